use std::fmt;
use std::time::Duration;

use reqwest::header;
use serde_json::Value as JsonValue;
use tokio::time::sleep;

use crate::{wire, ClientOptions, MercadoPublicoError, QueryParams, Result};

/// Public `licitaciones` endpoint of the Mercado Público API.
pub const DEFAULT_BASE_URL: &str =
    "https://api.mercadopublico.cl/servicios/v1/publico/licitaciones.json";

/// Tender status queried when the caller does not pick one.
pub const DEFAULT_STATUS: &str = "publicada";

#[derive(Clone)]
/// HTTP client for the Mercado Público public tenders API.
///
/// Every query carries the configured ticket and is retried with linear
/// backoff when the failure looks transient.
pub struct MercadoPublicoClient {
    http: reqwest::Client,
    base_url: String,
    ticket: String,
    options: ClientOptions,
}

impl fmt::Debug for MercadoPublicoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MercadoPublicoClient")
            .field("base_url", &self.base_url)
            .field("ticket", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl MercadoPublicoClient {
    /// Creates a client for an explicit endpoint and ticket.
    ///
    /// The ticket may be empty at construction time; every query checks it
    /// before building a request and fails with a configuration error when
    /// it is missing.
    pub fn new(base_url: impl Into<String>, ticket: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            ticket: ticket.into(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `MP_API_BASE_URL` — endpoint URL, defaults to [`DEFAULT_BASE_URL`]
    /// - `MP_API_TICKET` — authentication ticket (checked per call, so a
    ///   missing variable surfaces as a 500 on the first query, not here)
    /// - `MP_API_RETRY_ATTEMPTS` — total attempts, default 3
    /// - `MP_API_RETRY_DELAY_MS` — linear backoff base, default 1500
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var("MP_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let ticket = std::env::var("MP_API_TICKET").unwrap_or_default();

        let defaults = ClientOptions::default();
        let options = ClientOptions {
            timeout_ms: defaults.timeout_ms,
            retry_attempts: env_parse("MP_API_RETRY_ATTEMPTS", defaults.retry_attempts),
            retry_delay_ms: env_parse("MP_API_RETRY_DELAY_MS", defaults.retry_delay_ms),
        };

        Self::new(base_url, ticket).with_options(options)
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Queries tenders by status (`estado`), defaulting to
    /// [`DEFAULT_STATUS`] when `estado` is `None`.
    ///
    /// Extra parameters are merged on top, so a caller can add filters such
    /// as `fecha` or override `estado` entirely.
    pub async fn by_status(
        &self,
        estado: Option<&str>,
        extra_params: QueryParams,
    ) -> Result<JsonValue> {
        let ticket = self.ensure_ticket()?;
        let params = QueryParams::new()
            .set("estado", estado.unwrap_or(DEFAULT_STATUS))
            .set("ticket", ticket)
            .merge(extra_params);
        self.fetch(params).await
    }

    /// Queries a single tender by its exact code (`codigo`).
    pub async fn by_code(&self, codigo: &str) -> Result<JsonValue> {
        let ticket = self.ensure_ticket()?;
        let params = QueryParams::new()
            .set("codigo", codigo)
            .set("ticket", ticket);
        self.fetch(params).await
    }

    /// Issues a GET with `params`, retrying transient failures.
    ///
    /// Attempts are bounded by `retry_attempts`; the n-th retry waits
    /// `retry_delay_ms * n`. Non-retryable failures and exhausted attempts
    /// surface the last observed error.
    pub async fn fetch(&self, params: QueryParams) -> Result<JsonValue> {
        let attempts = self.options.retry_attempts.max(1);
        let mut attempt = 0usize;
        loop {
            match self.try_fetch(&params).await {
                Ok(payload) => return Ok(payload),
                Err(err) => {
                    if err.is_retryable() && attempt + 1 < attempts {
                        self.wait_before_retry(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Single attempt: send, check the status, parse the body, and unwrap
    /// the API's error-in-200 envelope when present.
    async fn try_fetch(&self, params: &QueryParams) -> Result<JsonValue> {
        let response = self
            .http
            .get(&self.base_url)
            .query(params.pairs())
            .header(header::ACCEPT, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms))
            .send()
            .await
            .map_err(MercadoPublicoError::Transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(MercadoPublicoError::Transport)?;

        if !status.is_success() {
            return Err(MercadoPublicoError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let payload: JsonValue = serde_json::from_str(&body).map_err(|err| {
            MercadoPublicoError::Decode(format!("invalid response JSON: {err}; body: {body}"))
        })?;

        // The API can answer 200 with { Codigo, Mensaje } instead of data.
        if let Some(api_error) = wire::detect_api_error(&payload) {
            return Err(MercadoPublicoError::Api {
                codigo: api_error.codigo,
                mensaje: api_error.mensaje,
                body: payload,
            });
        }

        Ok(payload)
    }

    fn ensure_ticket(&self) -> Result<&str> {
        let ticket = self.ticket.trim();
        if ticket.is_empty() {
            return Err(MercadoPublicoError::Config(
                "MP_API_TICKET is not configured".to_owned(),
            ));
        }
        Ok(ticket)
    }

    /// Waits before the next retry attempt, linearly longer each time.
    async fn wait_before_retry(&self, attempt: usize) {
        let delay_ms = self
            .options
            .retry_delay_ms
            .saturating_mul(attempt as u64 + 1);

        tracing::debug!(delay_ms, attempt, "retrying Mercado Público request");

        sleep(Duration::from_millis(delay_ms)).await;
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
