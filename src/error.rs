use serde_json::Value as JsonValue;

use crate::wire::CONCURRENT_REQUEST_CODE;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum MercadoPublicoError {
    /// Local configuration problem, detected before any request is built.
    #[error("configuration error: {0}")]
    Config(String),
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Error object returned by the Mercado Público API, possibly inside a
    /// 200 response.
    #[error("api error {codigo:?}: {mensaje}")]
    Api {
        /// `Codigo` field, when it could be read as a number.
        codigo: Option<i64>,
        /// `Mensaje` text from the API.
        mensaje: String,
        /// Raw error body, passed through to callers unmodified.
        body: JsonValue,
    },
    /// Response body that was not valid JSON.
    #[error("decode error: {0}")]
    Decode(String),
}

impl MercadoPublicoError {
    /// HTTP-equivalent status for this failure, used by the server layer.
    ///
    /// Configuration problems are a local 500; upstream statuses pass
    /// through; everything that went wrong while talking to the API maps to
    /// 502 unless the transport error carries a status of its own.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Config(_) => 500,
            Self::Transport(err) => err.status().map(|s| s.as_u16()).unwrap_or(502),
            Self::Http { status, .. } => *status,
            Self::Api { .. } | Self::Decode(_) => 502,
        }
    }

    /// Whether the failure is transient and worth another attempt.
    ///
    /// HTTP statuses, transport error kinds and the API's own error codes
    /// all go through this single check, so a "concurrent request" 10500 is
    /// retryable whichever path delivered it.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Decode(_) => false,
            Self::Transport(err) => {
                err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
            }
            Self::Http { status, .. } => matches!(*status, 429 | 502 | 503),
            Self::Api { codigo, .. } => *codigo == Some(CONCURRENT_REQUEST_CODE),
        }
    }
}
