//! Thin HTTP surface over [`MercadoPublicoClient`].
//!
//! One route, `GET /licitaciones`: with `codigo` it looks a tender up by
//! exact code, otherwise it lists by `estado` (default `publicada`). The
//! response is the raw upstream JSON; failures keep the upstream body where
//! one exists and carry the HTTP-equivalent status of the error.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{MercadoPublicoClient, MercadoPublicoError, QueryParams};

#[derive(Debug, Deserialize)]
pub struct LicitacionesQuery {
    pub estado: Option<String>,
    pub codigo: Option<String>,
}

/// Builds the router for the proxy, with the client as shared state.
pub fn router(client: MercadoPublicoClient) -> Router {
    Router::new()
        .route("/licitaciones", get(licitaciones))
        .with_state(client)
}

async fn licitaciones(
    State(client): State<MercadoPublicoClient>,
    Query(query): Query<LicitacionesQuery>,
) -> Response {
    let result = match query.codigo.as_deref() {
        Some(codigo) => client.by_code(codigo).await,
        None => {
            client
                .by_status(query.estado.as_deref(), QueryParams::new())
                .await
        }
    };

    match result {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: MercadoPublicoError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    tracing::warn!(status = status.as_u16(), error = %err, "licitaciones query failed");

    let body = match err {
        // Domain errors already carry the upstream body; pass it through.
        MercadoPublicoError::Api { body, .. } => body,
        MercadoPublicoError::Http { body, .. } => {
            serde_json::from_str(&body).unwrap_or_else(|_| json!({ "detail": body }))
        }
        other => json!({ "detail": other.to_string() }),
    };

    (status, Json(body)).into_response()
}
