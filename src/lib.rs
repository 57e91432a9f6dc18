//! `mercadopublico-http` is a retrying HTTP proxy for Chile's Mercado
//! Público public tenders API.
//!
//! The crate wraps the `licitaciones.json` endpoint with ergonomic methods:
//! - [`MercadoPublicoClient::by_status`]
//! - [`MercadoPublicoClient::by_code`]
//!
//! and ships a thin [`server`] router exposing them as `GET /licitaciones`.
//! Transient upstream failures (rate limiting, gateway errors, timeouts and
//! the API's "concurrent request" code 10500) are retried with linear
//! backoff before being surfaced.

mod client;
mod error;
mod options;
mod params;
mod wire;

pub mod server;

pub use client::{MercadoPublicoClient, DEFAULT_BASE_URL, DEFAULT_STATUS};
pub use error::MercadoPublicoError;
pub use options::ClientOptions;
pub use params::{ParamValue, QueryParams};
pub use wire::{ApiErrorBody, CONCURRENT_REQUEST_CODE};

pub type Result<T> = std::result::Result<T, MercadoPublicoError>;
