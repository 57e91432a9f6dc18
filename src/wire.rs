//! Shapes the Mercado Público API puts on the wire.
//!
//! The API does not reserve error reporting for non-2xx statuses: a request
//! that hits its concurrency limit, or carries a bad ticket, can come back
//! as HTTP 200 with an error object `{"Codigo": ..., "Mensaje": ...}` in
//! place of the payload. Detection is therefore structural, never
//! status-based.

use serde_json::Value as JsonValue;

/// `Codigo` the API reports when too many simultaneous requests hit the
/// same ticket. Transient; the request is worth retrying.
pub const CONCURRENT_REQUEST_CODE: i64 = 10500;

/// Error payload extracted from a transport-success response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Numeric `Codigo`, when it could be coerced from a number or a
    /// numeric string. The API is not consistent about which it sends.
    pub codigo: Option<i64>,
    /// `Mensaje` text.
    pub mensaje: String,
}

impl ApiErrorBody {
    pub fn is_retryable(&self) -> bool {
        self.codigo == Some(CONCURRENT_REQUEST_CODE)
    }
}

/// Checks whether a response body is a domain error.
///
/// A body counts as a domain error exactly when it is a JSON object
/// containing both the `Codigo` and `Mensaje` keys. Anything else (arrays,
/// scalars, objects missing either key) is a payload.
pub fn detect_api_error(body: &JsonValue) -> Option<ApiErrorBody> {
    let object = body.as_object()?;
    if !object.contains_key("Codigo") || !object.contains_key("Mensaje") {
        return None;
    }

    let codigo = coerce_codigo(&object["Codigo"]);
    let mensaje = match &object["Mensaje"] {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    };

    Some(ApiErrorBody { codigo, mensaje })
}

fn coerce_codigo(value: &JsonValue) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::detect_api_error;

    #[test]
    fn detects_error_object_with_numeric_codigo() {
        let body = json!({"Codigo": 10500, "Mensaje": "Peticiones simultáneas"});
        let error = detect_api_error(&body).expect("must be detected");
        assert_eq!(error.codigo, Some(10500));
        assert_eq!(error.mensaje, "Peticiones simultáneas");
        assert!(error.is_retryable());
    }

    #[test]
    fn detects_error_object_with_string_codigo() {
        let body = json!({"Codigo": "10500", "Mensaje": "Peticiones simultáneas"});
        let error = detect_api_error(&body).expect("must be detected");
        assert_eq!(error.codigo, Some(10500));
        assert!(error.is_retryable());
    }

    #[test]
    fn non_numeric_codigo_is_an_error_but_never_retryable() {
        let body = json!({"Codigo": "ERR", "Mensaje": "algo falló"});
        let error = detect_api_error(&body).expect("must be detected");
        assert_eq!(error.codigo, None);
        assert!(!error.is_retryable());
    }

    #[test]
    fn object_missing_either_key_is_a_payload() {
        assert!(detect_api_error(&json!({"Codigo": 1})).is_none());
        assert!(detect_api_error(&json!({"Mensaje": "hola"})).is_none());
        assert!(detect_api_error(&json!({"Cantidad": 3, "Listado": []})).is_none());
    }

    #[test]
    fn non_objects_are_payloads() {
        assert!(detect_api_error(&json!([{"Codigo": 1, "Mensaje": "x"}])).is_none());
        assert!(detect_api_error(&json!("Codigo")).is_none());
        assert!(detect_api_error(&json!(10500)).is_none());
        assert!(detect_api_error(&json!(null)).is_none());
    }
}
