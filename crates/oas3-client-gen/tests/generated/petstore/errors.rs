//! Errors returned by client calls.
pub use oas3_client_gen_support::{ApiError, ClientError, ErrorBody, TransportError};
/// Result of every client call.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
/// Decodes the JSON body of a non-2xx response into one of the declared
/// error models. Returns `None` when the body is not JSON or has another
/// shape.
pub fn error_body<T: serde::de::DeserializeOwned>(error: &ApiError) -> Option<T> {
    match &error.body {
        ErrorBody::Json(value) => serde_json::from_value(value.clone()).ok(),
        ErrorBody::Text(_) | ErrorBody::Empty => None,
    }
}
