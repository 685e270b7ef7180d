//! Security schemes declared by the API.
pub use oas3_client_gen_support::{AuthScheme, Credential};
/// Declared as `api_key`.
pub const API_KEY: AuthScheme = AuthScheme::ApiKeyHeader("X-Api-Key");
