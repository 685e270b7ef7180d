//! Security schemes declared by the API.
pub use oas3_client_gen_support::{AuthScheme, Credential};
/// Declared as `keeper`.
pub const KEEPER: AuthScheme = AuthScheme::Bearer;
