//! Typed view of the non-schema parts of an OpenAPI 3.x document.
//!
//! Schemas stay as raw JSON values and are classified separately, so only
//! the structure needed to enumerate operations is decoded here.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use strum::Display;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
  Ref {
    #[serde(rename = "$ref")]
    reference: String,
  },
  Item(T),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
  pub openapi: String,
  pub info: Info,
  #[serde(default)]
  pub servers: Vec<Server>,
  #[serde(default)]
  pub paths: Option<IndexMap<String, Value>>,
  #[serde(default)]
  pub components: Option<Components>,
  #[serde(default)]
  pub security: Option<Vec<SecurityRequirement>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Info {
  pub title: String,
  pub version: String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Server {
  pub url: String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
  #[serde(default)]
  pub schemas: IndexMap<String, Value>,
  #[serde(default)]
  pub security_schemes: IndexMap<String, RefOr<SecuritySchemeObject>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationObject {
  #[serde(default)]
  pub operation_id: Option<String>,
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub deprecated: bool,
  #[serde(default)]
  pub parameters: Vec<RefOr<ParameterObject>>,
  #[serde(default)]
  pub request_body: Option<RefOr<RequestBodyObject>>,
  #[serde(default)]
  pub responses: IndexMap<String, RefOr<ResponseObject>>,
  #[serde(default)]
  pub security: Option<Vec<SecurityRequirement>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
  Cookie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ParameterStyle {
  Form,
  SpaceDelimited,
  PipeDelimited,
  DeepObject,
  Simple,
  Matrix,
  Label,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterObject {
  pub name: String,
  #[serde(rename = "in")]
  pub location: ParameterLocation,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub deprecated: bool,
  #[serde(default)]
  pub style: Option<ParameterStyle>,
  #[serde(default)]
  pub explode: Option<bool>,
  #[serde(default)]
  pub schema: Option<Value>,
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestBodyObject {
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseObject {
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaTypeObject {
  #[serde(default)]
  pub schema: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeType {
  ApiKey,
  Http,
  #[serde(rename = "oauth2")]
  OAuth2,
  OpenIdConnect,
  #[serde(rename = "mutualTLS")]
  MutualTls,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchemeObject {
  #[serde(rename = "type")]
  pub scheme_type: SecuritySchemeType,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, rename = "in")]
  pub location: Option<ParameterLocation>,
  #[serde(default)]
  pub scheme: Option<String>,
  #[serde(default)]
  pub bearer_format: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
}

/// Scheme name -> required scopes. An empty requirement means "anonymous".
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

pub(crate) const HTTP_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch", "trace"];
