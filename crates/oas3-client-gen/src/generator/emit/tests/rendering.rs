use serde_json::json;

use super::support::{file, lower, petstore, render};
use crate::generator::emit::{Backend, RustBackend, Visibility};

#[test]
fn test_rust_backend_emits_one_file_per_concern() {
  let artifacts = render(&petstore());

  let names: Vec<&str> = artifacts.names().collect();
  assert_eq!(names, vec!["models.rs", "client.rs", "errors.rs", "auth.rs", "mod.rs"]);
  for (name, contents) in artifacts.iter() {
    syn::parse_file(contents).unwrap_or_else(|err| panic!("{name} is not valid Rust: {err}\n{contents}"));
  }
}

#[test]
fn test_rendering_is_byte_identical() {
  let (ir, _) = lower(&petstore());
  let backend = RustBackend::default();

  let first = backend.render(&ir).expect("first render");
  let second = backend.render(&ir).expect("second render");
  assert_eq!(first, second);

  let (again, _) = lower(&petstore());
  assert_eq!(backend.render(&again).expect("render after reload"), first);
}

#[test]
fn test_structs_keep_wire_names_and_optionality() {
  let artifacts = render(&petstore());
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("use serde::{Deserialize, Serialize};"));
  assert!(models.contains("pub struct Cat {"));
  assert!(models.contains("#[serde(rename = \"petType\")]"));
  assert!(models.contains("pub pet_type: String,"));
  assert!(models.contains("/// Defaults to `9`."));
  assert!(models.contains("#[serde(default, skip_serializing_if = \"Option::is_none\")]"));
  assert!(models.contains("pub lives: Option<i32>,"));
  assert!(models.contains("pub code: Option<i64>,"));
  assert!(models.contains("pub message: String,"));
}

#[test]
fn test_keyword_properties_become_raw_identifiers() {
  let artifacts = render(&petstore());
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("pub r#type: Option<String>,"));
  assert!(!models.contains("rename = \"type\""));
}

#[test]
fn test_discriminated_union_uses_support_macro() {
  let artifacts = render(&petstore());
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("oas3_client_gen_support::discriminated_enum!"));
  assert!(models.contains("\"petType\""));
  assert!(models.contains("\"dog\""));
  assert!(models.contains("\"Cat\""));
}

#[test]
fn test_positional_union_is_untagged() {
  let artifacts = render(&petstore());
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("#[serde(untagged)]"));
  assert!(models.contains("pub enum Shape {"));
  assert!(models.contains("String(String)"));
  assert!(models.contains("Cat(Cat)"));
}

#[test]
fn test_enums_are_closed() {
  let artifacts = render(&petstore());
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("pub enum Status {"));
  assert!(models.contains("#[serde(rename = \"on-hold\")]"));
  assert!(models.contains("OnHold"));
  assert!(models.contains("pub fn as_str(self) -> &'static str"));

  assert!(models.contains("pub enum Priority {"));
  assert!(models.contains("#[serde(try_from = \"i64\", into = \"i64\")]"));
  assert!(models.contains("ValueMinus1"));
  assert!(models.contains("impl TryFrom<i64> for Priority"));
}

#[test]
fn test_map_schemas_become_aliases() {
  let artifacts = render(&petstore());
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("pub type Labels = std::collections::BTreeMap<String, String>;"));
}

#[test]
fn test_client_methods_follow_operations() {
  let artifacts = render(&petstore());
  let client = file(&artifacts, "client.rs");

  assert!(client.contains("use oas3_client_gen_support as support;"));
  assert!(client.contains("use super::models;"));
  assert!(client.contains("pub struct Client {"));
  assert!(client.contains("pub const DEFAULT_BASE_URL: &'static str = \"https://petstore.example.com/v1\";"));

  assert!(client.contains("pub async fn list_pets("));
  assert!(client.contains("limit: Option<i32>"));
  assert!(client.contains("tags: Option<&[String]>"));
  assert!(client.contains("filter: Option<&models::PetFilter>"));
  assert!(client.contains("Result<Vec<models::Pet>>"));
  assert!(client.contains("support::PairRule::Join(support::Delimiter::Comma)"));
  assert!(client.contains("support::PairRule::DeepObject"));

  assert!(client.contains("pub async fn create_pet("));
  assert!(client.contains("body: &models::Pet"));
  assert!(client.contains("support::ClientCore::json_body("));
  assert!(client.contains("support::ClientCore::send_empty(request).await"));

  assert!(client.contains("pub async fn get_pet("));
  assert!(client.contains("pet_id: i64"));
  assert!(client.contains("x_request_id: Option<&str>"));
  assert!(client.contains("\"/pets/{}\""));
  assert!(client.contains("support::SegmentRule::Simple { explode: false }"));
  assert!(client.contains("&[auth::API_KEY]"));
  assert!(client.contains("/// - `404`: Not found"));
}

#[test]
fn test_auth_constants_cover_supported_schemes() {
  let artifacts = render(&petstore());
  let auth = file(&artifacts, "auth.rs");

  assert!(auth.contains("pub use oas3_client_gen_support::{AuthScheme, Credential};"));
  assert!(auth.contains("pub const API_KEY: AuthScheme = AuthScheme::ApiKeyHeader(\"X-Api-Key\");"));
  assert!(auth.contains("pub const OAUTH: AuthScheme = AuthScheme::Bearer;"));
  assert!(!auth.contains("DIGEST"));
}

#[test]
fn test_module_root_carries_header_and_reexports() {
  let artifacts = render(&petstore());
  let root = file(&artifacts, "mod.rs");

  assert!(root.starts_with("//! AUTO-GENERATED CODE - DO NOT EDIT!"));
  assert!(root.contains("//! Petstore (version 1.2.0)"));
  assert!(root.contains("`petstore_client`"));
  for module in ["auth", "client", "errors", "models"] {
    assert!(root.contains(&format!("pub mod {module};")), "missing module {module}");
  }
  assert!(root.contains("client::Client"));

  let errors = file(&artifacts, "errors.rs");
  assert!(errors.contains("pub type Result<T, E = ClientError> = std::result::Result<T, E>;"));
  assert!(errors.contains("pub fn error_body<T: serde::de::DeserializeOwned>"));
}

#[test]
fn test_crate_visibility_applies_to_every_item() {
  let (ir, _) = lower(&petstore());
  let artifacts = RustBackend::new(Visibility::Crate).render(&ir).expect("render");

  let models = file(&artifacts, "models.rs");
  assert!(models.contains("pub(crate) struct Cat {"));
  assert!(!models.contains("pub struct"));
  assert!(file(&artifacts, "client.rs").contains("pub(crate) async fn get_pet("));
  assert!(file(&artifacts, "mod.rs").contains("pub(crate) mod models;"));
}

#[test]
fn test_cycles_render_with_indirection() {
  let document = json!({
    "openapi": "3.0.3",
    "info": { "title": "Tree", "version": "1" },
    "paths": {},
    "components": {
      "schemas": {
        "Node": {
          "type": "object",
          "required": ["value"],
          "properties": {
            "value": { "type": "integer" },
            "parent": { "$ref": "#/components/schemas/Node" },
            "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
          }
        }
      }
    }
  });
  let artifacts = render(&document);
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("pub parent: Option<Box<Node>>,"));
  assert!(models.contains("pub children: Option<Vec<Node>>,"));
  syn::parse_file(models).expect("models should parse");
}

#[test]
fn test_cycle_through_all_of_base_is_boxed() {
  let document = json!({
    "openapi": "3.0.3",
    "info": { "title": "List", "version": "1" },
    "paths": {},
    "components": {
      "schemas": {
        "Base": {
          "type": "object",
          "properties": { "next": { "$ref": "#/components/schemas/Node" } }
        },
        "Node": {
          "allOf": [
            { "$ref": "#/components/schemas/Base" },
            { "type": "object", "properties": { "value": { "type": "string" } } }
          ]
        }
      }
    }
  });
  let artifacts = render(&document);
  let models = file(&artifacts, "models.rs");

  assert!(models.contains("pub next: Option<Box<Node>>,"), "{models}");
  assert!(models.contains("pub struct Base {"));
}

#[test]
fn test_text_and_binary_bodies_use_raw_payloads() {
  let document = json!({
    "openapi": "3.0.3",
    "info": { "title": "Files", "version": "1" },
    "paths": {
      "/files/{name}": {
        "put": {
          "operationId": "uploadFile",
          "parameters": [{ "name": "name", "in": "path", "required": true, "schema": { "type": "string" } }],
          "requestBody": { "required": true, "content": { "application/octet-stream": {} } },
          "responses": { "200": { "description": "ok", "content": { "text/plain": {} } } }
        },
        "get": {
          "operationId": "downloadFile",
          "parameters": [{ "name": "name", "in": "path", "required": true, "schema": { "type": "string" } }],
          "responses": { "200": { "description": "ok", "content": { "application/pdf": {} } } }
        }
      }
    }
  });
  let artifacts = render(&document);
  let client = file(&artifacts, "client.rs");

  assert!(client.contains("body: &[u8]"));
  assert!(client.contains("body.to_vec()"));
  assert!(client.contains("\"application/octet-stream\""));
  assert!(client.contains("Result<String>"));
  assert!(client.contains("support::ClientCore::send_text(request).await"));
  assert!(client.contains("Result<Vec<u8>>"));
  assert!(client.contains("support::ClientCore::send_bytes(request).await"));
  assert!(!client.contains("use super::models;"));
}
