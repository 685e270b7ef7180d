use serde_json::{Value, json};

use crate::{
  error::Result,
  generator::{
    compose::compose,
    emit::{Artifacts, Backend, ClientIr, RustBackend},
    loader::{SpecFormat, SpecLoader, fetch::DefaultFetcher},
    metrics::GenerationWarning,
    resolver::Resolver,
    types::TypeGraphBuilder,
  },
};

pub(super) fn try_lower(document: &Value) -> Result<(ClientIr, Vec<GenerationWarning>)> {
  let fetcher = DefaultFetcher::new(".", None);
  let spec = SpecLoader::new(&fetcher).load(document.to_string().as_bytes(), SpecFormat::Json)?;
  let (graph, mut ctx) = Resolver::new(&spec).resolve()?;
  let definitions = compose(&graph, &mut ctx)?;
  let types = TypeGraphBuilder::new(&graph).build(definitions, &mut ctx)?;
  ClientIr::lower(&types, "petstore_client")
}

pub(super) fn lower(document: &Value) -> (ClientIr, Vec<GenerationWarning>) {
  try_lower(document).expect("document should lower")
}

pub(super) fn render(document: &Value) -> Artifacts {
  let (ir, _) = lower(document);
  RustBackend::default().render(&ir).expect("rust backend should render")
}

pub(super) fn file<'a>(artifacts: &'a Artifacts, name: &str) -> &'a str {
  artifacts.get(name).unwrap_or_else(|| panic!("missing artifact {name}"))
}

pub(super) fn petstore() -> Value {
  json!({
    "openapi": "3.0.3",
    "info": { "title": "Petstore", "version": "1.2.0", "description": "Pets for sale." },
    "servers": [{ "url": "https://petstore.example.com/v1" }],
    "security": [{ "apiKey": [] }],
    "paths": {
      "/pets": {
        "get": {
          "operationId": "listPets",
          "summary": "List pets",
          "security": [],
          "parameters": [
            { "name": "limit", "in": "query", "schema": { "type": "integer", "format": "int32" } },
            {
              "name": "tags",
              "in": "query",
              "explode": false,
              "schema": { "type": "array", "items": { "type": "string" } }
            },
            {
              "name": "filter",
              "in": "query",
              "style": "deepObject",
              "description": "Narrow the listing.",
              "schema": { "$ref": "#/components/schemas/PetFilter" }
            }
          ],
          "responses": {
            "200": {
              "description": "A page of pets",
              "content": {
                "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } } }
              }
            }
          }
        },
        "post": {
          "operationId": "createPet",
          "requestBody": {
            "required": true,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
          },
          "responses": {
            "201": { "description": "Created" },
            "default": {
              "description": "Unexpected error",
              "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
            }
          }
        }
      },
      "/pets/{petId}": {
        "get": {
          "operationId": "getPet",
          "parameters": [
            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } },
            { "name": "X-Request-Id", "in": "header", "schema": { "type": "string" } }
          ],
          "responses": {
            "200": {
              "description": "The pet",
              "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
            },
            "404": { "description": "Not found" }
          }
        }
      }
    },
    "components": {
      "securitySchemes": {
        "apiKey": { "type": "apiKey", "name": "X-Api-Key", "in": "header" },
        "oauth": { "type": "oauth2", "flows": {} },
        "digest": { "type": "http", "scheme": "digest" }
      },
      "schemas": {
        "Pet": {
          "oneOf": [{ "$ref": "#/components/schemas/Cat" }, { "$ref": "#/components/schemas/Dog" }],
          "discriminator": { "propertyName": "petType", "mapping": { "dog": "#/components/schemas/Dog" } }
        },
        "Cat": {
          "type": "object",
          "required": ["petType", "name"],
          "properties": {
            "petType": { "type": "string" },
            "name": { "type": "string" },
            "lives": { "type": "integer", "format": "int32", "default": 9 }
          }
        },
        "Dog": {
          "type": "object",
          "required": ["petType"],
          "properties": {
            "petType": { "type": "string" },
            "status": { "$ref": "#/components/schemas/Status" },
            "friends": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
          }
        },
        "Status": { "type": "string", "enum": ["available", "on-hold", "sold"] },
        "Priority": { "type": "integer", "enum": [1, 2, -1] },
        "PetFilter": {
          "type": "object",
          "properties": { "color": { "type": "string" }, "type": { "type": "string" } }
        },
        "Shape": { "oneOf": [{ "type": "string" }, { "$ref": "#/components/schemas/Cat" }] },
        "Labels": { "type": "object", "additionalProperties": { "type": "string" } },
        "Error": {
          "type": "object",
          "required": ["message"],
          "properties": { "message": { "type": "string" }, "code": { "type": "integer", "nullable": true } }
        }
      }
    }
  })
}
