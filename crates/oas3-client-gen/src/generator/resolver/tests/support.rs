use serde_json::Value;

use crate::generator::loader::{
  LoadedSpec, SpecFormat, SpecLoader,
  fetch::{ExternalFetcher, FetchError},
};

/// Serves a single external document.
pub(super) struct OneDocument(pub(super) &'static str, pub(super) Value);

impl ExternalFetcher for OneDocument {
  fn fetch(&self, document: &str) -> Result<Vec<u8>, FetchError> {
    if document == self.0 {
      Ok(self.1.to_string().into_bytes())
    } else {
      Err(FetchError::Fatal(format!("{document} does not exist")))
    }
  }
}

pub(super) fn load(spec: &Value) -> LoadedSpec {
  load_with(spec, &OneDocument("", Value::Null))
}

pub(super) fn load_with(spec: &Value, fetcher: &dyn ExternalFetcher) -> LoadedSpec {
  SpecLoader::new(fetcher)
    .load(spec.to_string().as_bytes(), SpecFormat::Json)
    .expect("spec should load")
}

pub(super) fn with_schemas(schemas: Value) -> Value {
  serde_json::json!({
    "openapi": "3.1.0",
    "info": { "title": "Test", "version": "1.0.0" },
    "paths": {},
    "components": { "schemas": schemas }
  })
}
