use std::collections::HashMap;

use serde_json::Value;

use crate::generator::loader::{
  LoadedSpec, SpecFormat, SpecLoader,
  fetch::{ExternalFetcher, FetchError},
};

/// In-memory documents keyed by their normalized location.
#[derive(Default)]
pub(super) struct MapFetcher {
  documents: HashMap<String, Result<String, FetchError>>,
}

impl MapFetcher {
  pub(super) fn with(mut self, document: &str, content: &Value) -> Self {
    self.documents.insert(document.to_string(), Ok(content.to_string()));
    self
  }

  pub(super) fn failing(mut self, document: &str, error: FetchError) -> Self {
    self.documents.insert(document.to_string(), Err(error));
    self
  }
}

impl ExternalFetcher for MapFetcher {
  fn fetch(&self, document: &str) -> Result<Vec<u8>, FetchError> {
    match self.documents.get(document) {
      Some(Ok(content)) => Ok(content.clone().into_bytes()),
      Some(Err(err)) => Err(err.clone()),
      None => Err(FetchError::Fatal(format!("{document} does not exist"))),
    }
  }
}

pub(super) fn load_json(spec: &Value) -> LoadedSpec {
  load_with(spec, &MapFetcher::default())
}

pub(super) fn load_with(spec: &Value, fetcher: &MapFetcher) -> LoadedSpec {
  SpecLoader::new(fetcher)
    .load(spec.to_string().as_bytes(), SpecFormat::Json)
    .expect("spec should load")
}
