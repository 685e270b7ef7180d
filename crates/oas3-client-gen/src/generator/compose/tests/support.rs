use serde_json::{Value, json};

use crate::{
  error::Result,
  generator::{
    compose::compose,
    loader::{SpecFormat, SpecLoader, fetch::DefaultFetcher},
    resolver::Resolver,
    types::model::{Definition, ModelDefinition},
  },
};

pub(super) fn compose_schemas(schemas: Value) -> Result<Vec<Definition>> {
  let document = json!({
    "openapi": "3.1.0",
    "info": { "title": "Test", "version": "1.0.0" },
    "components": { "schemas": schemas }
  });
  let fetcher = DefaultFetcher::new(".", None);
  let spec = SpecLoader::new(&fetcher)
    .load(document.to_string().as_bytes(), SpecFormat::Json)
    .expect("spec should load");
  let (graph, mut ctx) = Resolver::new(&spec).resolve()?;
  compose(&graph, &mut ctx)
}

pub(super) fn model<'d>(definitions: &'d [Definition], name: &str) -> &'d ModelDefinition {
  match definitions.iter().find(|definition| definition.name() == name) {
    Some(Definition::Model(model)) => model,
    other => panic!("expected model {name}, found {other:?}"),
  }
}

pub(super) fn field_names(model: &ModelDefinition) -> Vec<&str> {
  model.fields.iter().map(|field| field.name.as_str()).collect()
}
