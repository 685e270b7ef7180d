use serde_json::Value;

use crate::{
  error::Result,
  generator::{
    compose::compose,
    loader::{SpecFormat, SpecLoader, fetch::DefaultFetcher},
    metrics::GenerationWarning,
    resolver::Resolver,
    types::{TypeGraph, TypeGraphBuilder},
  },
};

pub(super) fn try_build(document: &Value) -> Result<(TypeGraph, Vec<GenerationWarning>)> {
  let fetcher = DefaultFetcher::new(".", None);
  let spec = SpecLoader::new(&fetcher).load(document.to_string().as_bytes(), SpecFormat::Json)?;
  let (graph, mut ctx) = Resolver::new(&spec).resolve()?;
  let definitions = compose(&graph, &mut ctx)?;
  let types = TypeGraphBuilder::new(&graph).build(definitions, &mut ctx)?;
  Ok((types, ctx.warnings))
}

pub(super) fn build(document: &Value) -> (TypeGraph, Vec<GenerationWarning>) {
  try_build(document).expect("type graph should build")
}

pub(super) fn document(paths: Value, schemas: Value) -> Value {
  serde_json::json!({
    "openapi": "3.0.3",
    "info": { "title": "Store", "version": "1.0.0" },
    "paths": paths,
    "components": { "schemas": schemas }
  })
}
