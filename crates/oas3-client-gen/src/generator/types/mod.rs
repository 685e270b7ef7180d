//! The type model: every named definition plus the operations that use them.

use indexmap::IndexMap;

pub mod arena;
mod builder;
pub mod content;
pub(crate) mod mapper;
pub mod model;
pub mod operation;

#[cfg(test)]
mod tests;

pub use self::{
  builder::TypeGraphBuilder,
  model::{Definition, TypeRef},
  operation::Operation,
};
use crate::generator::loader::document::{Info, SecuritySchemeObject, Server};

/// Output of the type graph builder. Read-only from here on.
#[derive(Debug, Clone)]
pub struct TypeGraph {
  definitions: Vec<Definition>,
  index: IndexMap<String, usize>,
  pub operations: Vec<Operation>,
  pub security_schemes: IndexMap<String, SecuritySchemeObject>,
  pub info: Info,
  pub servers: Vec<Server>,
}

impl TypeGraph {
  pub(crate) fn new(
    definitions: Vec<Definition>,
    operations: Vec<Operation>,
    security_schemes: IndexMap<String, SecuritySchemeObject>,
    info: Info,
    servers: Vec<Server>,
  ) -> Self {
    let index = definitions
      .iter()
      .enumerate()
      .map(|(i, definition)| (definition.name().to_string(), i))
      .collect();
    Self {
      definitions,
      index,
      operations,
      security_schemes,
      info,
      servers,
    }
  }

  /// Definitions in declaration order.
  #[must_use]
  pub fn definitions(&self) -> &[Definition] {
    &self.definitions
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&Definition> {
    self.index.get(name).map(|&i| &self.definitions[i])
  }

  #[must_use]
  pub fn operation(&self, id: &str) -> Option<&Operation> {
    self.operations.iter().find(|operation| operation.id == id)
  }
}
