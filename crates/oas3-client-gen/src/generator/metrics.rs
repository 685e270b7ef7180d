use strum::Display;

use crate::generator::types::{Definition, TypeGraph};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub structs_generated: usize,
  pub enums_generated: usize,
  pub unions_generated: usize,
  pub type_aliases_generated: usize,
  pub operations_converted: usize,
  pub forward_declarations: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_definition(&mut self, definition: &Definition) {
    match definition {
      Definition::Model(model) if model.variants.is_some() && model.fields.is_empty() => self.unions_generated += 1,
      Definition::Model(_) => self.structs_generated += 1,
      Definition::Enum(_) => self.enums_generated += 1,
      Definition::Alias(_) => self.type_aliases_generated += 1,
    }
    self.types_generated += 1;
  }

  pub fn record_graph(&mut self, graph: &TypeGraph) {
    for definition in graph.definitions() {
      self.record_definition(definition);
      if definition.forward_declared() {
        self.forward_declarations += 1;
      }
    }
    self.operations_converted += graph.operations.len();
  }

  pub fn record_cycles(&mut self, cycles: impl IntoIterator<Item = Vec<String>>) {
    for cycle in cycles {
      self.cycles_detected += 1;
      self.cycle_details.push(cycle);
    }
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

/// Non-fatal observations made while building the type model.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Operation id '{original}' is used more than once; renamed to '{renamed}'")]
  DuplicateOperationId { original: String, renamed: String },
  #[strum(to_string = "Type name '{requested}' is taken; '{pointer}' is named '{assigned}'")]
  NameCollision {
    pointer: String,
    requested: String,
    assigned: String,
  },
  #[strum(to_string = "[{operation_id}] path parameter '{name}' is not declared; assuming a required string")]
  UndeclaredPathParameter { operation_id: String, name: String },
  #[strum(to_string = "[{operation_id}] no JSON media type for {target}; using '{content_type}'")]
  NonJsonContent {
    operation_id: String,
    target: String,
    content_type: String,
  },
  #[strum(to_string = "Security scheme '{scheme}' ({kind}) is applied as {applied}")]
  SecuritySchemeApproximated {
    scheme: String,
    kind: String,
    applied: String,
  },
  #[strum(to_string = "Security scheme '{scheme}' is not supported and will be skipped: {reason}")]
  SecuritySchemeSkipped { scheme: String, reason: String },
}
