use indexmap::IndexMap;

use super::model::Definition;
use crate::error::{GenerationError, Result};

/// Definitions keyed by type name. Names may be reserved before their body
/// is known; the first reservation fixes the declaration position.
#[derive(Debug, Default)]
pub struct TypeArena {
  slots: IndexMap<String, Option<Definition>>,
}

impl TypeArena {
  pub fn reserve(&mut self, name: &str) {
    self.slots.entry(name.to_string()).or_insert(None);
  }

  pub fn define(&mut self, definition: Definition) -> Result<()> {
    let slot = self.slots.entry(definition.name().to_string()).or_insert(None);
    if slot.is_some() {
      return Err(GenerationError::unsupported(
        definition.source().to_string(),
        format!("type '{}' is defined twice", definition.name()),
      ));
    }
    *slot = Some(definition);
    Ok(())
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&Definition> {
    self.slots.get(name).and_then(Option::as_ref)
  }

  #[must_use]
  pub fn is_reserved(&self, name: &str) -> bool {
    self.slots.contains_key(name)
  }

  /// All definitions in declaration order; fails on any unfilled reservation.
  pub fn finish(self) -> Result<Vec<Definition>> {
    self
      .slots
      .into_iter()
      .map(|(name, slot)| {
        slot.ok_or_else(|| GenerationError::unresolved(name, None, "type was reserved but never defined"))
      })
      .collect()
  }
}
