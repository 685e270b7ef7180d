use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;

use crate::{
  error::{GenerationError, Result},
  generator::{
    loader::{
      LoadedSpec, MediaSource,
      pointer::Pointer,
      schema::{AdditionalProperties, ObjectShape, SchemaKind},
    },
    metrics::GenerationWarning,
    types::content::select_media,
  },
  naming::identifiers::{ensure_unique, to_pascal_case, to_type_name},
};

const MAX_ALIAS_HOPS: usize = 32;

/// Type names handed out during one run, in assignment order.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
  by_pointer: IndexMap<Pointer, String>,
  taken: BTreeSet<String>,
}

impl NameTable {
  #[must_use]
  pub fn get(&self, pointer: &Pointer) -> Option<&str> {
    self.by_pointer.get(pointer).map(String::as_str)
  }

  #[must_use]
  pub fn contains(&self, pointer: &Pointer) -> bool {
    self.by_pointer.contains_key(pointer)
  }

  /// Named pointers in the order their names were assigned.
  pub fn iter(&self) -> impl Iterator<Item = (&Pointer, &str)> {
    self.by_pointer.iter().map(|(pointer, name)| (pointer, name.as_str()))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.by_pointer.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.by_pointer.is_empty()
  }

  /// Claims a name for `pointer`, suffixing it when already taken.
  pub(crate) fn claim(&mut self, pointer: &Pointer, requested: &str, warnings: &mut Vec<GenerationWarning>) -> String {
    if let Some(existing) = self.by_pointer.get(pointer) {
      return existing.clone();
    }
    let assigned = self.reserve(requested);
    let base = to_type_name(requested);
    if assigned != base {
      warnings.push(GenerationWarning::NameCollision {
        pointer: pointer.to_string(),
        requested: base,
        assigned: assigned.clone(),
      });
    }
    self.by_pointer.insert(pointer.clone(), assigned.clone());
    assigned
  }

  /// Takes a name that has no schema behind it.
  pub(crate) fn reserve(&mut self, requested: &str) -> String {
    let assigned = ensure_unique(&to_type_name(requested), &self.taken);
    self.taken.insert(assigned.clone());
    assigned
  }
}

/// Names every declared node reachable from the operation and component
/// roots.
///
/// Operations are walked before components, each in document order, and the
/// first schema to ask for a name keeps it. Later requests for the same name
/// are suffixed.
pub(crate) struct Namer<'a> {
  spec: &'a LoadedSpec,
  names: &'a mut NameTable,
  warnings: &'a mut Vec<GenerationWarning>,
  visited: HashSet<Pointer>,
}

impl<'a> Namer<'a> {
  pub(crate) fn new(spec: &'a LoadedSpec, names: &'a mut NameTable, warnings: &'a mut Vec<GenerationWarning>) -> Self {
    Self {
      spec,
      names,
      warnings,
      visited: HashSet::new(),
    }
  }

  pub(crate) fn run(mut self, operation_ids: &[String]) -> Result<()> {
    let spec = self.spec;

    for (operation, id) in spec.operations.iter().zip(operation_ids) {
      let prefix = to_pascal_case(id);
      for parameter in &operation.parameters {
        if let Some(schema) = &parameter.schema {
          self.walk(schema, &format!("{prefix}{}", to_pascal_case(&parameter.name)), true)?;
        }
      }
      if let Some(body) = &operation.request_body {
        self.walk_media(&body.contents, &format!("{prefix}Request"))?;
      }
      for response in &operation.responses {
        let role = if is_success_status(&response.status) {
          format!("{prefix}Response")
        } else {
          format!("{prefix}Response{}", status_suffix(&response.status))
        };
        self.walk_media(&response.contents, &role)?;
      }
    }

    for component in &spec.components {
      let name = component.component_name().unwrap_or_default();
      let owner = match self.alias_target(component)? {
        Some(target) if self.takes_component_name(&target) => target,
        _ => component.clone(),
      };
      self.names.claim(&owner, &name, self.warnings);
      self.walk(component, &name, true)?;
    }

    Ok(())
  }

  fn walk_media(&mut self, contents: &[MediaSource], role: &str) -> Result<()> {
    if let Some(schema) = select_media(contents).and_then(|media| media.schema.as_ref()) {
      self.walk(schema, role, true)?;
    }
    Ok(())
  }

  /// Final target of a component that is only a `$ref`.
  fn alias_target(&self, component: &Pointer) -> Result<Option<Pointer>> {
    let mut current = component.clone();
    for _ in 0..MAX_ALIAS_HOPS {
      match self.node_kind(&current)? {
        SchemaKind::Ref(target) => current = target.clone(),
        _ => return Ok((&current != component).then_some(current)),
      }
    }
    Err(GenerationError::unsupported(
      component.to_string(),
      "reference chain does not reach a concrete schema",
    ))
  }

  /// An unnamed declarable schema outside `components/schemas` takes the name
  /// of the component that aliases it.
  fn takes_component_name(&self, target: &Pointer) -> bool {
    !self.spec.components.contains(target)
      && !self.names.contains(target)
      && self.spec.node(target).is_some_and(|node| node.kind.is_declarable())
  }

  fn node_kind(&self, pointer: &Pointer) -> Result<&'a SchemaKind> {
    let spec = self.spec;
    spec
      .node(pointer)
      .map(|node| &node.kind)
      .ok_or_else(|| GenerationError::unresolved(pointer.to_string(), None, "schema was not loaded"))
  }

  fn walk(&mut self, pointer: &Pointer, suggested: &str, declare: bool) -> Result<()> {
    if declare && !self.visited.insert(pointer.clone()) {
      return Ok(());
    }
    let kind = self.node_kind(pointer)?;

    let base = match self.names.get(pointer) {
      Some(name) => name.to_string(),
      None if declare && kind.is_declarable() => self.names.claim(pointer, suggested, self.warnings),
      None => suggested.to_string(),
    };

    match kind {
      SchemaKind::Object(shape) => self.walk_shape(shape, &base)?,
      SchemaKind::Array { items: Some(items), .. } => self.walk(items, &format!("{base}Item"), true)?,
      SchemaKind::AllOf { members, own } => {
        for member in members {
          // Inline members are merged into the owner and share its name.
          let inline = !matches!(self.node_kind(member)?, SchemaKind::Ref(_));
          self.walk(member, &base, !inline)?;
        }
        if let Some(shape) = own {
          self.walk_shape(shape, &base)?;
        }
      }
      SchemaKind::OneOf(union) | SchemaKind::AnyOf(union) => {
        for (i, member) in union.members.iter().enumerate() {
          self.walk(member, &format!("{base}Variant{}", i + 1), true)?;
        }
      }
      SchemaKind::Ref(target) => self.walk(target, &default_name(target), true)?,
      SchemaKind::Array { items: None, .. } | SchemaKind::Primitive { .. } | SchemaKind::Enum { .. } | SchemaKind::Any => {}
    }

    Ok(())
  }

  fn walk_shape(&mut self, shape: &'a ObjectShape, base: &str) -> Result<()> {
    for (property, child) in &shape.properties {
      self.walk(child, &format!("{base}{}", to_pascal_case(property)), true)?;
    }
    if let AdditionalProperties::Typed(value) = &shape.additional {
      self.walk(value, &format!("{base}Value"), true)?;
    }
    Ok(())
  }
}

/// Name suggested for a schema reached only through a `$ref`.
pub(crate) fn default_name(pointer: &Pointer) -> String {
  pointer
    .component_name()
    .or_else(|| pointer.last_segment())
    .or_else(|| {
      pointer
        .document()
        .rsplit('/')
        .next()
        .map(|file| file.split('.').next().unwrap_or(file).to_string())
    })
    .unwrap_or_default()
}

fn status_suffix(status: &str) -> String {
  if status.eq_ignore_ascii_case("default") {
    "Default".to_string()
  } else {
    status.to_ascii_uppercase()
  }
}

/// `2xx` codes and the `2XX` class count as success.
pub(crate) fn is_success_status(status: &str) -> bool {
  status.starts_with('2') && status.len() == 3
}
