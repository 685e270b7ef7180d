use std::collections::BTreeSet;

use super::model::{Primitive, TypeRef};
use crate::{
  error::{GenerationError, Result},
  generator::{
    loader::{
      pointer::Pointer,
      schema::{AdditionalProperties, SchemaKind, SchemaNode},
    },
    resolver::{NameTable, ResolvedGraph},
  },
};

const MAX_REF_HOPS: usize = 32;

/// Maps schema pointers to type references.
pub(crate) struct TypeMapper<'g, 'a> {
  graph: &'g ResolvedGraph<'a>,
  names: &'g NameTable,
}

impl<'g, 'a> TypeMapper<'g, 'a> {
  pub(crate) fn new(graph: &'g ResolvedGraph<'a>, names: &'g NameTable) -> Self {
    Self { graph, names }
  }

  pub(crate) fn node(&self, pointer: &Pointer) -> Result<&'a SchemaNode> {
    let spec = self.graph.spec;
    spec
      .node(pointer)
      .ok_or_else(|| GenerationError::unresolved(pointer.to_string(), None, "schema was not loaded"))
  }

  /// Names declared inside the strongly connected component holding `pointer`.
  pub(crate) fn cycle_names(&self, pointer: &Pointer) -> BTreeSet<&'g str> {
    let names = self.names;
    self
      .graph
      .cycles
      .iter()
      .find(|cycle| cycle.contains(pointer))
      .map(|cycle| cycle.iter().filter_map(|member| names.get(member)).collect())
      .unwrap_or_default()
  }

  /// First schema along a `$ref` chain that is not itself a reference.
  pub(crate) fn follow(&self, pointer: &Pointer) -> Result<Pointer> {
    let mut current = pointer.clone();
    for _ in 0..MAX_REF_HOPS {
      match &self.node(&current)?.kind {
        SchemaKind::Ref(target) => current = target.clone(),
        _ => return Ok(current),
      }
    }
    Err(GenerationError::unsupported(
      pointer.to_string(),
      "reference chain does not reach a concrete schema",
    ))
  }

  /// Type of a schema used directly by an operation.
  pub(crate) fn root(&self, pointer: &Pointer) -> Result<TypeRef> {
    self.resolve(None, pointer, 0)
  }

  /// Type of `to` as referenced from the schema at `from`.
  pub(crate) fn edge(&self, from: &Pointer, to: &Pointer) -> Result<TypeRef> {
    self.resolve(Some(from), to, 0)
  }

  /// The structure behind a named schema, ignoring its own name.
  pub(crate) fn body(&self, pointer: &Pointer) -> Result<TypeRef> {
    let node = self.node(pointer)?;
    self.structure(node, 0)
  }

  fn resolve(&self, from: Option<&Pointer>, pointer: &Pointer, hops: usize) -> Result<TypeRef> {
    let node = self.node(pointer)?;
    if let Some(name) = self.names.get(pointer) {
      let indirect = from.is_some_and(|from| self.graph.is_back_edge(from, pointer));
      return Ok(TypeRef::named(name, indirect).with_nullable(node.nullable));
    }
    Ok(self.structure(node, hops)?.with_nullable(node.nullable))
  }

  fn structure(&self, node: &SchemaNode, hops: usize) -> Result<TypeRef> {
    let id = &node.id;
    Ok(match &node.kind {
      SchemaKind::Ref(target) => {
        if hops >= MAX_REF_HOPS {
          return Err(GenerationError::unsupported(
            id.to_string(),
            "reference chain does not reach a concrete schema",
          ));
        }
        self.resolve(Some(id), target, hops + 1)?
      }
      SchemaKind::Array { items, .. } => TypeRef::array(match items {
        Some(items) => self.edge(id, items)?,
        None => TypeRef::any(),
      }),
      SchemaKind::Primitive { ty, format } => TypeRef::primitive(Primitive::from_schema(*ty, format.as_deref())),
      // Only reached for enums that were never named, e.g. inside a merged `allOf` member.
      SchemaKind::Enum { ty, .. } => TypeRef::primitive(Primitive::from_schema(*ty, None)),
      SchemaKind::Object(shape) if shape.properties.is_empty() => match &shape.additional {
        AdditionalProperties::Typed(values) => TypeRef::map(self.edge(id, values)?),
        _ => TypeRef::map(TypeRef::any()),
      },
      SchemaKind::Object(_) | SchemaKind::AllOf { .. } | SchemaKind::OneOf(_) | SchemaKind::AnyOf(_) => {
        return Err(GenerationError::unsupported(
          id.to_string(),
          "inline schema is not reachable from a named location",
        ));
      }
      SchemaKind::Any => TypeRef::any(),
    })
  }
}
