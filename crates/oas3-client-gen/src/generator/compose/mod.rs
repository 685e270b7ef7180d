//! Flattens `allOf` compositions and turns `oneOf`/`anyOf` into variant sets.

use std::collections::{BTreeSet, HashSet};

use indexmap::{IndexMap, IndexSet};

#[cfg(test)]
mod tests;

use crate::{
  error::{GenerationError, Result},
  generator::{
    loader::{
      pointer::Pointer,
      schema::{AdditionalProperties, Discriminator, ObjectShape, PrimitiveType, SchemaKind, UnionShape},
    },
    resolver::{NameTable, ResolutionContext, ResolvedGraph},
    types::{
      mapper::TypeMapper,
      model::{
        AliasDefinition, Definition, EnumDefinition, EnumValues, FieldDef, ModelDefinition, Primitive, Tagging,
        TypeRef, TypeTarget, UnionKind, Variant, VariantSet, VariantTag,
      },
    },
  },
  naming::identifiers::{ensure_unique, to_field_name, to_pascal_case},
};

/// Builds the definition of every named schema, in name-assignment order.
///
/// A model that carries both its own fields and a variant set is split: the
/// variants move into `<Name>OneOf`/`<Name>AnyOf`, declared right after the
/// model, and the model gains a flattened field of that type.
#[tracing::instrument(skip_all, name = "compose")]
pub fn compose(graph: &ResolvedGraph<'_>, ctx: &mut ResolutionContext) -> Result<Vec<Definition>> {
  let named: Vec<(Pointer, String)> = ctx
    .names
    .iter()
    .map(|(pointer, name)| (pointer.clone(), name.to_string()))
    .collect();

  let mut definitions = Vec::with_capacity(named.len());
  {
    let mapper = TypeMapper::new(graph, &ctx.names);
    let composer = Composer::new(&mapper, &ctx.names);
    for (pointer, name) in &named {
      definitions.push(composer.definition(pointer, name, ctx.is_forward_declared(pointer))?);
    }
  }

  let mut out = Vec::with_capacity(definitions.len());
  for definition in definitions {
    match definition {
      Definition::Model(mut model) if !model.fields.is_empty() => match model.variants.take() {
        Some(variants) => {
          let (owner, union) = split_union(model, variants, &mut ctx.names);
          out.push(Definition::Model(owner));
          out.push(Definition::Model(union));
        }
        None => out.push(Definition::Model(model)),
      },
      other => out.push(other),
    }
  }

  tracing::debug!(definitions = out.len(), "schemas composed");
  Ok(out)
}

fn split_union(
  mut owner: ModelDefinition,
  variants: VariantSet,
  names: &mut NameTable,
) -> (ModelDefinition, ModelDefinition) {
  let union_name = names.reserve(&format!("{}{}", owner.name, variants.kind));
  if let Tagging::Discriminated { property } = &variants.tagging {
    owner.fields.retain(|field| &field.name != property);
  }

  let taken: BTreeSet<String> = owner.fields.iter().map(|field| to_field_name(&field.name)).collect();
  owner.fields.push(FieldDef {
    name: ensure_unique("variant", &taken),
    ty: TypeRef::named(union_name.clone(), false),
    required: true,
    default: None,
    docs: None,
    deprecated: false,
    flatten: true,
  });

  let key = match variants.kind {
    UnionKind::OneOf => "oneOf",
    UnionKind::AnyOf => "anyOf",
  };
  let union = ModelDefinition {
    name: union_name,
    source: owner.source.child(key),
    docs: None,
    fields: vec![],
    bases: vec![],
    variants: Some(variants),
    additional: None,
    forward_declared: owner.forward_declared,
  };
  (owner, union)
}

/// Positional variants named after their types, in declaration order.
pub(crate) fn positional_variants(types: Vec<TypeRef>) -> Vec<Variant> {
  let mut used_names = BTreeSet::new();
  types
    .into_iter()
    .enumerate()
    .map(|(index, ty)| {
      let name = ensure_unique(&positional_name(&ty), &used_names);
      used_names.insert(name.clone());
      Variant {
        name,
        tag: VariantTag::Position(index),
        ty,
      }
    })
    .collect()
}

/// Everything an object-like schema contributes once its members are merged.
#[derive(Debug, Default)]
struct Composite {
  fields: IndexMap<String, FieldDef>,
  required: IndexSet<String>,
  additional: Option<TypeRef>,
  bases: Vec<String>,
  variants: Option<VariantSet>,
}

impl Composite {
  fn break_cycles(&mut self, names: &BTreeSet<&str>) {
    for field in self.fields.values_mut() {
      field.ty.break_cycle(names);
    }
    if let Some(additional) = &mut self.additional {
      additional.break_cycle(names);
    }
    if let Some(variants) = &mut self.variants {
      for variant in &mut variants.variants {
        variant.ty.break_cycle(names);
      }
    }
  }

  fn merge(&mut self, other: Composite, schema: &Pointer) -> Result<()> {
    for (name, field) in other.fields {
      match self.fields.get(&name) {
        Some(existing) if !existing.ty.same_shape(&field.ty) => {
          return Err(GenerationError::composition(
            schema.to_string(),
            Some(&name),
            "allOf members declare the property with different types",
          ));
        }
        Some(existing) if existing.required != field.required => {
          return Err(GenerationError::composition(
            schema.to_string(),
            Some(&name),
            "allOf members disagree on whether the property is required",
          ));
        }
        Some(_) => {}
        None => {
          self.fields.insert(name, field);
        }
      }
    }

    self.required.extend(other.required);

    match (&self.additional, other.additional) {
      (Some(current), Some(incoming)) if !current.same_shape(&incoming) => {
        return Err(GenerationError::unsupported(
          schema.to_string(),
          "allOf members declare conflicting additionalProperties schemas",
        ));
      }
      (None, Some(incoming)) => self.additional = Some(incoming),
      _ => {}
    }

    for base in other.bases {
      if !self.bases.contains(&base) {
        self.bases.push(base);
      }
    }

    match (&self.variants, other.variants) {
      (Some(_), Some(_)) => Err(GenerationError::composition(
        schema.to_string(),
        None,
        "allOf may contain at most one oneOf/anyOf member",
      )),
      (None, Some(variants)) => {
        self.variants = Some(variants);
        Ok(())
      }
      _ => Ok(()),
    }
  }
}

pub(crate) struct Composer<'m, 'g, 'a> {
  mapper: &'m TypeMapper<'g, 'a>,
  names: &'m NameTable,
}

impl<'m, 'g, 'a> Composer<'m, 'g, 'a> {
  pub(crate) fn new(mapper: &'m TypeMapper<'g, 'a>, names: &'m NameTable) -> Self {
    Self { mapper, names }
  }

  fn definition(&self, pointer: &Pointer, name: &str, forward_declared: bool) -> Result<Definition> {
    let node = self.mapper.node(pointer)?;
    let docs = node.description.clone().or_else(|| node.title.clone());

    Ok(match &node.kind {
      SchemaKind::Object(shape) if !shape.properties.is_empty() => {
        Definition::Model(self.model(pointer, name, forward_declared)?)
      }
      SchemaKind::AllOf { .. } | SchemaKind::OneOf(_) | SchemaKind::AnyOf(_) => {
        Definition::Model(self.model(pointer, name, forward_declared)?)
      }
      SchemaKind::Enum { ty, values } => Definition::Enum(EnumDefinition {
        name: name.to_string(),
        source: pointer.clone(),
        docs,
        values: enum_values(pointer, *ty, values)?,
        forward_declared,
      }),
      SchemaKind::Object(_)
      | SchemaKind::Array { .. }
      | SchemaKind::Primitive { .. }
      | SchemaKind::Ref(_)
      | SchemaKind::Any => Definition::Alias(AliasDefinition {
        name: name.to_string(),
        source: pointer.clone(),
        docs,
        ty: self.mapper.body(pointer)?,
        forward_declared,
      }),
    })
  }

  /// Builds the model declared at `pointer` under `name`.
  pub(crate) fn model(&self, pointer: &Pointer, name: &str, forward_declared: bool) -> Result<ModelDefinition> {
    let node = self.mapper.node(pointer)?;
    let composite = self.collect(pointer, &mut vec![])?;

    let fields = composite
      .fields
      .into_values()
      .map(|mut field| {
        field.required |= composite.required.contains(&field.name);
        field
      })
      .collect();

    Ok(ModelDefinition {
      name: name.to_string(),
      source: pointer.clone(),
      docs: node.description.clone().or_else(|| node.title.clone()),
      fields,
      bases: composite.bases,
      variants: composite.variants,
      additional: composite.additional,
      forward_declared,
    })
  }

  fn collect(&self, pointer: &Pointer, stack: &mut Vec<Pointer>) -> Result<Composite> {
    if stack.contains(pointer) {
      return Err(GenerationError::composition(
        pointer.to_string(),
        None,
        "allOf members form a cycle",
      ));
    }
    stack.push(pointer.clone());

    let node = self.mapper.node(pointer)?;
    let composite = match &node.kind {
      SchemaKind::Object(shape) => self.from_shape(pointer, shape)?,
      SchemaKind::AllOf { members, own } => {
        let mut merged = Composite::default();
        for member in members {
          let part = self.member(pointer, member, stack)?;
          merged.merge(part, pointer)?;
        }
        if let Some(shape) = own {
          merged.merge(self.from_shape(pointer, shape)?, pointer)?;
        }
        merged
      }
      SchemaKind::OneOf(union) => Composite {
        variants: Some(self.variants(pointer, UnionKind::OneOf, union)?),
        ..Composite::default()
      },
      SchemaKind::AnyOf(union) => Composite {
        variants: Some(self.variants(pointer, UnionKind::AnyOf, union)?),
        ..Composite::default()
      },
      SchemaKind::Any => Composite::default(),
      SchemaKind::Array { .. } | SchemaKind::Primitive { .. } | SchemaKind::Enum { .. } | SchemaKind::Ref(_) => {
        return Err(GenerationError::composition(
          pointer.to_string(),
          None,
          "only object schemas can be composed with allOf",
        ));
      }
    };

    stack.pop();
    Ok(composite)
  }

  /// One `allOf` member, followed through `$ref`s. Named members become bases.
  fn member(&self, owner: &Pointer, member: &Pointer, stack: &mut Vec<Pointer>) -> Result<Composite> {
    let target = self.mapper.follow(member)?;
    let mut part = match &self.mapper.node(&target)?.kind {
      SchemaKind::Ref(_) => unreachable!("follow stops at concrete schemas"),
      SchemaKind::Object(_)
      | SchemaKind::AllOf { .. }
      | SchemaKind::OneOf(_)
      | SchemaKind::AnyOf(_)
      | SchemaKind::Any => self.collect(&target, stack)?,
      SchemaKind::Array { .. } | SchemaKind::Primitive { .. } | SchemaKind::Enum { .. } => {
        return Err(GenerationError::composition(
          owner.to_string(),
          None,
          format!("allOf member '{target}' is not an object schema"),
        ));
      }
    };

    if &target != member
      && let Some(name) = self.names.get(&target)
      && part.variants.is_none()
    {
      part.bases.insert(0, name.to_string());
    }

    // Inherited references were judged against the member. Once inlined they
    // belong to the model being composed, so recheck them against its cycle.
    if let Some(root) = stack.first() {
      let cyclic = self.mapper.cycle_names(root);
      if !cyclic.is_empty() {
        part.break_cycles(&cyclic);
      }
    }
    Ok(part)
  }

  fn from_shape(&self, owner: &Pointer, shape: &ObjectShape) -> Result<Composite> {
    let mut composite = Composite {
      required: shape.required.clone(),
      ..Composite::default()
    };

    for (name, child) in &shape.properties {
      let node = self.mapper.node(child)?;
      composite.fields.insert(
        name.clone(),
        FieldDef {
          name: name.clone(),
          ty: self.mapper.edge(owner, child)?,
          required: shape.required.contains(name),
          default: node.default.clone(),
          docs: node.description.clone().or_else(|| node.title.clone()),
          deprecated: node.deprecated,
          flatten: false,
        },
      );
    }

    if let AdditionalProperties::Typed(values) = &shape.additional {
      composite.additional = Some(self.mapper.edge(owner, values)?);
    }

    Ok(composite)
  }

  fn variants(&self, pointer: &Pointer, kind: UnionKind, union: &UnionShape) -> Result<VariantSet> {
    let (tagging, variants) = match &union.discriminator {
      Some(discriminator) => (
        Tagging::Discriminated {
          property: discriminator.property.clone(),
        },
        self.discriminated(pointer, union, discriminator)?,
      ),
      None => (Tagging::Positional, self.positional(pointer, union)?),
    };

    Ok(VariantSet {
      kind,
      tagging,
      variants,
    })
  }

  fn discriminated(&self, pointer: &Pointer, union: &UnionShape, discriminator: &Discriminator) -> Result<Vec<Variant>> {
    let targets = union
      .members
      .iter()
      .map(|member| self.mapper.follow(member))
      .collect::<Result<Vec<_>>>()?;

    let mut variants = vec![];
    let mut values = HashSet::new();
    let mut mapped = HashSet::new();
    let mut used_names = BTreeSet::new();

    for (value, target) in &discriminator.mapping {
      let target = self.mapper.follow(target)?;
      let Some(index) = targets.iter().position(|member| member == &target) else {
        return Err(GenerationError::composition(
          pointer.to_string(),
          Some(&discriminator.property),
          format!("discriminator value '{value}' maps to '{target}', which is not a member"),
        ));
      };
      values.insert(value.clone());
      mapped.insert(index);
      variants.push(self.tagged_variant(pointer, &union.members[index], value, &mut used_names)?);
    }

    for (index, member) in union.members.iter().enumerate() {
      if mapped.contains(&index) {
        continue;
      }
      let implicit = (&targets[index] != member)
        .then(|| targets[index].component_name())
        .flatten();
      let Some(value) = implicit else {
        return Err(GenerationError::composition(
          pointer.to_string(),
          Some(&discriminator.property),
          format!("inline member '{member}' needs an explicit discriminator mapping"),
        ));
      };
      if !values.insert(value.clone()) {
        return Err(GenerationError::composition(
          pointer.to_string(),
          Some(&discriminator.property),
          format!("discriminator value '{value}' is used by more than one member"),
        ));
      }
      variants.push(self.tagged_variant(pointer, member, &value, &mut used_names)?);
    }

    Ok(variants)
  }

  fn tagged_variant(
    &self,
    pointer: &Pointer,
    member: &Pointer,
    value: &str,
    used_names: &mut BTreeSet<String>,
  ) -> Result<Variant> {
    let name = ensure_unique(&to_pascal_case(value), used_names);
    used_names.insert(name.clone());
    Ok(Variant {
      name,
      tag: VariantTag::Discriminator(value.to_string()),
      ty: self.mapper.edge(pointer, member)?,
    })
  }

  fn positional(&self, pointer: &Pointer, union: &UnionShape) -> Result<Vec<Variant>> {
    let types = union
      .members
      .iter()
      .map(|member| self.mapper.edge(pointer, member))
      .collect::<Result<Vec<_>>>()?;
    Ok(positional_variants(types))
  }
}

fn enum_values(pointer: &Pointer, ty: PrimitiveType, values: &[serde_json::Value]) -> Result<EnumValues> {
  let invalid = || GenerationError::unsupported(pointer.to_string(), format!("enumeration values do not fit '{ty}'"));
  match ty {
    PrimitiveType::String => values
      .iter()
      .map(|value| value.as_str().map(str::to_string).ok_or_else(invalid))
      .collect::<Result<Vec<_>>>()
      .map(EnumValues::String),
    PrimitiveType::Integer => values
      .iter()
      .map(|value| value.as_i64().ok_or_else(invalid))
      .collect::<Result<Vec<_>>>()
      .map(EnumValues::Integer),
    PrimitiveType::Number | PrimitiveType::Boolean | PrimitiveType::Null => Err(invalid()),
  }
}

fn positional_name(ty: &TypeRef) -> String {
  match &ty.target {
    TypeTarget::Named { name, .. } => name.clone(),
    TypeTarget::Primitive(Primitive::String) => "String".into(),
    TypeTarget::Primitive(Primitive::I32 | Primitive::I64) => "Integer".into(),
    TypeTarget::Primitive(Primitive::F32 | Primitive::F64) => "Number".into(),
    TypeTarget::Primitive(Primitive::Bool) => "Boolean".into(),
    TypeTarget::Primitive(Primitive::Null) => "Null".into(),
    TypeTarget::Primitive(Primitive::Bytes) => "Bytes".into(),
    TypeTarget::Array(_) => "Array".into(),
    TypeTarget::Map(_) => "Object".into(),
    TypeTarget::Any => "Value".into(),
  }
}
