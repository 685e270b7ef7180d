use std::collections::BTreeSet;

use serde_json::Value;
use strum::Display;

use crate::generator::loader::{pointer::Pointer, schema::PrimitiveType};

/// Scalar types the generated code can express directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Primitive {
  String,
  I32,
  I64,
  F32,
  F64,
  Bool,
  Null,
  /// Raw body bytes; never produced from a schema.
  Bytes,
}

impl Primitive {
  #[must_use]
  pub fn from_schema(ty: PrimitiveType, format: Option<&str>) -> Self {
    match (ty, format) {
      (PrimitiveType::String, _) => Self::String,
      (PrimitiveType::Integer, Some("int32" | "int16" | "int8")) => Self::I32,
      (PrimitiveType::Integer, _) => Self::I64,
      (PrimitiveType::Number, Some("float")) => Self::F32,
      (PrimitiveType::Number, _) => Self::F64,
      (PrimitiveType::Boolean, _) => Self::Bool,
      (PrimitiveType::Null, _) => Self::Null,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Cardinality {
  Single,
  Array,
  Map,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTarget {
  /// A declared type. `indirect` marks a reference that closes a cycle.
  Named { name: String, indirect: bool },
  Primitive(Primitive),
  Any,
  Array(Box<TypeRef>),
  Map(Box<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
  pub target: TypeTarget,
  pub nullable: bool,
}

impl TypeRef {
  #[must_use]
  pub fn named(name: impl Into<String>, indirect: bool) -> Self {
    Self::new(TypeTarget::Named {
      name: name.into(),
      indirect,
    })
  }

  #[must_use]
  pub fn primitive(primitive: Primitive) -> Self {
    Self::new(TypeTarget::Primitive(primitive))
  }

  #[must_use]
  pub fn any() -> Self {
    Self::new(TypeTarget::Any)
  }

  #[must_use]
  pub fn array(items: TypeRef) -> Self {
    Self::new(TypeTarget::Array(Box::new(items)))
  }

  #[must_use]
  pub fn map(values: TypeRef) -> Self {
    Self::new(TypeTarget::Map(Box::new(values)))
  }

  const fn new(target: TypeTarget) -> Self {
    Self { target, nullable: false }
  }

  #[must_use]
  pub fn with_nullable(mut self, nullable: bool) -> Self {
    self.nullable |= nullable;
    self
  }

  #[must_use]
  pub fn cardinality(&self) -> Cardinality {
    match self.target {
      TypeTarget::Array(_) => Cardinality::Array,
      TypeTarget::Map(_) => Cardinality::Map,
      TypeTarget::Named { .. } | TypeTarget::Primitive(_) | TypeTarget::Any => Cardinality::Single,
    }
  }

  /// Structural equality that ignores whether a named reference is indirect.
  #[must_use]
  pub fn same_shape(&self, other: &TypeRef) -> bool {
    if self.nullable != other.nullable {
      return false;
    }
    match (&self.target, &other.target) {
      (TypeTarget::Named { name: a, .. }, TypeTarget::Named { name: b, .. }) => a == b,
      (TypeTarget::Array(a), TypeTarget::Array(b)) | (TypeTarget::Map(a), TypeTarget::Map(b)) => a.same_shape(b),
      (a, b) => a == b,
    }
  }

  /// Makes a direct reference to one of `names` indirect. References inside
  /// arrays and maps are left alone; those already allocate.
  pub fn break_cycle(&mut self, names: &BTreeSet<&str>) {
    if let TypeTarget::Named { name, indirect } = &mut self.target
      && names.contains(name.as_str())
    {
      *indirect = true;
    }
  }

  /// Name of the declared type this reference points at, if any.
  #[must_use]
  pub fn name(&self) -> Option<&str> {
    match &self.target {
      TypeTarget::Named { name, .. } => Some(name),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
  /// Property name as it appears on the wire.
  pub name: String,
  pub ty: TypeRef,
  pub required: bool,
  pub default: Option<Value>,
  pub docs: Option<String>,
  pub deprecated: bool,
  /// Fields of this value are inlined into the parent object.
  pub flatten: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnionKind {
  OneOf,
  AnyOf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tagging {
  Discriminated { property: String },
  Positional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantTag {
  Discriminator(String),
  Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
  pub name: String,
  pub tag: VariantTag,
  pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
  pub kind: UnionKind,
  pub tagging: Tagging,
  pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
  pub name: String,
  pub source: Pointer,
  pub docs: Option<String>,
  pub fields: Vec<FieldDef>,
  /// Names of the `allOf` members this model was merged from.
  pub bases: Vec<String>,
  pub variants: Option<VariantSet>,
  /// Value type of properties not listed in `fields`.
  pub additional: Option<TypeRef>,
  pub forward_declared: bool,
}

impl ModelDefinition {
  #[must_use]
  pub fn is_union(&self) -> bool {
    self.variants.is_some()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValues {
  String(Vec<String>),
  Integer(Vec<i64>),
}

impl EnumValues {
  #[must_use]
  pub fn len(&self) -> usize {
    match self {
      Self::String(values) => values.len(),
      Self::Integer(values) => values.len(),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
  pub name: String,
  pub source: Pointer,
  pub docs: Option<String>,
  pub values: EnumValues,
  pub forward_declared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDefinition {
  pub name: String,
  pub source: Pointer,
  pub docs: Option<String>,
  pub ty: TypeRef,
  pub forward_declared: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
  Model(ModelDefinition),
  Enum(EnumDefinition),
  Alias(AliasDefinition),
}

impl Definition {
  #[must_use]
  pub fn name(&self) -> &str {
    match self {
      Self::Model(def) => &def.name,
      Self::Enum(def) => &def.name,
      Self::Alias(def) => &def.name,
    }
  }

  #[must_use]
  pub fn source(&self) -> &Pointer {
    match self {
      Self::Model(def) => &def.source,
      Self::Enum(def) => &def.source,
      Self::Alias(def) => &def.source,
    }
  }

  #[must_use]
  pub fn forward_declared(&self) -> bool {
    match self {
      Self::Model(def) => def.forward_declared,
      Self::Enum(def) => def.forward_declared,
      Self::Alias(def) => def.forward_declared,
    }
  }
}
