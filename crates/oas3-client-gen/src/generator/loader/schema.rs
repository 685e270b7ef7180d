use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use strum::Display;

use super::pointer::Pointer;
use crate::error::{GenerationError, Result};

/// One schema location after classification. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
  pub id: Pointer,
  pub kind: SchemaKind,
  pub title: Option<String>,
  pub description: Option<String>,
  pub nullable: bool,
  pub default: Option<Value>,
  pub deprecated: bool,
}

impl SchemaNode {
  fn new(id: Pointer, kind: SchemaKind) -> Self {
    Self {
      id,
      kind,
      title: None,
      description: None,
      nullable: false,
      default: None,
      deprecated: false,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveType {
  String,
  Integer,
  Number,
  Boolean,
  Null,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AdditionalProperties {
  #[default]
  Unspecified,
  Forbidden,
  Any,
  Typed(Pointer),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectShape {
  pub properties: IndexMap<String, Pointer>,
  pub required: IndexSet<String>,
  pub additional: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
  pub property: String,
  pub mapping: IndexMap<String, Pointer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionShape {
  pub members: Vec<Pointer>,
  pub discriminator: Option<Discriminator>,
}

/// Closed set of schema shapes the generator understands.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
  Object(ObjectShape),
  Array { items: Option<Pointer>, unique: bool },
  Primitive { ty: PrimitiveType, format: Option<String> },
  Enum { ty: PrimitiveType, values: Vec<Value> },
  AllOf { members: Vec<Pointer>, own: Option<ObjectShape> },
  OneOf(UnionShape),
  AnyOf(UnionShape),
  Ref(Pointer),
  Any,
}

impl SchemaKind {
  /// Outgoing edges in declaration order.
  #[must_use]
  pub fn references(&self) -> Vec<&Pointer> {
    fn shape_refs(shape: &ObjectShape) -> impl Iterator<Item = &Pointer> {
      let additional = match &shape.additional {
        AdditionalProperties::Typed(target) => Some(target),
        _ => None,
      };
      shape.properties.values().chain(additional)
    }

    match self {
      Self::Object(shape) => shape_refs(shape).collect(),
      Self::Array { items, .. } => items.iter().collect(),
      Self::AllOf { members, own } => members.iter().chain(own.iter().flat_map(shape_refs)).collect(),
      Self::OneOf(union) | Self::AnyOf(union) => union.members.iter().collect(),
      Self::Ref(target) => vec![target],
      Self::Primitive { .. } | Self::Enum { .. } | Self::Any => vec![],
    }
  }

  /// Whether this node becomes its own named type when it appears inline.
  #[must_use]
  pub fn is_declarable(&self) -> bool {
    match self {
      Self::Object(shape) => !shape.properties.is_empty(),
      Self::Enum { ty, .. } => matches!(ty, PrimitiveType::String | PrimitiveType::Integer),
      Self::AllOf { .. } | Self::OneOf(_) | Self::AnyOf(_) => true,
      Self::Array { .. } | Self::Primitive { .. } | Self::Ref(_) | Self::Any => false,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonType {
  Object,
  Array,
  Primitive(PrimitiveType),
}

impl JsonType {
  fn parse(raw: &str) -> Option<Self> {
    Some(match raw {
      "object" => Self::Object,
      "array" => Self::Array,
      "string" => Self::Primitive(PrimitiveType::String),
      "integer" => Self::Primitive(PrimitiveType::Integer),
      "number" => Self::Primitive(PrimitiveType::Number),
      "boolean" => Self::Primitive(PrimitiveType::Boolean),
      "null" => Self::Primitive(PrimitiveType::Null),
      _ => return None,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnionKeyword {
  OneOf,
  AnyOf,
}

impl UnionKeyword {
  const fn key(self) -> &'static str {
    match self {
      Self::OneOf => "oneOf",
      Self::AnyOf => "anyOf",
    }
  }
}

/// Classifies the raw schema `value` found at `id`.
///
/// Returns the node itself first, followed by any synthetic nodes created
/// for it (a union that shares its schema with object keywords or `allOf`).
pub(crate) fn classify(id: &Pointer, value: &Value) -> Result<Vec<SchemaNode>> {
  let map = match value {
    Value::Bool(true) => return Ok(vec![SchemaNode::new(id.clone(), SchemaKind::Any)]),
    Value::Bool(false) => {
      return Err(GenerationError::unsupported(
        id.to_string(),
        "the `false` schema accepts no values",
      ));
    }
    Value::Object(map) => map,
    _ => {
      return Err(GenerationError::spec_parse(
        "schema must be an object or a boolean",
        id.to_string(),
      ));
    }
  };

  let mut node = SchemaNode {
    id: id.clone(),
    kind: SchemaKind::Any,
    title: string_field(map, "title"),
    description: string_field(map, "description"),
    nullable: map.get("nullable").and_then(Value::as_bool).unwrap_or(false),
    default: map.get("default").cloned(),
    deprecated: map.get("deprecated").and_then(Value::as_bool).unwrap_or(false),
  };

  if let Some(reference) = map.get("$ref") {
    let raw = reference
      .as_str()
      .ok_or_else(|| GenerationError::spec_parse("`$ref` must be a string", id.child("$ref").to_string()))?;
    node.kind = SchemaKind::Ref(parse_ref_from(raw, id)?);
    return Ok(vec![node]);
  }

  let (declared, null_in_type) = declared_type(id, map)?;
  node.nullable |= null_in_type;

  if map.contains_key("enum") || map.contains_key("const") {
    let (kind, nullable) = classify_enum(id, map, declared)?;
    node.kind = kind;
    node.nullable |= nullable;
    return Ok(vec![node]);
  }

  let all_of = member_pointers(id, map, "allOf")?;
  let one_of = member_pointers(id, map, "oneOf")?;
  let any_of = member_pointers(id, map, "anyOf")?;

  let union = match (one_of, any_of) {
    (Some(_), Some(_)) => {
      return Err(GenerationError::unsupported(
        id.to_string(),
        "`oneOf` and `anyOf` cannot be combined in one schema",
      ));
    }
    (Some(members), None) => Some((UnionKeyword::OneOf, members)),
    (None, Some(members)) => Some((UnionKeyword::AnyOf, members)),
    (None, None) => None,
  };

  let own = object_shape(id, map, declared)?;
  let mut nodes = vec![];

  match (all_of, union) {
    (Some(members), None) => {
      node.kind = SchemaKind::AllOf {
        members: pointers_only(members),
        own,
      };
    }
    (all_of, Some((keyword, members))) if all_of.is_some() || own.is_some() => {
      let synthetic = union_node(id.child(keyword.key()), keyword, members, map, id)?;
      let mut members = all_of.map(pointers_only).unwrap_or_default();
      members.push(synthetic.id.clone());
      node.kind = SchemaKind::AllOf { members, own };
      nodes.push(synthetic);
    }
    (_, Some((keyword, members))) => {
      let union = union_node(id.clone(), keyword, members, map, id)?;
      node.nullable |= union.nullable;
      node.kind = union.kind;
    }
    (None, None) => {
      node.kind = match (declared, own) {
        (_, Some(shape)) => SchemaKind::Object(shape),
        (Some(JsonType::Object), None) => SchemaKind::Object(ObjectShape::default()),
        (Some(JsonType::Array), None) => array_kind(id, map),
        (None, None) if map.contains_key("items") => array_kind(id, map),
        (Some(JsonType::Primitive(ty)), None) => SchemaKind::Primitive {
          ty,
          format: string_field(map, "format"),
        },
        (None, None) => SchemaKind::Any,
      };
    }
  }

  nodes.insert(0, node);
  Ok(nodes)
}

fn parse_ref_from(raw: &str, referrer: &Pointer) -> Result<Pointer> {
  Pointer::parse_ref(raw, referrer.document()).map_err(|err| match err {
    GenerationError::UnresolvedReference {
      reference,
      message,
      retryable,
      ..
    } => GenerationError::UnresolvedReference {
      reference,
      referrer: Some(referrer.to_string()),
      message,
      retryable,
    },
    other => other,
  })
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
  map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The declared `type`, with `null` split out into a nullability flag.
fn declared_type(id: &Pointer, map: &Map<String, Value>) -> Result<(Option<JsonType>, bool)> {
  let location = || id.child("type").to_string();
  let parse = |raw: &str| {
    JsonType::parse(raw).ok_or_else(|| GenerationError::spec_parse(format!("unknown schema type '{raw}'"), location()))
  };

  match map.get("type") {
    None => Ok((None, false)),
    Some(Value::String(raw)) => {
      let ty = parse(raw)?;
      Ok((Some(ty), false))
    }
    Some(Value::Array(entries)) => {
      let mut types = vec![];
      let mut nullable = false;
      for entry in entries {
        let raw = entry
          .as_str()
          .ok_or_else(|| GenerationError::spec_parse("schema type entries must be strings", location()))?;
        match parse(raw)? {
          JsonType::Primitive(PrimitiveType::Null) => nullable = true,
          ty => types.push(ty),
        }
      }
      match types.as_slice() {
        [] if nullable => Ok((Some(JsonType::Primitive(PrimitiveType::Null)), false)),
        [] => Ok((None, false)),
        [single] => Ok((Some(*single), nullable)),
        _ => Err(GenerationError::unsupported(
          id.to_string(),
          "multiple non-null types in one schema",
        )),
      }
    }
    Some(_) => Err(GenerationError::spec_parse(
      "schema type must be a string or an array of strings",
      location(),
    )),
  }
}

fn classify_enum(id: &Pointer, map: &Map<String, Value>, declared: Option<JsonType>) -> Result<(SchemaKind, bool)> {
  let raw_values = match (map.get("enum"), map.get("const")) {
    (Some(Value::Array(values)), _) => values.clone(),
    (Some(_), _) => {
      return Err(GenerationError::spec_parse(
        "`enum` must be an array",
        id.child("enum").to_string(),
      ));
    }
    (None, Some(value)) => vec![value.clone()],
    (None, None) => vec![],
  };

  let nullable = raw_values.iter().any(Value::is_null);
  let values: Vec<Value> = raw_values.into_iter().filter(|v| !v.is_null()).collect();

  let ty = match declared {
    Some(JsonType::Primitive(ty)) => ty,
    Some(JsonType::Object | JsonType::Array) => {
      return Err(GenerationError::unsupported(
        id.to_string(),
        "enumerations of objects or arrays are not supported",
      ));
    }
    None if values.iter().all(Value::is_string) => PrimitiveType::String,
    None if values.iter().all(|v| v.is_i64() || v.is_u64()) => PrimitiveType::Integer,
    None => {
      return Err(GenerationError::unsupported(
        id.to_string(),
        "enumeration values mix several types",
      ));
    }
  };

  let kind = match ty {
    _ if values.is_empty() => SchemaKind::Primitive {
      ty: PrimitiveType::Null,
      format: None,
    },
    PrimitiveType::String if values.iter().all(Value::is_string) => SchemaKind::Enum { ty, values },
    PrimitiveType::Integer if values.iter().all(|v| v.is_i64() || v.is_u64()) => SchemaKind::Enum { ty, values },
    PrimitiveType::String | PrimitiveType::Integer => {
      return Err(GenerationError::unsupported(
        id.to_string(),
        format!("enumeration values do not match the declared type '{ty}'"),
      ));
    }
    // Closed sets of numbers or booleans are carried as their primitive type.
    other => SchemaKind::Primitive {
      ty: other,
      format: string_field(map, "format"),
    },
  };

  Ok((kind, nullable))
}

fn member_pointers(id: &Pointer, map: &Map<String, Value>, key: &str) -> Result<Option<Vec<(Pointer, Value)>>> {
  match map.get(key) {
    None => Ok(None),
    Some(Value::Array(members)) => {
      let base = id.child(key);
      Ok(Some(
        members
          .iter()
          .enumerate()
          .map(|(i, member)| (base.child(&i.to_string()), member.clone()))
          .collect(),
      ))
    }
    Some(_) => Err(GenerationError::spec_parse(
      format!("`{key}` must be an array of schemas"),
      id.child(key).to_string(),
    )),
  }
}

fn pointers_only(members: Vec<(Pointer, Value)>) -> Vec<Pointer> {
  members.into_iter().map(|(pointer, _)| pointer).collect()
}

fn is_null_schema(value: &Value) -> bool {
  let Some(map) = value.as_object() else {
    return false;
  };
  let is_null_type = map.get("type").and_then(Value::as_str) == Some("null");
  let is_null_enum = map
    .get("enum")
    .and_then(Value::as_array)
    .is_some_and(|values| !values.is_empty() && values.iter().all(Value::is_null));
  is_null_type || is_null_enum
}

fn union_node(
  union_id: Pointer,
  keyword: UnionKeyword,
  members: Vec<(Pointer, Value)>,
  map: &Map<String, Value>,
  owner: &Pointer,
) -> Result<SchemaNode> {
  let nullable = members.iter().any(|(_, value)| is_null_schema(value));
  let members: Vec<Pointer> = members
    .into_iter()
    .filter(|(_, value)| !is_null_schema(value))
    .map(|(pointer, _)| pointer)
    .collect();

  let discriminator = map
    .get("discriminator")
    .map(|raw| parse_discriminator(owner, raw))
    .transpose()?;

  let shape = UnionShape { members, discriminator };
  let kind = match keyword {
    UnionKeyword::OneOf => SchemaKind::OneOf(shape),
    UnionKeyword::AnyOf => SchemaKind::AnyOf(shape),
  };

  let mut node = SchemaNode::new(union_id, kind);
  node.nullable = nullable;
  Ok(node)
}

fn parse_discriminator(owner: &Pointer, raw: &Value) -> Result<Discriminator> {
  let location = owner.child("discriminator");
  let property = raw
    .get("propertyName")
    .and_then(Value::as_str)
    .ok_or_else(|| GenerationError::spec_parse("discriminator requires `propertyName`", location.to_string()))?
    .to_string();

  let mut mapping = IndexMap::new();
  if let Some(entries) = raw.get("mapping").and_then(Value::as_object) {
    for (value, target) in entries {
      let target = target.as_str().ok_or_else(|| {
        GenerationError::spec_parse(
          "discriminator mapping values must be strings",
          location.child("mapping").child(value).to_string(),
        )
      })?;
      mapping.insert(value.clone(), mapping_target(target, owner)?);
    }
  }

  Ok(Discriminator { property, mapping })
}

/// Mapping values are either references or bare component names.
fn mapping_target(target: &str, owner: &Pointer) -> Result<Pointer> {
  if target.contains('#') || target.contains('/') {
    parse_ref_from(target, owner)
  } else {
    Ok(Pointer::new(owner.document(), "").child("components").child("schemas").child(target))
  }
}

fn object_shape(id: &Pointer, map: &Map<String, Value>, declared: Option<JsonType>) -> Result<Option<ObjectShape>> {
  let has_object_keywords = ["properties", "additionalProperties", "required"]
    .iter()
    .any(|key| map.contains_key(*key));
  if !has_object_keywords || matches!(declared, Some(JsonType::Array | JsonType::Primitive(_))) {
    return Ok(None);
  }

  let mut shape = ObjectShape::default();

  if let Some(properties) = map.get("properties") {
    let properties = properties.as_object().ok_or_else(|| {
      GenerationError::spec_parse("`properties` must be an object", id.child("properties").to_string())
    })?;
    let base = id.child("properties");
    for name in properties.keys() {
      shape.properties.insert(name.clone(), base.child(name));
    }
  }

  if let Some(required) = map.get("required").and_then(Value::as_array) {
    shape.required = required.iter().filter_map(Value::as_str).map(str::to_string).collect();
  }

  shape.additional = match map.get("additionalProperties") {
    None => AdditionalProperties::Unspecified,
    Some(Value::Bool(false)) => AdditionalProperties::Forbidden,
    Some(Value::Bool(true)) => AdditionalProperties::Any,
    Some(Value::Object(inner)) if inner.is_empty() => AdditionalProperties::Any,
    Some(_) => AdditionalProperties::Typed(id.child("additionalProperties")),
  };

  Ok(Some(shape))
}

fn array_kind(id: &Pointer, map: &Map<String, Value>) -> SchemaKind {
  SchemaKind::Array {
    items: map.contains_key("items").then(|| id.child("items")),
    unique: map.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false),
  }
}
