use serde_json::json;

use super::support::{compose_schemas, field_names, model};
use crate::{
  error::ErrorKind,
  generator::types::model::{Primitive, Tagging, TypeRef, UnionKind},
};

#[test]
fn test_all_of_merges_members_in_declaration_order() {
  let definitions = compose_schemas(json!({
    "Base": {
      "type": "object",
      "required": ["id"],
      "properties": { "id": { "type": "integer" }, "created": { "type": "string" } }
    },
    "Pet": {
      "description": "A pet in the store",
      "allOf": [
        { "$ref": "#/components/schemas/Base" },
        {
          "type": "object",
          "required": ["name"],
          "properties": { "name": { "type": "string" }, "tag": { "type": "string" } }
        }
      ]
    }
  }))
  .expect("composes");

  let pet = model(&definitions, "Pet");
  assert_eq!(field_names(pet), ["id", "created", "name", "tag"]);
  assert_eq!(pet.bases, ["Base"]);
  assert_eq!(pet.docs.as_deref(), Some("A pet in the store"));
  assert!(pet.variants.is_none());

  let required: Vec<&str> = pet
    .fields
    .iter()
    .filter(|field| field.required)
    .map(|field| field.name.as_str())
    .collect();
  assert_eq!(required, ["id", "name"]);
  assert_eq!(pet.fields[0].ty, TypeRef::primitive(Primitive::I64));
}

#[test]
fn test_required_list_without_properties_marks_inherited_field() {
  let definitions = compose_schemas(json!({
    "Pet": {
      "type": "object",
      "properties": { "name": { "type": "string" }, "tag": { "type": "string" } }
    },
    "TaggedPet": {
      "allOf": [{ "$ref": "#/components/schemas/Pet" }, { "required": ["tag"] }]
    }
  }))
  .expect("composes");

  let tagged = model(&definitions, "TaggedPet");
  assert_eq!(field_names(tagged), ["name", "tag"]);
  assert!(!tagged.fields[0].required);
  assert!(tagged.fields[1].required);
  assert!(!model(&definitions, "Pet").fields[1].required);
}

#[test]
fn test_conflicting_member_types_name_field_and_schema() {
  let err = compose_schemas(json!({
    "A": { "type": "object", "properties": { "name": { "type": "string" } } },
    "B": { "type": "object", "properties": { "name": { "type": "integer" } } },
    "C": { "allOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }] }
  }))
  .expect_err("types disagree");

  assert_eq!(err.kind(), ErrorKind::SchemaComposition);
  assert_eq!(err.path(), Some("#/components/schemas/C"));
  assert!(err.to_string().contains("(field 'name')"), "{err}");
}

#[test]
fn test_conflicting_required_flags_are_rejected() {
  let err = compose_schemas(json!({
    "A": { "type": "object", "required": ["name"], "properties": { "name": { "type": "string" } } },
    "B": { "type": "object", "properties": { "name": { "type": "string" } } },
    "C": { "allOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }] }
  }))
  .expect_err("required-ness disagrees");

  assert_eq!(err.kind(), ErrorKind::SchemaComposition);
  assert!(err.to_string().contains("required"), "{err}");
}

#[test]
fn test_conflicting_additional_properties_are_unsupported() {
  let err = compose_schemas(json!({
    "A": {
      "type": "object",
      "properties": { "a": { "type": "string" } },
      "additionalProperties": { "type": "string" }
    },
    "B": {
      "type": "object",
      "properties": { "b": { "type": "string" } },
      "additionalProperties": { "type": "integer" }
    },
    "C": { "allOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }] }
  }))
  .expect_err("value schemas disagree");

  assert_eq!(err.kind(), ErrorKind::UnsupportedSchema);
}

#[test]
fn test_all_of_cycle_is_a_composition_error() {
  let err = compose_schemas(json!({
    "A": { "allOf": [{ "$ref": "#/components/schemas/B" }] },
    "B": { "allOf": [{ "$ref": "#/components/schemas/A" }] }
  }))
  .expect_err("members include themselves");

  assert_eq!(err.kind(), ErrorKind::SchemaComposition);
  assert!(err.to_string().contains("cycle"), "{err}");
}

#[test]
fn test_inherited_reference_to_the_owner_is_indirect() {
  let definitions = compose_schemas(json!({
    "Base": {
      "type": "object",
      "properties": { "next": { "$ref": "#/components/schemas/Node" } }
    },
    "Node": {
      "allOf": [
        { "$ref": "#/components/schemas/Base" },
        { "type": "object", "properties": { "value": { "type": "string" } } }
      ]
    }
  }))
  .expect("composes");

  let node = model(&definitions, "Node");
  assert_eq!(field_names(node), ["next", "value"]);
  assert_eq!(node.fields[0].ty, TypeRef::named("Node", true));

  let base = model(&definitions, "Base");
  assert_eq!(base.fields[0].ty, TypeRef::named("Node", false));
}

#[test]
fn test_inherited_reference_outside_the_cycle_stays_direct() {
  let definitions = compose_schemas(json!({
    "Tag": { "type": "object", "properties": { "label": { "type": "string" } } },
    "Base": {
      "type": "object",
      "properties": { "tag": { "$ref": "#/components/schemas/Tag" } }
    },
    "Pet": { "allOf": [{ "$ref": "#/components/schemas/Base" }] }
  }))
  .expect("composes");

  let pet = model(&definitions, "Pet");
  assert_eq!(pet.fields[0].ty, TypeRef::named("Tag", false));
}

#[test]
fn test_non_object_member_is_rejected() {
  let err = compose_schemas(json!({
    "Id": { "type": "string" },
    "Pet": { "allOf": [{ "$ref": "#/components/schemas/Id" }] }
  }))
  .expect_err("strings cannot be merged");

  assert_eq!(err.kind(), ErrorKind::SchemaComposition);
  assert!(err.to_string().contains("is not an object schema"), "{err}");
}

#[test]
fn test_union_with_own_fields_is_split_into_flattened_field() {
  let definitions = compose_schemas(json!({
    "Cat": { "type": "object", "properties": { "meow": { "type": "boolean" } } },
    "Dog": { "type": "object", "properties": { "bark": { "type": "boolean" } } },
    "Pet": {
      "type": "object",
      "properties": { "name": { "type": "string" } },
      "oneOf": [{ "$ref": "#/components/schemas/Cat" }, { "$ref": "#/components/schemas/Dog" }]
    }
  }))
  .expect("composes");

  let names: Vec<&str> = definitions.iter().map(|definition| definition.name()).collect();
  assert_eq!(names, ["Cat", "Dog", "Pet", "PetOneOf"]);

  let pet = model(&definitions, "Pet");
  assert!(!pet.is_union());
  assert_eq!(field_names(pet), ["name", "variant"]);
  assert!(pet.fields[1].flatten);
  assert_eq!(pet.fields[1].ty, TypeRef::named("PetOneOf", false));

  let union = model(&definitions, "PetOneOf");
  let variants = union.variants.as_ref().expect("variant set");
  assert_eq!(variants.kind, UnionKind::OneOf);
  assert_eq!(variants.tagging, Tagging::Positional);
  let variant_names: Vec<&str> = variants.variants.iter().map(|v| v.name.as_str()).collect();
  assert_eq!(variant_names, ["Cat", "Dog"]);
}

#[test]
fn test_two_unions_in_one_all_of_are_rejected() {
  let err = compose_schemas(json!({
    "A": { "type": "object", "properties": { "a": { "type": "string" } } },
    "B": { "type": "object", "properties": { "b": { "type": "string" } } },
    "C": {
      "allOf": [
        { "oneOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }] },
        { "anyOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }] }
      ]
    }
  }))
  .expect_err("only one variant set");

  assert_eq!(err.kind(), ErrorKind::SchemaComposition);
  assert!(err.to_string().contains("at most one"), "{err}");
}
