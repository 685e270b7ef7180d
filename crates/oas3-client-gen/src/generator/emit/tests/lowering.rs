use serde_json::json;

use super::support::{lower, petstore, try_lower};
use crate::{
  error::ErrorKind,
  generator::{
    emit::AuthKind,
    metrics::GenerationWarning,
    planner::WireRule,
  },
};

#[test]
fn test_metadata_comes_from_info_and_first_server() {
  let (ir, _) = lower(&petstore());

  assert_eq!(ir.package_name, "petstore_client");
  assert_eq!(ir.metadata.title, "Petstore");
  assert_eq!(ir.metadata.version, "1.2.0");
  assert_eq!(ir.metadata.description.as_deref(), Some("Pets for sale."));
  assert_eq!(ir.metadata.base_url.as_deref(), Some("https://petstore.example.com/v1"));
}

#[test]
fn test_security_schemes_are_mapped_or_reported() {
  let (ir, warnings) = lower(&petstore());

  let schemes: Vec<(&str, &AuthKind)> = ir
    .security_schemes
    .iter()
    .map(|scheme| (scheme.name.as_str(), &scheme.kind))
    .collect();
  assert_eq!(
    schemes,
    vec![
      ("apiKey", &AuthKind::ApiKeyHeader("X-Api-Key".to_string())),
      ("oauth", &AuthKind::Bearer),
    ]
  );

  assert!(warnings.contains(&GenerationWarning::SecuritySchemeApproximated {
    scheme: "oauth".to_string(),
    kind: "oauth2".to_string(),
    applied: "a bearer token obtained out of band".to_string(),
  }));
  assert!(warnings.contains(&GenerationWarning::SecuritySchemeSkipped {
    scheme: "digest".to_string(),
    reason: "HTTP scheme 'digest' has no runtime support".to_string(),
  }));
}

#[test]
fn test_operations_inherit_document_security_unless_overridden() {
  let (ir, _) = lower(&petstore());

  let auth: Vec<(&str, Vec<&str>)> = ir
    .operations
    .iter()
    .map(|op| (op.operation.id.as_str(), op.auth.iter().map(String::as_str).collect()))
    .collect();
  assert_eq!(
    auth,
    vec![("listPets", vec![]), ("createPet", vec!["apiKey"]), ("getPet", vec!["apiKey"])]
  );
}

#[test]
fn test_requirement_without_declared_scheme_is_reported_once() {
  let document = json!({
    "openapi": "3.0.3",
    "info": { "title": "T", "version": "1" },
    "security": [{ "token": [] }],
    "paths": {
      "/a": { "get": { "operationId": "a", "responses": { "204": { "description": "none" } } } },
      "/b": { "get": { "operationId": "b", "responses": { "204": { "description": "none" } } } }
    }
  });
  let (ir, warnings) = lower(&document);

  assert_eq!(
    warnings,
    vec![GenerationWarning::SecuritySchemeSkipped {
      scheme: "token".to_string(),
      reason: "it is required but never declared".to_string(),
    }]
  );
  assert!(ir.operations.iter().all(|op| op.auth.is_empty()));
}

#[test]
fn test_every_parameter_is_planned_in_order() {
  let (ir, _) = lower(&petstore());
  let list = &ir.operations[0];

  let planned: Vec<&str> = list.plans.iter().map(|plan| plan.parameter.name.as_str()).collect();
  assert_eq!(planned, vec!["limit", "tags", "filter"]);
  assert!(matches!(list.plans[2].rule, WireRule::Pairs(_)));

  let get = &ir.operations[2];
  assert!(matches!(get.plans[0].rule, WireRule::Segment(_)));
}

#[test]
fn test_invalid_parameter_style_fails_lowering() {
  let document = json!({
    "openapi": "3.0.3",
    "info": { "title": "T", "version": "1" },
    "paths": {
      "/items": {
        "get": {
          "operationId": "listItems",
          "parameters": [{ "name": "q", "in": "query", "style": "deepObject", "schema": { "type": "string" } }],
          "responses": { "204": { "description": "none" } }
        }
      }
    }
  });

  let err = try_lower(&document).expect_err("deepObject on a string must fail");
  assert_eq!(err.kind(), ErrorKind::UnsupportedSchema);
  assert_eq!(err.path(), Some("#/paths/~1items/get"));
}
