use serde_json::json;

use super::support::{load, with_schemas};
use crate::{
  error::ErrorKind,
  generator::{loader::pointer::Pointer, resolver::Resolver},
};

#[test]
fn test_mutual_recursion_has_one_back_edge() {
  let spec = load(&with_schemas(json!({
    "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" } } },
    "B": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } }
  })));

  let (graph, ctx) = Resolver::new(&spec).resolve().expect("cycles are not errors");

  assert_eq!(graph.back_edge_count(), 1);
  let b_to_a = Pointer::component("B").child("properties").child("a");
  assert!(graph.is_back_edge(&b_to_a, &Pointer::component("A")));
  assert_eq!(ctx.forward_declared.len(), 1);
  assert!(ctx.is_forward_declared(&Pointer::component("A")));

  assert_eq!(graph.cycles.len(), 1);
  let cycle = &graph.cycles[0];
  assert!(cycle.contains(&Pointer::component("A")));
  assert!(cycle.contains(&Pointer::component("B")));
}

#[test]
fn test_self_reference_through_array() {
  let spec = load(&with_schemas(json!({
    "Node": {
      "type": "object",
      "properties": {
        "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
      }
    }
  })));

  let (graph, ctx) = Resolver::new(&spec).resolve().expect("resolves");
  let items = Pointer::component("Node").child("properties").child("children").child("items");
  assert!(graph.is_back_edge(&items, &Pointer::component("Node")));
  assert!(ctx.is_forward_declared(&Pointer::component("Node")));
  assert_eq!(graph.cycles.len(), 1);
}

#[test]
fn test_acyclic_graph_reports_nothing() {
  let spec = load(&with_schemas(json!({
    "Pet": { "type": "object", "properties": { "owner": { "$ref": "#/components/schemas/Owner" } } },
    "Owner": { "type": "object", "properties": { "name": { "type": "string" } } }
  })));

  let (graph, ctx) = Resolver::new(&spec).resolve().expect("resolves");
  assert_eq!(graph.back_edge_count(), 0);
  assert!(graph.cycles.is_empty());
  assert!(ctx.forward_declared.is_empty());
  assert_eq!(graph.order[0], Pointer::component("Pet"));
}

#[test]
fn test_reference_only_cycle_is_rejected() {
  let spec = load(&with_schemas(json!({
    "A": { "$ref": "#/components/schemas/B" },
    "B": { "$ref": "#/components/schemas/A" }
  })));

  let err = Resolver::new(&spec).resolve().expect_err("no concrete schema");
  assert_eq!(err.kind(), ErrorKind::UnsupportedSchema);
}

#[test]
fn test_resolution_is_deterministic() {
  let document = with_schemas(json!({
    "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" }, "c": { "$ref": "#/components/schemas/C" } } },
    "B": { "type": "object", "properties": { "c": { "$ref": "#/components/schemas/C" } } },
    "C": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } }
  }));

  let first_spec = load(&document);
  let second_spec = load(&document);
  let (first, _) = Resolver::new(&first_spec).resolve().expect("resolves");
  let (second, _) = Resolver::new(&second_spec).resolve().expect("resolves");
  assert_eq!(first.order, second.order);
  assert_eq!(first.cycles, second.cycles);
}
