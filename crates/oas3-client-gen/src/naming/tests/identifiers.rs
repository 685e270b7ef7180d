use std::collections::BTreeSet;

use crate::naming::identifiers::{
  ensure_unique, sanitize, split_pascal_case, synthesize_operation_id, to_field_name, to_type_name,
};

#[test]
fn test_field_names() {
  assert_eq!(to_field_name("foo-bar"), "foo_bar");
  assert_eq!(to_field_name("petType"), "pet_type");
  assert_eq!(to_field_name("match"), "r#match");
  assert_eq!(to_field_name("self"), "self_");
  assert_eq!(to_field_name("123name"), "_123name");
  assert_eq!(to_field_name(""), "_");
  assert_eq!(to_field_name("  "), "_");
  assert_eq!(to_field_name("-created-date"), "negative_created_date");
}

#[test]
fn test_type_names() {
  assert_eq!(to_type_name("oAuth"), "OAuth");
  assert_eq!(to_type_name("order_item"), "OrderItem");
  assert_eq!(to_type_name("NOT_FORCED"), "NotForced");
  assert_eq!(to_type_name("beta_ResponseMCP"), "BetaResponseMcp");
  assert_eq!(to_type_name("XMLHttpRequest"), "XMLHttpRequest");
  assert_eq!(to_type_name("-INF"), "NegativeInf");
  assert_eq!(to_type_name("123Response"), "T123Response");
  assert_eq!(to_type_name(""), "Unnamed");
  assert_eq!(to_type_name("credit_card"), "CreditCard");
  assert_eq!(to_type_name("Pet.v2"), "PetV2");
}

#[test]
fn test_type_names_avoid_prelude_collisions() {
  assert_eq!(to_type_name("string"), "StringModel");
  assert_eq!(to_type_name("Result"), "ResultModel");
  assert_eq!(to_type_name("client"), "ClientModel");
}

#[test]
fn test_split_pascal_case() {
  assert_eq!(split_pascal_case("XMLParser"), vec!["XML", "Parser"]);
  assert_eq!(split_pascal_case("orderItem"), vec!["order", "Item"]);
  assert_eq!(split_pascal_case("v2Api"), vec!["v2", "Api"]);
}

#[test]
fn test_sanitize() {
  assert_eq!(sanitize("/products/{id}"), "products_id");
  assert_eq!(sanitize("café au lait"), "cafe_au_lait");
}

#[test]
fn test_ensure_unique_starts_at_two() {
  let mut used = BTreeSet::new();
  assert_eq!(ensure_unique("Pet", &used), "Pet");
  used.insert("Pet".to_string());
  assert_eq!(ensure_unique("Pet", &used), "Pet2");
  used.insert("Pet2".to_string());
  assert_eq!(ensure_unique("Pet", &used), "Pet3");
}

#[test]
fn test_synthesized_operation_ids() {
  assert_eq!(synthesize_operation_id("GET", "/products/{id}"), "get_products_id");
  assert_eq!(synthesize_operation_id("post", "/"), "post");
  assert_eq!(to_field_name(&synthesize_operation_id("DELETE", "/orders/{orderId}/items")), "delete_orders_order_id_items");
}
