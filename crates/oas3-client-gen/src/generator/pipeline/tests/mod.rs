
use serde_json::{Value, json};

fn bytes(document: &Value) -> Vec<u8> {
  document.to_string().into_bytes()
}

fn store() -> Value {
  json!({
    "openapi": "3.1.0",
    "info": { "title": "Store", "version": "2.0.0" },
    "paths": {
      "/orders/{orderId}": {
        "get": {
          "operationId": "getOrder",
          "parameters": [{ "name": "orderId", "in": "path", "required": true, "schema": { "type": "string" } }],
          "responses": {
            "200": {
              "description": "ok",
              "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Order" } } }
            }
          }
        }
      }
    },
    "components": {
      "schemas": {
        "Order": {
          "type": "object",
          "required": ["id"],
          "properties": {
            "id": { "type": "string" },
            "customer": { "$ref": "#/components/schemas/Customer" }
          }
        },
        "Customer": {
          "type": "object",
          "properties": {
            "lastOrder": { "$ref": "#/components/schemas/Order" }
          }
        }
      }
    }
  })
}
