use oas3::spec::{Operation, Parameter};
use serde_json::{Value, json};

use super::{
  HeaderParameterGenerator, ParameterGenerator, PathParameterGenerator, QueryParameterGenerator,
  RequestBodyGenerator,
};
use crate::generator::{
  ast::{BodyEncoding, ParameterLocation, RustPrimitive, TypeExpr},
  registry::TypeRegistry,
  resolver::SchemaResolver,
  tests::support::{codes, names, spec_from, spec_with_schemas},
};

fn parameter(value: Value) -> Parameter {
  serde_json::from_value(value).expect("valid parameter")
}

fn operation(value: Value) -> Operation {
  serde_json::from_value(value).expect("valid operation")
}

#[test]
fn test_path_scalar_is_required() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let param = parameter(json!({ "name": "petId", "in": "path", "schema": { "type": "integer", "format": "int64" } }));

  let mut generator = PathParameterGenerator::new(&param, "GetPet");
  let declaration = generator.generate(&mut resolver).unwrap().expect("path parameter bound");

  assert_eq!(declaration.name, "pet_id");
  assert_eq!(declaration.wire_name, "petId");
  assert_eq!(declaration.location, ParameterLocation::Path);
  assert_eq!(declaration.type_expr, TypeExpr::Primitive(RustPrimitive::I64));
  assert!(declaration.required);
  assert!(generator.diagnostics().is_empty());
}

#[test]
fn test_path_enum_component_is_scalar() {
  let spec = spec_with_schemas(json!({
    "Species": { "type": "string", "enum": ["cat", "dog"] }
  }));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let param = parameter(json!({
    "name": "species",
    "in": "path",
    "required": true,
    "schema": { "$ref": "#/components/schemas/Species" }
  }));

  let declaration = PathParameterGenerator::new(&param, "ListBySpecies")
    .generate(&mut resolver)
    .unwrap()
    .expect("enum path parameter bound");

  assert_eq!(declaration.type_expr, TypeExpr::named("Species"));
}

#[test]
fn test_path_array_rejected_without_leftovers() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let param = parameter(json!({
    "name": "ids",
    "in": "path",
    "required": true,
    "schema": { "type": "array", "items": { "type": "string", "maxLength": 8 } }
  }));

  let mut generator = PathParameterGenerator::new(&param, "GetMany");
  let declaration = generator.generate(&mut resolver).unwrap();

  assert!(declaration.is_none());
  assert_eq!(codes(generator.diagnostics()), vec!["C101"]);
  let message = generator.diagnostics().iter().next().unwrap().message();
  assert!(message.contains("'array'"), "{message}");
  assert!(resolver.registry().is_empty());
}

#[test]
fn test_query_array_of_scalars_and_default() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let tags = parameter(json!({
    "name": "tags",
    "in": "query",
    "schema": { "type": "array", "items": { "type": "string" } }
  }));
  let limit = parameter(json!({
    "name": "limit",
    "in": "query",
    "schema": { "type": "integer", "format": "int32", "default": 20 }
  }));

  let tags = QueryParameterGenerator::new(&tags, "ListPets")
    .generate(&mut resolver)
    .unwrap()
    .expect("array query parameter bound");
  let limit = QueryParameterGenerator::new(&limit, "ListPets")
    .generate(&mut resolver)
    .unwrap()
    .expect("scalar query parameter bound");

  assert_eq!(tags.type_expr.to_rust_type(), "Vec<String>");
  assert!(tags.explode);
  assert!(!tags.required);
  assert_eq!(limit.default, Some(json!(20)));
  assert_eq!(limit.signature_type().to_rust_type(), "Option<i32>");
}

#[test]
fn test_query_untyped_array_is_error() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let param = parameter(json!({ "name": "ids", "in": "query", "schema": { "type": "array" } }));

  let mut generator = QueryParameterGenerator::new(&param, "ListPets");
  assert!(generator.generate(&mut resolver).unwrap().is_none());
  assert_eq!(codes(generator.diagnostics()), vec!["C103"]);
  assert!(generator.diagnostics().has_errors());
}

#[test]
fn test_query_object_rejected_and_rolled_back() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let param = parameter(json!({
    "name": "filter",
    "in": "query",
    "schema": { "type": "object", "properties": { "name": { "type": "string" } } }
  }));

  let mut generator = QueryParameterGenerator::new(&param, "ListPets");
  assert!(generator.generate(&mut resolver).unwrap().is_none());
  assert_eq!(codes(generator.diagnostics()), vec!["C102"]);
  assert!(resolver.registry().is_empty());
  assert!(!resolver.registry().is_taken("ListPetsFilter"));
}

#[test]
fn test_header_binding() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let empty = parameter(json!({ "name": " ", "in": "header", "schema": { "type": "string" } }));
  let trace = parameter(json!({ "name": "X-Trace-Id", "in": "header", "required": true, "schema": { "type": "string" } }));

  let mut rejected = HeaderParameterGenerator::new(&empty, "ListPets");
  assert!(rejected.generate(&mut resolver).unwrap().is_none());
  assert_eq!(codes(rejected.diagnostics()), vec!["C111"]);

  let declaration = HeaderParameterGenerator::new(&trace, "ListPets")
    .generate(&mut resolver)
    .unwrap()
    .expect("header bound");
  assert_eq!(declaration.name, "x_trace_id");
  assert_eq!(declaration.wire_name, "X-Trace-Id");
  assert!(declaration.required);
  assert!(!declaration.explode);
}

#[test]
fn test_body_renamed_when_payload_taken() {
  let spec = spec_with_schemas(json!({
    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
  }));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let op = operation(json!({
    "operationId": "createPet",
    "requestBody": {
      "description": "Pet to add",
      "required": true,
      "content": {
        "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } }
      }
    },
    "responses": {}
  }));

  let mut generator = RequestBodyGenerator::new(&op, "createPet", "CreatePet", vec!["payload".to_string()]);
  let body = generator.generate(&mut resolver).unwrap().expect("body bound");

  assert_eq!(body.payload.name, "request_body");
  assert_eq!(body.payload.type_expr, TypeExpr::named("Pet"));
  assert_eq!(body.payload.encoding, Some(BodyEncoding::Json));
  assert_eq!(body.payload.docs.lines(), &["Pet to add".to_string()]);
  assert!(body.payload.required);
  assert_eq!(body.content_type, "application/json");
  assert!(body.headers.is_empty());
}

#[test]
fn test_body_first_supported_media_wins() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let op = operation(json!({
    "requestBody": {
      "content": {
        "image/png": {},
        "text/plain": { "schema": { "type": "string" } }
      }
    },
    "responses": {}
  }));

  let body = RequestBodyGenerator::new(&op, "upload", "Upload", vec![])
    .generate(&mut resolver)
    .unwrap()
    .expect("body bound");

  assert_eq!(body.payload.name, "payload");
  assert_eq!(body.content_type, "text/plain");
  assert_eq!(body.payload.type_expr, TypeExpr::Primitive(RustPrimitive::String));
}

#[test]
fn test_body_unknown_media_sent_as_bytes() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let op = operation(json!({
    "requestBody": { "content": { "image/png": {} } },
    "responses": {}
  }));

  let mut generator = RequestBodyGenerator::new(&op, "uploadImage", "UploadImage", vec![]);
  let body = generator.generate(&mut resolver).unwrap().expect("body bound");

  assert_eq!(body.payload.type_expr, TypeExpr::Primitive(RustPrimitive::Bytes));
  assert_eq!(body.payload.encoding, Some(BodyEncoding::Binary));
  assert_eq!(codes(generator.diagnostics()), vec!["C109"]);
}

#[test]
fn test_multipart_encoding_headers_become_parameters() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let op = operation(json!({
    "requestBody": {
      "content": {
        "multipart/form-data": {
          "schema": {
            "type": "object",
            "properties": { "file": { "type": "string", "format": "binary" } }
          },
          "encoding": {
            "file": {
              "headers": {
                "X-Rate-Limit": { "description": "Calls per hour", "schema": { "type": "integer" } },
                "X-Part-Meta": {
                  "schema": { "type": "object", "properties": { "origin": { "type": "string" } } }
                }
              }
            }
          }
        }
      }
    },
    "responses": {}
  }));

  let mut generator = RequestBodyGenerator::new(&op, "uploadFile", "UploadFile", vec![]);
  let body = generator.generate(&mut resolver).unwrap().expect("body bound");

  assert_eq!(body.payload.encoding, Some(BodyEncoding::Multipart));
  assert_eq!(body.headers.len(), 1);
  let header = &body.headers[0];
  assert_eq!(header.name, "x_rate_limit");
  assert_eq!(header.wire_name, "X-Rate-Limit");
  assert_eq!(header.location, ParameterLocation::Header);
  assert!(!header.required);

  // The object-typed part header is rejected and leaves nothing behind.
  assert_eq!(codes(generator.diagnostics()), vec!["C108"]);
  assert!(!names(resolver.registry()).iter().any(|name| name.contains("XPartMeta")));
  assert!(!resolver.registry().is_taken("UploadFileXPartMeta"));
}

#[test]
fn test_body_media_follows_document_order() {
  let spec = spec_from(
    json!({}),
    json!({
      "/notes": {
        "post": {
          "requestBody": {
            "content": {
              "text/plain": { "schema": { "type": "string" } },
              "application/json": { "schema": { "type": "object" } }
            }
          },
          "responses": {}
        }
      }
    }),
  );
  let op = spec.paths.as_ref().unwrap()["/notes"].post.clone().unwrap();
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);

  let body = RequestBodyGenerator::new(&op, "addNote", "AddNote", vec![])
    .generate(&mut resolver)
    .unwrap()
    .expect("body bound");

  assert_eq!(body.content_type, "text/plain");
  assert_eq!(body.payload.encoding, Some(BodyEncoding::Text));
}

#[test]
fn test_operation_without_body() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);
  let op = operation(json!({ "responses": {} }));

  let mut generator = RequestBodyGenerator::new(&op, "ping", "Ping", vec![]);
  assert!(generator.generate(&mut resolver).unwrap().is_none());
  assert!(generator.diagnostics().is_empty());
}
