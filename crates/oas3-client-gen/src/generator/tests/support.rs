use oas3::Spec;
use serde_json::{Value, json};

use crate::generator::{
  ast::{DeclarationKind, RecordDef, TypeDeclaration},
  diagnostics::Diagnostics,
  registry::TypeRegistry,
  resolver::SchemaResolver,
};

pub(crate) fn parse_spec(spec_json: &str) -> Spec {
  crate::utils::spec::from_json(spec_json).expect("failed to parse test spec")
}

/// Minimal document with the given component schemas and paths.
pub(crate) fn spec_from(schemas: Value, paths: Value) -> Spec {
  let document = json!({
    "openapi": "3.1.0",
    "info": { "title": "Test API", "version": "1.0.0" },
    "servers": [{ "url": "https://api.example.com/v1" }],
    "paths": paths,
    "components": { "schemas": schemas }
  });
  parse_spec(&document.to_string())
}

pub(crate) fn spec_with_schemas(schemas: Value) -> Spec {
  spec_from(schemas, json!({}))
}

/// Declares every component schema, panicking on reference errors.
pub(crate) fn resolve_components(spec: &Spec, nullable: bool) -> (TypeRegistry, Diagnostics) {
  let mut registry = TypeRegistry::new(spec);
  let names = registry
    .component_names()
    .map(|(ref_name, _)| ref_name.to_string())
    .collect::<Vec<_>>();

  let mut resolver = SchemaResolver::new(spec, &mut registry, nullable);
  for name in names {
    resolver
      .resolve_reference(&format!("#/components/schemas/{name}"))
      .unwrap_or_else(|err| panic!("component {name} failed to resolve: {err}"));
  }
  let diagnostics = resolver.take_diagnostics();
  (registry, diagnostics)
}

pub(crate) fn declaration<'a>(registry: &'a TypeRegistry, name: &str) -> &'a TypeDeclaration {
  registry
    .get(name)
    .unwrap_or_else(|| panic!("expected declaration {name}, found {:?}", names(registry)))
}

pub(crate) fn record<'a>(registry: &'a TypeRegistry, name: &str) -> &'a RecordDef {
  match &declaration(registry, name).kind {
    DeclarationKind::Record(record) => record,
    other => panic!("expected {name} to be a record, got {}", other.label()),
  }
}

/// Rust type of field `field` on record `name`.
pub(crate) fn field_type(registry: &TypeRegistry, name: &str, field: &str) -> String {
  record(registry, name)
    .fields
    .iter()
    .find(|f| f.name == field)
    .map(|f| f.type_expr.to_rust_type())
    .unwrap_or_else(|| panic!("record {name} has no field {field}"))
}

pub(crate) fn names(registry: &TypeRegistry) -> Vec<String> {
  registry.sorted().iter().map(|d| d.name.clone()).collect()
}

pub(crate) fn codes(diagnostics: &Diagnostics) -> Vec<&'static str> {
  diagnostics.iter().map(|d| d.code()).collect()
}

pub(crate) fn assert_contains(code: &str, expected: &str, context: &str) {
  assert!(
    code.contains(expected),
    "{context}: expected generated code to contain {expected:?}\n--- generated ---\n{code}"
  );
}

/// Like [`assert_contains`], ignoring the line breaks and indentation `prettyplease` chooses.
pub(crate) fn assert_contains_squashed(code: &str, expected: &str, context: &str) {
  let squash = |text: &str| text.split_whitespace().collect::<String>();
  assert!(
    squash(code).contains(&squash(expected)),
    "{context}: expected generated code to contain {expected:?}\n--- generated ---\n{code}"
  );
}
