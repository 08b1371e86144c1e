use oas3::spec::ObjectOrReference;
use serde_json::json;

use super::{ReferenceError, SchemaResolver};
use crate::generator::{
  ast::{DeclarationKind, TypeExpr},
  registry::TypeRegistry,
  tests::support::{names, resolve_components, spec_with_schemas},
};

fn reference(path: &str) -> ObjectOrReference<oas3::spec::ObjectSchema> {
  serde_json::from_value(json!({ "$ref": path })).expect("valid reference")
}

#[test]
fn test_non_local_reference_rejected() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);

  let err = resolver
    .resolve(&reference("common.yaml#/components/schemas/Pet"), "Pet")
    .unwrap_err();

  assert_eq!(err, ReferenceError::NonLocal("common.yaml#/components/schemas/Pet".to_string()));
  assert_eq!(err.to_diagnostic("list_pets").code(), "C100");
}

#[test]
fn test_missing_component_rejected() {
  let spec = spec_with_schemas(json!({}));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);

  let err = resolver.resolve_reference("#/components/schemas/Ghost").unwrap_err();
  assert!(matches!(err, ReferenceError::Missing(ref path) if path == "#/components/schemas/Ghost"));
}

#[test]
fn test_failed_component_is_abandoned() {
  let spec = spec_with_schemas(json!({
    "Broken": {
      "type": "object",
      "properties": { "owner": { "$ref": "#/components/schemas/Ghost" } }
    }
  }));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);

  let err = resolver.resolve_reference("#/components/schemas/Broken").unwrap_err();
  assert_eq!(err.reference(), "#/components/schemas/Ghost");
  let message = err.to_diagnostic("Broken").to_string();
  assert!(message.contains("'Broken' omitted"), "{message}");

  drop(resolver);
  assert!(registry.is_empty());
  assert!(!registry.is_pending("Broken"));
  assert!(registry.is_taken("Broken"));
}

#[test]
fn test_reference_chain_becomes_alias() {
  let spec = spec_with_schemas(json!({
    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
    "Animal": { "$ref": "#/components/schemas/Pet" }
  }));

  let (registry, _) = resolve_components(&spec, false);

  assert_eq!(names(&registry), vec!["Animal", "Pet"]);
  assert_eq!(
    registry.get("Animal").map(|d| &d.kind),
    Some(&DeclarationKind::Alias(TypeExpr::named("Pet")))
  );
}

#[test]
fn test_lookup_component_follows_chain() {
  let spec = spec_with_schemas(json!({
    "A": { "$ref": "#/components/schemas/B" },
    "B": { "$ref": "#/components/schemas/C" },
    "C": { "type": "string", "description": "leaf" }
  }));
  let mut registry = TypeRegistry::new(&spec);
  let resolver = SchemaResolver::new(&spec, &mut registry, false);

  let leaf = resolver.lookup_component("#/components/schemas/A").unwrap();
  assert_eq!(leaf.description.as_deref(), Some("leaf"));
}

#[test]
fn test_cyclic_reference_chain_is_unresolvable() {
  let spec = spec_with_schemas(json!({
    "A": { "$ref": "#/components/schemas/B" },
    "B": { "$ref": "#/components/schemas/A" }
  }));
  let mut registry = TypeRegistry::new(&spec);
  let resolver = SchemaResolver::new(&spec, &mut registry, false);

  let err = resolver.lookup_component("#/components/schemas/A").unwrap_err();
  assert!(matches!(err, ReferenceError::Unresolvable { .. }));
}

#[test]
fn test_repeated_resolution_is_stable() {
  let spec = spec_with_schemas(json!({
    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
  }));
  let mut registry = TypeRegistry::new(&spec);
  let mut resolver = SchemaResolver::new(&spec, &mut registry, false);

  let first = resolver.resolve_reference("#/components/schemas/Pet").unwrap();
  let second = resolver.resolve_reference("#/components/schemas/Pet").unwrap();
  assert_eq!(first, second);
  assert_eq!(first, TypeExpr::named("Pet"));
  drop(resolver);
  assert_eq!(registry.len(), 1);
}
