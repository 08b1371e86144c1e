use oas3::spec::ObjectSchema;

use crate::{
  generator::{
    ast::{DeclarationKind, TypeExpr},
    resolver::{ReferenceError, SchemaResolver},
  },
  utils::{AdditionalProperties, SchemaExt},
};

/// `HashMap<String, V>` keyed by property name.
///
/// Untyped or open `additionalProperties` maps to `serde_json::Value` values.
pub(super) fn descriptor(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  hint: &str,
) -> Result<TypeExpr, ReferenceError> {
  let value = match schema.additional() {
    AdditionalProperties::Typed(value) => resolver.resolve(value, &format!("{hint}Value"))?.required(),
    AdditionalProperties::Open | AdditionalProperties::Closed => TypeExpr::Any,
  };
  Ok(TypeExpr::map_of(value))
}

pub(super) fn definition(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  name: &str,
) -> Result<DeclarationKind, ReferenceError> {
  Ok(DeclarationKind::Alias(descriptor(resolver, schema, name)?.without_recursion()))
}
