//! Parameter generators, one per location.
//!
//! Each generator turns one OpenAPI parameter (or the request body) into a
//! [`ParameterDeclaration`], or rejects it with a diagnostic. Rejected
//! parameters leave no declarations behind in the registry.

mod body;
mod header;
mod path;
mod query;

#[cfg(test)]
mod tests;

use oas3::spec::{ObjectOrReference, ObjectSchema, Parameter, ParameterStyle};

pub(crate) use body::{GeneratedBody, RequestBodyGenerator};
pub(crate) use header::HeaderParameterGenerator;
pub(crate) use path::PathParameterGenerator;
pub(crate) use query::QueryParameterGenerator;

use super::{
  ast::{DeclarationKind, Documentation, ParameterDeclaration, ParameterLocation, RustPrimitive, TypeExpr},
  diagnostics::Diagnostics,
  naming::identifiers::{to_rust_field_name, to_rust_type_name},
  registry::{RegistryCheckpoint, TypeRegistry},
  resolver::{ReferenceError, SchemaResolver},
};
use crate::utils::{SchemaExt, spec::ordered_content};

pub(crate) trait ParameterGenerator {
  /// Builds the declaration, or `None` when the parameter cannot be bound.
  fn generate(&mut self, resolver: &mut SchemaResolver<'_>) -> Result<Option<ParameterDeclaration>, ReferenceError>;

  fn diagnostics(&self) -> &Diagnostics;

  fn take_diagnostics(&mut self) -> Diagnostics;
}

/// What a parameter type can be bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterShape {
  Scalar,
  ScalarArray,
  Other(&'static str),
}

impl ParameterShape {
  pub(crate) fn classify(registry: &TypeRegistry, ty: &TypeExpr) -> Self {
    match unalias(registry, ty) {
      TypeExpr::Array { item, dimensions: 1 } if is_scalar(registry, &item) => Self::ScalarArray,
      TypeExpr::Array { .. } => Self::Other("array"),
      TypeExpr::Map(_) => Self::Other("map"),
      TypeExpr::Any => Self::Other("any"),
      TypeExpr::Named { name, .. } => match registry.get(&name) {
        Some(declaration) if declaration.is_scalar() => Self::Scalar,
        Some(declaration) => Self::Other(declaration.kind.label()),
        None => Self::Other("unknown"),
      },
      other if is_scalar(registry, &other) => Self::Scalar,
      _ => Self::Other("unit"),
    }
  }

  pub(crate) fn label(self) -> &'static str {
    match self {
      Self::Scalar => "scalar",
      Self::ScalarArray => "array",
      Self::Other(label) => label,
    }
  }
}

/// Follows named aliases down to the aliased type, dropping `Option`.
fn unalias(registry: &TypeRegistry, ty: &TypeExpr) -> TypeExpr {
  let mut current = ty.clone().required();
  for _ in 0..16 {
    let TypeExpr::Named { name, .. } = &current else {
      break;
    };
    match registry.get(name).map(|d| &d.kind) {
      Some(DeclarationKind::Alias(inner)) => current = inner.clone().required(),
      _ => break,
    }
  }
  current
}

fn is_scalar(registry: &TypeRegistry, ty: &TypeExpr) -> bool {
  match unalias(registry, ty) {
    TypeExpr::Primitive(primitive) => primitive.is_scalar(),
    TypeExpr::Named { name, .. } => registry.get(&name).is_some_and(|d| d.is_scalar()),
    _ => false,
  }
}

/// The parameter schema, taken from `schema` or the first `content` entry.
fn parameter_schema(param: &Parameter) -> Option<&ObjectOrReference<ObjectSchema>> {
  param.schema.as_ref().or_else(|| {
    param
      .content
      .as_ref()
      .and_then(|content| ordered_content(content).into_iter().next())
      .and_then(|(_, media)| media.schema.as_ref())
  })
}

/// Resolves the parameter type. A parameter without a schema is a string.
fn resolve_parameter_type<'p>(
  resolver: &mut SchemaResolver<'_>,
  param: &'p Parameter,
  hint_prefix: &str,
) -> Result<(TypeExpr, Option<&'p ObjectOrReference<ObjectSchema>>), ReferenceError> {
  let Some(schema) = parameter_schema(param) else {
    return Ok((RustPrimitive::String.into(), None));
  };
  let hint = format!("{hint_prefix}{}", to_rust_type_name(&param.name));
  Ok((resolver.resolve(schema, &hint)?, Some(schema)))
}

/// True for an array schema that leaves its items undefined.
fn is_untyped_array(resolver: &SchemaResolver<'_>, schema: Option<&ObjectOrReference<ObjectSchema>>) -> bool {
  let Some(schema) = schema else {
    return false;
  };
  let resolved = match schema {
    ObjectOrReference::Object(inline) => Some(inline),
    ObjectOrReference::Ref { ref_path, .. } => resolver.lookup_component(ref_path).ok(),
  };
  resolved.is_some_and(|s| s.value_type() == Some(oas3::spec::SchemaType::Array) && s.items_schema().is_none())
}

fn default_literal(resolver: &SchemaResolver<'_>, schema: Option<&ObjectOrReference<ObjectSchema>>) -> Option<serde_json::Value> {
  match schema? {
    ObjectOrReference::Object(inline) => inline.default_value(),
    ObjectOrReference::Ref { ref_path, .. } => resolver.lookup_component(ref_path).ok()?.default_value(),
  }
}

/// Declaration for a bound path, query or header parameter.
fn declare(
  resolver: &SchemaResolver<'_>,
  param: &Parameter,
  location: ParameterLocation,
  type_expr: TypeExpr,
  schema: Option<&ObjectOrReference<ObjectSchema>>,
) -> ParameterDeclaration {
  let required = location == ParameterLocation::Path || param.required.unwrap_or(false);
  let default = if required { None } else { default_literal(resolver, schema) };
  let explode = param
    .explode
    .unwrap_or(matches!(param.style, None | Some(ParameterStyle::Form)));

  ParameterDeclaration::builder()
    .name(to_rust_field_name(&param.name))
    .wire_name(param.name.clone())
    .location(location)
    .type_expr(type_expr.required())
    .required(required)
    .maybe_default(default)
    .docs(Documentation::from_optional(param.description.as_ref()))
    .explode(explode)
    .build()
}

/// Undoes declarations made while resolving a rejected parameter.
fn discard(resolver: &mut SchemaResolver<'_>, checkpoint: RegistryCheckpoint) {
  resolver.registry_mut().rollback(checkpoint);
}
