//! Type generators, one per schema shape.
//!
//! Every generator offers a `descriptor`, the type expression used where the
//! schema appears, and a `definition`, the declaration body used when the
//! schema is given its own name.

mod array;
mod map;
mod object;
mod primitive;
mod union;


use oas3::spec::{ObjectSchema, SchemaType};
use strum::Display;

pub use array::MAX_ARRAY_LENGTH;

use super::{
  ast::{DeclarationKind, TypeExpr},
  resolver::{ReferenceError, SchemaResolver},
};
use crate::utils::{AdditionalProperties, SchemaExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ShapeKind {
  #[strum(to_string = "primitive")]
  Primitive,
  #[strum(to_string = "array")]
  Array,
  #[strum(to_string = "object")]
  Object,
  #[strum(to_string = "union")]
  Union,
  #[strum(to_string = "map")]
  Map,
  #[strum(to_string = "any")]
  Any,
}

impl ShapeKind {
  pub fn classify(schema: &ObjectSchema) -> Self {
    if !schema.all_of.is_empty() {
      return Self::Object;
    }
    if schema.has_union() || !schema.enum_values.is_empty() {
      return Self::Union;
    }
    if schema.is_multi_typed() {
      return Self::Any;
    }

    match schema.value_type() {
      Some(SchemaType::Array) => Self::Array,
      Some(SchemaType::Object) => Self::classify_object(schema),
      Some(SchemaType::String | SchemaType::Integer | SchemaType::Number | SchemaType::Boolean) => Self::Primitive,
      Some(SchemaType::Null) => Self::Primitive,
      None if schema.is_null() => Self::Primitive,
      None if schema.items.is_some() => Self::Array,
      None if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
        Self::classify_object(schema)
      }
      None => Self::Any,
    }
  }

  fn classify_object(schema: &ObjectSchema) -> Self {
    if !schema.properties.is_empty() {
      return Self::Object;
    }
    match schema.additional() {
      AdditionalProperties::Closed => Self::Object,
      AdditionalProperties::Open | AdditionalProperties::Typed(_) => Self::Map,
    }
  }

  /// Type expression for `schema` where it is used.
  pub fn descriptor(
    self,
    resolver: &mut SchemaResolver<'_>,
    schema: &ObjectSchema,
    hint: &str,
  ) -> Result<TypeExpr, ReferenceError> {
    match self {
      Self::Primitive => Ok(primitive::descriptor(resolver, schema, hint)),
      Self::Array => array::descriptor(resolver, schema, hint),
      Self::Object => object::descriptor(resolver, schema, hint),
      Self::Union => union::descriptor(resolver, schema, hint),
      Self::Map => map::descriptor(resolver, schema, hint),
      Self::Any => Ok(TypeExpr::Any),
    }
  }

  /// Declaration body for `schema` declared as `name`.
  pub fn definition(
    self,
    resolver: &mut SchemaResolver<'_>,
    schema: &ObjectSchema,
    name: &str,
  ) -> Result<DeclarationKind, ReferenceError> {
    match self {
      Self::Primitive => Ok(primitive::definition(resolver, schema, name)),
      Self::Array => array::definition(resolver, schema, name),
      Self::Object => object::definition(resolver, schema, name),
      Self::Union => union::definition(resolver, schema, name),
      Self::Map => map::definition(resolver, schema, name),
      Self::Any => Ok(DeclarationKind::Alias(TypeExpr::Any)),
    }
  }
}
