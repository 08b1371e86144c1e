use oas3::spec::{ObjectOrReference, ObjectSchema};

use super::ShapeKind;
use crate::{
  generator::{
    ast::{DeclarationKind, NewtypeDef, TypeExpr},
    resolver::{ReferenceError, SchemaResolver},
  },
  utils::SchemaExt,
};

/// Ceiling applied to `maxItems`.
pub const MAX_ARRAY_LENGTH: u64 = 1_000_000;

/// `Vec<T>` of the item type, with nested arrays folded into one dimension count.
///
/// Inline items that carry constraints are hoisted into their own declaration
/// named `<hint>Items<ItemType>` so the constraint travels with a reusable name.
/// Nullable mode keeps items inline.
pub(super) fn descriptor(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  hint: &str,
) -> Result<TypeExpr, ReferenceError> {
  let Some(items) = schema.items_schema() else {
    return Ok(TypeExpr::array_of(TypeExpr::Any));
  };

  let item = match items {
    ObjectOrReference::Object(item) if !resolver.nullable() && item.has_constraints() => {
      hoist_constrained_item(resolver, item, hint)?
    }
    other => resolver.resolve(other, &format!("{hint}Item"))?,
  };

  Ok(TypeExpr::array_of(item.required()))
}

/// Arrays declared by name are aliases, or newtypes when they carry item-count constraints.
pub(super) fn definition(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  name: &str,
) -> Result<DeclarationKind, ReferenceError> {
  let inner = descriptor(resolver, schema, name)?;
  let constraints = resolver.constraints_for(schema, name);
  if constraints.is_empty() {
    Ok(DeclarationKind::Alias(inner))
  } else {
    Ok(DeclarationKind::Newtype(NewtypeDef { inner, constraints }))
  }
}

fn hoist_constrained_item(
  resolver: &mut SchemaResolver<'_>,
  item: &ObjectSchema,
  hint: &str,
) -> Result<TypeExpr, ReferenceError> {
  let name = format!("{hint}Items{}", item.openapi_type_label());
  let shape = ShapeKind::classify(item);

  resolver.declare_inline("items", item, &name, |resolver, name| match shape {
    ShapeKind::Primitive | ShapeKind::Array => {
      let inner = shape.descriptor(resolver, item, name)?;
      let constraints = resolver.constraints_for(item, name);
      Ok(DeclarationKind::Newtype(NewtypeDef { inner, constraints }))
    }
    other => other.definition(resolver, item, name),
  })
}
