use indexmap::IndexSet;
use oas3::spec::{ObjectOrReference, ObjectSchema};

use super::primitive;
use crate::{
  generator::{
    ast::{DeclarationKind, EnumDef, EnumVariant, TypeExpr, UnionDef, UnionVariant},
    diagnostics::DiagnosticKind,
    naming::identifiers::{ensure_unique, to_rust_type_name},
    resolver::{ReferenceError, SchemaResolver},
  },
  utils::SchemaExt,
};

/// Literal enums and `oneOf`/`anyOf` unions.
///
/// A union with a single non-null branch collapses to that branch; a `null`
/// branch makes the result optional when nullable mode is on.
pub(super) fn descriptor(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  hint: &str,
) -> Result<TypeExpr, ReferenceError> {
  if !schema.enum_values.is_empty() {
    return enum_descriptor(resolver, schema, hint);
  }

  let (branches, has_null) = non_null_branches(resolver, schema);
  let ty = match branches.as_slice() {
    [] => TypeExpr::Any,
    [single] => resolver.resolve(single, hint)?.required(),
    _ => resolver.declare_inline("union", schema, hint, |resolver, name| definition(resolver, schema, name))?,
  };
  Ok(if has_null && resolver.nullable() { ty.optional() } else { ty })
}

pub(super) fn definition(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  name: &str,
) -> Result<DeclarationKind, ReferenceError> {
  if !schema.enum_values.is_empty() {
    return Ok(enum_definition(resolver, schema, name));
  }

  let (branches, _) = non_null_branches(resolver, schema);
  let mut variants: Vec<UnionVariant> = vec![];
  for (index, branch) in branches.iter().enumerate() {
    let branch_type = resolver.resolve(branch, &format!("{name}Variant{}", index + 1))?.required();
    if variants.iter().any(|v| v.type_expr.clone().without_recursion() == branch_type.clone().without_recursion()) {
      continue;
    }
    let variant_name = ensure_unique(&to_rust_type_name(&branch_type.name_fragment()), |c| {
      variants.iter().any(|v| v.name == c)
    });
    variants.push(UnionVariant {
      name: variant_name,
      type_expr: branch_type,
    });
  }

  Ok(match variants.len() {
    0 => DeclarationKind::Alias(TypeExpr::Any),
    1 => DeclarationKind::Alias(variants.remove(0).type_expr.without_recursion()),
    _ => DeclarationKind::Union(UnionDef { variants }),
  })
}

fn non_null_branches<'s>(
  resolver: &SchemaResolver<'_>,
  schema: &'s ObjectSchema,
) -> (Vec<&'s ObjectOrReference<ObjectSchema>>, bool) {
  let mut has_null = schema.allows_null();
  let mut branches = vec![];
  for branch in schema.union_variants() {
    let is_null = match branch {
      ObjectOrReference::Object(inline) => inline.is_null(),
      ObjectOrReference::Ref { ref_path, .. } => resolver.lookup_component(ref_path).is_ok_and(|s| s.is_null()),
    };
    if is_null {
      has_null = true;
    } else {
      branches.push(branch);
    }
  }
  (branches, has_null)
}

fn string_values(schema: &ObjectSchema) -> Option<(Vec<String>, bool)> {
  let mut has_null = false;
  let mut values = IndexSet::new();
  for value in &schema.enum_values {
    match value {
      serde_json::Value::String(s) => {
        values.insert(s.clone());
      }
      serde_json::Value::Null => has_null = true,
      _ => return None,
    }
  }
  Some((values.into_iter().collect(), has_null))
}

fn enum_descriptor(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  hint: &str,
) -> Result<TypeExpr, ReferenceError> {
  let Some((values, has_null)) = string_values(schema) else {
    return Ok(fallback_primitive(resolver, schema, hint));
  };
  if values.is_empty() {
    return Ok(TypeExpr::Any);
  }

  let ty = resolver.declare_inline("enum", schema, hint, |resolver, name| {
    Ok(enum_definition(resolver, schema, name))
  })?;
  Ok(if has_null && resolver.nullable() { ty.optional() } else { ty })
}

/// Unit-variant enum over the distinct string literals, in document order.
fn enum_definition(resolver: &mut SchemaResolver<'_>, schema: &ObjectSchema, name: &str) -> DeclarationKind {
  let Some((values, _)) = string_values(schema) else {
    return DeclarationKind::Alias(fallback_primitive(resolver, schema, name));
  };

  let mut variants: Vec<EnumVariant> = Vec::with_capacity(values.len());
  for value in values {
    let variant_name = ensure_unique(&to_rust_type_name(&value), |c| variants.iter().any(|v| v.name == c));
    variants.push(EnumVariant {
      name: variant_name,
      value,
    });
  }
  DeclarationKind::Enum(EnumDef { variants })
}

fn fallback_primitive(resolver: &mut SchemaResolver<'_>, schema: &ObjectSchema, name: &str) -> TypeExpr {
  let fallback = if schema.value_type().is_some() {
    TypeExpr::Primitive(primitive::map_primitive(resolver, schema))
  } else {
    TypeExpr::Any
  };
  resolver.report(DiagnosticKind::UnsupportedEnumValues {
    name: name.to_string(),
    fallback: fallback.to_rust_type(),
  });
  fallback
}
