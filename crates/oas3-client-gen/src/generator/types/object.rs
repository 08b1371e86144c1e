use std::borrow::Cow;

use indexmap::IndexMap;
use oas3::spec::{ObjectOrReference, ObjectSchema, Schema};

use crate::{
  generator::{
    ast::{Constraints, DeclarationKind, Documentation, FieldDef, RecordDef, RestField, TypeExpr},
    naming::identifiers::{ensure_unique, to_rust_field_name, to_rust_type_name},
    resolver::{ReferenceError, SchemaResolver},
  },
  utils::{AdditionalProperties, SchemaExt, schema_ext::PROPERTY_ORDER_EXTENSION},
};

const REST_FIELD_NAME: &str = "additional_properties";

/// Inline objects are declared under the hint name.
pub(super) fn descriptor(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  hint: &str,
) -> Result<TypeExpr, ReferenceError> {
  resolver.declare_inline("record", schema, hint, |resolver, name| definition(resolver, schema, name))
}

pub(super) fn definition(
  resolver: &mut SchemaResolver<'_>,
  schema: &ObjectSchema,
  name: &str,
) -> Result<DeclarationKind, ReferenceError> {
  let merged = merge_all_of(resolver, schema)?;

  let mut fields = Vec::with_capacity(merged.properties.len());
  let mut used = Vec::<String>::new();

  for (prop_name, prop_schema) in merged.ordered_properties() {
    let field_name = ensure_unique(&to_rust_field_name(prop_name), |c| used.iter().any(|u| u == c));
    used.push(field_name.clone());

    let hint = format!("{name}{}", to_rust_type_name(prop_name));
    let type_expr = resolver.resolve(prop_schema, &hint)?;
    let required = merged.required.iter().any(|r| r == prop_name);

    let (docs, constraints, deprecated) = match prop_schema {
      ObjectOrReference::Object(inline) => (
        inline.docs(),
        resolver.constraints_for(inline, &hint),
        inline.is_deprecated(),
      ),
      ObjectOrReference::Ref { .. } => (Documentation::default(), Constraints::default(), false),
    };

    fields.push(
      FieldDef::builder()
        .name(field_name)
        .wire_name(prop_name.clone())
        .docs(docs)
        .type_expr(if required { type_expr } else { type_expr.optional() })
        .required(required)
        .constraints(constraints)
        .deprecated(deprecated)
        .build(),
    );
  }

  let rest = match merged.additional() {
    AdditionalProperties::Typed(value) => {
      let value_type = resolver.resolve(value, &format!("{name}Value"))?;
      Some(RestField {
        name: ensure_unique(REST_FIELD_NAME, |c| used.iter().any(|u| u == c)),
        value_type: value_type.required().without_recursion(),
      })
    }
    AdditionalProperties::Open | AdditionalProperties::Closed => None,
  };

  Ok(DeclarationKind::Record(RecordDef { fields, rest }))
}

/// Accumulates the properties of `allOf` branches into one object schema.
#[derive(Default)]
struct MergeAccumulator {
  properties: IndexMap<String, ObjectOrReference<ObjectSchema>>,
  required: Vec<String>,
  additional_properties: Option<Schema>,
}

impl MergeAccumulator {
  fn merge_from(&mut self, source: &ObjectSchema) {
    for (name, prop) in source.ordered_properties() {
      self.properties.insert(name.clone(), prop.clone());
    }
    for name in &source.required {
      if !self.required.contains(name) {
        self.required.push(name.clone());
      }
    }
    if self.additional_properties.is_none() && source.additional_properties.is_some() {
      self.additional_properties.clone_from(&source.additional_properties);
    }
  }

  fn into_schema(self, base: &ObjectSchema) -> ObjectSchema {
    let mut result = base.clone();
    let order = self.properties.keys().cloned().map(serde_json::Value::String).collect();
    result
      .extensions
      .insert(PROPERTY_ORDER_EXTENSION.to_string(), serde_json::Value::Array(order));
    result.properties = self.properties.into_iter().collect();
    result.required = self.required;
    result.all_of.clear();
    if result.additional_properties.is_none() {
      result.additional_properties = self.additional_properties;
    }
    result
  }
}

/// Flattens `allOf` into a single schema; branch properties come first, in branch order.
fn merge_all_of<'s>(
  resolver: &SchemaResolver<'_>,
  schema: &'s ObjectSchema,
) -> Result<Cow<'s, ObjectSchema>, ReferenceError> {
  if schema.all_of.is_empty() {
    return Ok(Cow::Borrowed(schema));
  }

  let mut acc = MergeAccumulator::default();
  collect_branches(resolver, schema, &mut acc, 0)?;
  acc.merge_from(schema);
  Ok(Cow::Owned(acc.into_schema(schema)))
}

fn collect_branches(
  resolver: &SchemaResolver<'_>,
  schema: &ObjectSchema,
  acc: &mut MergeAccumulator,
  depth: usize,
) -> Result<(), ReferenceError> {
  if depth > 16 {
    return Ok(());
  }
  for branch in &schema.all_of {
    let branch_schema = match branch {
      ObjectOrReference::Object(inline) => inline,
      ObjectOrReference::Ref { ref_path, .. } => resolver.lookup_component(ref_path)?,
    };
    collect_branches(resolver, branch_schema, acc, depth + 1)?;
    acc.merge_from(branch_schema);
  }
  Ok(())
}
