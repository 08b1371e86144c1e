use oas3::spec::{ObjectOrReference, ObjectSchema, Schema, SchemaType, SchemaTypeSet};

use crate::generator::ast::{Constraints, Documentation};

/// Extension (without its `x-` prefix) listing a schema's property names in document order.
pub(crate) const PROPERTY_ORDER_EXTENSION: &str = "client-gen-property-order";

/// How an object schema treats properties it does not declare.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AdditionalProperties<'a> {
  /// Absent or `true`: anything goes, no typed rest field.
  Open,
  /// `false`.
  Closed,
  Typed(&'a ObjectOrReference<ObjectSchema>),
}

/// Extension methods for `ObjectSchema` to query its type properties conveniently.
pub(crate) trait SchemaExt {
  /// Returns true if the type set includes `null`.
  fn allows_null(&self) -> bool;

  /// Returns true if the schema is explicitly and only the null type.
  fn is_null(&self) -> bool;

  /// The single non-null type, if exactly one is declared.
  fn value_type(&self) -> Option<SchemaType>;

  /// Returns true if the type set holds more than one non-null type.
  fn is_multi_typed(&self) -> bool;

  /// Returns true if the schema has inline oneOf or anyOf variants.
  fn has_union(&self) -> bool;

  /// `oneOf` branches followed by `anyOf` branches.
  fn union_variants(&self) -> impl Iterator<Item = &ObjectOrReference<ObjectSchema>>;

  /// Properties in document order; names missing from the recorded order follow by name.
  fn ordered_properties(&self) -> Vec<(&String, &ObjectOrReference<ObjectSchema>)>;

  /// The `items` schema, unless absent or a boolean schema.
  fn items_schema(&self) -> Option<&ObjectOrReference<ObjectSchema>>;

  fn additional(&self) -> AdditionalProperties<'_>;

  /// Raw validation constraints, without any clamping applied.
  fn constraints(&self) -> Constraints;

  fn has_constraints(&self) -> bool;

  /// OpenAPI type name capitalized, used in synthesized identifiers.
  ///
  /// # Example
  /// ```text
  /// { "type": "string" }  => "String"
  /// { "type": "integer" } => "Integer"
  /// {}                    => "Value"
  /// ```
  fn openapi_type_label(&self) -> &'static str;

  fn docs(&self) -> Documentation;

  fn is_deprecated(&self) -> bool;

  /// The `default` literal, if any.
  fn default_value(&self) -> Option<serde_json::Value>;

  /// `example`, else the first entry of `examples`.
  fn example_value(&self) -> Option<serde_json::Value>;
}

impl SchemaExt for ObjectSchema {
  fn allows_null(&self) -> bool {
    self.is_nullable().unwrap_or(false)
  }

  fn ordered_properties(&self) -> Vec<(&String, &ObjectOrReference<ObjectSchema>)> {
    let mut ordered = self
      .extensions
      .get(PROPERTY_ORDER_EXTENSION)
      .and_then(serde_json::Value::as_array)
      .map(|names| {
        names
          .iter()
          .filter_map(serde_json::Value::as_str)
          .filter_map(|name| self.properties.get_key_value(name))
          .collect::<Vec<_>>()
      })
      .unwrap_or_default();
    for entry in &self.properties {
      if !ordered.iter().any(|(name, _)| *name == entry.0) {
        ordered.push(entry);
      }
    }
    ordered
  }

  fn is_null(&self) -> bool {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(t)) => *t == SchemaType::Null,
      Some(SchemaTypeSet::Multiple(types)) => !types.is_empty() && types.iter().all(|t| *t == SchemaType::Null),
      None => false,
    }
  }

  fn value_type(&self) -> Option<SchemaType> {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(t)) if *t != SchemaType::Null => Some(*t),
      Some(SchemaTypeSet::Multiple(types)) => {
        let mut non_null = types.iter().filter(|t| **t != SchemaType::Null);
        let first = non_null.next().copied();
        if non_null.next().is_some() { None } else { first }
      }
      _ => None,
    }
  }

  fn is_multi_typed(&self) -> bool {
    matches!(&self.schema_type, Some(SchemaTypeSet::Multiple(types))
      if types.iter().filter(|t| **t != SchemaType::Null).count() > 1)
  }

  fn has_union(&self) -> bool {
    !self.one_of.is_empty() || !self.any_of.is_empty()
  }

  fn union_variants(&self) -> impl Iterator<Item = &ObjectOrReference<ObjectSchema>> {
    self.one_of.iter().chain(&self.any_of)
  }

  fn items_schema(&self) -> Option<&ObjectOrReference<ObjectSchema>> {
    match self.items.as_deref()? {
      Schema::Object(item) => Some(item),
      Schema::Boolean(_) => None,
    }
  }

  fn additional(&self) -> AdditionalProperties<'_> {
    match &self.additional_properties {
      Some(Schema::Object(schema)) => AdditionalProperties::Typed(schema),
      Some(Schema::Boolean(flag)) if !flag.0 => AdditionalProperties::Closed,
      _ => AdditionalProperties::Open,
    }
  }

  fn constraints(&self) -> Constraints {
    Constraints {
      min_length: self.min_length,
      max_length: self.max_length,
      min_items: self.min_items,
      max_items: self.max_items,
      minimum: self.minimum.clone(),
      maximum: self.maximum.clone(),
      pattern: self.pattern.clone(),
    }
  }

  fn has_constraints(&self) -> bool {
    !self.constraints().is_empty()
  }

  fn openapi_type_label(&self) -> &'static str {
    match self.value_type() {
      Some(SchemaType::String) => "String",
      Some(SchemaType::Integer) => "Integer",
      Some(SchemaType::Number) => "Number",
      Some(SchemaType::Boolean) => "Boolean",
      Some(SchemaType::Array) => "Array",
      Some(SchemaType::Object) => "Object",
      Some(SchemaType::Null) | None => "Value",
    }
  }

  fn docs(&self) -> Documentation {
    Documentation::first_of([self.description.as_ref(), self.title.as_ref()])
  }

  fn is_deprecated(&self) -> bool {
    self.deprecated.unwrap_or(false)
  }

  fn default_value(&self) -> Option<serde_json::Value> {
    keyword(self, "default")
  }

  fn example_value(&self) -> Option<serde_json::Value> {
    keyword(self, "example").or_else(|| match keyword(self, "examples")? {
      serde_json::Value::Array(items) => items.into_iter().next(),
      _ => None,
    })
  }
}

/// Reads a keyword off the serialized schema, treating `null` as absent.
fn keyword(schema: &ObjectSchema, key: &str) -> Option<serde_json::Value> {
  let serde_json::Value::Object(mut map) = serde_json::to_value(schema).ok()? else {
    return None;
  };
  map.remove(key).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn schema(value: serde_json::Value) -> ObjectSchema {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_nullable_type_sets() {
    let nullable = schema(json!({"type": ["string", "null"]}));
    assert!(nullable.allows_null());
    assert!(!nullable.is_null());
    assert_eq!(nullable.value_type(), Some(SchemaType::String));

    assert!(!schema(json!({"type": "string"})).allows_null());
    assert!(!schema(json!({})).allows_null());

    let null = schema(json!({"type": "null"}));
    assert!(null.is_null());
    assert_eq!(null.value_type(), None);

    let multi = schema(json!({"type": ["string", "integer"]}));
    assert!(multi.is_multi_typed());
    assert_eq!(multi.value_type(), None);
  }

  #[test]
  fn test_additional_properties_modes() {
    assert!(matches!(schema(json!({"type": "object"})).additional(), AdditionalProperties::Open));
    assert!(matches!(
      schema(json!({"type": "object", "additionalProperties": false})).additional(),
      AdditionalProperties::Closed
    ));
    assert!(matches!(
      schema(json!({"type": "object", "additionalProperties": {"type": "integer"}})).additional(),
      AdditionalProperties::Typed(_)
    ));
  }

  #[test]
  fn test_constraints_and_labels() {
    let s = schema(json!({"type": "string", "maxLength": 10, "pattern": "^a"}));
    assert!(s.has_constraints());
    assert_eq!(s.constraints().max_length, Some(10));
    assert_eq!(s.openapi_type_label(), "String");
    assert!(!schema(json!({"type": "integer"})).has_constraints());
  }

  #[test]
  fn test_default_and_example_values() {
    let s = schema(json!({"type": "integer", "default": 20, "examples": [5, 6]}));
    assert_eq!(s.default_value(), Some(json!(20)));
    assert_eq!(s.example_value(), Some(json!(5)));

    let s = schema(json!({"type": "string", "example": "rex"}));
    assert_eq!(s.example_value(), Some(json!("rex")));
    assert_eq!(s.default_value(), None);
  }
}
