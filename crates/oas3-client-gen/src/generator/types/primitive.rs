use oas3::spec::{ObjectSchema, SchemaType};

use crate::{
  generator::{
    ast::{DeclarationKind, NewtypeDef, RustPrimitive, TypeExpr},
    diagnostics::DiagnosticKind,
    resolver::SchemaResolver,
  },
  utils::SchemaExt,
};

/// String formats that carry no extra structure and map to `String` silently.
const TEXTUAL_FORMATS: &[&str] = &[
  "byte",
  "email",
  "hostname",
  "idn-email",
  "idn-hostname",
  "ipv4",
  "ipv6",
  "iri",
  "iri-reference",
  "json-pointer",
  "password",
  "regex",
  "relative-json-pointer",
  "uri",
  "uri-reference",
  "uri-template",
  "url",
];

pub(super) fn descriptor(resolver: &mut SchemaResolver<'_>, schema: &ObjectSchema, _hint: &str) -> TypeExpr {
  map_primitive(resolver, schema).into()
}

/// Constrained primitives become newtypes so the constraint stays attached to the name.
pub(super) fn definition(resolver: &mut SchemaResolver<'_>, schema: &ObjectSchema, name: &str) -> DeclarationKind {
  let inner: TypeExpr = map_primitive(resolver, schema).into();
  let constraints = resolver.constraints_for(schema, name);
  if constraints.is_empty() {
    DeclarationKind::Alias(inner)
  } else {
    DeclarationKind::Newtype(NewtypeDef { inner, constraints })
  }
}

pub(crate) fn map_primitive(resolver: &mut SchemaResolver<'_>, schema: &ObjectSchema) -> RustPrimitive {
  let format = schema.format.as_deref();
  let Some(schema_type) = schema.value_type() else {
    return RustPrimitive::Unit;
  };

  let (primitive, supported) = match (schema_type, format) {
    (SchemaType::Integer, None | Some("int64")) => (RustPrimitive::I64, true),
    (SchemaType::Integer, Some("int32")) => (RustPrimitive::I32, true),
    (SchemaType::Integer, Some("int16")) => (RustPrimitive::I16, true),
    (SchemaType::Integer, Some("int8")) => (RustPrimitive::I8, true),
    (SchemaType::Integer, Some("uint64")) => (RustPrimitive::U64, true),
    (SchemaType::Integer, Some("uint32")) => (RustPrimitive::U32, true),
    (SchemaType::Integer, Some("uint16")) => (RustPrimitive::U16, true),
    (SchemaType::Integer, Some("uint8")) => (RustPrimitive::U8, true),
    (SchemaType::Integer, Some(_)) => (RustPrimitive::I64, false),
    (SchemaType::Number, None | Some("double")) => (RustPrimitive::F64, true),
    (SchemaType::Number, Some("float")) => (RustPrimitive::F32, true),
    (SchemaType::Number, Some(_)) => (RustPrimitive::F64, false),
    (SchemaType::Boolean, _) => (RustPrimitive::Bool, true),
    (SchemaType::String, None) => (RustPrimitive::String, true),
    (SchemaType::String, Some("date")) => (RustPrimitive::Date, true),
    (SchemaType::String, Some("date-time")) => (RustPrimitive::DateTime, true),
    (SchemaType::String, Some("time")) => (RustPrimitive::Time, true),
    (SchemaType::String, Some("uuid")) => (RustPrimitive::Uuid, true),
    (SchemaType::String, Some("binary")) => (RustPrimitive::Bytes, true),
    (SchemaType::String, Some(f)) => (RustPrimitive::String, TEXTUAL_FORMATS.contains(&f)),
    (SchemaType::Null, _) => (RustPrimitive::Unit, true),
    (SchemaType::Array | SchemaType::Object, _) => (RustPrimitive::Unit, false),
  };

  if !supported {
    resolver.report(DiagnosticKind::UnsupportedFormat {
      type_name: format!("{schema_type:?}").to_lowercase(),
      format: format.unwrap_or_default().to_string(),
      fallback: primitive.to_string(),
    });
  }
  primitive
}
