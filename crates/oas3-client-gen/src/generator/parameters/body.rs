use std::borrow::Cow;

use oas3::spec::{MediaType, ObjectOrReference, ObjectSchema, Operation, RequestBody};
use serde_json::Value;

use super::{ParameterShape, discard};
use crate::generator::{
  ast::{BodyEncoding, Documentation, ParameterDeclaration, ParameterLocation, RustPrimitive, TypeExpr},
  diagnostics::{DiagnosticKind, Diagnostics},
  naming::identifiers::{ensure_unique, to_rust_field_name, to_rust_type_name},
  resolver::{ReferenceError, SchemaResolver},
};
use crate::utils::spec::ordered_content;

const BODY_PARAM_NAME: &str = "payload";
const BODY_PARAM_FALLBACK: &str = "request_body";

/// The bound request body plus the per-part headers a multipart body declares.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GeneratedBody {
  pub(crate) payload: ParameterDeclaration,
  pub(crate) content_type: String,
  pub(crate) headers: Vec<ParameterDeclaration>,
}

/// Binds the request body of one operation.
///
/// The first media type with a known encoding wins, in document order. A body
/// whose media types are all unknown is sent as raw bytes.
pub(crate) struct RequestBodyGenerator<'o> {
  operation: &'o Operation,
  operation_label: &'o str,
  hint: String,
  taken: Vec<String>,
  diagnostics: Diagnostics,
}

impl<'o> RequestBodyGenerator<'o> {
  /// `taken` lists the parameter names already used by the operation.
  pub(crate) fn new(operation: &'o Operation, operation_label: &'o str, type_base: &str, taken: Vec<String>) -> Self {
    Self {
      operation,
      operation_label,
      hint: format!("{type_base}Request"),
      taken,
      diagnostics: Diagnostics::new(),
    }
  }

  pub(crate) fn diagnostics(&self) -> &Diagnostics {
    &self.diagnostics
  }

  pub(crate) fn take_diagnostics(&mut self) -> Diagnostics {
    self.diagnostics.take()
  }

  pub(crate) fn generate(&mut self, resolver: &mut SchemaResolver<'_>) -> Result<Option<GeneratedBody>, ReferenceError> {
    let Some(body_ref) = self.operation.request_body.as_ref() else {
      return Ok(None);
    };
    let body: Cow<'_, RequestBody> = match body_ref {
      ObjectOrReference::Object(body) => Cow::Borrowed(body),
      ObjectOrReference::Ref { .. } => Cow::Owned(
        body_ref
          .resolve(resolver.spec())
          .map_err(|err| ReferenceError::unresolvable(body_ref, err))?,
      ),
    };

    let Some((content_type, media, encoding)) = self.select_media(&body) else {
      return Ok(None);
    };

    let type_expr = match encoding {
      BodyEncoding::Binary => RustPrimitive::Bytes.into(),
      BodyEncoding::Text | BodyEncoding::Xml => RustPrimitive::String.into(),
      BodyEncoding::Json | BodyEncoding::FormUrlEncoded | BodyEncoding::Multipart => match &media.schema {
        Some(schema) => resolver.resolve(schema, &self.hint)?.required(),
        None => TypeExpr::Any,
      },
    };

    let name = if self.taken.iter().any(|t| t == BODY_PARAM_NAME) {
      ensure_unique(BODY_PARAM_FALLBACK, |c| self.taken.iter().any(|t| t == c))
    } else {
      BODY_PARAM_NAME.to_string()
    };
    self.taken.push(name.clone());

    let payload = ParameterDeclaration::builder()
      .name(name)
      .wire_name(content_type.clone())
      .location(ParameterLocation::Body)
      .type_expr(type_expr)
      .required(body.required.unwrap_or(false))
      .docs(Documentation::from_optional(body.description.as_ref()))
      .encoding(encoding)
      .build();

    let headers = if encoding == BodyEncoding::Multipart {
      self.encoding_headers(resolver, &media)?
    } else {
      vec![]
    };

    Ok(Some(GeneratedBody {
      payload,
      content_type,
      headers,
    }))
  }

  fn select_media(&mut self, body: &RequestBody) -> Option<(String, MediaType, BodyEncoding)> {
    let content = ordered_content(&body.content);
    let supported = content.iter().copied().find_map(|(content_type, media)| {
      BodyEncoding::from_content_type(content_type).map(|encoding| (content_type.clone(), media.clone(), encoding))
    });
    if supported.is_some() {
      return supported;
    }

    let &(content_type, media) = content.first()?;
    self.diagnostics.push(DiagnosticKind::UnsupportedMediaType {
      operation: self.operation_label.to_string(),
      media_type: content_type.clone(),
    });
    Some((content_type.clone(), media.clone(), BodyEncoding::Binary))
  }

  /// Synthetic header parameters from `encoding.<part>.headers` of a multipart body.
  fn encoding_headers(
    &mut self,
    resolver: &mut SchemaResolver<'_>,
    media: &MediaType,
  ) -> Result<Vec<ParameterDeclaration>, ReferenceError> {
    let Ok(Value::Object(raw)) = serde_json::to_value(media) else {
      return Ok(vec![]);
    };
    let Some(Value::Object(parts)) = raw.get("encoding") else {
      return Ok(vec![]);
    };

    let mut headers = vec![];
    for part in parts.values() {
      let Some(Value::Object(part_headers)) = part.get("headers") else {
        continue;
      };
      for (wire_name, header) in part_headers {
        if wire_name.eq_ignore_ascii_case("content-type") {
          continue;
        }
        if wire_name.trim().is_empty() {
          self.diagnostics.push(DiagnosticKind::EmptyHeaderName);
          continue;
        }

        let schema = header
          .get("schema")
          .and_then(|s| serde_json::from_value::<ObjectOrReference<ObjectSchema>>(s.clone()).ok());
        let checkpoint = resolver.registry().checkpoint();
        let type_expr = match &schema {
          Some(schema) => {
            let hint = format!("{}{}", self.hint, to_rust_type_name(wire_name));
            resolver.resolve(schema, &hint)?.required()
          }
          None => RustPrimitive::String.into(),
        };
        if !matches!(
          ParameterShape::classify(resolver.registry(), &type_expr),
          ParameterShape::Scalar | ParameterShape::ScalarArray
        ) {
          self.diagnostics.push(DiagnosticKind::UnsupportedHeaderParameter {
            name: wire_name.clone(),
          });
          discard(resolver, checkpoint);
          continue;
        }

        let name = ensure_unique(&to_rust_field_name(wire_name), |c| self.taken.iter().any(|t| t == c));
        self.taken.push(name.clone());
        let description = header.get("description").and_then(Value::as_str).map(str::to_string);

        headers.push(
          ParameterDeclaration::builder()
            .name(name)
            .wire_name(wire_name.clone())
            .location(ParameterLocation::Header)
            .type_expr(type_expr)
            .required(header.get("required").and_then(Value::as_bool).unwrap_or(false))
            .docs(Documentation::from_optional(description.as_ref()))
            .explode(false)
            .build(),
        );
      }
    }
    Ok(headers)
  }
}
