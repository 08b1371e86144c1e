//! Return types synthesized from an operation's responses.
//!
//! Plain mode returns the success payload directly, hoisting several distinct
//! payloads into an untagged union. Status-code binding declares a response
//! enum with one variant per supported status code.

use itertools::Itertools;
use oas3::spec::{ObjectOrReference, Operation, Response};

use super::{
  ast::{
    BodyEncoding, DeclarationKind, Documentation, ResponseDecode, ResponseEnumDef, ResponseStatus, ResponseVariant,
    ReturnShape, RustPrimitive, StatusArm, TypeDeclaration, TypeExpr, UnionDef, UnionVariant,
  },
  diagnostics::{DiagnosticKind, Diagnostics},
  naming::{
    identifiers::{ensure_unique, to_rust_type_name},
    status_codes::{DEFAULT_STATUS_KEY, StatusKey, is_success_key},
  },
  resolver::{ReferenceError, SchemaResolver},
};
use crate::utils::spec::ordered_content;

pub(crate) const DEFAULT_VARIANT: &str = "Default";

/// What one response carries on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Payload {
  Empty,
  Typed(TypeExpr, ResponseDecode),
}

/// A success payload of plain mode, with the status code it was declared under.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SuccessPayload {
  status_code: String,
  type_expr: TypeExpr,
  decode: ResponseDecode,
}

/// Return type plus the status bookkeeping the function descriptor records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReturnPlan {
  pub(crate) shape: ReturnShape,
  pub(crate) has_default_status_code_binding: bool,
  pub(crate) non_default_status_codes: Vec<u16>,
}

pub(crate) struct ReturnTypeGenerator<'o> {
  operation_label: &'o str,
  type_base: &'o str,
  binding: bool,
  payloads: Vec<SuccessPayload>,
  has_empty: bool,
  arms: Vec<StatusArm>,
  arm_docs: Vec<Documentation>,
  has_default_status_code_binding: bool,
  non_default_status_codes: Vec<u16>,
  diagnostics: Diagnostics,
}

impl<'o> ReturnTypeGenerator<'o> {
  pub(crate) fn new(operation_label: &'o str, type_base: &'o str, binding: bool) -> Self {
    Self {
      operation_label,
      type_base,
      binding,
      payloads: vec![],
      has_empty: false,
      arms: vec![],
      arm_docs: vec![],
      has_default_status_code_binding: false,
      non_default_status_codes: vec![],
      diagnostics: Diagnostics::new(),
    }
  }

  pub(crate) fn diagnostics(&self) -> &Diagnostics {
    &self.diagnostics
  }

  pub(crate) fn take_diagnostics(&mut self) -> Diagnostics {
    self.diagnostics.take()
  }

  /// Feeds the operation's responses through [`Self::populate_return_type`].
  ///
  /// Plain mode reads the `2xx` responses, falling back to `default` when
  /// there are none. Status-code binding reads every response.
  pub(crate) fn populate(
    &mut self,
    resolver: &mut SchemaResolver<'_>,
    operation: &Operation,
  ) -> Result<(), ReferenceError> {
    let Some(responses) = operation.responses.as_ref() else {
      return Ok(());
    };

    let mut selected = responses
      .iter()
      .filter(|(key, _)| self.binding || is_success_key(key))
      .collect::<Vec<_>>();
    if selected.is_empty() && !self.binding {
      selected = responses
        .iter()
        .filter(|(key, _)| key.eq_ignore_ascii_case(DEFAULT_STATUS_KEY))
        .collect();
    }

    for (status_code, response_ref) in selected {
      let response = match response_ref {
        ObjectOrReference::Object(response) => response.clone(),
        ObjectOrReference::Ref { .. } => response_ref
          .resolve(resolver.spec())
          .map_err(|err| ReferenceError::unresolvable(response_ref, err))?,
      };
      self.populate_return_type(resolver, status_code, &response)?;
    }
    Ok(())
  }

  /// Records one response. Returns `false` when the response was skipped.
  pub(crate) fn populate_return_type(
    &mut self,
    resolver: &mut SchemaResolver<'_>,
    status_code: &str,
    response: &Response,
  ) -> Result<bool, ReferenceError> {
    if !self.binding {
      return Ok(match self.payload(resolver, status_code, response)? {
        Some(Payload::Typed(type_expr, decode)) => {
          if !self
            .payloads
            .iter()
            .any(|existing| existing.type_expr == type_expr && existing.decode == decode)
          {
            self.payloads.push(SuccessPayload {
              status_code: status_code.to_string(),
              type_expr,
              decode,
            });
          }
          true
        }
        Some(Payload::Empty) => {
          self.has_empty = true;
          true
        }
        None => false,
      });
    }

    let (status, variant) = match StatusKey::parse(status_code) {
      StatusKey::Code { code, variant } => (ResponseStatus::Code(code), variant),
      StatusKey::Default => (ResponseStatus::Default, DEFAULT_VARIANT),
      StatusKey::Unsupported => {
        self.diagnostics.push(DiagnosticKind::UnsupportedStatusCode {
          code: status_code.to_string(),
        });
        return Ok(false);
      }
    };

    let Some(payload) = self.payload(resolver, status_code, response)? else {
      return Ok(false);
    };
    let (payload, decode) = match payload {
      Payload::Typed(ty, decode) => (Some(ty), decode),
      Payload::Empty => (None, ResponseDecode::Empty),
    };

    match status {
      ResponseStatus::Code(code) => self.non_default_status_codes.push(code),
      ResponseStatus::Default => self.has_default_status_code_binding = true,
    }
    self.arms.push(StatusArm {
      status,
      variant: variant.to_string(),
      payload,
      decode,
    });
    self
      .arm_docs
      .push(Documentation::from_optional(response.description.as_ref()));
    Ok(true)
  }

  /// True when status-code binding found no response it could map.
  pub(crate) fn is_empty(&self) -> bool {
    self.binding && self.arms.is_empty()
  }

  /// True when `default` is the only response status-code binding could map.
  pub(crate) fn is_default_only(&self) -> bool {
    self.binding && !self.arms.is_empty() && self.arms.iter().all(|arm| arm.status == ResponseStatus::Default)
  }

  /// Declares any hoisted return type and produces the plan.
  pub(crate) fn finish(mut self, resolver: &mut SchemaResolver<'_>) -> (ReturnPlan, Diagnostics) {
    let shape = if self.binding {
      self.declare_response_enum(resolver)
    } else {
      self.plain_shape(resolver)
    };
    let plan = ReturnPlan {
      shape,
      has_default_status_code_binding: self.has_default_status_code_binding,
      non_default_status_codes: self.non_default_status_codes,
    };
    (plan, self.diagnostics)
  }

  /// Payloads that can share one return type.
  ///
  /// A hoisted union is decoded as JSON, so when the payloads decode
  /// differently only the JSON ones are kept, or the first one when none is
  /// JSON. Every dropped payload is reported.
  fn unionable_payloads(&mut self) -> Vec<SuccessPayload> {
    let payloads = std::mem::take(&mut self.payloads);
    if payloads.iter().all(|payload| payload.decode == ResponseDecode::Json) {
      return payloads;
    }

    let keep_json = payloads.iter().any(|payload| payload.decode == ResponseDecode::Json);
    let (kept, dropped): (Vec<_>, Vec<_>) = payloads.into_iter().enumerate().partition(|(index, payload)| {
      if keep_json {
        payload.decode == ResponseDecode::Json
      } else {
        *index == 0
      }
    });
    for (_, payload) in dropped {
      self.diagnostics.push(DiagnosticKind::UnsupportedResponse {
        operation: self.operation_label.to_string(),
        code: payload.status_code,
        reason: format!(
          "its {} payload can not share a return type with the other success responses",
          payload.decode
        ),
      });
    }
    kept.into_iter().map(|(_, payload)| payload).collect()
  }

  fn plain_shape(&mut self, resolver: &mut SchemaResolver<'_>) -> ReturnShape {
    match self.unionable_payloads().as_slice() {
      [] => ReturnShape::unit(),
      [payload] => ReturnShape::Single {
        type_expr: payload.type_expr.clone(),
        decode: payload.decode,
      },
      several => {
        let mut variants: Vec<UnionVariant> = vec![];
        for SuccessPayload { type_expr, .. } in several {
          let name = ensure_unique(&to_rust_type_name(&type_expr.name_fragment()), |c| {
            variants.iter().any(|v| v.name == c)
          });
          variants.push(UnionVariant {
            name,
            type_expr: type_expr.clone(),
          });
        }
        let registry = resolver.registry_mut();
        let name = registry.reserve_unique(&format!("{}Response", self.type_base));
        let docs = Documentation::from(format!("Success payloads of `{}`.", self.operation_label).as_str());
        let type_expr = registry.complete(TypeDeclaration::new(
          &name,
          docs,
          DeclarationKind::Union(UnionDef { variants }),
        ));
        ReturnShape::Single {
          type_expr,
          decode: ResponseDecode::Json,
        }
      }
    }
  }

  fn declare_response_enum(&self, resolver: &mut SchemaResolver<'_>) -> ReturnShape {
    let variants = self
      .arms
      .iter()
      .zip(&self.arm_docs)
      .map(|(arm, docs)| ResponseVariant {
        name: arm.variant.clone(),
        status: arm.status,
        payload: arm.payload.clone(),
        docs: docs.clone(),
      })
      .collect();

    let registry = resolver.registry_mut();
    let enum_name = registry.reserve_unique(&format!("{}Response", self.type_base));
    let docs = Documentation::from(format!("Responses of `{}` by status code.", self.operation_label).as_str());
    registry.complete(TypeDeclaration::new(
      &enum_name,
      docs,
      DeclarationKind::Response(ResponseEnumDef { variants }),
    ));

    ReturnShape::StatusBinding {
      enum_name,
      arms: self.arms.clone(),
    }
  }

  /// Maps a response to its payload, or `None` when no media type is usable.
  fn payload(
    &mut self,
    resolver: &mut SchemaResolver<'_>,
    status_code: &str,
    response: &Response,
  ) -> Result<Option<Payload>, ReferenceError> {
    if response.content.is_empty() {
      return Ok(Some(Payload::Empty));
    }

    let content = ordered_content(&response.content);
    let Some((media, encoding)) = content
      .iter()
      .copied()
      .find_map(|(content_type, media)| BodyEncoding::from_content_type(content_type).map(|enc| (media, enc)))
    else {
      let media_types = content.iter().map(|(content_type, _)| content_type.as_str()).join(", ");
      self.diagnostics.push(DiagnosticKind::UnsupportedResponse {
        operation: self.operation_label.to_string(),
        code: status_code.to_string(),
        reason: format!("no supported media type among '{media_types}'"),
      });
      return Ok(None);
    };

    let type_expr = match encoding {
      BodyEncoding::Binary => RustPrimitive::Bytes.into(),
      BodyEncoding::Text | BodyEncoding::Xml => RustPrimitive::String.into(),
      BodyEncoding::Json | BodyEncoding::FormUrlEncoded | BodyEncoding::Multipart => match &media.schema {
        Some(schema) => {
          let hint = format!("{}Response{}", self.type_base, to_rust_type_name(status_code));
          resolver.resolve(schema, &hint)?.required().without_recursion()
        }
        None => TypeExpr::Any,
      },
    };
    Ok(Some(Payload::Typed(type_expr, encoding.into())))
  }
}
