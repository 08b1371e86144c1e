use http::Method;
use mediatype::MediaType;
use strum::Display;

use super::{Documentation, PathTemplate, ResponseStatus, TypeExpr};
use crate::generator::diagnostics::Diagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParameterLocation {
  #[strum(to_string = "path")]
  Path,
  #[strum(to_string = "query")]
  Query,
  #[strum(to_string = "header")]
  Header,
  #[strum(to_string = "body")]
  Body,
}

/// Wire encoding of a request or response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum BodyEncoding {
  #[strum(to_string = "json")]
  Json,
  #[strum(to_string = "form")]
  FormUrlEncoded,
  #[strum(to_string = "multipart")]
  Multipart,
  #[strum(to_string = "text")]
  Text,
  #[strum(to_string = "binary")]
  Binary,
  #[strum(to_string = "xml")]
  Xml,
}

impl BodyEncoding {
  /// Classifies a content type, returning `None` when no encoding supports it.
  #[must_use]
  pub fn from_content_type(content_type: &str) -> Option<Self> {
    let media = MediaType::parse(content_type).ok()?;
    let suffix = media.suffix.as_ref().map(mediatype::Name::as_str);

    match (media.ty.as_str(), media.subty.as_str(), suffix) {
      (_, "json", _) | (_, _, Some("json")) => Some(Self::Json),
      ("application", "x-www-form-urlencoded", _) => Some(Self::FormUrlEncoded),
      ("multipart", "form-data", _) => Some(Self::Multipart),
      ("text", "plain", _) => Some(Self::Text),
      ("application", "octet-stream", _) => Some(Self::Binary),
      ("application" | "text", "xml", _) => Some(Self::Xml),
      _ => None,
    }
  }

  /// True when the body is carried as a serialized structured value.
  pub const fn is_structured(self) -> bool {
    matches!(self, Self::Json | Self::FormUrlEncoded | Self::Multipart)
  }
}

/// One formal parameter of a generated client method.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct ParameterDeclaration {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub wire_name: String,
  pub location: ParameterLocation,
  pub type_expr: TypeExpr,
  #[builder(default)]
  pub required: bool,
  pub default: Option<serde_json::Value>,
  #[builder(default)]
  pub docs: Documentation,
  pub encoding: Option<BodyEncoding>,
  #[builder(default = true)]
  pub explode: bool,
}

impl ParameterDeclaration {
  /// Type as it appears in the method signature.
  pub fn signature_type(&self) -> TypeExpr {
    if self.required {
      self.type_expr.clone().required()
    } else {
      self.type_expr.clone().optional()
    }
  }

  pub fn is_array(&self) -> bool {
    matches!(self.type_expr.clone().required(), TypeExpr::Array { .. })
  }
}

/// Orders parameters: required first, then defaultable, each sorted by name.
pub fn sort_parameters(params: &mut [ParameterDeclaration]) {
  params.sort_by(|a, b| (!a.required, &a.name).cmp(&(!b.required, &b.name)));
}

/// How a response payload is read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ResponseDecode {
  #[strum(to_string = "json")]
  Json,
  #[strum(to_string = "text")]
  Text,
  #[strum(to_string = "bytes")]
  Bytes,
  #[strum(to_string = "empty")]
  Empty,
}

impl From<BodyEncoding> for ResponseDecode {
  fn from(encoding: BodyEncoding) -> Self {
    match encoding {
      BodyEncoding::Json | BodyEncoding::FormUrlEncoded | BodyEncoding::Multipart => Self::Json,
      BodyEncoding::Text | BodyEncoding::Xml => Self::Text,
      BodyEncoding::Binary => Self::Bytes,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusArm {
  pub status: ResponseStatus,
  pub variant: String,
  pub payload: Option<TypeExpr>,
  pub decode: ResponseDecode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
  Single { type_expr: TypeExpr, decode: ResponseDecode },
  StatusBinding { enum_name: String, arms: Vec<StatusArm> },
}

impl ReturnShape {
  pub fn unit() -> Self {
    Self::Single {
      type_expr: TypeExpr::Primitive(super::RustPrimitive::Unit),
      decode: ResponseDecode::Empty,
    }
  }

  pub fn type_expr(&self) -> TypeExpr {
    match self {
      Self::Single { type_expr, .. } => type_expr.clone(),
      Self::StatusBinding { enum_name, .. } => TypeExpr::named(enum_name.clone()),
    }
  }
}

/// How the request URL is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RouteStyle {
  /// Path pushed segment by segment onto the base URL.
  #[strum(to_string = "segments")]
  Segments,
  /// Path formatted from its template inside the method body.
  #[strum(to_string = "template")]
  Template,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
  pub method: Method,
  pub path: PathTemplate,
  pub route: RouteStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockPlan {
  pub example: serde_json::Value,
  /// Response enum variant wrapping the example under status-code binding.
  pub variant: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
  Request(RequestPlan),
  Mock(MockPlan),
  Delegate { target: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodVisibility {
  #[default]
  Public,
  Private,
}

/// Signature, body and bookkeeping for one generated client method.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct FunctionDescriptor {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub operation_id: String,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub visibility: MethodVisibility,
  #[builder(default)]
  pub params: Vec<ParameterDeclaration>,
  pub returns: ReturnShape,
  pub body: FunctionBody,
  #[builder(default)]
  pub diagnostics: Diagnostics,
  #[builder(default)]
  pub has_default_status_code_binding: bool,
  #[builder(default)]
  pub non_default_status_codes: Vec<u16>,
  #[builder(default)]
  pub deprecated: bool,
}

impl FunctionDescriptor {
  pub fn is_mock(&self) -> bool {
    matches!(self.body, FunctionBody::Mock(_))
  }

  pub fn param(&self, location: ParameterLocation) -> impl Iterator<Item = &ParameterDeclaration> {
    self.params.iter().filter(move |p| p.location == location)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::ast::RustPrimitive;

  fn param(name: &str, required: bool) -> ParameterDeclaration {
    ParameterDeclaration::builder()
      .name(name)
      .wire_name(name)
      .location(ParameterLocation::Query)
      .type_expr(RustPrimitive::String.into())
      .required(required)
      .build()
  }

  #[test]
  fn test_content_type_classification() {
    let cases = [
      ("application/json", Some(BodyEncoding::Json)),
      ("application/problem+json", Some(BodyEncoding::Json)),
      ("application/json; charset=utf-8", Some(BodyEncoding::Json)),
      ("application/x-www-form-urlencoded", Some(BodyEncoding::FormUrlEncoded)),
      ("multipart/form-data", Some(BodyEncoding::Multipart)),
      ("text/plain", Some(BodyEncoding::Text)),
      ("application/octet-stream", Some(BodyEncoding::Binary)),
      ("application/xml", Some(BodyEncoding::Xml)),
      ("image/png", None),
      ("not a media type", None),
    ];
    for (content_type, expected) in cases {
      assert_eq!(BodyEncoding::from_content_type(content_type), expected, "{content_type}");
    }
  }

  #[test]
  fn test_sort_parameters_required_first() {
    let mut params = vec![
      param("zeta", false),
      param("beta", true),
      param("alpha", false),
      param("gamma", true),
    ];
    sort_parameters(&mut params);
    let names = params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["beta", "gamma", "alpha", "zeta"]);
  }

  #[test]
  fn test_signature_type_wraps_optional() {
    assert_eq!(param("limit", false).signature_type().to_rust_type(), "Option<String>");
    assert_eq!(param("limit", true).signature_type().to_rust_type(), "String");
  }
}
