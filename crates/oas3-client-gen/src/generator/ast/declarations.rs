use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, quote};
use serde_json::Number;

use super::{Documentation, TypeExpr};
use crate::generator::diagnostics::Diagnostics;

/// A named type produced once per distinct schema identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
  pub name: String,
  pub docs: Documentation,
  pub kind: DeclarationKind,
  pub diagnostics: Diagnostics,
}

impl TypeDeclaration {
  pub fn new(name: impl Into<String>, docs: Documentation, kind: DeclarationKind) -> Self {
    Self {
      name: name.into(),
      docs,
      kind,
      diagnostics: Diagnostics::new(),
    }
  }

  #[must_use]
  pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
    self.diagnostics = diagnostics;
    self
  }

  /// True when values of this type render to a single token via `Display`.
  pub fn is_scalar(&self) -> bool {
    match &self.kind {
      DeclarationKind::Enum(_) => true,
      DeclarationKind::Newtype(def) => def.inner.primitive().is_some_and(|p| p.is_scalar()),
      DeclarationKind::Alias(TypeExpr::Primitive(primitive)) => primitive.is_scalar(),
      _ => false,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
  Record(RecordDef),
  Alias(TypeExpr),
  Enum(EnumDef),
  Union(UnionDef),
  Newtype(NewtypeDef),
  Response(ResponseEnumDef),
}

impl DeclarationKind {
  pub const fn label(&self) -> &'static str {
    match self {
      Self::Record(_) => "record",
      Self::Alias(_) => "alias",
      Self::Enum(_) => "enum",
      Self::Union(_) => "union",
      Self::Newtype(_) => "newtype",
      Self::Response(_) => "response",
    }
  }
}

#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct FieldDef {
  pub name: String,
  pub wire_name: String,
  #[builder(default)]
  pub docs: Documentation,
  pub type_expr: TypeExpr,
  #[builder(default)]
  pub required: bool,
  #[builder(default)]
  pub constraints: Constraints,
  #[builder(default)]
  pub deprecated: bool,
}

/// Flattened map collecting properties a record does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestField {
  pub name: String,
  pub value_type: TypeExpr,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDef {
  pub fields: Vec<FieldDef>,
  /// Present when `additionalProperties` is a schema.
  pub rest: Option<RestField>,
}

impl RecordDef {
  pub fn has_validations(&self) -> bool {
    self.fields.iter().any(|field| field.constraints.has_validations())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
  pub name: String,
  pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDef {
  pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionVariant {
  pub name: String,
  pub type_expr: TypeExpr,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnionDef {
  pub variants: Vec<UnionVariant>,
}

/// A constrained scalar lifted into its own name so the constraint travels with it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtypeDef {
  pub inner: TypeExpr,
  pub constraints: Constraints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
  Code(u16),
  Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseVariant {
  pub name: String,
  pub status: ResponseStatus,
  pub payload: Option<TypeExpr>,
  pub docs: Documentation,
}

/// Per-status-code return type of one operation under status-code binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEnumDef {
  pub variants: Vec<ResponseVariant>,
}

impl ResponseEnumDef {
  pub fn has_default(&self) -> bool {
    self.variants.iter().any(|v| v.status == ResponseStatus::Default)
  }
}

/// Validation constraints copied from a schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
  pub min_length: Option<u64>,
  pub max_length: Option<u64>,
  pub min_items: Option<u64>,
  pub max_items: Option<u64>,
  pub minimum: Option<Number>,
  pub maximum: Option<Number>,
  pub pattern: Option<String>,
}

impl Constraints {
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  /// Constraints that map onto `validator` attributes; `pattern` only documents.
  pub fn has_validations(&self) -> bool {
    self.min_length.is_some()
      || self.max_length.is_some()
      || self.min_items.is_some()
      || self.max_items.is_some()
      || self.minimum.is_some()
      || self.maximum.is_some()
  }

  pub fn docs(&self) -> Documentation {
    let mut docs = Documentation::default();
    if let Some(pattern) = &self.pattern {
      docs.push(format!("Pattern: `{pattern}`"));
    }
    docs
  }
}

fn number_literal(value: &Number) -> Literal {
  if let Some(int) = value.as_i64() {
    Literal::i64_unsuffixed(int)
  } else if let Some(uint) = value.as_u64() {
    Literal::u64_unsuffixed(uint)
  } else {
    Literal::f64_unsuffixed(value.as_f64().unwrap_or_default())
  }
}

fn length_rule(min: Option<u64>, max: Option<u64>) -> Option<TokenStream> {
  let min = min.map(|m| {
    let lit = Literal::u64_unsuffixed(m);
    quote! { min = #lit }
  });
  let max = max.map(|m| {
    let lit = Literal::u64_unsuffixed(m);
    quote! { max = #lit }
  });
  match (min, max) {
    (Some(min), Some(max)) => Some(quote! { length(#min, #max) }),
    (Some(min), None) => Some(quote! { length(#min) }),
    (None, Some(max)) => Some(quote! { length(#max) }),
    (None, None) => None,
  }
}

impl ToTokens for Constraints {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let mut rules = Vec::new();
    rules.extend(length_rule(self.min_length, self.max_length));
    rules.extend(length_rule(self.min_items, self.max_items));

    let mut range = Vec::new();
    if let Some(min) = &self.minimum {
      let lit = number_literal(min);
      range.push(quote! { min = #lit });
    }
    if let Some(max) = &self.maximum {
      let lit = number_literal(max);
      range.push(quote! { max = #lit });
    }
    if !range.is_empty() {
      rules.push(quote! { range(#(#range),*) });
    }

    if !rules.is_empty() {
      tokens.extend(quote! { #[validate(#(#rules),*)] });
    }
  }
}
