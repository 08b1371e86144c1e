use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::Visibility;
use crate::generator::{
  ast::{
    DeclarationKind, Documentation, EnumDef, FieldDef, NewtypeDef, RecordDef, ResponseEnumDef, ResponseStatus,
    RustPrimitive, TypeDeclaration, TypeExpr, UnionDef,
  },
  registry::TypeRegistry,
};

#[derive(Clone, Debug)]
pub(crate) struct FieldFragment<'a> {
  field: &'a FieldDef,
  visibility: Visibility,
}

impl ToTokens for FieldFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let field = self.field;
    let name = format_ident!("{}", field.name);
    let vis = self.visibility.item_tokens();
    let ty = &field.type_expr;
    let constraints = &field.constraints;

    let mut docs = field.docs.clone();
    for line in field.constraints.docs().lines() {
      docs.push(line.clone());
    }
    if field.deprecated {
      docs.push("Deprecated.");
    }

    let wire_name = field.wire_name.as_str();
    let rename = (field.name.trim_start_matches("r#") != wire_name).then(|| quote! { #[serde(rename = #wire_name)] });
    let optional = ty
      .is_optional()
      .then(|| quote! { #[serde(default, skip_serializing_if = "Option::is_none")] });

    tokens.extend(quote! {
      #docs
      #rename
      #optional
      #constraints
      #vis #name: #ty
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct RecordFragment<'a> {
  name: &'a str,
  docs: &'a Documentation,
  def: &'a RecordDef,
  visibility: Visibility,
}

impl ToTokens for RecordFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.name);
    let docs = self.docs;
    let vis = self.visibility.item_tokens();
    let validate = self.def.has_validations().then(|| quote! { , validator::Validate });

    let fields = self.def.fields.iter().map(|field| FieldFragment {
      field,
      visibility: self.visibility,
    });
    let rest = self.def.rest.as_ref().map(|rest| {
      let rest_name = format_ident!("{}", rest.name);
      let value = &rest.value_type;
      quote! {
        #[serde(flatten)]
        #vis #rest_name: std::collections::HashMap<String, #value>,
      }
    });

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone, PartialEq, Serialize, Deserialize #validate)]
      #vis struct #name {
        #(#fields,)*
        #rest
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct EnumFragment<'a> {
  name: &'a str,
  docs: &'a Documentation,
  def: &'a EnumDef,
  visibility: Visibility,
}

impl ToTokens for EnumFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.name);
    let docs = self.docs;
    let vis = self.visibility.item_tokens();

    let variants = self.def.variants.iter().enumerate().map(|(idx, variant)| {
      let ident = format_ident!("{}", variant.name);
      let value = variant.value.as_str();
      let default = (idx == 0).then(|| quote! { #[default] });
      quote! {
        #default
        #[serde(rename = #value)]
        #ident
      }
    });
    let display_arms = self.def.variants.iter().map(|variant| {
      let ident = format_ident!("{}", variant.name);
      let value = variant.value.as_str();
      quote! { Self::#ident => #value }
    });
    let default_derive = (!self.def.variants.is_empty()).then(|| quote! { Default, });

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, #default_derive Serialize, Deserialize)]
      #vis enum #name {
        #(#variants),*
      }

      impl std::fmt::Display for #name {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
          let value = match self {
            #(#display_arms,)*
          };
          f.write_str(value)
        }
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct UnionFragment<'a> {
  name: &'a str,
  docs: &'a Documentation,
  def: &'a UnionDef,
  visibility: Visibility,
}

impl ToTokens for UnionFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.name);
    let docs = self.docs;
    let vis = self.visibility.item_tokens();
    let variants = self.def.variants.iter().map(|variant| {
      let ident = format_ident!("{}", variant.name);
      let ty = &variant.type_expr;
      quote! { #ident(#ty) }
    });

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
      #[serde(untagged)]
      #vis enum #name {
        #(#variants),*
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct NewtypeFragment<'a> {
  declaration: &'a TypeDeclaration,
  def: &'a NewtypeDef,
  visibility: Visibility,
}

impl ToTokens for NewtypeFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.declaration.name);
    let vis = self.visibility.item_tokens();
    let inner = &self.def.inner;
    let constraints = &self.def.constraints;
    let validate = self.def.constraints.has_validations().then(|| quote! { , validator::Validate });

    let mut docs = self.declaration.docs.clone();
    for line in self.def.constraints.docs().lines() {
      docs.push(line.clone());
    }

    let display = self.declaration.is_scalar().then(|| {
      quote! {
        impl std::fmt::Display for #name {
          fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            std::fmt::Display::fmt(&self.value, f)
          }
        }
      }
    });

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone, PartialEq, Serialize, Deserialize #validate)]
      #[serde(transparent)]
      #vis struct #name {
        #constraints
        #vis value: #inner,
      }

      impl From<#inner> for #name {
        fn from(value: #inner) -> Self {
          Self { value }
        }
      }

      #display
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ResponseEnumFragment<'a> {
  name: &'a str,
  docs: &'a Documentation,
  def: &'a ResponseEnumDef,
  visibility: Visibility,
}

impl ToTokens for ResponseEnumFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.name);
    let docs = self.docs;
    let vis = self.visibility.item_tokens();

    let variants = self.def.variants.iter().map(|variant| {
      let ident = format_ident!("{}", variant.name);
      let docs = &variant.docs;
      let payload = match (variant.status, &variant.payload) {
        (ResponseStatus::Default, payload) => {
          let body = payload.clone().unwrap_or(TypeExpr::Primitive(RustPrimitive::Unit));
          quote! { (DefaultStatusResponse<#body>) }
        }
        (_, Some(payload)) => quote! { (#payload) },
        (_, None) => quote! {},
      };
      quote! {
        #docs
        #ident #payload
      }
    });

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone, PartialEq)]
      #vis enum #name {
        #(#variants),*
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct TypeFragment<'a> {
  declaration: &'a TypeDeclaration,
  visibility: Visibility,
}

impl ToTokens for TypeFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let declaration = self.declaration;
    let name = declaration.name.as_str();
    let docs = &declaration.docs;
    let visibility = self.visibility;

    let ts = match &declaration.kind {
      DeclarationKind::Record(def) => RecordFragment {
        name,
        docs,
        def,
        visibility,
      }
      .into_token_stream(),
      DeclarationKind::Enum(def) => EnumFragment {
        name,
        docs,
        def,
        visibility,
      }
      .into_token_stream(),
      DeclarationKind::Union(def) => UnionFragment {
        name,
        docs,
        def,
        visibility,
      }
      .into_token_stream(),
      DeclarationKind::Newtype(def) => NewtypeFragment {
        declaration,
        def,
        visibility,
      }
      .into_token_stream(),
      DeclarationKind::Response(def) => ResponseEnumFragment {
        name,
        docs,
        def,
        visibility,
      }
      .into_token_stream(),
      DeclarationKind::Alias(target) => {
        let ident = format_ident!("{}", name);
        let vis = visibility.item_tokens();
        quote! {
          #docs
          #vis type #ident = #target;
        }
      }
    };
    tokens.extend(ts);
  }
}

/// Contents of the generated `types.rs`: every declaration, ordered by name.
#[derive(Clone, Debug)]
pub(crate) struct TypesFragment<'a> {
  registry: &'a TypeRegistry,
  visibility: Visibility,
  uses_default_binding: bool,
}

impl<'a> TypesFragment<'a> {
  pub(crate) fn new(registry: &'a TypeRegistry, visibility: Visibility, uses_default_binding: bool) -> Self {
    Self {
      registry,
      visibility,
      uses_default_binding,
    }
  }
}

impl ToTokens for TypesFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let default_import = self
      .uses_default_binding
      .then(|| quote! { use super::utils::DefaultStatusResponse; });
    let declarations = self.registry.sorted().into_iter().map(|declaration| TypeFragment {
      declaration,
      visibility: self.visibility,
    });

    tokens.extend(quote! {
      #![allow(clippy::large_enum_variant, dead_code)]

      #[allow(unused_imports)]
      use serde::{Deserialize, Serialize};
      #default_import

      #(#declarations)*
    });
  }
}
