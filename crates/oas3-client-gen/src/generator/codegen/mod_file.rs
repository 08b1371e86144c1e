use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::Visibility;

/// Contents of the generated `mod.rs` wiring the three files together.
#[derive(Clone, Debug)]
pub(crate) struct ModFileFragment<'a> {
  client_name: &'a str,
  visibility: Visibility,
  default_binding: bool,
}

impl<'a> ModFileFragment<'a> {
  pub(crate) fn new(client_name: &'a str, visibility: Visibility, default_binding: bool) -> Self {
    Self {
      client_name,
      visibility,
      default_binding,
    }
  }
}

impl ToTokens for ModFileFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let vis = self.visibility.to_tokens();
    let client = format_ident!("{}", self.client_name);
    let default_export = self
      .default_binding
      .then(|| quote! { #vis use utils::DefaultStatusResponse; });

    tokens.extend(quote! {
      mod client;
      mod types;
      mod utils;

      #vis use client::{BASE_URL, #client};
      #vis use types::*;
      #vis use utils::ClientError;
      #default_export
    });
  }
}
