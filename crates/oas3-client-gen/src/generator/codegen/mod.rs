//! Rendering of a [`GenerationOutput`](super::client::GenerationOutput) into Rust source files.
//!
//! Every file is assembled as a token stream from small `ToTokens` fragments,
//! validated by `syn` and printed with `prettyplease`.

mod client;
mod json;
mod mod_file;
mod support;
mod types;


use anyhow::Context;
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) use client::ClientFragment;
pub(crate) use mod_file::ModFileFragment;
pub(crate) use support::SupportFragment;
pub(crate) use types::TypesFragment;

/// Visibility of the generated items re-exported from the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum Visibility {
  #[default]
  #[strum(to_string = "public")]
  Public,
  #[strum(to_string = "crate")]
  Crate,
  #[strum(to_string = "file")]
  File,
}

impl Visibility {
  pub(crate) fn to_tokens(self) -> TokenStream {
    match self {
      Visibility::Public => quote! { pub },
      Visibility::Crate => quote! { pub(crate) },
      Visibility::File => quote! {},
    }
  }

  /// Visibility of items inside the generated submodules, which must stay
  /// reachable from their sibling modules.
  pub(crate) fn item_tokens(self) -> TokenStream {
    match self {
      Visibility::Public => quote! { pub },
      Visibility::Crate => quote! { pub(crate) },
      Visibility::File => quote! { pub(super) },
    }
  }
}

/// Text placed above every generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FileHeader {
  License(String),
  Banner {
    title: String,
    version: String,
    source: String,
    description: Option<String>,
  },
}

impl FileHeader {
  pub(crate) fn render(&self) -> String {
    match self {
      Self::License(text) => {
        let mut header = text
          .lines()
          .map(|line| if line.is_empty() { "//".to_string() } else { format!("// {line}") })
          .collect::<Vec<_>>()
          .join("\n");
        header.push_str("\n\n");
        header
      }
      Self::Banner {
        title,
        version,
        source,
        description,
      } => {
        let description = description
          .as_deref()
          .map(str::trim)
          .filter(|d| !d.is_empty())
          .map_or_else(|| "No description provided".to_string(), |d| d.replace('\n', "\n//! "));
        format!(
          "//! AUTO-GENERATED CODE - DO NOT EDIT!\n//!\n//! {title}\n//! Source: {source}\n//! Version: {version}\n//! Generated by `oas3-client-gen`\n//!\n//! {description}\n\n"
        )
      }
    }
  }
}

/// Parses and pretty prints `tokens`, prefixed with `header`.
pub(crate) fn format_source(tokens: TokenStream, header: &FileHeader, file: &str) -> anyhow::Result<String> {
  let syntax_tree = syn::parse2::<syn::File>(tokens).with_context(|| format!("generated {file} is not valid Rust"))?;
  let formatted = prettyplease::unparse(&syntax_tree);
  Ok(format!("{}{formatted}", header.render()))
}
