use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// Doc comment lines attached to a generated item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
  lines: Vec<String>,
}

impl Documentation {
  #[must_use]
  pub fn from_raw(input: &str) -> Self {
    Self {
      lines: input.replace("\\n", "\n").lines().map(|line| line.trim_end().to_string()).collect(),
    }
  }

  #[must_use]
  pub fn from_optional(desc: Option<&String>) -> Self {
    desc.map_or_else(Self::default, |d| Self::from_raw(d))
  }

  /// Uses the first non-empty source.
  #[must_use]
  pub fn first_of<'a>(sources: impl IntoIterator<Item = Option<&'a String>>) -> Self {
    sources
      .into_iter()
      .flatten()
      .find(|text| !text.trim().is_empty())
      .map_or_else(Self::default, |text| Self::from_raw(text))
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  #[must_use]
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  pub fn push(&mut self, line: impl Into<String>) {
    self.lines.push(line.into());
  }

  /// Appends a paragraph, separated from existing text by a blank doc line.
  pub fn push_paragraph(&mut self, line: impl Into<String>) {
    if !self.lines.is_empty() {
      self.lines.push(String::new());
    }
    self.lines.push(line.into());
  }
}

impl ToTokens for Documentation {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    for line in &self.lines {
      let line = format!(" {line}");
      quote! { #[doc = #line] }.to_tokens(tokens);
    }
  }
}

impl From<&str> for Documentation {
  fn from(s: &str) -> Self {
    Self::from_raw(s)
  }
}

impl From<Option<&String>> for Documentation {
  fn from(s: Option<&String>) -> Self {
    Self::from_optional(s)
  }
}
