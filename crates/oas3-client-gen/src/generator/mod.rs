pub(crate) mod ast;
pub mod client;
pub(crate) mod codegen;
pub mod config_entry;
pub mod diagnostics;
pub(crate) mod functions;
pub mod metrics;
pub(crate) mod naming;
pub mod operations;
pub mod orchestrator;
pub(crate) mod parameters;
pub mod registry;
pub(crate) mod resolver;
pub(crate) mod responses;
pub(crate) mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use codegen::Visibility;
pub use functions::{DefaultOnlyPolicy, FunctionStyle};

/// Options of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GeneratorOptions {
  #[builder(default)]
  pub style: FunctionStyle,
  #[builder(default)]
  pub status_code_binding: bool,
  /// Wrap schemas that allow `null` in `Option`.
  #[builder(default)]
  pub nullable: bool,
  /// Return response examples instead of calling the server.
  #[builder(default)]
  pub mock: bool,
  #[builder(default)]
  pub tags: Vec<String>,
  #[builder(default)]
  pub operations: Vec<String>,
  #[builder(default)]
  pub default_only: DefaultOnlyPolicy,
  #[builder(default)]
  pub visibility: Visibility,
  /// Placed above every generated file instead of the generated banner.
  pub license: Option<String>,
}

impl Default for GeneratorOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}
