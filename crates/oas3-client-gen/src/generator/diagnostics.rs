use std::fmt;

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Severity {
  #[strum(to_string = "error")]
  Error,
  #[strum(to_string = "warning")]
  Warning,
}

/// Every condition the generator reports instead of failing.
///
/// The variant carries the message arguments; `Display` renders the message
/// template and [`DiagnosticKind::code`] gives the stable code reported to users.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DiagnosticKind {
  #[strum(to_string = "invalid reference '{reference}': {reason}")]
  InvalidReference { reference: String, reason: String },
  #[strum(to_string = "path parameter '{name}' has unsupported type '{type_name}'")]
  UnsupportedPathParameter { name: String, type_name: String },
  #[strum(to_string = "query parameter '{name}' has an unsupported type")]
  UnsupportedQueryParameter { name: String },
  #[strum(to_string = "array parameter '{name}' must define its item type")]
  MissingArrayItems { name: String },
  #[strum(to_string = "server variable '{variable}' has an empty default value")]
  EmptyServerVariable { variable: String },
  #[strum(to_string = "no server URL declared, using '{fallback}'")]
  MissingServerUrl { fallback: String },
  #[strum(to_string = "failed to generate operation '{operation}': {reason}")]
  GenerationFailed { operation: String, reason: String },
  #[strum(to_string = "header parameter '{name}' has an unsupported type")]
  UnsupportedHeaderParameter { name: String },
  #[strum(to_string = "header name can not be empty")]
  EmptyHeaderName,
  #[strum(to_string = "cookie parameter '{name}' is not supported")]
  UnsupportedCookieParameter { name: String },
  #[strum(to_string = "unsupported path parameter, resource function skipped for path `{path}` method `{method}`")]
  ResourceFunctionSkipped { path: String, method: String },
  #[strum(to_string = "failed to generate impl function for '{function}'")]
  ImplFunctionFailed { function: String },
  #[strum(to_string = "HTTP status code '{code}' is not supported")]
  UnsupportedStatusCode { code: String },
  #[strum(to_string = "operation '{operation}' skipped, only a default response is declared")]
  DefaultOnlyResponse { operation: String },
  #[strum(to_string = "response '{code}' of operation '{operation}' skipped: {reason}")]
  UnsupportedResponse {
    operation: String,
    code: String,
    reason: String,
  },
  #[strum(to_string = "media type '{media_type}' of operation '{operation}' is not supported, sending raw bytes")]
  UnsupportedMediaType { operation: String, media_type: String },
  #[strum(to_string = "mock for '{operation}' skipped: no success response with content")]
  MockNoSuccessResponse { operation: String },
  #[strum(to_string = "mock for '{operation}' skipped: no examples found")]
  MockNoExamples { operation: String },
  #[strum(to_string = "mock for '{operation}' skipped: invalid example reference '{reference}'")]
  MockInvalidExampleReference { operation: String, reference: String },
  #[strum(to_string = "maxItems of '{name}' is {max_items}, clamped to {ceiling}")]
  ArrayMaxItemsClamped { name: String, max_items: String, ceiling: String },
  #[strum(to_string = "format '{format}' is not supported for type '{type_name}', using '{fallback}'")]
  UnsupportedFormat {
    type_name: String,
    format: String,
    fallback: String,
  },
  #[strum(to_string = "enum '{name}' has non-string values, using '{fallback}'")]
  UnsupportedEnumValues { name: String, fallback: String },
  #[strum(to_string = "schema '{name}' skipped: {reason}")]
  UnsupportedSchema { name: String, reason: String },
  #[strum(to_string = "placeholder '{{{name}}}' of '{path}' has no bound parameter and is sent as written")]
  UnboundPathPlaceholder { path: String, name: String },
}

impl DiagnosticKind {
  pub const fn code(&self) -> &'static str {
    match self {
      Self::InvalidReference { .. } => "C100",
      Self::UnsupportedPathParameter { .. } => "C101",
      Self::UnsupportedQueryParameter { .. } => "C102",
      Self::MissingArrayItems { .. } => "C103",
      Self::UnsupportedCookieParameter { .. } => "C104",
      Self::EmptyServerVariable { .. } => "C105",
      Self::MissingServerUrl { .. } => "C106",
      Self::GenerationFailed { .. } => "C107",
      Self::UnsupportedHeaderParameter { .. } => "C108",
      Self::UnsupportedMediaType { .. } => "C109",
      Self::ResourceFunctionSkipped { .. } => "C110",
      Self::EmptyHeaderName => "C111",
      Self::ImplFunctionFailed { .. } => "C112",
      Self::UnsupportedStatusCode { .. } => "C113",
      Self::DefaultOnlyResponse { .. } => "C114",
      Self::MockNoSuccessResponse { .. } => "C115",
      Self::MockNoExamples { .. } => "C116",
      Self::MockInvalidExampleReference { .. } => "C117",
      Self::UnsupportedResponse { .. } => "C118",
      Self::UnboundPathPlaceholder { .. } => "C119",
      Self::ArrayMaxItemsClamped { .. } => "T101",
      Self::UnsupportedFormat { .. } => "T102",
      Self::UnsupportedEnumValues { .. } => "T103",
      Self::UnsupportedSchema { .. } => "T104",
    }
  }

  pub const fn severity(&self) -> Severity {
    match self {
      Self::InvalidReference { .. } | Self::MissingArrayItems { .. } | Self::ImplFunctionFailed { .. } => {
        Severity::Error
      }
      _ => Severity::Warning,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  kind: DiagnosticKind,
}

impl Diagnostic {
  pub const fn new(kind: DiagnosticKind) -> Self {
    Self { kind }
  }

  pub const fn kind(&self) -> &DiagnosticKind {
    &self.kind
  }

  pub const fn code(&self) -> &'static str {
    self.kind.code()
  }

  pub const fn severity(&self) -> Severity {
    self.kind.severity()
  }

  pub fn message(&self) -> String {
    self.kind.to_string()
  }

  pub const fn is_error(&self) -> bool {
    matches!(self.severity(), Severity::Error)
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {}: {}", self.code(), self.severity(), self.kind)
  }
}

impl From<DiagnosticKind> for Diagnostic {
  fn from(kind: DiagnosticKind) -> Self {
    Self::new(kind)
  }
}

/// Append-only diagnostic collection owned by one generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
  entries: Vec<Diagnostic>,
}

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, kind: DiagnosticKind) {
    let diagnostic = Diagnostic::new(kind);
    match diagnostic.severity() {
      Severity::Error => tracing::warn!(code = diagnostic.code(), "{}", diagnostic.kind),
      Severity::Warning => tracing::debug!(code = diagnostic.code(), "{}", diagnostic.kind),
    }
    self.entries.push(diagnostic);
  }

  pub fn extend(&mut self, other: Diagnostics) {
    self.entries.extend(other.entries);
  }

  /// Moves the collected entries out, leaving this collection empty.
  pub fn take(&mut self) -> Diagnostics {
    std::mem::take(self)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn has_errors(&self) -> bool {
    self.entries.iter().any(Diagnostic::is_error)
  }

  pub fn count(&self, severity: Severity) -> usize {
    self.entries.iter().filter(|d| d.severity() == severity).count()
  }
}

impl<'a> IntoIterator for &'a Diagnostics {
  type Item = &'a Diagnostic;
  type IntoIter = std::slice::Iter<'a, Diagnostic>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}

impl IntoIterator for Diagnostics {
  type Item = Diagnostic;
  type IntoIter = std::vec::IntoIter<Diagnostic>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

impl FromIterator<DiagnosticKind> for Diagnostics {
  fn from_iter<I: IntoIterator<Item = DiagnosticKind>>(iter: I) -> Self {
    let mut diagnostics = Self::new();
    for kind in iter {
      diagnostics.push(kind);
    }
    diagnostics
  }
}
