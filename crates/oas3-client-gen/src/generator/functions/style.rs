use strum::Display;

use crate::generator::{
  ast::RouteStyle,
  diagnostics::{DiagnosticKind, Diagnostics},
  naming::identifiers::{synthesize_operation_name, to_rust_field_name},
  operations::OperationEntry,
};

/// Shape of the generated client methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum FunctionStyle {
  /// Method named after the HTTP method and path, URL pushed segment by segment.
  #[default]
  #[strum(to_string = "resource")]
  Resource,
  /// Method named after the `operationId`, URL formatted from the path template.
  #[strum(to_string = "remote")]
  Remote,
}

impl FunctionStyle {
  pub(crate) fn function_name(self, entry: &OperationEntry) -> String {
    match (self, entry.operation.operation_id.as_deref()) {
      (Self::Remote, Some(operation_id)) if !operation_id.trim().is_empty() => to_rust_field_name(operation_id),
      _ => synthesize_operation_name(entry.method.as_str(), &entry.path),
    }
  }

  pub(crate) const fn route_style(self) -> RouteStyle {
    match self {
      Self::Resource => RouteStyle::Segments,
      Self::Remote => RouteStyle::Template,
    }
  }

  /// Applies the policy for a path parameter the path generator rejected.
  ///
  /// Returns `false` when the whole operation must be skipped.
  pub(crate) fn reject_path_parameter(
    self,
    entry: &OperationEntry,
    rejection: Diagnostics,
    diagnostics: &mut Diagnostics,
  ) -> bool {
    match self {
      Self::Resource => {
        diagnostics.push(DiagnosticKind::ResourceFunctionSkipped {
          path: entry.path.clone(),
          method: entry.method.as_str().to_lowercase(),
        });
        false
      }
      Self::Remote => {
        diagnostics.extend(rejection);
        true
      }
    }
  }
}
