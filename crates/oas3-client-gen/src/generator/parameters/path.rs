use oas3::spec::Parameter;

use super::{ParameterGenerator, ParameterShape, declare, discard, resolve_parameter_type};
use crate::generator::{
  ast::{ParameterDeclaration, ParameterLocation},
  diagnostics::{DiagnosticKind, Diagnostics},
  resolver::{ReferenceError, SchemaResolver},
};

/// Path parameters bind scalars and scalar enums only.
pub(crate) struct PathParameterGenerator<'p> {
  param: &'p Parameter,
  hint_prefix: &'p str,
  diagnostics: Diagnostics,
}

impl<'p> PathParameterGenerator<'p> {
  pub(crate) fn new(param: &'p Parameter, hint_prefix: &'p str) -> Self {
    Self {
      param,
      hint_prefix,
      diagnostics: Diagnostics::new(),
    }
  }
}

impl ParameterGenerator for PathParameterGenerator<'_> {
  fn generate(&mut self, resolver: &mut SchemaResolver<'_>) -> Result<Option<ParameterDeclaration>, ReferenceError> {
    let checkpoint = resolver.registry().checkpoint();
    let (type_expr, schema) = resolve_parameter_type(resolver, self.param, self.hint_prefix)?;

    match ParameterShape::classify(resolver.registry(), &type_expr) {
      ParameterShape::Scalar => Ok(Some(declare(
        resolver,
        self.param,
        ParameterLocation::Path,
        type_expr,
        schema,
      ))),
      shape => {
        self.diagnostics.push(DiagnosticKind::UnsupportedPathParameter {
          name: self.param.name.clone(),
          type_name: shape.label().to_string(),
        });
        discard(resolver, checkpoint);
        Ok(None)
      }
    }
  }

  fn diagnostics(&self) -> &Diagnostics {
    &self.diagnostics
  }

  fn take_diagnostics(&mut self) -> Diagnostics {
    self.diagnostics.take()
  }
}
