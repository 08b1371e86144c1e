use oas3::spec::Parameter;

use super::{ParameterGenerator, ParameterShape, declare, discard, is_untyped_array, resolve_parameter_type};
use crate::generator::{
  ast::{ParameterDeclaration, ParameterLocation},
  diagnostics::{DiagnosticKind, Diagnostics},
  resolver::{ReferenceError, SchemaResolver},
};

/// Header parameters accept the same shapes as query parameters.
pub(crate) struct HeaderParameterGenerator<'p> {
  param: &'p Parameter,
  hint_prefix: &'p str,
  diagnostics: Diagnostics,
}

impl<'p> HeaderParameterGenerator<'p> {
  pub(crate) fn new(param: &'p Parameter, hint_prefix: &'p str) -> Self {
    Self {
      param,
      hint_prefix,
      diagnostics: Diagnostics::new(),
    }
  }
}

impl ParameterGenerator for HeaderParameterGenerator<'_> {
  fn generate(&mut self, resolver: &mut SchemaResolver<'_>) -> Result<Option<ParameterDeclaration>, ReferenceError> {
    if self.param.name.trim().is_empty() {
      self.diagnostics.push(DiagnosticKind::EmptyHeaderName);
      return Ok(None);
    }

    let checkpoint = resolver.registry().checkpoint();
    let (type_expr, schema) = resolve_parameter_type(resolver, self.param, self.hint_prefix)?;

    if is_untyped_array(resolver, schema) {
      self.diagnostics.push(DiagnosticKind::MissingArrayItems {
        name: self.param.name.clone(),
      });
      discard(resolver, checkpoint);
      return Ok(None);
    }

    match ParameterShape::classify(resolver.registry(), &type_expr) {
      ParameterShape::Scalar | ParameterShape::ScalarArray => {
        let mut declaration = declare(resolver, self.param, ParameterLocation::Header, type_expr, schema);
        declaration.explode = self.param.explode.unwrap_or(false);
        Ok(Some(declaration))
      }
      ParameterShape::Other(_) => {
        self.diagnostics.push(DiagnosticKind::UnsupportedHeaderParameter {
          name: self.param.name.clone(),
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
