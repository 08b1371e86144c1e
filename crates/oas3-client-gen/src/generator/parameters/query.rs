use oas3::spec::Parameter;

use super::{ParameterGenerator, ParameterShape, declare, discard, is_untyped_array, resolve_parameter_type};
use crate::generator::{
  ast::{ParameterDeclaration, ParameterLocation},
  diagnostics::{DiagnosticKind, Diagnostics},
  resolver::{ReferenceError, SchemaResolver},
};

/// Query parameters bind scalars, scalar enums and arrays of either.
pub(crate) struct QueryParameterGenerator<'p> {
  param: &'p Parameter,
  hint_prefix: &'p str,
  diagnostics: Diagnostics,
}

impl<'p> QueryParameterGenerator<'p> {
  pub(crate) fn new(param: &'p Parameter, hint_prefix: &'p str) -> Self {
    Self {
      param,
      hint_prefix,
      diagnostics: Diagnostics::new(),
    }
  }
}

impl ParameterGenerator for QueryParameterGenerator<'_> {
  fn generate(&mut self, resolver: &mut SchemaResolver<'_>) -> Result<Option<ParameterDeclaration>, ReferenceError> {
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
      ParameterShape::Scalar | ParameterShape::ScalarArray => Ok(Some(declare(
        resolver,
        self.param,
        ParameterLocation::Query,
        type_expr,
        schema,
      ))),
      ParameterShape::Other(_) => {
        self.diagnostics.push(DiagnosticKind::UnsupportedQueryParameter {
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
