//! Function generators: one client method (or method pair) per operation.
//!
//! Two styles are supported, each with or without status-code binding:
//!
//! | Style    | Name                      | Unsupported path parameter |
//! |----------|---------------------------|----------------------------|
//! | resource | `get_pets_by_pet_id`      | operation skipped          |
//! | remote   | `operationId` snake cased | parameter dropped          |
//!
//! Under status-code binding the public method delegates to a private
//! `<name>_impl` that performs the request and dispatches on the status code.

mod binding;
mod mock;
mod style;


use itertools::Itertools;
use oas3::{
  Spec,
  spec::{ObjectOrReference, Parameter, ParameterIn},
};

pub(crate) use binding::impl_name;
pub(crate) use mock::MockBodyGenerator;
pub use style::FunctionStyle;

use super::{
  ast::{
    Documentation, FunctionBody, FunctionDescriptor, ParameterDeclaration, ParameterLocation, PathTemplate,
    RequestPlan, RustPrimitive, sort_parameters,
  },
  diagnostics::{DiagnosticKind, Diagnostics},
  naming::identifiers::{ensure_unique, to_rust_field_name, to_rust_type_name},
  operations::OperationEntry,
  parameters::{
    HeaderParameterGenerator, ParameterGenerator, PathParameterGenerator, QueryParameterGenerator,
    RequestBodyGenerator,
  },
  resolver::{ReferenceError, SchemaResolver},
  responses::ReturnTypeGenerator,
};

/// What happens to an operation whose only mappable response is `default`
/// under status-code binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum DefaultOnlyPolicy {
  /// Skip the operation with a warning.
  #[default]
  #[strum(to_string = "skip")]
  Skip,
  /// Generate it with a single `Default` variant.
  #[strum(to_string = "proceed")]
  Proceed,
}

/// Result of generating one operation. No functions means the operation was skipped.
#[derive(Debug, Default)]
pub(crate) struct FunctionOutcome {
  pub(crate) functions: Vec<FunctionDescriptor>,
  pub(crate) diagnostics: Diagnostics,
  pub(crate) uses_default_binding: bool,
}

impl FunctionOutcome {
  fn skipped(diagnostics: Diagnostics) -> Self {
    Self {
      diagnostics,
      ..Default::default()
    }
  }

  pub(crate) fn is_skipped(&self) -> bool {
    self.functions.is_empty()
  }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FunctionGenerator {
  style: FunctionStyle,
  binding: bool,
  mock: bool,
  default_only: DefaultOnlyPolicy,
}

impl FunctionGenerator {
  pub(crate) fn new(style: FunctionStyle, binding: bool, mock: bool, default_only: DefaultOnlyPolicy) -> Self {
    Self {
      style,
      binding,
      mock,
      default_only,
    }
  }

  /// Method name before it is made unique across the client.
  pub(crate) fn function_name(&self, entry: &OperationEntry) -> String {
    self.style.function_name(entry)
  }

  /// True when the operation yields a private `_impl` next to the public method.
  pub(crate) fn splits_impl(&self) -> bool {
    self.binding && !self.mock
  }

  /// Builds the methods for one operation under the unique name `name`.
  ///
  /// A reference error aborts the operation; the caller discards whatever it
  /// declared. Every other failure is reported as a diagnostic on a skipped
  /// outcome.
  pub(crate) fn generate(
    &self,
    resolver: &mut SchemaResolver<'_>,
    entry: &OperationEntry,
    name: &str,
  ) -> Result<FunctionOutcome, ReferenceError> {
    let label = entry.label();
    tracing::debug!(operation = %label, function = name, style = %self.style, "generating function");
    let mut diagnostics = Diagnostics::new();

    let path = match PathTemplate::parse(&entry.path) {
      Ok(path) => path,
      Err(err) => {
        diagnostics.push(DiagnosticKind::GenerationFailed {
          operation: label,
          reason: err.to_string(),
        });
        return Ok(FunctionOutcome::skipped(diagnostics));
      }
    };
    let type_base = to_rust_type_name(name);

    let Some(mut params) = self.bind_parameters(resolver, entry, &path, &type_base, &mut diagnostics)? else {
      return Ok(FunctionOutcome::skipped(diagnostics));
    };

    let taken = params.iter().map(|p| p.name.clone()).collect();
    let mut body_generator = RequestBodyGenerator::new(&entry.operation, &label, &type_base, taken);
    let body = body_generator.generate(resolver)?;
    diagnostics.extend(body_generator.take_diagnostics());
    if let Some(body) = body {
      params.push(body.payload);
      params.extend(body.headers);
    }
    sort_parameters(&mut params);

    let mut returns = ReturnTypeGenerator::new(&label, &type_base, self.binding);
    returns.populate(resolver, &entry.operation)?;
    if returns.is_empty() {
      diagnostics.extend(returns.take_diagnostics());
      diagnostics.push(DiagnosticKind::ImplFunctionFailed {
        function: impl_name(name),
      });
      return Ok(FunctionOutcome::skipped(diagnostics));
    }
    if returns.is_default_only() && self.default_only == DefaultOnlyPolicy::Skip {
      diagnostics.extend(returns.take_diagnostics());
      diagnostics.push(DiagnosticKind::DefaultOnlyResponse {
        operation: label.clone(),
      });
      return Ok(FunctionOutcome::skipped(diagnostics));
    }
    let (plan, return_diagnostics) = returns.finish(resolver);
    diagnostics.extend(return_diagnostics);

    let body = if self.mock {
      let mut mock = MockBodyGenerator::new(entry, &label);
      let generated = mock.generate(resolver, &plan.shape);
      diagnostics.extend(mock.take_diagnostics());
      match generated {
        Some(mock_plan) => FunctionBody::Mock(mock_plan),
        None => return Ok(FunctionOutcome::skipped(diagnostics)),
      }
    } else {
      FunctionBody::Request(RequestPlan {
        method: entry.method.clone(),
        path,
        route: self.style.route_style(),
      })
    };

    let uses_default_binding = plan.has_default_status_code_binding;
    let function = FunctionDescriptor::builder()
      .name(name)
      .operation_id(label)
      .docs(documentation(entry))
      .params(params)
      .returns(plan.shape)
      .body(body)
      .diagnostics(diagnostics.clone())
      .has_default_status_code_binding(plan.has_default_status_code_binding)
      .non_default_status_codes(plan.non_default_status_codes)
      .deprecated(entry.operation.deprecated.unwrap_or(false))
      .build();

    let functions = if self.splits_impl() {
      Vec::from(binding::split_impl(function))
    } else {
      vec![function]
    };

    Ok(FunctionOutcome {
      functions,
      diagnostics,
      uses_default_binding,
    })
  }

  /// Path, query and header parameters, or `None` when the operation must be skipped.
  fn bind_parameters(
    &self,
    resolver: &mut SchemaResolver<'_>,
    entry: &OperationEntry,
    path: &PathTemplate,
    type_base: &str,
    diagnostics: &mut Diagnostics,
  ) -> Result<Option<Vec<ParameterDeclaration>>, ReferenceError> {
    let mut bound = vec![];
    let mut rejected = vec![];

    for param in collect_parameters(resolver.spec(), entry)? {
      let declaration = match param.location {
        ParameterIn::Path => {
          let mut generator = PathParameterGenerator::new(&param, type_base);
          let declaration = generator.generate(resolver)?;
          if declaration.is_none() {
            if !self
              .style
              .reject_path_parameter(entry, generator.take_diagnostics(), diagnostics)
            {
              return Ok(None);
            }
            if path.params().any(|name| name == param.name) {
              diagnostics.push(DiagnosticKind::UnboundPathPlaceholder {
                path: entry.path.clone(),
                name: param.name.clone(),
              });
            }
            rejected.push(param.name.clone());
          }
          declaration
        }
        ParameterIn::Query => bind(QueryParameterGenerator::new(&param, type_base), resolver, diagnostics)?,
        ParameterIn::Header => bind(HeaderParameterGenerator::new(&param, type_base), resolver, diagnostics)?,
        ParameterIn::Cookie => {
          diagnostics.push(DiagnosticKind::UnsupportedCookieParameter {
            name: param.name.clone(),
          });
          None
        }
      };
      bound.extend(declaration);
    }

    let declared = bound
      .iter()
      .filter(|p| p.location == ParameterLocation::Path)
      .map(|p| p.wire_name.clone())
      .collect::<Vec<_>>();
    let undeclared = path
      .params()
      .unique()
      .filter(|name| !declared.iter().any(|d| d == name) && !rejected.iter().any(|r| r == name))
      .map(|name| {
        ParameterDeclaration::builder()
          .name(to_rust_field_name(name))
          .wire_name(name)
          .location(ParameterLocation::Path)
          .type_expr(RustPrimitive::String.into())
          .required(true)
          .build()
      })
      .collect::<Vec<_>>();
    bound.extend(undeclared);

    let mut taken: Vec<String> = vec![];
    for param in &mut bound {
      let unique = ensure_unique(&param.name, |candidate| taken.iter().any(|t| t == candidate));
      taken.push(unique.clone());
      param.name = unique;
    }

    Ok(Some(bound))
  }
}

fn bind(
  mut generator: impl ParameterGenerator,
  resolver: &mut SchemaResolver<'_>,
  diagnostics: &mut Diagnostics,
) -> Result<Option<ParameterDeclaration>, ReferenceError> {
  let declaration = generator.generate(resolver)?;
  diagnostics.extend(generator.take_diagnostics());
  Ok(declaration)
}

/// Path-item parameters overridden by operation parameters with the same name and location.
fn collect_parameters(spec: &Spec, entry: &OperationEntry) -> Result<Vec<Parameter>, ReferenceError> {
  let resolve = |param: &ObjectOrReference<Parameter>| {
    param
      .resolve(spec)
      .map_err(|err| ReferenceError::unresolvable(param, err))
  };

  let mut params = entry
    .path_parameters
    .iter()
    .map(resolve)
    .collect::<Result<Vec<_>, _>>()?;
  for param in &entry.operation.parameters {
    let param = resolve(param)?;
    params.retain(|p| p.location != param.location || p.name != param.name);
    params.push(param);
  }
  Ok(params)
}

fn documentation(entry: &OperationEntry) -> Documentation {
  let operation = &entry.operation;
  let mut docs = Documentation::first_of([operation.summary.as_ref(), operation.description.as_ref()]);
  if let (Some(summary), Some(description)) = (&operation.summary, &operation.description)
    && !summary.trim().is_empty()
    && description.trim() != summary.trim()
  {
    let description = Documentation::from_raw(description);
    let mut lines = description.lines().iter();
    if let Some(first) = lines.next() {
      docs.push_paragraph(first.clone());
      lines.for_each(|line| docs.push(line.clone()));
    }
  }
  docs.push_paragraph(format!("`{} {}`", entry.method, entry.path));
  docs
}
