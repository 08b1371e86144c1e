use std::collections::BTreeSet;

use oas3::Spec;
use serde_json::Value;

use super::{
  GeneratorOptions,
  ast::FunctionDescriptor,
  diagnostics::{DiagnosticKind, Diagnostics},
  functions::{FunctionGenerator, impl_name},
  metrics::GenerationStats,
  naming::identifiers::{ensure_unique, to_rust_type_name},
  operations::{OperationFilter, OperationRegistry},
  registry::TypeRegistry,
  resolver::SchemaResolver,
};

pub(crate) const FALLBACK_BASE_URL: &str = "http://localhost:8080";
const FALLBACK_CLIENT_NAME: &str = "ApiClient";
/// Associated items of the client struct that operation methods must not shadow.
const RESERVED_METHODS: &[&str] = &["new", "with_client", "base_url", "client"];

/// Everything one run produces before rendering.
#[derive(Debug)]
pub struct GenerationOutput {
  pub registry: TypeRegistry,
  pub functions: Vec<FunctionDescriptor>,
  pub client_name: String,
  pub base_url: String,
  pub diagnostics: Diagnostics,
  /// At least one method dispatches on the status code.
  pub uses_status_binding: bool,
  /// At least one response enum has a `Default` variant.
  pub uses_default_binding: bool,
  pub stats: GenerationStats,
}

/// Drives a full run: component types, then one function set per selected operation.
pub struct ClientGenerator<'a> {
  spec: &'a Spec,
  options: &'a GeneratorOptions,
}

impl<'a> ClientGenerator<'a> {
  pub fn new(spec: &'a Spec, options: &'a GeneratorOptions) -> Self {
    Self { spec, options }
  }

  pub fn generate(&self) -> GenerationOutput {
    let spec = self.spec;
    let options = self.options;
    let mut diagnostics = Diagnostics::new();
    let mut stats = GenerationStats::default();

    let base_url = server_url(spec, &mut diagnostics);
    let client_name = client_name(&spec.info.title);

    let mut registry = TypeRegistry::new(spec);
    let mut resolver = SchemaResolver::new(spec, &mut registry, options.nullable);
    declare_components(&mut resolver, &mut diagnostics);

    let generator = FunctionGenerator::new(
      options.style,
      options.status_code_binding,
      options.mock,
      options.default_only,
    );
    let filter = OperationFilter::new(&options.tags, &options.operations);
    let operations = OperationRegistry::with_filter(spec, &filter);
    tracing::info!(
      operations = operations.len(),
      style = %options.style,
      status_code_binding = options.status_code_binding,
      mock = options.mock,
      "generating client methods"
    );

    let mut taken = RESERVED_METHODS.iter().map(ToString::to_string).collect::<BTreeSet<_>>();
    let mut functions = vec![];
    let mut uses_default_binding = false;

    for entry in operations.operations() {
      let label = entry.label();
      let base = generator.function_name(entry);
      let splits = generator.splits_impl();
      let name = ensure_unique(&base, |candidate| {
        taken.contains(candidate) || (splits && taken.contains(&impl_name(candidate)))
      });

      let checkpoint = resolver.registry().checkpoint();
      match generator.generate(&mut resolver, entry, &name) {
        Ok(outcome) if !outcome.is_skipped() => {
          tracing::debug!(operation = %label, function = %name, "generated function");
          for function in &outcome.functions {
            taken.insert(function.name.clone());
          }
          stats.record_operation(&outcome.functions);
          uses_default_binding |= outcome.uses_default_binding;
          diagnostics.extend(outcome.diagnostics);
          functions.extend(outcome.functions);
        }
        Ok(outcome) => {
          tracing::debug!(operation = %label, "operation skipped");
          resolver.registry_mut().rollback(checkpoint);
          stats.record_operation(&[]);
          diagnostics.extend(outcome.diagnostics);
        }
        Err(err) => {
          tracing::debug!(operation = %label, error = %err, "operation omitted");
          resolver.registry_mut().rollback(checkpoint);
          stats.record_operation(&[]);
          diagnostics.push(err.to_diagnostic(&label));
        }
      }
      diagnostics.extend(resolver.take_diagnostics());
    }

    diagnostics.extend(registry.diagnostics());
    stats.record_registry(&registry);
    stats.record_diagnostics(&diagnostics);

    let uses_status_binding = options.status_code_binding && !functions.is_empty();
    GenerationOutput {
      registry,
      functions,
      client_name,
      base_url,
      diagnostics,
      uses_status_binding,
      uses_default_binding,
      stats,
    }
  }
}

/// Declares every component schema up front so references resolve in any order.
fn declare_components(resolver: &mut SchemaResolver<'_>, diagnostics: &mut Diagnostics) {
  let components = resolver
    .registry()
    .component_names()
    .map(|(ref_name, type_name)| (ref_name.to_string(), type_name.to_string()))
    .collect::<Vec<_>>();

  for (ref_name, type_name) in components {
    if resolver.registry().contains(&type_name) {
      continue;
    }
    if let Err(err) = resolver.declare_component(&ref_name, &type_name) {
      diagnostics.push(err.to_diagnostic(&ref_name));
    }
  }
  diagnostics.extend(resolver.take_diagnostics());
}

/// First server URL with its variables replaced by their defaults.
fn server_url(spec: &Spec, diagnostics: &mut Diagnostics) -> String {
  let Some(server) = spec.servers.first() else {
    diagnostics.push(DiagnosticKind::MissingServerUrl {
      fallback: FALLBACK_BASE_URL.to_string(),
    });
    return FALLBACK_BASE_URL.to_string();
  };

  let mut url = server.url.clone();
  let raw = serde_json::to_value(server).unwrap_or(Value::Null);
  if let Some(Value::Object(variables)) = raw.get("variables") {
    for (variable, definition) in variables {
      let default = definition.get("default").and_then(Value::as_str).unwrap_or_default();
      if default.is_empty() {
        diagnostics.push(DiagnosticKind::EmptyServerVariable {
          variable: variable.clone(),
        });
      }
      url = url.replace(&format!("{{{variable}}}"), default);
    }
  }
  url
}

fn client_name(title: &str) -> String {
  let base = to_rust_type_name(title);
  if base.is_empty() || title.trim().is_empty() {
    return FALLBACK_CLIENT_NAME.to_string();
  }
  if base.ends_with("Client") {
    base
  } else {
    format!("{base}Client")
  }
}
