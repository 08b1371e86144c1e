use super::{
  ast::{DeclarationKind, FunctionDescriptor, MethodVisibility},
  diagnostics::{Diagnostics, Severity},
  registry::TypeRegistry,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub records_generated: usize,
  pub enums_generated: usize,
  pub unions_generated: usize,
  pub newtypes_generated: usize,
  pub type_aliases_generated: usize,
  pub response_enums_generated: usize,
  pub operations_total: usize,
  pub operations_converted: usize,
  pub operations_skipped: usize,
  pub client_methods_generated: usize,
  pub mock_methods_generated: usize,
  pub errors: usize,
  pub warnings: usize,
}

impl GenerationStats {
  pub fn record_declaration(&mut self, kind: &DeclarationKind) {
    self.types_generated += 1;
    match kind {
      DeclarationKind::Record(_) => self.records_generated += 1,
      DeclarationKind::Enum(_) => self.enums_generated += 1,
      DeclarationKind::Union(_) => self.unions_generated += 1,
      DeclarationKind::Newtype(_) => self.newtypes_generated += 1,
      DeclarationKind::Alias(_) => self.type_aliases_generated += 1,
      DeclarationKind::Response(_) => self.response_enums_generated += 1,
    }
  }

  pub fn record_registry(&mut self, registry: &TypeRegistry) {
    for declaration in registry.sorted() {
      self.record_declaration(&declaration.kind);
    }
  }

  pub fn record_operation(&mut self, functions: &[FunctionDescriptor]) {
    self.operations_total += 1;
    if functions.is_empty() {
      self.operations_skipped += 1;
      return;
    }
    self.operations_converted += 1;
    for function in functions {
      if function.visibility == MethodVisibility::Public {
        self.client_methods_generated += 1;
      }
      if function.is_mock() {
        self.mock_methods_generated += 1;
      }
    }
  }

  pub fn record_diagnostics(&mut self, diagnostics: &Diagnostics) {
    self.errors += diagnostics.count(Severity::Error);
    self.warnings += diagnostics.count(Severity::Warning);
  }
}
