use std::collections::{BTreeMap, HashMap};

use indexmap::{IndexMap, IndexSet};
use oas3::Spec;

use super::{
  ast::{DeclarationKind, TypeDeclaration, TypeExpr},
  diagnostics::Diagnostics,
  naming::identifiers::{ensure_unique, to_rust_type_name},
};

/// Names every type the generated `types.rs` may declare.
///
/// Declarations live in an arena keyed by name. A name enters the placeholder
/// map before its declaration is built; any lookup that reaches it again while
/// it is still under construction gets the placeholder handle back, which is
/// what breaks reference cycles.
#[derive(Debug, Default)]
pub struct TypeRegistry {
  declarations: IndexMap<String, TypeDeclaration>,
  placeholders: BTreeMap<String, TypeExpr>,
  reserved: IndexSet<String>,
  components: BTreeMap<String, String>,
  fingerprints: IndexMap<String, String>,
}

/// Registry state captured before an operation so its additions can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryCheckpoint {
  declarations: usize,
  reserved: usize,
  fingerprints: usize,
}

impl TypeRegistry {
  /// Reserves a unique type name for every component schema, in document order.
  pub fn new(spec: &Spec) -> Self {
    let mut registry = Self::default();
    let names = spec
      .components
      .as_ref()
      .map(|components| components.schemas.keys().cloned().collect::<Vec<_>>())
      .unwrap_or_default();
    for ref_name in names {
      let type_name = registry.reserve_unique(&to_rust_type_name(&ref_name));
      registry.components.insert(ref_name, type_name);
    }
    registry
  }

  /// Type name assigned to the component schema `ref_name`.
  pub fn component_type_name(&self, ref_name: &str) -> Option<&str> {
    self.components.get(ref_name).map(String::as_str)
  }

  pub fn component_names(&self) -> impl Iterator<Item = (&str, &str)> {
    self.components.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Handle for `name` if it is declared or under construction.
  pub fn lookup(&self, name: &str) -> Option<TypeExpr> {
    if let Some(placeholder) = self.placeholders.get(name) {
      return Some(placeholder.clone());
    }
    self.declarations.contains_key(name).then(|| TypeExpr::named(name))
  }

  pub fn is_pending(&self, name: &str) -> bool {
    self.placeholders.contains_key(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.declarations.contains_key(name)
  }

  pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
    self.declarations.get(name)
  }

  /// Registers the placeholder for `name` and returns it.
  pub fn begin(&mut self, name: &str) -> TypeExpr {
    let placeholder = TypeExpr::placeholder(name);
    self.placeholders.insert(name.to_string(), placeholder.clone());
    self.reserved.insert(name.to_string());
    placeholder
  }

  /// Stores a finished declaration and retires its placeholder.
  pub fn complete(&mut self, declaration: TypeDeclaration) -> TypeExpr {
    let name = declaration.name.clone();
    tracing::debug!(name = %name, kind = declaration.kind.label(), "registered type");
    self.placeholders.remove(&name);
    self.reserved.insert(name.clone());
    self.declarations.insert(name.clone(), declaration);
    TypeExpr::named(name)
  }

  /// Drops the placeholder of a declaration that could not be built.
  pub fn abandon(&mut self, name: &str) {
    self.placeholders.remove(name);
  }

  pub fn is_taken(&self, name: &str) -> bool {
    self.reserved.contains(name)
  }

  /// Claims `base`, or `base` with the smallest free ordinal suffix.
  pub fn reserve_unique(&mut self, base: &str) -> String {
    let name = ensure_unique(base, |candidate| self.reserved.contains(candidate));
    self.reserved.insert(name.clone());
    name
  }

  /// Name already registered for an identical anonymous schema.
  pub fn fingerprint_name(&self, fingerprint: &str) -> Option<&str> {
    self.fingerprints.get(fingerprint).map(String::as_str)
  }

  pub fn remember_fingerprint(&mut self, fingerprint: String, name: &str) {
    self.fingerprints.insert(fingerprint, name.to_string());
  }

  pub fn forget_fingerprint(&mut self, fingerprint: &str) {
    self.fingerprints.shift_remove(fingerprint);
  }

  pub fn checkpoint(&self) -> RegistryCheckpoint {
    RegistryCheckpoint {
      declarations: self.declarations.len(),
      reserved: self.reserved.len(),
      fingerprints: self.fingerprints.len(),
    }
  }

  /// Forgets everything registered after `checkpoint`.
  pub fn rollback(&mut self, checkpoint: RegistryCheckpoint) {
    self.declarations.truncate(checkpoint.declarations);
    self.reserved.truncate(checkpoint.reserved);
    self.fingerprints.truncate(checkpoint.fingerprints);
    self.placeholders.clear();
  }

  pub fn len(&self) -> usize {
    self.declarations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.declarations.is_empty()
  }

  /// Declarations ordered by name.
  pub fn sorted(&self) -> Vec<&TypeDeclaration> {
    let mut declarations = self.declarations.values().collect::<Vec<_>>();
    declarations.sort_by(|a, b| a.name.cmp(&b.name));
    declarations
  }

  /// Diagnostics recorded while building declarations, in declaration name order.
  pub fn diagnostics(&self) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for declaration in self.sorted() {
      diagnostics.extend(declaration.diagnostics.clone());
    }
    diagnostics
  }

  pub fn count_by_kind(&self) -> HashMap<&'static str, usize> {
    let mut counts = HashMap::new();
    for declaration in self.declarations.values() {
      *counts.entry(declaration.kind.label()).or_insert(0) += 1;
    }
    counts
  }

  pub fn declarations_of(&self, predicate: impl Fn(&DeclarationKind) -> bool) -> impl Iterator<Item = &TypeDeclaration> {
    self.declarations.values().filter(move |d| predicate(&d.kind))
  }
}
