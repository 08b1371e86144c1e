use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema},
};

use super::{
  ast::{Constraints, DeclarationKind, TypeDeclaration, TypeExpr},
  diagnostics::{DiagnosticKind, Diagnostics},
  naming::identifiers::to_rust_type_name,
  registry::TypeRegistry,
  types::{MAX_ARRAY_LENGTH, ShapeKind},
};
use crate::utils::{SchemaExt, parse_schema_ref_path, ref_path_of};

/// A `$ref` that cannot be turned into a type.
///
/// Propagates to the enclosing operation or component, which is then omitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
  #[error("reference '{0}' is not a local component schema")]
  NonLocal(String),
  #[error("reference '{0}' points to a missing component")]
  Missing(String),
  #[error("reference '{reference}' could not be resolved: {reason}")]
  Unresolvable { reference: String, reason: String },
}

impl ReferenceError {
  pub fn reference(&self) -> &str {
    match self {
      Self::NonLocal(reference) | Self::Missing(reference) => reference,
      Self::Unresolvable { reference, .. } => reference,
    }
  }

  /// Wraps the failure of resolving a non-schema component such as a parameter or request body.
  pub fn unresolvable<T>(item: &ObjectOrReference<T>, err: impl std::fmt::Display) -> Self {
    Self::Unresolvable {
      reference: ref_path_of(item).unwrap_or_default().to_string(),
      reason: err.to_string(),
    }
  }

  /// Error diagnostic recording that `subject` was omitted because of this reference.
  pub fn to_diagnostic(&self, subject: &str) -> DiagnosticKind {
    DiagnosticKind::InvalidReference {
      reference: self.reference().to_string(),
      reason: format!("{self}, '{subject}' omitted"),
    }
  }
}

/// Maps schemas to type handles, declaring named types in the registry as it goes.
///
/// Diagnostics raised while a declaration is being built are stored on that
/// declaration. Everything else accumulates here until the caller takes it.
pub struct SchemaResolver<'a> {
  spec: &'a Spec,
  registry: &'a mut TypeRegistry,
  nullable: bool,
  diagnostics: Diagnostics,
}

impl<'a> SchemaResolver<'a> {
  pub fn new(spec: &'a Spec, registry: &'a mut TypeRegistry, nullable: bool) -> Self {
    Self {
      spec,
      registry,
      nullable,
      diagnostics: Diagnostics::new(),
    }
  }

  pub fn spec(&self) -> &'a Spec {
    self.spec
  }

  pub fn nullable(&self) -> bool {
    self.nullable
  }

  pub fn registry(&self) -> &TypeRegistry {
    &*self.registry
  }

  pub fn registry_mut(&mut self) -> &mut TypeRegistry {
    &mut *self.registry
  }

  pub fn report(&mut self, kind: DiagnosticKind) {
    self.diagnostics.push(kind);
  }

  pub fn take_diagnostics(&mut self) -> Diagnostics {
    self.diagnostics.take()
  }

  /// Resolves a schema or reference to a type handle.
  ///
  /// `hint` names anonymous declarations created for inline schemas.
  pub fn resolve(&mut self, schema: &ObjectOrReference<ObjectSchema>, hint: &str) -> Result<TypeExpr, ReferenceError> {
    match schema {
      ObjectOrReference::Ref { ref_path, .. } => self.resolve_reference(ref_path),
      ObjectOrReference::Object(inline) => self.resolve_inline(inline, hint),
    }
  }

  pub fn resolve_inline(&mut self, schema: &ObjectSchema, hint: &str) -> Result<TypeExpr, ReferenceError> {
    let ty = ShapeKind::classify(schema).descriptor(self, schema, hint)?;
    Ok(self.apply_nullable(schema, ty))
  }

  /// Resolves `#/components/schemas/<name>`, declaring the component on first use.
  pub fn resolve_reference(&mut self, ref_path: &str) -> Result<TypeExpr, ReferenceError> {
    let ref_name = parse_schema_ref_path(ref_path).ok_or_else(|| ReferenceError::NonLocal(ref_path.to_string()))?;
    let type_name = self
      .registry
      .component_type_name(&ref_name)
      .ok_or_else(|| ReferenceError::Missing(ref_path.to_string()))?
      .to_string();

    if let Some(existing) = self.registry.lookup(&type_name) {
      return Ok(existing);
    }
    self.declare_component(&ref_name, &type_name)
  }

  /// Follows a schema reference (and any reference chain behind it) to the target schema.
  pub fn lookup_component(&self, ref_path: &str) -> Result<&'a ObjectSchema, ReferenceError> {
    let spec = self.spec;
    let mut current = ref_path.to_string();
    for _ in 0..32 {
      let name = parse_schema_ref_path(&current).ok_or_else(|| ReferenceError::NonLocal(current.clone()))?;
      let target = spec
        .components
        .as_ref()
        .and_then(|components| components.schemas.get(&name))
        .ok_or_else(|| ReferenceError::Missing(current.clone()))?;
      match target {
        ObjectOrReference::Object(schema) => return Ok(schema),
        ObjectOrReference::Ref { ref_path, .. } => current.clone_from(ref_path),
      }
    }
    Err(ReferenceError::Unresolvable {
      reference: ref_path.to_string(),
      reason: "reference chain does not terminate".to_string(),
    })
  }

  /// Inline schema or the schema a reference points at.
  pub fn schema_of(&self, schema: &'a ObjectOrReference<ObjectSchema>) -> Result<&'a ObjectSchema, ReferenceError> {
    match schema {
      ObjectOrReference::Object(inline) => Ok(inline),
      ObjectOrReference::Ref { ref_path, .. } => self.lookup_component(ref_path),
    }
  }

  /// Builds the declaration for a component schema under its reserved name.
  pub fn declare_component(&mut self, ref_name: &str, type_name: &str) -> Result<TypeExpr, ReferenceError> {
    let spec = self.spec;
    let Some(target) = spec
      .components
      .as_ref()
      .and_then(|components| components.schemas.get(ref_name))
    else {
      return Err(ReferenceError::Missing(ref_name.to_string()));
    };
    tracing::debug!(schema = ref_name, type_name, "resolving component schema");

    self.registry.begin(type_name);
    let outer = self.diagnostics.take();
    let result = match target {
      ObjectOrReference::Ref { ref_path, .. } => self
        .resolve_reference(ref_path)
        .map(|ty| (Default::default(), DeclarationKind::Alias(ty.without_recursion()))),
      ObjectOrReference::Object(schema) => ShapeKind::classify(schema)
        .definition(self, schema, type_name)
        .map(|kind| (schema.docs(), self.nullable_alias(schema, kind))),
    };
    let own = std::mem::replace(&mut self.diagnostics, outer);

    match result {
      Ok((docs, kind)) => {
        let declaration = TypeDeclaration::new(type_name, docs, kind).with_diagnostics(own);
        Ok(self.registry.complete(declaration))
      }
      Err(err) => {
        self.registry.abandon(type_name);
        self.diagnostics.extend(own);
        Err(err)
      }
    }
  }

  /// Declares an anonymous schema under a name synthesized from `hint`.
  ///
  /// Identical schemas share one declaration, so repeated shapes are declared once.
  pub fn declare_inline<F>(
    &mut self,
    tag: &str,
    schema: &ObjectSchema,
    hint: &str,
    build: F,
  ) -> Result<TypeExpr, ReferenceError>
  where
    F: FnOnce(&mut Self, &str) -> Result<DeclarationKind, ReferenceError>,
  {
    let fingerprint = format!("{tag}:{}", serde_json::to_string(schema).unwrap_or_default());
    if let Some(existing) = self.registry.fingerprint_name(&fingerprint) {
      let existing = existing.to_string();
      return Ok(self.registry.lookup(&existing).unwrap_or_else(|| TypeExpr::named(existing)));
    }

    let name = self.registry.reserve_unique(&to_rust_type_name(hint));
    self.registry.remember_fingerprint(fingerprint.clone(), &name);
    self.registry.begin(&name);

    let outer = self.diagnostics.take();
    let result = build(self, &name);
    let own = std::mem::replace(&mut self.diagnostics, outer);

    match result {
      Ok(kind) => {
        let declaration = TypeDeclaration::new(&name, schema.docs(), kind).with_diagnostics(own);
        Ok(self.registry.complete(declaration))
      }
      Err(err) => {
        self.registry.abandon(&name);
        self.registry.forget_fingerprint(&fingerprint);
        self.diagnostics.extend(own);
        Err(err)
      }
    }
  }

  /// Constraints of `schema` with `maxItems` clamped to [`MAX_ARRAY_LENGTH`].
  pub fn constraints_for(&mut self, schema: &ObjectSchema, name: &str) -> Constraints {
    let mut constraints = schema.constraints();
    if let Some(max_items) = constraints.max_items
      && max_items > MAX_ARRAY_LENGTH
    {
      self.report(DiagnosticKind::ArrayMaxItemsClamped {
        name: name.to_string(),
        max_items: max_items.to_string(),
        ceiling: MAX_ARRAY_LENGTH.to_string(),
      });
      constraints.max_items = Some(MAX_ARRAY_LENGTH);
    }
    constraints
  }

  fn apply_nullable(&self, schema: &ObjectSchema, ty: TypeExpr) -> TypeExpr {
    if self.nullable && schema.allows_null() && !schema.is_null() {
      ty.optional()
    } else {
      ty
    }
  }

  fn nullable_alias(&self, schema: &ObjectSchema, kind: DeclarationKind) -> DeclarationKind {
    match kind {
      DeclarationKind::Alias(ty) => DeclarationKind::Alias(self.apply_nullable(schema, ty)),
      other => other,
    }
  }
}

#[cfg(test)]
mod tests;
