use std::collections::HashSet;

use http::Method;
use itertools::Itertools;
use oas3::{
  Spec,
  spec::{ObjectOrReference, Operation, Parameter},
};

use crate::utils::spec::ordered_paths;

/// One HTTP operation of the document, in document order.
#[derive(Debug, Clone)]
pub struct OperationEntry {
  pub method: Method,
  pub path: String,
  pub operation: Operation,
  /// Parameters declared on the enclosing path item.
  pub path_parameters: Vec<ObjectOrReference<Parameter>>,
}

impl OperationEntry {
  /// `operationId`, or `METHOD path` when the operation has none.
  pub fn label(&self) -> String {
    self
      .operation
      .operation_id
      .clone()
      .unwrap_or_else(|| format!("{} {}", self.method, self.path))
  }
}

/// Tag and operation allow-lists.
///
/// With both lists empty every operation passes. Otherwise an operation passes
/// when one of its tags is listed or its `operationId` is listed.
#[derive(Debug, Clone, Default)]
pub struct OperationFilter {
  tags: HashSet<String>,
  operations: HashSet<String>,
}

impl OperationFilter {
  #[must_use]
  pub fn new(tags: &[String], operations: &[String]) -> Self {
    Self {
      tags: tags.iter().cloned().collect(),
      operations: operations.iter().cloned().collect(),
    }
  }

  #[must_use]
  pub fn accepts(&self, operation: &Operation) -> bool {
    if self.tags.is_empty() && self.operations.is_empty() {
      return true;
    }
    operation.tags.iter().any(|tag| self.tags.contains(tag))
      || operation
        .operation_id
        .as_ref()
        .is_some_and(|id| self.operations.contains(id))
  }
}

/// Operations selected for generation.
#[derive(Debug)]
pub struct OperationRegistry {
  entries: Vec<OperationEntry>,
}

impl OperationRegistry {
  #[must_use]
  pub fn new(spec: &Spec) -> Self {
    Self::with_filter(spec, &OperationFilter::default())
  }

  #[must_use]
  pub fn with_filter(spec: &Spec, filter: &OperationFilter) -> Self {
    let Some(paths) = &spec.paths else {
      return Self { entries: vec![] };
    };
    let entries = ordered_paths(spec)
      .into_iter()
      .filter_map(|path| paths.get_key_value(path))
      .flat_map(|(path, item)| {
        item
          .methods()
          .into_iter()
          .unique_by(|(method, _)| method.clone())
          .filter(move |(_, operation)| filter.accepts(operation))
          .map(move |(method, operation)| OperationEntry {
            method,
            path: path.clone(),
            operation: operation.clone(),
            path_parameters: item.parameters.clone(),
          })
      })
      .collect();
    Self { entries }
  }

  pub fn operations(&self) -> impl Iterator<Item = &OperationEntry> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::generator::tests::support::spec_from;

  fn spec() -> Spec {
    spec_from(
      json!({}),
      json!({
        "/pets": {
          "get": { "operationId": "listPets", "tags": ["pets"], "responses": {} },
          "post": { "operationId": "createPet", "tags": ["pets", "admin"], "responses": {} }
        },
        "/store/inventory": {
          "parameters": [{ "name": "X-Store", "in": "header", "schema": { "type": "string" } }],
          "get": { "operationId": "getInventory", "tags": ["store"], "responses": {} }
        },
        "/health": {
          "get": { "responses": {} }
        }
      }),
    )
  }

  fn ids(registry: &OperationRegistry) -> Vec<String> {
    let mut ids = registry.operations().map(OperationEntry::label).collect::<Vec<_>>();
    ids.sort();
    ids
  }

  #[test]
  fn test_empty_filter_accepts_everything() {
    let registry = OperationRegistry::new(&spec());
    assert_eq!(registry.len(), 4);
    assert!(ids(&registry).contains(&"GET /health".to_string()));
  }

  #[test]
  fn test_tag_or_operation_id_selects() {
    let filter = OperationFilter::new(&["admin".to_string()], &["getInventory".to_string()]);
    let registry = OperationRegistry::with_filter(&spec(), &filter);
    assert_eq!(ids(&registry), vec!["createPet", "getInventory"]);
  }

  #[test]
  fn test_operations_follow_path_order() {
    let labels = OperationRegistry::new(&spec())
      .operations()
      .map(OperationEntry::label)
      .collect::<Vec<_>>();
    assert_eq!(labels, vec!["listPets", "createPet", "getInventory", "GET /health"]);
  }

  #[test]
  fn test_path_level_parameters_attached() {
    let registry = OperationRegistry::new(&spec());
    let inventory = registry
      .operations()
      .find(|entry| entry.path == "/store/inventory")
      .unwrap();
    assert_eq!(inventory.path_parameters.len(), 1);
  }
}
