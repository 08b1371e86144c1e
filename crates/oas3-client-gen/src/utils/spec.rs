use std::{collections::BTreeMap, ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3::spec::MediaType;
use serde_json::Value;

use super::schema_ext::PROPERTY_ORDER_EXTENSION;

/// Root extension listing the paths in document order.
pub(crate) const PATH_ORDER_EXTENSION: &str = "client-gen-path-order";
/// Media type extension holding its index within the enclosing `content` map.
pub(crate) const MEDIA_POSITION_EXTENSION: &str = "client-gen-position";

/// Serialization of the input document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(OsStr::to_str) {
      Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
      _ => Self::Json,
    }
  }
}

/// Memory-mapped OpenAPI document.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to map {}", path.display()))?;
    Ok(Self {
      file,
      format: SpecFormat::from_path(path),
    })
  }

  pub fn parse(&self) -> anyhow::Result<oas3::Spec> {
    let document = match self.format {
      SpecFormat::Json => serde_json::from_slice::<Value>(self.file.as_slice()).context("invalid JSON document")?,
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.file.as_slice()).context("YAML document is not UTF-8")?;
        serde_yaml::from_str::<Value>(content).context("invalid YAML document")?
      }
    };
    from_value(document)
  }
}

pub fn from_json(content: &str) -> anyhow::Result<oas3::Spec> {
  from_value(serde_json::from_str(content).context("invalid JSON document")?)
}

/// Builds the typed model from a document whose maps are still in document order.
///
/// The typed model keeps paths, `content` and `properties` sorted by name, so
/// the order as written is first stamped into `x-` extensions.
pub fn from_value(mut document: Value) -> anyhow::Result<oas3::Spec> {
  if let Value::Object(root) = &mut document {
    let paths = match root.get("paths") {
      Some(Value::Object(paths)) => paths.keys().cloned().map(Value::String).collect(),
      _ => vec![],
    };
    root.insert(format!("x-{PATH_ORDER_EXTENSION}"), Value::Array(paths));
  }
  record_document_order(&mut document);
  serde_json::from_value(document).context("document is not a valid OpenAPI 3.x description")
}

/// Paths in document order; paths missing from the recorded order follow by name.
pub(crate) fn ordered_paths(spec: &oas3::Spec) -> Vec<&str> {
  let Some(paths) = &spec.paths else {
    return vec![];
  };
  let mut ordered = spec
    .extensions
    .get(PATH_ORDER_EXTENSION)
    .and_then(Value::as_array)
    .map(|names| {
      names
        .iter()
        .filter_map(Value::as_str)
        .filter(|name| paths.contains_key(*name))
        .collect::<Vec<_>>()
    })
    .unwrap_or_default();
  for path in paths.keys() {
    if !ordered.contains(&path.as_str()) {
      ordered.push(path);
    }
  }
  ordered
}

/// Entries of a `content` map in document order.
pub(crate) fn ordered_content(content: &BTreeMap<String, MediaType>) -> Vec<(&String, &MediaType)> {
  let mut entries = content.iter().collect::<Vec<_>>();
  entries.sort_by_key(|(_, media)| {
    media
      .extensions
      .get(MEDIA_POSITION_EXTENSION)
      .and_then(Value::as_u64)
      .unwrap_or(u64::MAX)
  });
  entries
}

/// Keywords holding literal data, never schemas.
const LITERAL_KEYWORDS: &[&str] = &["example", "examples", "default", "enum", "const"];

/// Stamps `content` entries with their position and finds every schema root
/// (`schema` values and `components.schemas` entries).
fn record_document_order(node: &mut Value) {
  match node {
    Value::Object(map) => {
      for (key, value) in map.iter_mut() {
        match key.as_str() {
          "schema" => annotate_schema(value),
          "schemas" => {
            if let Value::Object(schemas) = value {
              schemas.values_mut().for_each(annotate_schema);
            }
          }
          "content" => {
            if let Value::Object(content) = value {
              for (position, media) in content.values_mut().enumerate() {
                if let Value::Object(media) = media {
                  media.insert(format!("x-{MEDIA_POSITION_EXTENSION}"), Value::from(position));
                }
              }
            }
            record_document_order(value);
          }
          literal if LITERAL_KEYWORDS.contains(&literal) => {}
          _ => record_document_order(value),
        }
      }
    }
    Value::Array(items) => items.iter_mut().for_each(record_document_order),
    _ => {}
  }
}

fn annotate_schema(schema: &mut Value) {
  let Value::Object(map) = schema else {
    return;
  };

  let order = match map.get_mut("properties") {
    Some(Value::Object(properties)) => {
      properties.values_mut().for_each(annotate_schema);
      Some(properties.keys().cloned().map(Value::String).collect::<Vec<_>>())
    }
    _ => None,
  };

  for (key, value) in map.iter_mut() {
    match key.as_str() {
      "items" | "additionalProperties" | "not" | "contains" | "propertyNames" | "if" | "then" | "else" => {
        annotate_schema(value);
      }
      "allOf" | "oneOf" | "anyOf" | "prefixItems" => {
        if let Value::Array(branches) = value {
          branches.iter_mut().for_each(annotate_schema);
        }
      }
      "patternProperties" | "dependentSchemas" | "$defs" => {
        if let Value::Object(schemas) = value {
          schemas.values_mut().for_each(annotate_schema);
        }
      }
      _ => {}
    }
  }

  if let Some(order) = order {
    map.insert(format!("x-{PROPERTY_ORDER_EXTENSION}"), Value::Array(order));
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::utils::SchemaExt;

  fn property_names(spec: &oas3::Spec, schema: &str) -> Vec<String> {
    let components = spec.components.as_ref().unwrap();
    let oas3::spec::ObjectOrReference::Object(schema) = &components.schemas[schema] else {
      panic!("{schema} is a reference");
    };
    schema.ordered_properties().into_iter().map(|(name, _)| name.clone()).collect()
  }

  #[test]
  fn test_format_from_extension() {
    assert_eq!(SpecFormat::from_path(Path::new("api.yaml")), SpecFormat::Yaml);
    assert_eq!(SpecFormat::from_path(Path::new("api.YML")), SpecFormat::Yaml);
    assert_eq!(SpecFormat::from_path(Path::new("api.json")), SpecFormat::Json);
    assert_eq!(SpecFormat::from_path(Path::new("api")), SpecFormat::Json);
  }

  #[tokio::test]
  async fn test_loads_yaml_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.yaml");
    let yaml = "\
openapi: 3.0.3
info:
  title: Yaml API
  version: 0.1.0
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        zeta: {type: string}
        alpha: {type: string}
";
    tokio::fs::write(&path, yaml).await.unwrap();

    let spec = SpecLoader::open(&path).await.unwrap().parse().unwrap();
    assert_eq!(spec.info.title, "Yaml API");
    assert_eq!(property_names(&spec, "Pet"), vec!["zeta", "alpha"]);
  }

  #[tokio::test]
  async fn test_invalid_json_reports_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let err = SpecLoader::open(&path).await.unwrap().parse().unwrap_err();
    assert!(err.to_string().contains("invalid JSON document"));
  }

  #[test]
  fn test_property_order_follows_document() {
    let document = json!({
      "openapi": "3.1.0",
      "info": { "title": "Order", "version": "1" },
      "paths": {},
      "components": {
        "schemas": {
          "Pet": {
            "type": "object",
            "properties": {
              "zeta": { "type": "string" },
              "alpha": {
                "type": "object",
                "properties": { "second": { "type": "string" }, "first": { "type": "string" } }
              },
              "mid": { "type": "string" }
            },
            "example": { "zeta": "z", "alpha": { "second": "s" } }
          }
        }
      }
    });
    let spec = from_value(document).unwrap();
    assert_eq!(property_names(&spec, "Pet"), vec!["zeta", "alpha", "mid"]);

    let components = spec.components.as_ref().unwrap();
    let oas3::spec::ObjectOrReference::Object(pet) = &components.schemas["Pet"] else {
      panic!("Pet is a reference");
    };
    let oas3::spec::ObjectOrReference::Object(alpha) = &pet.properties["alpha"] else {
      panic!("alpha is a reference");
    };
    let nested = alpha.ordered_properties().into_iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>();
    assert_eq!(nested, vec!["second", "first"]);
    assert_eq!(pet.example, Some(json!({ "zeta": "z", "alpha": { "second": "s" } })));
  }
}
