use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::{FunctionStyle, GeneratorOptions};

/// Tool manifest entry describing how a client module was generated, so the
/// run can be repeated.
///
/// Serialized as one element of the `[[tool.openapi]]` array of tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct ToolConfigEntry {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub target_module: String,
  #[builder(into)]
  pub file_path: String,
  #[builder(default)]
  pub options: ToolConfigOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolConfigOptions {
  pub mode: String,
  #[serde(default)]
  pub status_code_binding: bool,
  #[serde(default)]
  pub nullable: bool,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub operations: Vec<String>,
  /// Path of the license header file.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license: Option<String>,
  #[serde(default)]
  pub mock: bool,
}

impl ToolConfigOptions {
  pub fn from_options(options: &GeneratorOptions, license_path: Option<String>) -> Self {
    Self {
      mode: options.style.to_string(),
      status_code_binding: options.status_code_binding,
      nullable: options.nullable,
      tags: options.tags.clone(),
      operations: options.operations.clone(),
      license: license_path,
      mock: options.mock,
    }
  }

  /// Style recorded in `mode`, `None` when it names no known style.
  pub fn style(&self) -> Option<FunctionStyle> {
    match self.mode.as_str() {
      "resource" => Some(FunctionStyle::Resource),
      "remote" => Some(FunctionStyle::Remote),
      _ => None,
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
  #[serde(default)]
  tool: ToolSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ToolSection {
  #[serde(default)]
  openapi: Vec<ToolConfigEntry>,
}

impl ToolConfigEntry {
  /// Renders the entry as a standalone `[[tool.openapi]]` table.
  pub fn to_toml(&self) -> anyhow::Result<String> {
    let manifest = Manifest {
      tool: ToolSection {
        openapi: vec![self.clone()],
      },
    };
    toml::to_string(&manifest).with_context(|| format!("failed to serialize config entry '{}'", self.id))
  }

  /// Reads every `[[tool.openapi]]` entry of a manifest.
  pub fn parse_all(manifest: &str) -> anyhow::Result<Vec<Self>> {
    let manifest: Manifest = toml::from_str(manifest).context("failed to parse tool manifest")?;
    Ok(manifest.tool.openapi)
  }
}
