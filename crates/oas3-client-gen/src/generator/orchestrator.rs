//! Entry point of the generation pipeline.
//!
//! The [`Orchestrator`] validates the document, runs the [`ClientGenerator`]
//! and renders the result into the four files of a client module:
//!
//! | File        | Contents                                         |
//! |-------------|--------------------------------------------------|
//! | `types.rs`  | records, enums, unions, newtypes, response enums |
//! | `client.rs` | the client struct and one method per operation   |
//! | `utils.rs`  | error type and request helpers                   |
//! | `mod.rs`    | module wiring and re-exports                     |
//!
//! ```no_run
//! use oas3_client_gen::generator::{GeneratorOptions, orchestrator::Orchestrator};
//!
//! # fn example() -> anyhow::Result<()> {
//! let spec = oas3_client_gen::utils::spec::from_json(&std::fs::read_to_string("openapi.json")?)?;
//! let output = Orchestrator::new(spec, GeneratorOptions::default()).generate("openapi.json")?;
//! for file in &output.files {
//!   std::fs::write(file.name, &file.code)?;
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::bail;
use quote::ToTokens;

use super::{
  GeneratorOptions,
  client::{ClientGenerator, GenerationOutput},
  codegen::{ClientFragment, FileHeader, ModFileFragment, SupportFragment, TypesFragment, format_source},
  diagnostics::Diagnostics,
  metrics::GenerationStats,
};

pub const TYPES_FILE: &str = "types.rs";
pub const CLIENT_FILE: &str = "client.rs";
pub const UTILS_FILE: &str = "utils.rs";
pub const MOD_FILE: &str = "mod.rs";

/// Metadata of the document used for the generated file banner.
#[derive(Debug, Clone)]
pub struct CodeMetadata {
  pub title: String,
  pub version: String,
  pub description: Option<String>,
}

/// One rendered file of the client module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub name: &'static str,
  pub code: String,
}

/// Rendered client module together with what the run reported.
#[derive(Debug)]
pub struct GeneratedModule {
  pub client_name: String,
  pub base_url: String,
  pub files: Vec<GeneratedFile>,
  pub diagnostics: Diagnostics,
  pub stats: GenerationStats,
}

impl GeneratedModule {
  pub fn file(&self, name: &str) -> Option<&str> {
    self.files.iter().find(|f| f.name == name).map(|f| f.code.as_str())
  }
}

pub struct Orchestrator {
  spec: oas3::Spec,
  options: GeneratorOptions,
}

impl Orchestrator {
  pub fn new(spec: oas3::Spec, options: GeneratorOptions) -> Self {
    Self { spec, options }
  }

  pub fn metadata(&self) -> CodeMetadata {
    CodeMetadata {
      title: self.spec.info.title.clone(),
      version: self.spec.info.version.clone(),
      description: self.spec.info.description.clone(),
    }
  }

  /// Runs the generators without rendering.
  ///
  /// # Errors
  ///
  /// Fails when the document lacks a title or a version.
  pub fn analyze(&self) -> anyhow::Result<GenerationOutput> {
    self.validate()?;
    Ok(ClientGenerator::new(&self.spec, &self.options).generate())
  }

  /// Generates and renders the client module.
  ///
  /// `source_path` only appears in the file banner.
  ///
  /// # Errors
  ///
  /// Fails when the document is missing required metadata or a generated file
  /// does not parse as Rust.
  pub fn generate(&self, source_path: &str) -> anyhow::Result<GeneratedModule> {
    let output = self.analyze()?;
    let header = self.header(source_path);
    let visibility = self.options.visibility;

    let files = vec![
      render(
        TYPES_FILE,
        TypesFragment::new(&output.registry, visibility, output.uses_default_binding),
        &header,
      )?,
      render(CLIENT_FILE, ClientFragment::new(&output, visibility), &header)?,
      render(
        UTILS_FILE,
        SupportFragment::new(visibility, output.uses_status_binding, output.uses_default_binding),
        &header,
      )?,
      render(
        MOD_FILE,
        ModFileFragment::new(&output.client_name, visibility, output.uses_default_binding),
        &header,
      )?,
    ];

    tracing::info!(
      client = %output.client_name,
      types = output.stats.types_generated,
      methods = output.stats.client_methods_generated,
      warnings = output.stats.warnings,
      errors = output.stats.errors,
      "rendered client module"
    );

    Ok(GeneratedModule {
      client_name: output.client_name,
      base_url: output.base_url,
      files,
      diagnostics: output.diagnostics,
      stats: output.stats,
    })
  }

  fn validate(&self) -> anyhow::Result<()> {
    if self.spec.info.title.trim().is_empty() {
      bail!("the OpenAPI document has no info.title");
    }
    if self.spec.info.version.trim().is_empty() {
      bail!("the OpenAPI document has no info.version");
    }
    Ok(())
  }

  fn header(&self, source_path: &str) -> FileHeader {
    if let Some(license) = &self.options.license {
      return FileHeader::License(license.clone());
    }
    let metadata = self.metadata();
    FileHeader::Banner {
      title: metadata.title,
      version: metadata.version,
      source: source_path.to_string(),
      description: metadata.description,
    }
  }
}

fn render(name: &'static str, fragment: impl ToTokens, header: &FileHeader) -> anyhow::Result<GeneratedFile> {
  let code = format_source(fragment.into_token_stream(), header, name)?;
  Ok(GeneratedFile { name, code })
}
