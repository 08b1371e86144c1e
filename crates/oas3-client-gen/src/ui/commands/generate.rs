use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use num_format::{Locale, ToFormattedString};

use crate::{
  generator::{
    GeneratorOptions,
    config_entry::{ToolConfigEntry, ToolConfigOptions},
    diagnostics::{Diagnostic, Diagnostics},
    metrics::GenerationStats,
    orchestrator::{GeneratedModule, Orchestrator},
  },
  ui::{Colors, GenerateCommand, colors::Role},
  utils::spec::SpecLoader,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

fn format_count(count: usize) -> String {
  count.to_formatted_string(&Locale::en)
}

#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub id: String,
  pub module: String,
  pub license: Option<PathBuf>,
  pub options: GeneratorOptions,
  pub verbose: bool,
  pub quiet: bool,
  pub emit_config: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      module,
      id,
      style,
      status_code_binding,
      nullable,
      mock,
      tags,
      operations,
      license,
      default_only,
      visibility,
      verbose,
      quiet,
      emit_config,
    } = command;

    if verbose && quiet {
      anyhow::bail!("--verbose and --quiet can not be combined");
    }

    let id = match id {
      Some(id) => id,
      None => file_stem(&input)?,
    };
    let module = match module {
      Some(module) => module,
      None => file_stem(&output)?,
    };

    let options = GeneratorOptions::builder()
      .style(style.into())
      .status_code_binding(status_code_binding)
      .nullable(nullable)
      .mock(mock)
      .tags(clean_list(tags))
      .operations(clean_list(operations))
      .default_only(default_only.into())
      .visibility(visibility.into())
      .build();

    Ok(Self {
      input,
      output,
      id,
      module,
      license,
      options,
      verbose,
      quiet,
      emit_config,
    })
  }

  async fn load_spec(&self) -> anyhow::Result<oas3::Spec> {
    SpecLoader::open(&self.input)
      .await
      .with_context(|| format!("failed to open {}", self.input.display()))?
      .parse()
      .with_context(|| format!("failed to parse {}", self.input.display()))
  }

  async fn load_license(&self) -> anyhow::Result<Option<String>> {
    let Some(path) = &self.license else {
      return Ok(None);
    };
    let text = tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("failed to read license file {}", path.display()))?;
    Ok(Some(text))
  }

  async fn write_module_output(&self, module: &GeneratedModule) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&self.output)
      .await
      .with_context(|| format!("failed to create {}", self.output.display()))?;
    for file in &module.files {
      let path = self.output.join(file.name);
      tokio::fs::write(&path, &file.code)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
  }

  pub fn config_entry(&self) -> ToolConfigEntry {
    let license = self.license.as_ref().map(|p| p.display().to_string());
    ToolConfigEntry::builder()
      .id(self.id.clone())
      .target_module(self.module.clone())
      .file_path(self.input.display().to_string())
      .options(ToolConfigOptions::from_options(&self.options, license))
      .build()
  }
}

fn file_stem(path: &Path) -> anyhow::Result<String> {
  path
    .file_stem()
    .and_then(|stem| stem.to_str())
    .filter(|stem| !stem.is_empty())
    .map(ToString::to_string)
    .with_context(|| format!("can not derive a name from '{}'", path.display()))
}

fn clean_list(values: Vec<String>) -> Vec<String> {
  values
    .into_iter()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
    .collect()
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.get(Role::Timestamp)));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.get(Role::Label)),
        value.with(self.colors.get(Role::Count))
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.input.display())
        .with(self.colors.get(Role::Progress))
        .to_string(),
    );
  }

  fn log_generating(&self) {
    let message = if self.config.options.mock {
      "Generating Rust mock client module..."
    } else {
      "Generating Rust client module..."
    };
    self.info(&message.with(self.colors.get(Role::Progress)).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Types generated:", format_count(stats.types_generated));
    self.stat("", format!("{} records", format_count(stats.records_generated)));
    self.stat("", format!("{} enums", format_count(stats.enums_generated)));
    self.stat("", format!("{} unions", format_count(stats.unions_generated)));
    self.stat("", format!("{} newtypes", format_count(stats.newtypes_generated)));
    self.stat("", format!("{} type aliases", format_count(stats.type_aliases_generated)));
    if stats.response_enums_generated > 0 {
      self.stat("", format!("{} response enums", format_count(stats.response_enums_generated)));
    }
    self.stat(
      "Operations converted:",
      format!(
        "{} of {}",
        format_count(stats.operations_converted),
        format_count(stats.operations_total)
      ),
    );
    if stats.operations_skipped > 0 {
      self.stat("", format!("{} skipped", format_count(stats.operations_skipped)));
    }
    self.stat("Methods generated:", format_count(stats.client_methods_generated));
    if stats.mock_methods_generated > 0 {
      self.stat("", format!("{} return examples", format_count(stats.mock_methods_generated)));
    }
    if stats.errors > 0 {
      self.stat("Errors:", format_count(stats.errors));
    }
    if stats.warnings > 0 {
      self.stat("Warnings:", format_count(stats.warnings));
    }
  }

  /// Errors are always printed, warnings only when verbose.
  fn print_diagnostics(&self, diagnostics: &Diagnostics) {
    let visible = diagnostics
      .iter()
      .filter(|d| d.is_error() || self.config.verbose)
      .collect::<Vec<_>>();
    if visible.is_empty() {
      return;
    }

    eprintln!();
    for diagnostic in visible {
      self.print_diagnostic(diagnostic);
    }
  }

  fn print_diagnostic(&self, diagnostic: &Diagnostic) {
    let label = if diagnostic.is_error() { "Error:" } else { "Warning:" };
    eprintln!(
      "{} {}",
      format!("{label} [{}]", diagnostic.code()).with(self.colors.severity(diagnostic.severity())),
      diagnostic.message()
    );
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.get(Role::Progress))
        .to_string(),
    );
  }

  fn log_success(&self, module: &GeneratedModule) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.get(Role::Timestamp)),
        format!("Successfully generated {} ({})", module.client_name, module.base_url).with(self.colors.get(Role::Success))
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let spec = config.load_spec().await?;
  let mut options = config.options.clone();
  options.license = config.load_license().await?;

  logger.log_generating();
  let source_path = config.input.display().to_string();
  let module = Orchestrator::new(spec, options).generate(&source_path)?;
  logger.print_statistics(&module.stats);
  logger.print_diagnostics(&module.diagnostics);

  logger.log_writing();
  config.write_module_output(&module).await?;

  if config.emit_config {
    println!();
    print!("{}", config.config_entry().to_toml()?);
  }

  logger.log_success(&module);
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::Parser;
  use serde_json::json;

  use super::*;
  use crate::{
    generator::{FunctionStyle, Visibility},
    ui::{Cli, Commands, colors::Theme},
  };

  fn command(args: &[&str]) -> GenerateCommand {
    let argv = ["oas3-client-gen", "generate"].iter().chain(args.iter()).copied();
    match Cli::parse_from(argv).command {
      Commands::Generate(command) => command,
      Commands::List { .. } => panic!("expected the generate command"),
    }
  }

  #[test]
  fn test_from_command_defaults() {
    let config = GenerateConfig::from_command(command(&["-i", "specs/petstore.json", "-o", "src/petstore"])).unwrap();
    assert_eq!(config.id, "petstore");
    assert_eq!(config.module, "petstore");
    assert_eq!(config.options, GeneratorOptions::default());
    assert!(!config.emit_config);
  }

  #[test]
  fn test_from_command_maps_flags() {
    let config = GenerateConfig::from_command(command(&[
      "-i",
      "api.yaml",
      "-o",
      "out",
      "--style",
      "remote",
      "--status-code-binding",
      "--nullable",
      "--tags",
      "pets, store,",
      "--operations",
      "listPets",
      "--default-only",
      "proceed",
      "--visibility",
      "crate",
      "--module",
      "clients::api",
      "--id",
      "main-api",
    ]))
    .unwrap();

    let options = &config.options;
    assert_eq!(options.style, FunctionStyle::Remote);
    assert!(options.status_code_binding);
    assert!(options.nullable);
    assert!(!options.mock);
    assert_eq!(options.tags, vec!["pets", "store"]);
    assert_eq!(options.operations, vec!["listPets"]);
    assert_eq!(options.default_only, crate::generator::DefaultOnlyPolicy::Proceed);
    assert_eq!(options.visibility, Visibility::Crate);
    assert_eq!(config.module, "clients::api");
    assert_eq!(config.id, "main-api");
  }

  #[test]
  fn test_verbose_and_quiet_conflict() {
    let result = GenerateConfig::from_command(command(&["-i", "a.json", "-o", "out", "-v", "-q"]));
    assert!(result.is_err());
  }

  #[test]
  fn test_config_entry_records_run() {
    let config = GenerateConfig::from_command(command(&[
      "-i",
      "petstore.json",
      "-o",
      "petstore",
      "--mock",
      "--license",
      "HEADER.txt",
    ]))
    .unwrap();
    let entry = config.config_entry();
    assert_eq!(entry.file_path, "petstore.json");
    assert!(entry.options.mock);
    assert_eq!(entry.options.mode, "resource");
    assert_eq!(entry.options.license.as_deref(), Some("HEADER.txt"));
  }

  #[tokio::test]
  async fn test_generate_code_writes_module() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("status.json");
    let license = dir.path().join("LICENSE.txt");
    let output = dir.path().join("status");

    let document = json!({
      "openapi": "3.0.3",
      "info": {"title": "Status", "version": "1.0.0"},
      "servers": [{"url": "https://status.example.com"}],
      "paths": {
        "/health": {
          "get": {
            "operationId": "health",
            "responses": {
              "200": {
                "description": "ok",
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Health"}}}
              }
            }
          }
        }
      },
      "components": {
        "schemas": {
          "Health": {
            "type": "object",
            "required": ["status"],
            "properties": {"status": {"type": "string"}}
          }
        }
      }
    });
    tokio::fs::write(&input, document.to_string()).await.unwrap();
    tokio::fs::write(&license, "Copyright Example").await.unwrap();

    let config = GenerateConfig::from_command(command(&[
      "-i",
      input.to_str().unwrap(),
      "-o",
      output.to_str().unwrap(),
      "--license",
      license.to_str().unwrap(),
      "-q",
    ]))
    .unwrap();
    generate_code(config, &Colors::new(false, Theme::Dark)).await.unwrap();

    for name in ["types.rs", "client.rs", "utils.rs", "mod.rs"] {
      let code = tokio::fs::read_to_string(output.join(name)).await.unwrap();
      assert!(code.starts_with("// Copyright Example\n"), "{name}: {code}");
    }
    let types = tokio::fs::read_to_string(output.join("types.rs")).await.unwrap();
    assert!(types.contains("pub struct Health"), "{types}");
  }
}
