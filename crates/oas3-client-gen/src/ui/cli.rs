use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::{DefaultOnlyPolicy, FunctionStyle, Visibility};

#[derive(Parser, Debug)]
#[command(name = "oas3-client-gen")]
#[command(author, version, about = "Generates typed Rust HTTP clients from OpenAPI v3 specifications")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate a Rust client module from OpenAPI specification
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateCommand {
  /// Path to the OpenAPI JSON or YAML specification file
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory where `types.rs`, `client.rs`, `utils.rs` and `mod.rs` are written
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Module path recorded in the config entry (defaults to the output directory name)
  #[arg(long, value_name = "MODULE")]
  pub module: Option<String>,

  /// Identifier recorded in the config entry (defaults to the input file stem)
  #[arg(long, value_name = "ID")]
  pub id: Option<String>,

  /// Naming and URL building style of the client methods
  #[arg(long, value_enum, default_value = "resource")]
  pub style: StyleArg,

  /// Return one enum per operation with a variant for each documented status code
  #[arg(long, default_value_t = false)]
  pub status_code_binding: bool,

  /// Wrap schemas that allow `null` in `Option`
  #[arg(long, default_value_t = false)]
  pub nullable: bool,

  /// Generate a client that returns response examples instead of calling the server
  #[arg(long, default_value_t = false)]
  pub mock: bool,

  /// Include only operations carrying one of these tags (comma-separated)
  #[arg(long, value_name = "TAGS", value_delimiter = ',')]
  pub tags: Vec<String>,

  /// Include only these operation ids (comma-separated)
  #[arg(long, value_name = "IDS", value_delimiter = ',')]
  pub operations: Vec<String>,

  /// File whose contents replace the generated banner at the top of every file
  #[arg(long, value_name = "FILE")]
  pub license: Option<PathBuf>,

  /// Handling of operations that only document a `default` response under status-code binding
  #[arg(long, value_enum, default_value = "skip")]
  pub default_only: DefaultOnlyArg,

  /// Visibility level for generated items
  #[arg(long, value_enum, default_value = "public")]
  pub visibility: VisibilityArg,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,

  /// Print the `[[tool.openapi]]` entry describing this run
  #[arg(long, default_value_t = false)]
  pub emit_config: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleArg {
  Resource,
  Remote,
}

impl From<StyleArg> for FunctionStyle {
  fn from(style: StyleArg) -> Self {
    match style {
      StyleArg::Resource => FunctionStyle::Resource,
      StyleArg::Remote => FunctionStyle::Remote,
    }
  }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultOnlyArg {
  Skip,
  Proceed,
}

impl From<DefaultOnlyArg> for DefaultOnlyPolicy {
  fn from(policy: DefaultOnlyArg) -> Self {
    match policy {
      DefaultOnlyArg::Skip => DefaultOnlyPolicy::Skip,
      DefaultOnlyArg::Proceed => DefaultOnlyPolicy::Proceed,
    }
  }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityArg {
  Public,
  Crate,
  File,
}

impl From<VisibilityArg> for Visibility {
  fn from(visibility: VisibilityArg) -> Self {
    match visibility {
      VisibilityArg::Public => Visibility::Public,
      VisibilityArg::Crate => Visibility::Crate,
      VisibilityArg::File => Visibility::File,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations defined in the OpenAPI specification
  Operations {
    /// Path to the OpenAPI JSON or YAML specification file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Method naming style used for the listed names
    #[arg(long, value_enum, default_value = "resource")]
    style: StyleArg,
  },
}
