#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod generator;
mod ui;
mod utils;

/// `RUST_LOG` wins; otherwise engine events show up with `--verbose`.
fn init_tracing(verbose: bool) {
  let filter = std::env::var("RUST_LOG")
    .ok()
    .and_then(|filter| EnvFilter::try_new(filter).ok())
    .unwrap_or_else(|| EnvFilter::new(if verbose { "warn,oas3_client_gen=debug" } else { "warn" }));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::List { list_command } => {
      init_tracing(false);
      match list_command {
        ListCommands::Operations { input, style } => {
          ui::commands::list_operations(&input, style.into(), &colors).await?;
        }
      }
    }
    Commands::Generate(command) => {
      init_tracing(command.verbose);
      let config = ui::commands::GenerateConfig::from_command(command)?;
      ui::commands::generate_code(config, &colors).await?;
    }
  }

  Ok(())
}
