// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Export {
            design,
            output,
            estimate,
        }) => {
            info!("Exporting design: {}", design);
            commands::export(&design, output, estimate)
        }
        Some(Commands::Validate { design }) => {
            info!("Validating design: {}", design);
            commands::validate(&design)
        }
        Some(Commands::Inspect { design }) => commands::inspect(&design),
        Some(Commands::Completions { shell }) => commands::completions(shell),
        None => {
            // No command provided, show help
            println!("Apogee v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'apogee --help' for usage information");
            Ok(())
        }
    }
}
