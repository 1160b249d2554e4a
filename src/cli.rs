// src/cli.rs
//! CLI definitions for apogee
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "apogee")]
#[command(author = "Apogee Contributors")]
#[command(version)]
#[command(about = "Model rocket design toolkit with RockSim interchange export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a design document to a RockSim .rkt file
    Export {
        /// Design document (.toml or .json)
        design: String,

        /// Output path (defaults to the design name with .rkt)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the projected output size instead of writing
        #[arg(long)]
        estimate: bool,
    },

    /// Load and validate a design document
    Validate {
        /// Design document (.toml or .json)
        design: String,
    },

    /// Print the component tree with structural mass and CG
    Inspect {
        /// Design document (.toml or .json)
        design: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
