// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: design document path
fn design_arg() -> Arg {
    Arg::new("design")
        .required(true)
        .value_name("DESIGN")
        .help("Design document (.toml or .json)")
}

fn build_cli() -> Command {
    Command::new("apogee")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Apogee Contributors")
        .about("Model rocket design toolkit with RockSim interchange export")
        .subcommand_required(false)
        .subcommand(
            Command::new("export")
                .about("Export a design document to a RockSim .rkt file")
                .arg(design_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output path (defaults to the design name with .rkt)"),
                )
                .arg(
                    Arg::new("estimate")
                        .long("estimate")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print the projected output size instead of writing"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Load and validate a design document")
                .arg(design_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the component tree with structural mass and CG")
                .arg(design_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_name("SHELL")
                        .help("Shell to generate completions for"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("apogee.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
