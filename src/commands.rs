// src/commands.rs
//! Command handlers for the apogee CLI

use anyhow::{Context, Result};
use apogee::design::DesignDocument;
use apogee::masscalc::{MassCalculator, StructuralMassCalculator};
use apogee::rocksim::{units, RockSimExporter};
use apogee::RocketComponent;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Output path used when `export` is invoked without `--output`.
pub fn default_output_path(design: &Path) -> PathBuf {
    design.with_extension("rkt")
}

/// Export a design file to RockSim 9 XML
pub fn export(design: &str, output: Option<String>, estimate: bool) -> Result<()> {
    let design_path = Path::new(design);
    let document = DesignDocument::from_file(design_path)
        .with_context(|| format!("Failed to load design: {design}"))?;

    let calculator = StructuralMassCalculator;
    let exporter = RockSimExporter::new(&calculator);

    if estimate {
        let size = exporter.estimate_size(&document.rocket)?;
        println!("{size}");
        return Ok(());
    }

    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(design_path));

    write_export(&exporter, &document, &output_path)?;

    println!(
        "Exported '{}' to {}",
        document.rocket.name,
        output_path.display()
    );
    Ok(())
}

/// Write the export through a temporary file so a failed run never
/// leaves a truncated .rkt behind.
fn write_export(
    exporter: &RockSimExporter<'_>,
    document: &DesignDocument,
    output_path: &Path,
) -> Result<()> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    {
        let mut sink = BufWriter::new(temp.as_file_mut());
        exporter.export(&document.rocket, &mut sink)?;
        sink.flush()?;
    }

    temp.persist(output_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to move export into place at {}: {}",
            output_path.display(),
            e
        )
    })?;

    info!("Wrote {}", output_path.display());
    Ok(())
}

/// Validate a design file and print a summary
pub fn validate(design: &str) -> Result<()> {
    let document = DesignDocument::from_file(Path::new(design))
        .with_context(|| format!("Failed to load design: {design}"))?;
    let rocket = &document.rocket;

    let calculator = StructuralMassCalculator;
    let props = calculator.structural_mass_and_cg(rocket);

    println!("Design:     {}", rocket.name);
    println!("Stages:     {}", rocket.stage_count());
    println!("Components: {}", rocket.component_count());
    println!("Length:     {:.1} mm", units::length_to_target(rocket.length()));
    println!("Mass:       {:.1} g", units::mass_to_target(props.mass));
    println!("CG:         {:.1} mm", units::length_to_target(props.cg));

    let exporter = RockSimExporter::new(&calculator);
    match exporter.estimate_size(rocket) {
        Ok(size) => println!("Export:     ~{size} bytes"),
        Err(e) => warn!("Design is not exportable: {e}"),
    }

    println!("Design file is valid");
    Ok(())
}

/// Print the component tree of a design
pub fn inspect(design: &str) -> Result<()> {
    let document = DesignDocument::from_file(Path::new(design))
        .with_context(|| format!("Failed to load design: {design}"))?;
    let rocket = &document.rocket;

    println!("{}", rocket.name);
    for (index, stage) in rocket.stages.iter().enumerate() {
        println!(
            "  Stage {} '{}' ({} components)",
            index + 1,
            stage.name,
            stage.component_count()
        );
        for child in &stage.children {
            print_component(child, 2);
        }
    }

    let props = StructuralMassCalculator.structural_mass_and_cg(rocket);
    println!();
    println!("Structural mass: {:.1} g", units::mass_to_target(props.mass));
    println!("CG from nose:    {:.1} mm", units::length_to_target(props.cg));
    Ok(())
}

fn print_component(component: &RocketComponent, depth: usize) {
    let indent = "  ".repeat(depth);
    let mass = units::mass_to_target(component.effective_mass());
    let marker = if component.is_overridden() { "*" } else { "" };
    println!(
        "{indent}{} [{}] {:.1} g{marker}",
        component.name, component.kind, mass
    );
    for child in &component.children {
        print_component(child, depth + 1);
    }
}

/// Generate shell completions on stdout
pub fn completions(shell: Shell) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    clap_complete::generate(shell, &mut cmd, "apogee", &mut std::io::stdout());
    Ok(())
}
