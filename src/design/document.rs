// src/design/document.rs

//! Design document loading and validation
//!
//! Designs are stored as TOML or JSON files with a version marker and a
//! single rocket. Parsing is strict about geometry: dimensions must be
//! non-negative, inner radii must fit inside outer radii and instance
//! counts must be at least one.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::design::component::{ComponentKind, RocketComponent};
use crate::design::rocket::Rocket;

/// The design file version this build reads and writes.
pub const DESIGN_VERSION: u32 = 1;

/// Errors from loading or validating a design document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported design file format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported design version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

fn current_version() -> u32 {
    DESIGN_VERSION
}

/// A design file: version marker plus one rocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    #[serde(default = "current_version")]
    pub version: u32,
    pub rocket: Rocket,
}

impl DesignDocument {
    pub fn new(rocket: Rocket) -> Self {
        DesignDocument {
            version: DESIGN_VERSION,
            rocket,
        }
    }

    /// Load a design from a file, dispatching on the extension.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        debug!(path = %path.display(), "loading design document");
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::parse_json(&content),
            Some("toml") | Some("apg") => Self::parse_toml(&content),
            other => Err(DocumentError::UnsupportedFormat(
                other.unwrap_or("(none)").to_string(),
            )),
        }
    }

    /// Parse a TOML design and validate it.
    pub fn parse_toml(content: &str) -> Result<Self, DocumentError> {
        let doc: DesignDocument = toml::from_str(content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse a JSON design and validate it.
    pub fn parse_json(content: &str) -> Result<Self, DocumentError> {
        let doc: DesignDocument = serde_json::from_str(content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check version, names, stage count and geometry.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.version != DESIGN_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: self.version,
                expected: DESIGN_VERSION,
            });
        }
        if self.rocket.name.trim().is_empty() {
            return Err(DocumentError::InvalidValue {
                field: "rocket.name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.rocket.stages.is_empty() {
            return Err(DocumentError::InvalidValue {
                field: "rocket.stages".to_string(),
                reason: "needs at least one stage".to_string(),
            });
        }
        for stage in &self.rocket.stages {
            if stage.name.trim().is_empty() {
                return Err(DocumentError::InvalidValue {
                    field: "stage.name".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            for child in &stage.children {
                validate_component(child)?;
            }
        }
        Ok(())
    }
}

fn invalid(component: &RocketComponent, field: &str, reason: &str) -> DocumentError {
    DocumentError::InvalidValue {
        field: format!("{}.{}", component.name, field),
        reason: reason.to_string(),
    }
}

fn check_non_negative(
    component: &RocketComponent,
    field: &str,
    value: f64,
) -> Result<(), DocumentError> {
    if value < 0.0 || !value.is_finite() {
        return Err(invalid(component, field, "must be non-negative"));
    }
    Ok(())
}

fn check_radii(
    component: &RocketComponent,
    outer: f64,
    inner: f64,
) -> Result<(), DocumentError> {
    check_non_negative(component, "outer_radius", outer)?;
    check_non_negative(component, "inner_radius", inner)?;
    if inner > outer {
        return Err(invalid(
            component,
            "inner_radius",
            "must not exceed outer_radius",
        ));
    }
    Ok(())
}

fn validate_component(component: &RocketComponent) -> Result<(), DocumentError> {
    if component.name.trim().is_empty() {
        return Err(invalid(component, "name", "must not be empty"));
    }
    if component.instance_count == 0 {
        return Err(invalid(component, "instance_count", "must be at least 1"));
    }
    check_non_negative(component, "radial_offset", component.radial_offset)?;

    match &component.kind {
        ComponentKind::BodyTube(t) => {
            check_non_negative(component, "length", t.length)?;
            check_radii(component, t.outer_radius, t.inner_radius)?;
        }
        ComponentKind::InnerTube(t) => {
            check_non_negative(component, "length", t.length)?;
            check_radii(component, t.outer_radius, t.inner_radius)?;
        }
        ComponentKind::NoseCone(n) => {
            check_non_negative(component, "length", n.length)?;
            check_non_negative(component, "base_radius", n.base_radius)?;
            check_non_negative(component, "shoulder_length", n.shoulder_length)?;
        }
        ComponentKind::Transition(t) => {
            check_non_negative(component, "length", t.length)?;
            check_non_negative(component, "fore_radius", t.fore_radius)?;
            check_non_negative(component, "aft_radius", t.aft_radius)?;
        }
        ComponentKind::CenteringRing(r)
        | ComponentKind::Bulkhead(r)
        | ComponentKind::EngineBlock(r)
        | ComponentKind::TubeCoupler(r) => {
            check_non_negative(component, "length", r.length)?;
            check_radii(component, r.outer_radius, r.inner_radius)?;
        }
        ComponentKind::TrapezoidFinSet(f) => {
            if f.fin_count == 0 {
                return Err(invalid(component, "fin_count", "must be at least 1"));
            }
            check_non_negative(component, "root_chord", f.root_chord)?;
            check_non_negative(component, "tip_chord", f.tip_chord)?;
            check_non_negative(component, "height", f.height)?;
            check_non_negative(component, "thickness", f.thickness)?;
        }
        ComponentKind::EllipticalFinSet(f) => {
            if f.fin_count == 0 {
                return Err(invalid(component, "fin_count", "must be at least 1"));
            }
            check_non_negative(component, "root_chord", f.root_chord)?;
            check_non_negative(component, "height", f.height)?;
        }
        ComponentKind::FreeformFinSet(f) => {
            if f.fin_count == 0 {
                return Err(invalid(component, "fin_count", "must be at least 1"));
            }
            if f.points.len() < 3 {
                return Err(invalid(component, "points", "needs at least 3 points"));
            }
        }
        ComponentKind::TubeFinSet(f) => {
            if f.fin_count == 0 {
                return Err(invalid(component, "fin_count", "must be at least 1"));
            }
            check_non_negative(component, "length", f.length)?;
            check_radii(component, f.outer_radius, f.inner_radius)?;
        }
        ComponentKind::LaunchLug(l) => {
            check_non_negative(component, "length", l.length)?;
            check_radii(component, l.outer_radius, l.inner_radius)?;
        }
        ComponentKind::RailButton(b) => {
            check_non_negative(component, "height", b.height)?;
            check_non_negative(component, "outer_diameter", b.outer_diameter)?;
        }
        ComponentKind::Parachute(p) => {
            check_non_negative(component, "diameter", p.diameter)?;
            check_non_negative(component, "line_length", p.line_length)?;
            check_non_negative(component, "packed_length", p.packed_length)?;
        }
        ComponentKind::Streamer(s) => {
            check_non_negative(component, "strip_length", s.strip_length)?;
            check_non_negative(component, "strip_width", s.strip_width)?;
        }
        ComponentKind::ShockCord(s) => {
            check_non_negative(component, "packed_length", s.packed_length)?;
            check_non_negative(component, "cord_length", s.cord_length)?;
        }
        ComponentKind::MassComponent(m) => {
            check_non_negative(component, "length", m.length)?;
            check_non_negative(component, "mass", m.mass)?;
        }
        ComponentKind::PodSet | ComponentKind::ParallelStage => {}
    }

    for child in &component.children {
        validate_component(child)?;
    }
    Ok(())
}
