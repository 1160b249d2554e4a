// src/rocksim/units.rs

//! Unit and convention conversions for the RockSim format
//!
//! The design model is SI throughout. RockSim stores millimeters, grams
//! and diameters instead of radii, so radial dimensions pick up a factor
//! of 2000 while plain lengths pick up 1000. Densities scale per density
//! kind. Enumerated conventions (finish, shapes, placement anchors) map
//! to the format's integer codes.

use crate::design::{AxialMethod, DensityKind, FinCrossSection, Finish, TransitionShape};

/// Meters to RockSim length units (mm).
pub const LENGTH: f64 = 1000.0;
/// Radius in meters to RockSim diameter units (mm), so a doubling on top
/// of the length scale.
pub const RADIUS: f64 = 2000.0;
/// Kilograms to RockSim mass units (g).
pub const MASS: f64 = 1000.0;
/// Bulk density, kg/m^3 to g/cm^3 scale used by the format.
pub const BULK_DENSITY: f64 = 1000.0;
/// Surface density, kg/m^2 to the format's sheet scale.
pub const SURFACE_DENSITY: f64 = 100.0;
/// Line density, kg/m to the format's cord scale.
pub const LINE_DENSITY: f64 = 10.0;

pub fn length_to_target(meters: f64) -> f64 {
    meters * LENGTH
}

pub fn length_from_target(value: f64) -> f64 {
    value / LENGTH
}

/// Radii always leave as diameters.
pub fn radius_to_target(meters: f64) -> f64 {
    meters * RADIUS
}

pub fn radius_from_target(value: f64) -> f64 {
    value / RADIUS
}

pub fn mass_to_target(kilograms: f64) -> f64 {
    kilograms * MASS
}

pub fn mass_from_target(value: f64) -> f64 {
    value / MASS
}

fn density_factor(kind: DensityKind) -> f64 {
    match kind {
        DensityKind::Bulk => BULK_DENSITY,
        DensityKind::Surface => SURFACE_DENSITY,
        DensityKind::Line => LINE_DENSITY,
    }
}

pub fn density_to_target(density: f64, kind: DensityKind) -> f64 {
    density * density_factor(kind)
}

pub fn density_from_target(value: f64, kind: DensityKind) -> f64 {
    value / density_factor(kind)
}

/// RockSim density type code.
pub fn density_type_code(kind: DensityKind) -> i32 {
    match kind {
        DensityKind::Bulk => 0,
        DensityKind::Surface => 1,
        DensityKind::Line => 2,
    }
}

/// Convert an axial placement to the format's (Xb, location mode) pair.
///
/// RockSim only knows top, bottom and absolute anchoring. Bottom flips
/// the sign of the offset. A middle anchor folds into a top anchor by
/// shifting the offset to the centered position, which needs the parent
/// and component lengths.
pub fn axial_to_target(
    offset: f64,
    method: AxialMethod,
    parent_length: f64,
    own_length: f64,
) -> (f64, i32) {
    match method {
        AxialMethod::Top => (offset * LENGTH, 0),
        AxialMethod::Middle => {
            let folded = offset + (parent_length - own_length) / 2.0;
            (folded * LENGTH, 0)
        }
        AxialMethod::Bottom => (-offset * LENGTH, 1),
        AxialMethod::Absolute => (offset * LENGTH, 2),
    }
}

/// RockSim finish code. The format has no rough finish, it folds into
/// unfinished.
pub fn finish_code(finish: Finish) -> i32 {
    match finish {
        Finish::Polished => 0,
        Finish::Smooth => 1,
        Finish::Regular => 2,
        Finish::Unfinished | Finish::Rough => 3,
    }
}

/// RockSim nose and transition shape code. Code 2 is an import-only
/// alias for the ellipsoid, never written.
pub fn shape_code(shape: TransitionShape) -> i32 {
    match shape {
        TransitionShape::Conical => 0,
        TransitionShape::Ogive => 1,
        TransitionShape::Ellipsoid => 3,
        TransitionShape::Power => 4,
        TransitionShape::Parabolic => 5,
        TransitionShape::Haack => 6,
    }
}

pub fn shape_from_code(code: i32) -> Option<TransitionShape> {
    match code {
        0 => Some(TransitionShape::Conical),
        1 => Some(TransitionShape::Ogive),
        2 | 3 => Some(TransitionShape::Ellipsoid),
        4 => Some(TransitionShape::Power),
        5 => Some(TransitionShape::Parabolic),
        6 => Some(TransitionShape::Haack),
        _ => None,
    }
}

/// RockSim fin tip cross-section code.
pub fn cross_section_code(cross_section: FinCrossSection) -> i32 {
    match cross_section {
        FinCrossSection::Square => 0,
        FinCrossSection::Rounded => 1,
        FinCrossSection::Airfoil => 2,
    }
}
