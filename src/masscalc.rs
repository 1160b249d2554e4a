// src/masscalc.rs

//! Structural mass and balance estimates
//!
//! Exporters and reports need a mass figure for the unloaded airframe.
//! The trait keeps the calculation swappable; the default implementation
//! sums per-component estimates over the tree, honoring overrides and
//! instance counts.

use tracing::debug;

use crate::design::Rocket;

/// Mass and axial CG of some assembly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassProperties {
    /// Mass in kilograms
    pub mass: f64,
    /// CG in meters from the nose tip
    pub cg: f64,
}

/// Computes structural (motorless) mass properties for a rocket.
pub trait MassCalculator {
    /// Mass and CG of the whole airframe without motors.
    fn structural_mass_and_cg(&self, rocket: &Rocket) -> MassProperties;
}

/// Default calculator: per-component geometric estimates, summed over
/// the tree with instance counts applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralMassCalculator;

impl MassCalculator for StructuralMassCalculator {
    fn structural_mass_and_cg(&self, rocket: &Rocket) -> MassProperties {
        let mut total_mass = 0.0;
        let mut moment = 0.0;
        rocket.visit_positioned(|component, offset, _| {
            let instances = component.instance_count as f64;
            let mass = component.effective_mass() * instances;
            let cg = offset + component.effective_cg();
            total_mass += mass;
            moment += mass * cg;
        });
        let cg = if total_mass > 0.0 {
            moment / total_mass
        } else {
            0.0
        };
        debug!(mass_kg = total_mass, cg_m = cg, "structural mass computed");
        MassProperties {
            mass: total_mass,
            cg,
        }
    }
}
