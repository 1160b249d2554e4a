// src/lib.rs

//! Apogee model rocket design toolkit
//!
//! Loads rocket designs, estimates their structural mass properties and
//! exports them to the RockSim 9 interchange format.
//!
//! # Architecture
//!
//! - Design model: an SI-unit component tree, owned by the designer's file
//! - Mass calculation: swappable estimates consumed by exports and reports
//! - RockSim export: a one-way conversion into the format's fixed
//!   three-slot, millimeter/gram world, serialized with quick-xml

pub mod design;
mod error;
pub mod masscalc;
pub mod rocksim;

pub use design::{
    AxialMethod, ComponentKind, DesignDocument, DocumentError, Finish, Material, Rocket,
    RocketComponent, Stage, TransitionShape,
};
pub use error::{Error, Result};
pub use masscalc::{MassCalculator, MassProperties, StructuralMassCalculator};
pub use rocksim::{ExportError, RockSimDocument, RockSimExporter};
