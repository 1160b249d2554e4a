// src/design/mod.rs

//! Source-side rocket design model
//!
//! The types here describe a rocket the way the designer entered it:
//! a tree of components with SI dimensions, materials and placement.
//! Interchange formats consume this model, they never own it.

pub mod component;
pub mod document;
pub mod rocket;

pub use component::{
    AxialMethod, BodyTube, ComponentKind, DensityKind, EllipticalFinSet, FinCrossSection, Finish,
    FreeformFinSet, InnerTube, LaunchLug, MassComponent, Material, NoseCone, Parachute,
    RailButton, Ring, RocketComponent, ShockCord, Streamer, Transition, TransitionShape,
    TrapezoidFinSet, TubeFinSet,
};
pub use document::{DesignDocument, DocumentError, DESIGN_VERSION};
pub use rocket::{Rocket, Stage};
