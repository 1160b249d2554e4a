// src/rocksim/mod.rs

//! RockSim interchange export
//!
//! Converts a design into the RockSim 9 XML layout: three fixed stage
//! slots, parts carrying millimeter/gram values and integer convention
//! codes, serial numbers threaded through the whole file. The submodules
//! split the work the way the data flows:
//!
//! - `units`: scalar and convention conversions
//! - `serial`: per-export serial numbering
//! - `parts`: the target-side node model
//! - `convert`: the component walk producing part nodes
//! - `document`: stage slot assembly and the exporter entry point
//! - `writer`: XML serialization
//!
//! Export never mutates the source design, so one design can be
//! exported from several threads at once, each run numbering its own
//! parts.

use thiserror::Error;

pub mod convert;
pub mod document;
pub mod parts;
pub mod serial;
pub mod units;
pub mod writer;

pub use document::{RockSimDocument, RockSimExporter, StageSlot};
pub use parts::{AttachedParts, PartData, PartKind, PartNode, RingUsage};
pub use serial::SerialAllocator;

/// Errors from assembling or serializing a RockSim document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A clustered component declared zero instances
    #[error("Cluster '{name}' has no instances")]
    EmptyCluster { name: String },

    /// The format has exactly three stage slots
    #[error("RockSim supports 1 to 3 stages, design has {count}")]
    StageCount { count: usize },

    /// The sink failed while writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML serialization failed
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),
}
