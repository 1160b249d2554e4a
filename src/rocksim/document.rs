// src/rocksim/document.rs

//! Document assembly
//!
//! A RockSim file always has exactly three stage slots, numbered 3, 2
//! and 1 from the top of the rocket down. The assembler places a
//! design's real stages into the top slots, leaves the rest empty, and
//! fills the document header: the scenario CG for the full stack, the
//! per-stage overrides and the serial trailer.

use std::io::Write;
use tracing::{debug, info};

use crate::design::Rocket;
use crate::masscalc::MassCalculator;
use crate::rocksim::convert::Converter;
use crate::rocksim::parts::{AttachedParts, PartNode};
use crate::rocksim::serial::SerialAllocator;
use crate::rocksim::writer;
use crate::rocksim::{units, ExportError};

/// One of the three fixed stage slots, top of the rocket first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageSlot {
    pub parts: AttachedParts,
    /// Stage mass override in target units (g)
    pub known_mass: Option<f64>,
    /// Stage CG override in target units (mm)
    pub known_cg: Option<f64>,
}

impl StageSlot {
    /// Part nodes in this slot, containers included.
    pub fn part_count(&self) -> usize {
        self.parts.iter().map(PartNode::subtree_len).sum()
    }
}

/// An assembled document, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct RockSimDocument {
    pub name: String,
    pub stage_count: usize,
    /// Scenario CG when only the top stage flies (mm)
    pub stage3_cg: f64,
    /// Scenario CG for the two-stage stack (mm)
    pub stage32_cg: f64,
    /// Scenario CG for the full three-stage stack (mm)
    pub stage321_cg: f64,
    /// 1 when any stage override is in effect
    pub use_known_mass: i32,
    /// Slots in order 3, 2, 1
    pub slots: [StageSlot; 3],
    /// Highest serial number handed out during conversion
    pub last_serial: i32,
}

impl RockSimDocument {
    pub fn new(name: impl Into<String>, stage_count: usize) -> Self {
        RockSimDocument {
            name: name.into(),
            stage_count,
            stage3_cg: 0.0,
            stage32_cg: -1.0,
            stage321_cg: -1.0,
            use_known_mass: 0,
            slots: Default::default(),
            last_serial: 0,
        }
    }

    /// Slot for the given slot number (3, 2 or 1).
    pub fn slot(&self, number: usize) -> Option<&StageSlot> {
        match number {
            3 => Some(&self.slots[0]),
            2 => Some(&self.slots[1]),
            1 => Some(&self.slots[2]),
            _ => None,
        }
    }

    /// Part nodes over all slots.
    pub fn part_count(&self) -> usize {
        self.slots.iter().map(StageSlot::part_count).sum()
    }
}

/// Assembles and serializes RockSim documents for rocket designs.
pub struct RockSimExporter<'a> {
    calculator: &'a dyn MassCalculator,
}

impl<'a> RockSimExporter<'a> {
    pub fn new(calculator: &'a dyn MassCalculator) -> Self {
        RockSimExporter { calculator }
    }

    /// Build the document for a design.
    ///
    /// Fails when the stage count does not fit the format's three
    /// slots. The design itself is left untouched.
    pub fn assemble(&self, rocket: &Rocket) -> Result<RockSimDocument, ExportError> {
        let count = rocket.stage_count();
        if count == 0 || count > 3 {
            return Err(ExportError::StageCount { count });
        }
        debug!(rocket = %rocket.name, stages = count, "assembling document");

        let mut document = RockSimDocument::new(rocket.name.clone(), count);

        let props = self.calculator.structural_mass_and_cg(rocket);
        let cg = units::length_to_target(props.cg);
        match count {
            1 => document.stage3_cg = cg,
            2 => document.stage32_cg = cg,
            _ => document.stage321_cg = cg,
        }

        let mut serials = SerialAllocator::new();
        let mut converter = Converter::new(&mut serials);
        let mut use_known_mass = false;
        let mut stage_start = 0.0;
        for (index, stage) in rocket.stages.iter().enumerate() {
            let slot = &mut document.slots[index];
            if let Some(mass) = stage.override_mass {
                slot.known_mass = Some(units::mass_to_target(mass));
                use_known_mass = true;
            }
            if let Some(stage_cg) = stage.override_cg {
                slot.known_cg = Some(units::length_to_target(stage_cg));
            }
            converter.convert_stage(stage, stage_start, &mut slot.parts)?;
            stage_start += stage.length();
        }
        document.use_known_mass = use_known_mass as i32;
        document.last_serial = serials.last_assigned();

        info!(
            rocket = %rocket.name,
            parts = document.part_count(),
            last_serial = document.last_serial,
            "document assembled"
        );
        Ok(document)
    }

    /// Assemble and serialize a design into `sink`.
    pub fn export<W: Write>(&self, rocket: &Rocket, sink: W) -> Result<(), ExportError> {
        let document = self.assemble(rocket)?;
        writer::write_document(&document, sink)
    }

    /// Size in bytes the exported file will have.
    pub fn estimate_size(&self, rocket: &Rocket) -> Result<usize, ExportError> {
        let document = self.assemble(rocket)?;
        writer::estimate_size(&document)
    }
}
