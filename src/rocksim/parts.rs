// src/rocksim/parts.rs

//! Target-side part nodes
//!
//! The converter produces a tree of `PartNode` values that mirrors what
//! the RockSim file will contain: every node carries the shared base
//! fields in `PartData`, already converted to target units and integer
//! codes, plus a kind-specific payload. Container kinds hold their
//! children in an `AttachedParts` list.

use tracing::debug;

/// Fields shared by every part node, in target units.
#[derive(Debug, Clone, PartialEq)]
pub struct PartData {
    /// Unique within one exported document
    pub serial: i32,
    pub name: String,
    /// Override mass if set, otherwise the computed mass (g)
    pub known_mass: f64,
    /// Computed mass, always present (g)
    pub calc_mass: f64,
    /// Override CG, zero when not overridden (mm)
    pub known_cg: f64,
    /// Computed CG (mm from part top)
    pub calc_cg: f64,
    /// 1 when either mass or CG is overridden
    pub use_known_cg: i32,
    pub density: f64,
    pub density_type: i32,
    pub material: String,
    /// Part length (mm), zero for fin sets
    pub len: f64,
    pub finish_code: i32,
    /// Axial offset (mm), sign and anchor per `location_mode`
    pub xb: f64,
    pub location_mode: i32,
    /// Distance from the rocket centerline (mm)
    pub radial_loc: f64,
    /// Angle around the centerline (rad)
    pub radial_angle: f64,
}

/// What a ring-shaped part is used for, with the format's usage code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingUsage {
    CenteringRing,
    Bulkhead,
    EngineBlock,
    Sleeve,
    TubeCoupler,
}

impl RingUsage {
    pub fn code(self) -> i32 {
        match self {
            RingUsage::CenteringRing => 0,
            RingUsage::Bulkhead => 1,
            RingUsage::EngineBlock => 2,
            RingUsage::Sleeve => 3,
            RingUsage::TubeCoupler => 4,
        }
    }
}

/// Kind-specific payload of a part node.
#[derive(Debug, Clone, PartialEq)]
pub enum PartKind {
    BodyTube {
        od: f64,
        id: f64,
        is_motor_mount: i32,
        motor_dia: f64,
        engine_overhang: f64,
        /// 1 for tubes nested inside another tube
        is_inside_tube: i32,
        attached: AttachedParts,
    },
    NoseCone {
        shape_code: i32,
        shape_parameter: f64,
        /// 1 solid, 0 shell
        construction_type: i32,
        wall_thickness: f64,
        base_dia: f64,
        shoulder_od: f64,
        shoulder_len: f64,
        attached: AttachedParts,
    },
    Transition {
        shape_code: i32,
        shape_parameter: f64,
        construction_type: i32,
        wall_thickness: f64,
        front_dia: f64,
        rear_dia: f64,
        front_shoulder_dia: f64,
        front_shoulder_len: f64,
        rear_shoulder_dia: f64,
        rear_shoulder_len: f64,
        attached: AttachedParts,
    },
    Ring {
        usage: RingUsage,
        od: f64,
        id: f64,
    },
    FinSet {
        /// 0 trapezoidal, 1 elliptical
        shape_code: i32,
        fin_count: i32,
        root_chord: f64,
        tip_chord: f64,
        semi_span: f64,
        sweep_distance: f64,
        thickness: f64,
        tip_shape_code: i32,
        tab_length: f64,
        tab_depth: f64,
        tab_offset: f64,
        cant_angle: f64,
    },
    CustomFinSet {
        fin_count: i32,
        /// Outline as `x,y|x,y|...` in target length units
        point_list: String,
        thickness: f64,
        tip_shape_code: i32,
        cant_angle: f64,
    },
    TubeFinSet {
        tube_count: i32,
        od: f64,
        id: f64,
    },
    LaunchLug {
        od: f64,
        id: f64,
    },
    Parachute {
        dia: f64,
        shroud_line_count: i32,
        shroud_line_len: f64,
        drag_coefficient: f64,
    },
    Streamer {
        width: f64,
        drag_coefficient: f64,
    },
    MassObject {
        type_code: i32,
    },
    Pod {
        detachable: i32,
        ejected: i32,
        auto_calc_radial_distance: i32,
        auto_calc_radial_angle: i32,
        attached: AttachedParts,
    },
}

/// One exported part: shared data plus kind payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PartNode {
    pub data: PartData,
    pub kind: PartKind,
}

impl PartNode {
    /// The XML element name this node serializes under.
    pub fn element_name(&self) -> &'static str {
        match &self.kind {
            PartKind::BodyTube { .. } => "BodyTube",
            PartKind::NoseCone { .. } => "NoseCone",
            PartKind::Transition { .. } => "Transition",
            PartKind::Ring { .. } => "Ring",
            PartKind::FinSet { .. } => "FinSet",
            PartKind::CustomFinSet { .. } => "CustomFinSet",
            PartKind::TubeFinSet { .. } => "TubeFinSet",
            PartKind::LaunchLug { .. } => "LaunchLug",
            PartKind::Parachute { .. } => "Parachute",
            PartKind::Streamer { .. } => "Streamer",
            PartKind::MassObject { .. } => "MassObject",
            PartKind::Pod { .. } => "ExternalPod",
        }
    }

    /// Children of this node, if the kind is a container.
    pub fn attached(&self) -> Option<&AttachedParts> {
        match &self.kind {
            PartKind::BodyTube { attached, .. }
            | PartKind::NoseCone { attached, .. }
            | PartKind::Transition { attached, .. }
            | PartKind::Pod { attached, .. } => Some(attached),
            _ => None,
        }
    }

    /// Nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .attached()
            .map(|a| a.iter().map(PartNode::subtree_len).sum())
            .unwrap_or(0)
    }
}

/// Ordered list of child part nodes.
///
/// Adding the same node twice (by serial) is ignored, so a conversion
/// path that both hoists and recurses cannot duplicate parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttachedParts {
    parts: Vec<PartNode>,
}

impl AttachedParts {
    pub fn new() -> Self {
        AttachedParts { parts: Vec::new() }
    }

    /// Append a node unless one with the same serial is already present.
    pub fn add(&mut self, node: PartNode) {
        if self.parts.iter().any(|p| p.data.serial == node.data.serial) {
            debug!(
                serial = node.data.serial,
                name = %node.data.name,
                "part already attached, ignoring"
            );
            return;
        }
        self.parts.push(node);
    }

    /// Detach the node with the given serial, returning it if present.
    pub fn remove(&mut self, serial: i32) -> Option<PartNode> {
        let index = self.parts.iter().position(|p| p.data.serial == serial)?;
        Some(self.parts.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PartNode> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PartNode> {
        self.parts.get(index)
    }
}

impl<'a> IntoIterator for &'a AttachedParts {
    type Item = &'a PartNode;
    type IntoIter = std::slice::Iter<'a, PartNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}
