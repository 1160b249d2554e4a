// src/design/component.rs

//! Rocket component tree
//!
//! A design is a tree of `RocketComponent` values. Every component carries
//! the same base fields (name, placement, material, overrides) plus a
//! kind-specific geometry payload in `ComponentKind`. All dimensions are
//! SI: meters, kilograms, radians.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum_macros::{Display, EnumIter};

/// How a component's axial offset is anchored to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum AxialMethod {
    /// Offset measured from the top of the parent
    #[default]
    Top,
    /// Offset measured from the centered position within the parent
    Middle,
    /// Offset measured from the bottom of the parent
    Bottom,
    /// Offset measured from the nose tip of the whole rocket
    Absolute,
}

/// Which dimension a material density applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DensityKind {
    /// kg/m^3, for solid stock
    #[default]
    Bulk,
    /// kg/m^2, for sheet stock (fins cut from plate, chute fabric)
    Surface,
    /// kg/m, for cord and line stock
    Line,
}

/// Material applied to a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Density in the unit implied by `kind`
    pub density: f64,
    #[serde(default)]
    pub kind: DensityKind,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            name: "Cardboard".to_string(),
            density: 680.0,
            kind: DensityKind::Bulk,
        }
    }
}

/// External surface finish of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Rough,
    Unfinished,
    #[default]
    Regular,
    Smooth,
    Polished,
}

/// Profile of a nose cone or transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum TransitionShape {
    Conical,
    #[default]
    Ogive,
    Ellipsoid,
    Power,
    Parabolic,
    Haack,
}

/// Cross-section of a fin, viewed from the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum FinCrossSection {
    #[default]
    Square,
    Rounded,
    Airfoil,
}

fn one() -> u32 {
    1
}

/// A single node in the design tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketComponent {
    pub name: String,

    /// Axial offset in meters, interpreted per `axial_method`
    #[serde(default)]
    pub axial_offset: f64,
    #[serde(default)]
    pub axial_method: AxialMethod,

    /// Distance from the rocket centerline, meters
    #[serde(default)]
    pub radial_offset: f64,
    /// Angle around the rocket centerline, radians
    #[serde(default)]
    pub radial_angle: f64,

    /// Number of identical copies this component stands for
    #[serde(default = "one")]
    pub instance_count: u32,

    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub finish: Finish,

    /// Mass override in kilograms, replacing the computed mass
    #[serde(default)]
    pub override_mass: Option<f64>,
    /// CG override in meters from the component top, replacing the computed CG
    #[serde(default)]
    pub override_cg: Option<f64>,

    #[serde(flatten)]
    pub kind: ComponentKind,

    #[serde(default)]
    pub children: Vec<RocketComponent>,
}

/// Geometry payload per component kind.
///
/// The set is closed: adding a kind means teaching the RockSim conversion
/// about it as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentKind {
    BodyTube(BodyTube),
    InnerTube(InnerTube),
    NoseCone(NoseCone),
    Transition(Transition),
    CenteringRing(Ring),
    Bulkhead(Ring),
    EngineBlock(Ring),
    TubeCoupler(Ring),
    TrapezoidFinSet(TrapezoidFinSet),
    EllipticalFinSet(EllipticalFinSet),
    FreeformFinSet(FreeformFinSet),
    TubeFinSet(TubeFinSet),
    LaunchLug(LaunchLug),
    RailButton(RailButton),
    Parachute(Parachute),
    Streamer(Streamer),
    ShockCord(ShockCord),
    MassComponent(MassComponent),
    PodSet,
    ParallelStage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyTube {
    pub length: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    #[serde(default)]
    pub motor_mount: bool,
    /// Diameter of the motor this tube mounts, meters
    #[serde(default)]
    pub motor_diameter: f64,
    /// How far the motor protrudes past the tube end, meters
    #[serde(default)]
    pub motor_overhang: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerTube {
    pub length: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    #[serde(default)]
    pub motor_mount: bool,
    #[serde(default)]
    pub motor_diameter: f64,
    #[serde(default)]
    pub motor_overhang: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoseCone {
    pub length: f64,
    pub base_radius: f64,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub shape: TransitionShape,
    /// Shape parameter for power, parabolic and Haack profiles
    #[serde(default)]
    pub shape_parameter: f64,
    #[serde(default)]
    pub shoulder_radius: f64,
    #[serde(default)]
    pub shoulder_length: f64,
    /// A flipped cone points backwards and acts as a tail cone
    #[serde(default)]
    pub flipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub length: f64,
    pub fore_radius: f64,
    pub aft_radius: f64,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub shape: TransitionShape,
    #[serde(default)]
    pub shape_parameter: f64,
    #[serde(default)]
    pub fore_shoulder_radius: f64,
    #[serde(default)]
    pub fore_shoulder_length: f64,
    #[serde(default)]
    pub aft_shoulder_radius: f64,
    #[serde(default)]
    pub aft_shoulder_length: f64,
}

/// Shared geometry for centering rings, bulkheads, engine blocks and
/// tube couplers. A bulkhead is a ring with a zero inner radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub length: f64,
    pub outer_radius: f64,
    #[serde(default)]
    pub inner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidFinSet {
    pub fin_count: u32,
    pub root_chord: f64,
    pub tip_chord: f64,
    /// Distance from root leading edge to tip leading edge, meters
    #[serde(default)]
    pub sweep: f64,
    pub height: f64,
    pub thickness: f64,
    #[serde(default)]
    pub cross_section: FinCrossSection,
    #[serde(default)]
    pub cant_angle: f64,
    #[serde(default)]
    pub tab_length: f64,
    #[serde(default)]
    pub tab_height: f64,
    #[serde(default)]
    pub tab_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipticalFinSet {
    pub fin_count: u32,
    pub root_chord: f64,
    pub height: f64,
    pub thickness: f64,
    #[serde(default)]
    pub cross_section: FinCrossSection,
    #[serde(default)]
    pub cant_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeformFinSet {
    pub fin_count: u32,
    /// Fin outline as (x, y) pairs in meters, starting at the root
    /// leading edge, x running aft and y away from the body
    pub points: Vec<(f64, f64)>,
    pub thickness: f64,
    #[serde(default)]
    pub cross_section: FinCrossSection,
    #[serde(default)]
    pub cant_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeFinSet {
    pub fin_count: u32,
    pub length: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchLug {
    pub length: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailButton {
    pub height: f64,
    pub outer_diameter: f64,
    #[serde(default)]
    pub inner_diameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parachute {
    /// Deployed canopy diameter, meters
    pub diameter: f64,
    pub line_count: u32,
    pub line_length: f64,
    #[serde(default = "Parachute::default_drag_coefficient")]
    pub drag_coefficient: f64,
    /// Length of the packed chute inside the airframe
    pub packed_length: f64,
    #[serde(default)]
    pub packed_radius: f64,
}

impl Parachute {
    fn default_drag_coefficient() -> f64 {
        0.8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streamer {
    pub strip_length: f64,
    pub strip_width: f64,
    #[serde(default = "Streamer::default_drag_coefficient")]
    pub drag_coefficient: f64,
}

impl Streamer {
    fn default_drag_coefficient() -> f64 {
        0.6
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockCord {
    /// Length of the packed cord bundle inside the airframe
    pub packed_length: f64,
    #[serde(default)]
    pub packed_radius: f64,
    /// Unpacked cord length, used for the mass estimate
    pub cord_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassComponent {
    pub length: f64,
    #[serde(default)]
    pub radius: f64,
    /// Mass in kilograms
    pub mass: f64,
}

impl RocketComponent {
    /// Create a component with default placement and material.
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        RocketComponent {
            name: name.into(),
            axial_offset: 0.0,
            axial_method: AxialMethod::Top,
            radial_offset: 0.0,
            radial_angle: 0.0,
            instance_count: 1,
            material: Material::default(),
            finish: Finish::default(),
            override_mass: None,
            override_cg: None,
            kind,
            children: Vec::new(),
        }
    }

    /// Axial length the component occupies, meters.
    ///
    /// Fin sets report their root chord, assemblies report zero.
    pub fn length(&self) -> f64 {
        match &self.kind {
            ComponentKind::BodyTube(t) => t.length,
            ComponentKind::InnerTube(t) => t.length,
            ComponentKind::NoseCone(n) => n.length,
            ComponentKind::Transition(t) => t.length,
            ComponentKind::CenteringRing(r)
            | ComponentKind::Bulkhead(r)
            | ComponentKind::EngineBlock(r)
            | ComponentKind::TubeCoupler(r) => r.length,
            ComponentKind::TrapezoidFinSet(f) => f.root_chord,
            ComponentKind::EllipticalFinSet(f) => f.root_chord,
            ComponentKind::FreeformFinSet(f) => {
                f.points.iter().map(|p| p.0).fold(0.0, f64::max)
            }
            ComponentKind::TubeFinSet(f) => f.length,
            ComponentKind::LaunchLug(l) => l.length,
            ComponentKind::RailButton(b) => b.height,
            ComponentKind::Parachute(p) => p.packed_length,
            ComponentKind::Streamer(s) => s.strip_length,
            ComponentKind::ShockCord(s) => s.packed_length,
            ComponentKind::MassComponent(m) => m.length,
            ComponentKind::PodSet | ComponentKind::ParallelStage => 0.0,
        }
    }

    /// Absolute axial position of the component top, given the parent's
    /// absolute position and length.
    pub fn absolute_offset(&self, parent_offset: f64, parent_length: f64) -> f64 {
        match self.axial_method {
            AxialMethod::Top => parent_offset + self.axial_offset,
            AxialMethod::Middle => {
                parent_offset + (parent_length - self.length()) / 2.0 + self.axial_offset
            }
            AxialMethod::Bottom => {
                parent_offset + parent_length - self.length() + self.axial_offset
            }
            AxialMethod::Absolute => self.axial_offset,
        }
    }

    /// Estimated mass of a single instance, kilograms.
    ///
    /// Geometry times density for built parts, the declared mass for
    /// mass components. Assemblies weigh nothing themselves.
    pub fn component_mass(&self) -> f64 {
        let d = self.material.density;
        match &self.kind {
            ComponentKind::BodyTube(t) => tube_volume(t.length, t.outer_radius, t.inner_radius) * d,
            ComponentKind::InnerTube(t) => {
                tube_volume(t.length, t.outer_radius, t.inner_radius) * d
            }
            ComponentKind::NoseCone(n) => {
                if n.filled {
                    PI * n.base_radius * n.base_radius * n.length / 3.0 * d
                } else {
                    let slant = (n.length * n.length + n.base_radius * n.base_radius).sqrt();
                    PI * n.base_radius * slant * n.thickness * d
                }
            }
            ComponentKind::Transition(t) => {
                let (r1, r2) = (t.fore_radius, t.aft_radius);
                if t.filled {
                    PI * t.length / 3.0 * (r1 * r1 + r1 * r2 + r2 * r2) * d
                } else {
                    let dr = r1 - r2;
                    let slant = (t.length * t.length + dr * dr).sqrt();
                    PI * (r1 + r2) * slant * t.thickness * d
                }
            }
            ComponentKind::CenteringRing(r)
            | ComponentKind::Bulkhead(r)
            | ComponentKind::EngineBlock(r)
            | ComponentKind::TubeCoupler(r) => {
                tube_volume(r.length, r.outer_radius, r.inner_radius) * d
            }
            ComponentKind::TrapezoidFinSet(f) => {
                let area = (f.root_chord + f.tip_chord) / 2.0 * f.height;
                f.fin_count as f64 * area * f.thickness * d
            }
            ComponentKind::EllipticalFinSet(f) => {
                let area = PI / 4.0 * f.root_chord * f.height;
                f.fin_count as f64 * area * f.thickness * d
            }
            ComponentKind::FreeformFinSet(f) => {
                f.fin_count as f64 * polygon_area(&f.points) * f.thickness * d
            }
            ComponentKind::TubeFinSet(f) => {
                f.fin_count as f64 * tube_volume(f.length, f.outer_radius, f.inner_radius) * d
            }
            ComponentKind::LaunchLug(l) => tube_volume(l.length, l.outer_radius, l.inner_radius) * d,
            ComponentKind::RailButton(b) => {
                let (ro, ri) = (b.outer_diameter / 2.0, b.inner_diameter / 2.0);
                tube_volume(b.height, ro, ri) * d
            }
            ComponentKind::Parachute(p) => {
                let r = p.diameter / 2.0;
                PI * r * r * d
            }
            ComponentKind::Streamer(s) => s.strip_length * s.strip_width * d,
            ComponentKind::ShockCord(s) => s.cord_length * d,
            ComponentKind::MassComponent(m) => m.mass,
            ComponentKind::PodSet | ComponentKind::ParallelStage => 0.0,
        }
    }

    /// Estimated CG of a single instance, meters from the component top.
    pub fn component_cg(&self) -> f64 {
        match &self.kind {
            ComponentKind::NoseCone(n) => {
                if n.filled {
                    0.75 * n.length
                } else {
                    2.0 / 3.0 * n.length
                }
            }
            ComponentKind::TrapezoidFinSet(f) => {
                (f.sweep + f.tip_chord / 2.0 + f.root_chord / 2.0) / 2.0
            }
            _ => self.length() / 2.0,
        }
    }

    /// Effective mass of a single instance, honoring the override.
    pub fn effective_mass(&self) -> f64 {
        self.override_mass.unwrap_or_else(|| self.component_mass())
    }

    /// Effective CG of a single instance, honoring the override.
    pub fn effective_cg(&self) -> f64 {
        self.override_cg.unwrap_or_else(|| self.component_cg())
    }

    /// Whether either the mass or the CG is overridden.
    pub fn is_overridden(&self) -> bool {
        self.override_mass.is_some() || self.override_cg.is_some()
    }

    /// Split a multi-instance component into per-instance copies.
    ///
    /// A single-instance component yields one unchanged copy. With more
    /// instances the copies are arranged on a ring: each keeps the radial
    /// offset and gets an evenly spaced radial angle, and names gain a
    /// ` #N` suffix. The source component is not modified.
    pub fn split_into_instances(&self) -> Vec<RocketComponent> {
        if self.instance_count <= 1 {
            return vec![self.clone()];
        }
        let count = self.instance_count;
        let step = 2.0 * PI / count as f64;
        (0..count)
            .map(|i| {
                let mut instance = self.clone();
                instance.instance_count = 1;
                instance.radial_angle = self.radial_angle + i as f64 * step;
                instance.name = format!("{} #{}", self.name, i + 1);
                instance
            })
            .collect()
    }

    /// Iterate over the subtree rooted at this component, parents first.
    pub fn iter(&self) -> ComponentIter<'_> {
        ComponentIter { stack: vec![self] }
    }
}

fn tube_volume(length: f64, outer_radius: f64, inner_radius: f64) -> f64 {
    PI * (outer_radius * outer_radius - inner_radius * inner_radius) * length
}

fn polygon_area(points: &[(f64, f64)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % points.len()];
        sum += x1 * y2 - x2 * y1;
    }
    sum.abs() / 2.0
}

/// Depth-first component iterator, parents before children.
pub struct ComponentIter<'a> {
    stack: Vec<&'a RocketComponent>,
}

impl<'a> Iterator for ComponentIter<'a> {
    type Item = &'a RocketComponent;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        for child in next.children.iter().rev() {
            self.stack.push(child);
        }
        Some(next)
    }
}
