// src/design/rocket.rs

//! Rocket and stage containers
//!
//! A rocket is an ordered list of stages, topmost first. Stage children
//! stack axially in declaration order, so a stage's length is the sum of
//! its children's lengths and a stage starts where the previous one ends.

use serde::{Deserialize, Serialize};

use crate::design::component::RocketComponent;

/// One serially staged section of the rocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    /// Stage mass override in kilograms
    #[serde(default)]
    pub override_mass: Option<f64>,
    /// Stage CG override in meters from the stage top
    #[serde(default)]
    pub override_cg: Option<f64>,
    #[serde(default)]
    pub children: Vec<RocketComponent>,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Stage {
            name: name.into(),
            override_mass: None,
            override_cg: None,
            children: Vec::new(),
        }
    }

    /// Axial length of the stage, meters.
    pub fn length(&self) -> f64 {
        self.children.iter().map(|c| c.length()).sum()
    }

    /// Number of components in the stage, containers included.
    pub fn component_count(&self) -> usize {
        self.children.iter().map(|c| c.iter().count()).sum()
    }
}

/// A complete rocket design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Rocket {
    pub fn new(name: impl Into<String>) -> Self {
        Rocket {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Total axial length over all stages, meters.
    pub fn length(&self) -> f64 {
        self.stages.iter().map(|s| s.length()).sum()
    }

    /// Number of components over all stages.
    pub fn component_count(&self) -> usize {
        self.stages.iter().map(|s| s.component_count()).sum()
    }

    /// Visit every component with its absolute axial position.
    ///
    /// Stage children are stacked in order, nested children are resolved
    /// through their placement relative to the parent. The callback also
    /// receives the nesting depth, with stage children at depth zero.
    pub fn visit_positioned<F>(&self, mut f: F)
    where
        F: FnMut(&RocketComponent, f64, usize),
    {
        let mut stage_start = 0.0;
        for stage in &self.stages {
            let mut cursor = stage_start;
            for child in &stage.children {
                visit_component(child, cursor, child.length(), 0, &mut f);
                cursor += child.length();
            }
            stage_start += stage.length();
        }
    }
}

fn visit_component<F>(
    component: &RocketComponent,
    parent_offset: f64,
    parent_length: f64,
    depth: usize,
    f: &mut F,
) where
    F: FnMut(&RocketComponent, f64, usize),
{
    let offset = component.absolute_offset(parent_offset, parent_length);
    f(component, offset, depth);
    for child in &component.children {
        visit_component(child, offset, component.length(), depth + 1, f);
    }
}
