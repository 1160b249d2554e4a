// src/rocksim/convert.rs

//! Component conversion walk
//!
//! Turns the source component tree into part nodes. The walk is total
//! over the component kinds: everything either maps to a part node, is
//! expanded into per-instance nodes first, or is dropped with a debug
//! note when the format has no way to express it.
//!
//! Two structural rewrites happen here. Tube coupler children are
//! hoisted to the coupler's parent with absolute placement, because the
//! format does not let a coupler contain parts. Multi-instance
//! components (motor clusters, pods, parallel stages) are split into
//! one node per instance before conversion.

use tracing::debug;

use crate::design::component::{
    BodyTube, EllipticalFinSet, FreeformFinSet, InnerTube, LaunchLug, NoseCone, Parachute, Ring,
    Streamer, TrapezoidFinSet, Transition, TubeFinSet,
};
use crate::design::{AxialMethod, ComponentKind, RocketComponent, Stage};
use crate::rocksim::parts::{AttachedParts, PartData, PartKind, PartNode, RingUsage};
use crate::rocksim::serial::SerialAllocator;
use crate::rocksim::units;
use crate::rocksim::ExportError;

/// Placement of the parent while walking, in source units.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParentContext {
    /// Absolute axial position of the parent's top, meters
    pub offset: f64,
    /// Parent length, meters
    pub length: f64,
    /// Emit direct children with absolute placement
    pub absolute: bool,
}

/// Split a multi-instance component into single-instance copies.
///
/// Fails on a zero instance count; a single instance passes through
/// unchanged. The source tree is never modified.
pub(crate) fn expand_instances(
    component: &RocketComponent,
) -> Result<Vec<RocketComponent>, ExportError> {
    if component.instance_count == 0 {
        return Err(ExportError::EmptyCluster {
            name: component.name.clone(),
        });
    }
    let instances = component.split_into_instances();
    if instances.len() > 1 {
        debug!(
            component = %component.name,
            count = instances.len(),
            "expanded into per-instance parts"
        );
    }
    Ok(instances)
}

/// Converts components into part nodes, numbering them as it goes.
pub(crate) struct Converter<'a> {
    serials: &'a mut SerialAllocator,
}

impl<'a> Converter<'a> {
    pub fn new(serials: &'a mut SerialAllocator) -> Self {
        Converter { serials }
    }

    /// Convert every child of a stage into `sink`.
    ///
    /// Stage children stack in declaration order, so absolute positions
    /// advance by each child's length. `stage_start` is the absolute
    /// position of the stage's top.
    pub fn convert_stage(
        &mut self,
        stage: &Stage,
        stage_start: f64,
        sink: &mut AttachedParts,
    ) -> Result<(), ExportError> {
        let mut cursor = stage_start;
        for child in &stage.children {
            let ctx = ParentContext {
                offset: cursor,
                length: child.length(),
                absolute: false,
            };
            self.convert_component(child, ctx, sink)?;
            cursor += child.length();
        }
        Ok(())
    }

    fn convert_component(
        &mut self,
        component: &RocketComponent,
        ctx: ParentContext,
        sink: &mut AttachedParts,
    ) -> Result<(), ExportError> {
        match &component.kind {
            ComponentKind::BodyTube(tube) => {
                let node = self.body_tube_node(component, tube, ctx)?;
                sink.add(node);
            }
            ComponentKind::InnerTube(tube) => {
                for instance in expand_instances(component)? {
                    let node = self.inner_tube_node(&instance, tube, ctx)?;
                    sink.add(node);
                }
            }
            ComponentKind::NoseCone(nose) if nose.flipped => {
                let node = self.tail_cone_node(component, nose, ctx)?;
                sink.add(node);
            }
            ComponentKind::NoseCone(nose) => {
                let node = self.nose_cone_node(component, nose, ctx)?;
                sink.add(node);
            }
            ComponentKind::Transition(transition) => {
                let node = self.transition_node(component, transition, ctx)?;
                sink.add(node);
            }
            ComponentKind::CenteringRing(ring) => {
                let node = self.ring_node(component, ring, RingUsage::CenteringRing, ctx);
                sink.add(node);
            }
            ComponentKind::Bulkhead(ring) => {
                let node = self.ring_node(component, ring, RingUsage::Bulkhead, ctx);
                sink.add(node);
            }
            ComponentKind::EngineBlock(ring) => {
                let node = self.ring_node(component, ring, RingUsage::EngineBlock, ctx);
                sink.add(node);
            }
            ComponentKind::TubeCoupler(ring) => {
                let node = self.ring_node(component, ring, RingUsage::TubeCoupler, ctx);
                sink.add(node);
                // The format cannot nest parts inside a coupler. Children
                // move up to the coupler's parent, keeping their physical
                // position through absolute placement.
                let offset = component.absolute_offset(ctx.offset, ctx.length);
                let child_ctx = ParentContext {
                    offset,
                    length: ring.length,
                    absolute: true,
                };
                for child in &component.children {
                    self.convert_component(child, child_ctx, sink)?;
                }
            }
            ComponentKind::TrapezoidFinSet(fins) => {
                let node = self.trapezoid_fin_node(component, fins, ctx);
                sink.add(node);
            }
            ComponentKind::EllipticalFinSet(fins) => {
                let node = self.elliptical_fin_node(component, fins, ctx);
                sink.add(node);
            }
            ComponentKind::FreeformFinSet(fins) => {
                let node = self.custom_fin_node(component, fins, ctx);
                sink.add(node);
            }
            ComponentKind::TubeFinSet(fins) => {
                let node = self.tube_fin_node(component, fins, ctx);
                sink.add(node);
            }
            ComponentKind::LaunchLug(lug) => {
                let node = self.launch_lug_node(component, lug, ctx);
                sink.add(node);
            }
            ComponentKind::RailButton(_) => {
                debug!(component = %component.name, "no target representation, skipped");
            }
            ComponentKind::Parachute(chute) => {
                let node = self.parachute_node(component, chute, ctx);
                sink.add(node);
            }
            ComponentKind::Streamer(streamer) => {
                let node = self.streamer_node(component, streamer, ctx);
                sink.add(node);
            }
            ComponentKind::ShockCord(_) | ComponentKind::MassComponent(_) => {
                let node = self.mass_object_node(component, ctx);
                sink.add(node);
            }
            ComponentKind::PodSet => {
                for instance in expand_instances(component)? {
                    let node = self.pod_node(&instance, ctx, false)?;
                    sink.add(node);
                }
            }
            ComponentKind::ParallelStage => {
                for instance in expand_instances(component)? {
                    let node = self.pod_node(&instance, ctx, true)?;
                    sink.add(node);
                }
            }
        }

        let recurses = matches!(
            component.kind,
            ComponentKind::BodyTube(_)
                | ComponentKind::InnerTube(_)
                | ComponentKind::NoseCone(_)
                | ComponentKind::Transition(_)
                | ComponentKind::TubeCoupler(_)
                | ComponentKind::PodSet
                | ComponentKind::ParallelStage
        );
        if !recurses && !component.children.is_empty() {
            debug!(
                component = %component.name,
                count = component.children.len(),
                "children have no place under this part, dropped"
            );
        }
        Ok(())
    }

    /// Fill the fields every part node shares.
    fn base_part(&mut self, component: &RocketComponent, ctx: ParentContext) -> PartData {
        let serial = self.serials.next();
        let (xb, location_mode) = if ctx.absolute {
            let offset = component.absolute_offset(ctx.offset, ctx.length);
            units::axial_to_target(offset, AxialMethod::Absolute, 0.0, 0.0)
        } else {
            units::axial_to_target(
                component.axial_offset,
                component.axial_method,
                ctx.length,
                component.length(),
            )
        };
        // fin sets carry their size in the fin fields, not in Len
        let len = match component.kind {
            ComponentKind::TrapezoidFinSet(_)
            | ComponentKind::EllipticalFinSet(_)
            | ComponentKind::FreeformFinSet(_) => 0.0,
            _ => units::length_to_target(component.length()),
        };
        PartData {
            serial,
            name: component.name.clone(),
            known_mass: units::mass_to_target(component.effective_mass()),
            calc_mass: units::mass_to_target(component.component_mass()),
            known_cg: units::length_to_target(component.override_cg.unwrap_or(0.0)),
            calc_cg: units::length_to_target(component.component_cg()),
            use_known_cg: component.is_overridden() as i32,
            density: units::density_to_target(component.material.density, component.material.kind),
            density_type: units::density_type_code(component.material.kind),
            material: component.material.name.clone(),
            len,
            finish_code: units::finish_code(component.finish),
            xb,
            location_mode,
            radial_loc: units::length_to_target(component.radial_offset),
            radial_angle: component.radial_angle,
        }
    }

    /// Convert a container's children against the container's own frame.
    fn convert_children_of(
        &mut self,
        component: &RocketComponent,
        ctx: ParentContext,
    ) -> Result<AttachedParts, ExportError> {
        let mut attached = AttachedParts::new();
        let offset = component.absolute_offset(ctx.offset, ctx.length);
        let child_ctx = ParentContext {
            offset,
            length: component.length(),
            absolute: false,
        };
        for child in &component.children {
            self.convert_component(child, child_ctx, &mut attached)?;
        }
        Ok(attached)
    }

    fn body_tube_node(
        &mut self,
        component: &RocketComponent,
        tube: &BodyTube,
        ctx: ParentContext,
    ) -> Result<PartNode, ExportError> {
        let data = self.base_part(component, ctx);
        let attached = self.convert_children_of(component, ctx)?;
        Ok(PartNode {
            data,
            kind: PartKind::BodyTube {
                od: units::radius_to_target(tube.outer_radius),
                id: units::radius_to_target(tube.inner_radius),
                is_motor_mount: tube.motor_mount as i32,
                motor_dia: units::length_to_target(tube.motor_diameter),
                engine_overhang: units::length_to_target(tube.motor_overhang),
                is_inside_tube: 0,
                attached,
            },
        })
    }

    fn inner_tube_node(
        &mut self,
        component: &RocketComponent,
        tube: &InnerTube,
        ctx: ParentContext,
    ) -> Result<PartNode, ExportError> {
        let data = self.base_part(component, ctx);
        let attached = self.convert_children_of(component, ctx)?;
        Ok(PartNode {
            data,
            kind: PartKind::BodyTube {
                od: units::radius_to_target(tube.outer_radius),
                id: units::radius_to_target(tube.inner_radius),
                is_motor_mount: tube.motor_mount as i32,
                motor_dia: units::length_to_target(tube.motor_diameter),
                engine_overhang: units::length_to_target(tube.motor_overhang),
                is_inside_tube: 1,
                attached,
            },
        })
    }

    fn nose_cone_node(
        &mut self,
        component: &RocketComponent,
        nose: &NoseCone,
        ctx: ParentContext,
    ) -> Result<PartNode, ExportError> {
        let data = self.base_part(component, ctx);
        let attached = self.convert_children_of(component, ctx)?;
        Ok(PartNode {
            data,
            kind: PartKind::NoseCone {
                shape_code: units::shape_code(nose.shape),
                shape_parameter: nose.shape_parameter,
                construction_type: nose.filled as i32,
                wall_thickness: units::length_to_target(nose.thickness),
                base_dia: units::radius_to_target(nose.base_radius),
                shoulder_od: units::radius_to_target(nose.shoulder_radius),
                shoulder_len: units::length_to_target(nose.shoulder_length),
                attached,
            },
        })
    }

    /// A flipped nose cone leaves as a tail transition with the large
    /// end forward and the shoulder on the forward side.
    fn tail_cone_node(
        &mut self,
        component: &RocketComponent,
        nose: &NoseCone,
        ctx: ParentContext,
    ) -> Result<PartNode, ExportError> {
        let data = self.base_part(component, ctx);
        let attached = self.convert_children_of(component, ctx)?;
        Ok(PartNode {
            data,
            kind: PartKind::Transition {
                shape_code: units::shape_code(nose.shape),
                shape_parameter: nose.shape_parameter,
                construction_type: nose.filled as i32,
                wall_thickness: units::length_to_target(nose.thickness),
                front_dia: units::radius_to_target(nose.base_radius),
                rear_dia: 0.0,
                front_shoulder_dia: units::radius_to_target(nose.shoulder_radius),
                front_shoulder_len: units::length_to_target(nose.shoulder_length),
                rear_shoulder_dia: 0.0,
                rear_shoulder_len: 0.0,
                attached,
            },
        })
    }

    fn transition_node(
        &mut self,
        component: &RocketComponent,
        transition: &Transition,
        ctx: ParentContext,
    ) -> Result<PartNode, ExportError> {
        let data = self.base_part(component, ctx);
        let attached = self.convert_children_of(component, ctx)?;
        Ok(PartNode {
            data,
            kind: PartKind::Transition {
                shape_code: units::shape_code(transition.shape),
                shape_parameter: transition.shape_parameter,
                construction_type: transition.filled as i32,
                wall_thickness: units::length_to_target(transition.thickness),
                front_dia: units::radius_to_target(transition.fore_radius),
                rear_dia: units::radius_to_target(transition.aft_radius),
                front_shoulder_dia: units::radius_to_target(transition.fore_shoulder_radius),
                front_shoulder_len: units::length_to_target(transition.fore_shoulder_length),
                rear_shoulder_dia: units::radius_to_target(transition.aft_shoulder_radius),
                rear_shoulder_len: units::length_to_target(transition.aft_shoulder_length),
                attached,
            },
        })
    }

    fn ring_node(
        &mut self,
        component: &RocketComponent,
        ring: &Ring,
        usage: RingUsage,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::Ring {
                usage,
                od: units::radius_to_target(ring.outer_radius),
                id: units::radius_to_target(ring.inner_radius),
            },
        }
    }

    fn trapezoid_fin_node(
        &mut self,
        component: &RocketComponent,
        fins: &TrapezoidFinSet,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::FinSet {
                shape_code: 0,
                fin_count: fins.fin_count as i32,
                root_chord: units::length_to_target(fins.root_chord),
                tip_chord: units::length_to_target(fins.tip_chord),
                semi_span: units::length_to_target(fins.height),
                sweep_distance: units::length_to_target(fins.sweep),
                thickness: units::length_to_target(fins.thickness),
                tip_shape_code: units::cross_section_code(fins.cross_section),
                tab_length: units::length_to_target(fins.tab_length),
                tab_depth: units::length_to_target(fins.tab_height),
                tab_offset: units::length_to_target(fins.tab_offset),
                cant_angle: fins.cant_angle.to_degrees(),
            },
        }
    }

    fn elliptical_fin_node(
        &mut self,
        component: &RocketComponent,
        fins: &EllipticalFinSet,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::FinSet {
                shape_code: 1,
                fin_count: fins.fin_count as i32,
                root_chord: units::length_to_target(fins.root_chord),
                tip_chord: 0.0,
                semi_span: units::length_to_target(fins.height),
                sweep_distance: 0.0,
                thickness: units::length_to_target(fins.thickness),
                tip_shape_code: units::cross_section_code(fins.cross_section),
                tab_length: 0.0,
                tab_depth: 0.0,
                tab_offset: 0.0,
                cant_angle: fins.cant_angle.to_degrees(),
            },
        }
    }

    fn custom_fin_node(
        &mut self,
        component: &RocketComponent,
        fins: &FreeformFinSet,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        let point_list = fins
            .points
            .iter()
            .map(|(x, y)| {
                format!(
                    "{},{}",
                    units::length_to_target(*x),
                    units::length_to_target(*y)
                )
            })
            .collect::<Vec<_>>()
            .join("|");
        PartNode {
            data,
            kind: PartKind::CustomFinSet {
                fin_count: fins.fin_count as i32,
                point_list,
                thickness: units::length_to_target(fins.thickness),
                tip_shape_code: units::cross_section_code(fins.cross_section),
                cant_angle: fins.cant_angle.to_degrees(),
            },
        }
    }

    fn tube_fin_node(
        &mut self,
        component: &RocketComponent,
        fins: &TubeFinSet,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::TubeFinSet {
                tube_count: fins.fin_count as i32,
                od: units::radius_to_target(fins.outer_radius),
                id: units::radius_to_target(fins.inner_radius),
            },
        }
    }

    fn launch_lug_node(
        &mut self,
        component: &RocketComponent,
        lug: &LaunchLug,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::LaunchLug {
                od: units::radius_to_target(lug.outer_radius),
                id: units::radius_to_target(lug.inner_radius),
            },
        }
    }

    fn parachute_node(
        &mut self,
        component: &RocketComponent,
        chute: &Parachute,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::Parachute {
                dia: units::length_to_target(chute.diameter),
                shroud_line_count: chute.line_count as i32,
                shroud_line_len: units::length_to_target(chute.line_length),
                drag_coefficient: chute.drag_coefficient,
            },
        }
    }

    fn streamer_node(
        &mut self,
        component: &RocketComponent,
        streamer: &Streamer,
        ctx: ParentContext,
    ) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::Streamer {
                width: units::length_to_target(streamer.strip_width),
                drag_coefficient: streamer.drag_coefficient,
            },
        }
    }

    fn mass_object_node(&mut self, component: &RocketComponent, ctx: ParentContext) -> PartNode {
        let data = self.base_part(component, ctx);
        PartNode {
            data,
            kind: PartKind::MassObject { type_code: 0 },
        }
    }

    fn pod_node(
        &mut self,
        component: &RocketComponent,
        ctx: ParentContext,
        detachable: bool,
    ) -> Result<PartNode, ExportError> {
        let data = self.base_part(component, ctx);
        let attached = self.convert_children_of(component, ctx)?;
        Ok(PartNode {
            data,
            kind: PartKind::Pod {
                detachable: detachable as i32,
                ejected: 0,
                auto_calc_radial_distance: 0,
                auto_calc_radial_angle: 0,
                attached,
            },
        })
    }
}
