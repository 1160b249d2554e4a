// tests/rocksim_export.rs
//! Integration tests for end-to-end RockSim export
//!
//! These tests run complete designs through assembly and serialization:
//! - SI design values arriving as millimeters and grams in the output
//! - Serial number allocation in parent-before-children order
//! - Cluster, pod and parallel-stage expansion into per-instance parts
//! - Tube coupler contents flattening into the parent tube
//! - The fixed three-slot stage layout and simulation scenario values

use apogee::design::{
    BodyTube, ComponentKind, InnerTube, MassComponent, NoseCone, Parachute, RailButton, Ring,
    Rocket, RocketComponent, ShockCord, Stage, TransitionShape, TrapezoidFinSet,
};
use apogee::masscalc::StructuralMassCalculator;
use apogee::rocksim::{ExportError, PartKind, RingUsage, RockSimDocument, RockSimExporter};
use apogee::DesignDocument;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn assemble(rocket: &Rocket) -> RockSimDocument {
    let calc = StructuralMassCalculator;
    RockSimExporter::new(&calc).assemble(rocket).unwrap()
}

fn export_to_string(rocket: &Rocket) -> String {
    let calc = StructuralMassCalculator;
    let mut buffer = Vec::new();
    RockSimExporter::new(&calc)
        .export(rocket, &mut buffer)
        .unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Body tube with a 25 mm outer and 23 mm inner diameter
fn make_body_tube(name: &str, length: f64) -> RocketComponent {
    RocketComponent::new(
        name,
        ComponentKind::BodyTube(BodyTube {
            length,
            outer_radius: 0.0125,
            inner_radius: 0.0115,
            motor_mount: false,
            motor_diameter: 0.0,
            motor_overhang: 0.0,
        }),
    )
}

/// Ogive nose cone matching the 25 mm airframe
fn make_nose_cone(name: &str) -> RocketComponent {
    RocketComponent::new(
        name,
        ComponentKind::NoseCone(NoseCone {
            length: 0.07,
            base_radius: 0.0125,
            thickness: 0.002,
            filled: false,
            shape: TransitionShape::Ogive,
            shape_parameter: 0.0,
            shoulder_radius: 0.0115,
            shoulder_length: 0.025,
            flipped: false,
        }),
    )
}

/// Single-stage sport model: nose, tube, fins, engine block, parachute
fn create_alpha_design() -> Rocket {
    let mut rocket = Rocket::new("Alpha III");
    let mut stage = Stage::new("Sustainer");
    stage.children.push(make_nose_cone("Nose cone"));

    let mut tube = make_body_tube("Body tube", 0.3);
    tube.children.push(RocketComponent::new(
        "Fin set",
        ComponentKind::TrapezoidFinSet(TrapezoidFinSet {
            fin_count: 3,
            root_chord: 0.05,
            tip_chord: 0.03,
            sweep: 0.02,
            height: 0.04,
            thickness: 0.003,
            cross_section: Default::default(),
            cant_angle: 0.0,
            tab_length: 0.0,
            tab_height: 0.0,
            tab_offset: 0.0,
        }),
    ));
    tube.children.push(RocketComponent::new(
        "Engine block",
        ComponentKind::EngineBlock(Ring {
            length: 0.005,
            outer_radius: 0.0115,
            inner_radius: 0.009,
        }),
    ));
    tube.children.push(RocketComponent::new(
        "Parachute",
        ComponentKind::Parachute(Parachute {
            diameter: 0.3,
            line_count: 6,
            line_length: 0.3,
            drag_coefficient: 0.8,
            packed_length: 0.04,
            packed_radius: 0.01,
        }),
    ));
    stage.children.push(tube);
    rocket.stages.push(stage);
    rocket
}

/// Sustainer on top of a booster stage
fn create_two_stage_design() -> Rocket {
    let mut rocket = Rocket::new("Two stager");
    let mut sustainer = Stage::new("Sustainer");
    sustainer.children.push(make_nose_cone("Nose cone"));
    sustainer.children.push(make_body_tube("Upper tube", 0.25));
    let mut booster = Stage::new("Booster");
    booster.children.push(make_body_tube("Booster tube", 0.15));
    rocket.stages.push(sustainer);
    rocket.stages.push(booster);
    rocket
}

// =============================================================================
// END-TO-END EXPORT TESTS
// =============================================================================

#[test]
fn test_complete_design_export_structure() {
    let output = export_to_string(&create_alpha_design());

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(output.contains("<RockSimDocument>"));
    assert!(output.contains("<FileVersion>4</FileVersion>"));
    assert!(output.contains("<DesignInformation>"));
    assert!(output.contains("<RocketDesign>"));
    assert!(output.contains("<Name>Alpha III</Name>"));
    assert!(output.contains("<StageCount>1</StageCount>"));
    assert!(output.ends_with("</RockSimDocument>"));
}

#[test]
fn test_dimensions_arrive_in_millimeters() {
    let output = export_to_string(&create_alpha_design());

    // radii become diameters, meters become millimeters
    assert!(output.contains("<OD>25</OD>"));
    assert!(output.contains("<ID>23</ID>"));
    assert!(output.contains("<Len>300</Len>"));
    assert!(output.contains("<BaseDia>25</BaseDia>"));
    assert!(output.contains("<ShoulderOD>23</ShoulderOD>"));
    assert!(output.contains("<ShoulderLen>25</ShoulderLen>"));
}

#[test]
fn test_minimal_tube_with_centering_ring() {
    let mut rocket = Rocket::new("Minimal");
    let mut stage = Stage::new("Only stage");
    let mut tube = make_body_tube("Tube", 0.3);
    tube.children.push(RocketComponent::new(
        "Ring",
        ComponentKind::CenteringRing(Ring {
            length: 0.005,
            outer_radius: 0.0115,
            inner_radius: 0.009,
        }),
    ));
    stage.children.push(tube);
    rocket.stages.push(stage);

    let document = assemble(&rocket);
    let slot = document.slot(3).unwrap();
    assert_eq!(slot.parts.len(), 1);

    let tube_node = slot.parts.get(0).unwrap();
    assert_eq!(tube_node.data.serial, 1);
    match &tube_node.kind {
        PartKind::BodyTube { od, id, .. } => {
            assert_eq!(*od, 25.0);
            assert_eq!(*id, 23.0);
        }
        other => panic!("expected a body tube, got {other:?}"),
    }

    let attached = tube_node.attached().unwrap();
    assert_eq!(attached.len(), 1);
    let ring = attached.get(0).unwrap();
    assert_eq!(ring.data.serial, 2);
    match &ring.kind {
        PartKind::Ring { usage, .. } => assert_eq!(*usage, RingUsage::CenteringRing),
        other => panic!("expected a centering ring, got {other:?}"),
    }
}

#[test]
fn test_serials_run_parent_before_children() {
    let document = assemble(&create_alpha_design());

    let slot = document.slot(3).unwrap();
    let nose = slot.parts.get(0).unwrap();
    let tube = slot.parts.get(1).unwrap();
    assert_eq!(nose.data.serial, 1);
    assert_eq!(tube.data.serial, 2);

    let attached = tube.attached().unwrap();
    let serials: Vec<i32> = attached.iter().map(|p| p.data.serial).collect();
    assert_eq!(serials, vec![3, 4, 5]);

    assert_eq!(document.last_serial, 5);
    assert_eq!(document.part_count(), 5);
}

#[test]
fn test_positions_are_parent_relative() {
    let mut rocket = create_alpha_design();
    // 250 mm from the top of the body tube
    rocket.stages[0].children[1].children[1].axial_offset = 0.25;

    let document = assemble(&rocket);
    let slot = document.slot(3).unwrap();
    let nose = slot.parts.get(0).unwrap();
    let tube = slot.parts.get(1).unwrap();

    // stage-level parts stack on their own, so both sit at zero
    assert_eq!(nose.data.xb, 0.0);
    assert_eq!(nose.data.location_mode, 0);
    assert_eq!(tube.data.xb, 0.0);
    assert_eq!(tube.data.location_mode, 0);

    let block = tube
        .attached()
        .unwrap()
        .iter()
        .find(|p| p.data.name == "Engine block")
        .unwrap();
    assert_eq!(block.data.xb, 250.0);
    assert_eq!(block.data.location_mode, 0);
}

#[test]
fn test_fin_set_carries_size_in_fin_fields() {
    let output = export_to_string(&create_alpha_design());

    assert!(output.contains("<FinSet>"));
    assert!(output.contains("<FinCount>3</FinCount>"));
    assert!(output.contains("<RootChord>50</RootChord>"));
    assert!(output.contains("<TipChord>30</TipChord>"));
    assert!(output.contains("<SemiSpan>40</SemiSpan>"));
    // fin sets always export Len 0
    assert!(output.contains("<Len>0</Len>"));
}

#[test]
fn test_overrides_export_as_known_values() {
    let mut rocket = create_alpha_design();
    let tube = &mut rocket.stages[0].children[1];
    tube.override_mass = Some(0.05);
    tube.override_cg = Some(0.12);

    let document = assemble(&rocket);
    let part = &document.slot(3).unwrap().parts.get(1).unwrap().data;
    assert_eq!(part.known_mass, 50.0);
    assert_eq!(part.known_cg, 120.0);
    assert_eq!(part.use_known_cg, 1);
}

// =============================================================================
// MULTIPLICITY EXPANSION TESTS
// =============================================================================

#[test]
fn test_clustered_motor_tubes_expand_per_instance() {
    let mut rocket = create_alpha_design();
    let mut mount = RocketComponent::new(
        "Motor tube",
        ComponentKind::InnerTube(InnerTube {
            length: 0.07,
            outer_radius: 0.009,
            inner_radius: 0.0085,
            motor_mount: true,
            motor_diameter: 0.018,
            motor_overhang: 0.003,
        }),
    );
    mount.instance_count = 3;
    mount.radial_offset = 0.012;
    rocket.stages[0].children[1].children.push(mount);

    let document = assemble(&rocket);
    let tube = document.slot(3).unwrap().parts.get(1).unwrap();
    let attached = tube.attached().unwrap();

    let mounts: Vec<_> = attached
        .iter()
        .filter(|p| p.data.name.starts_with("Motor tube"))
        .collect();
    assert_eq!(mounts.len(), 3);
    for (i, node) in mounts.iter().enumerate() {
        assert_eq!(node.data.name, format!("Motor tube #{}", i + 1));
        assert_eq!(node.data.radial_loc, 12.0);
        let expected_angle = i as f64 * 2.0 * std::f64::consts::PI / 3.0;
        assert!((node.data.radial_angle - expected_angle).abs() < 1e-9);
        match &node.kind {
            PartKind::BodyTube { is_inside_tube, .. } => assert_eq!(*is_inside_tube, 1),
            other => panic!("expected inner tube as BodyTube, got {other:?}"),
        }
    }
}

#[test]
fn test_zero_count_cluster_is_rejected() {
    let mut rocket = create_alpha_design();
    let mut mount = RocketComponent::new(
        "Motor tube",
        ComponentKind::InnerTube(InnerTube {
            length: 0.07,
            outer_radius: 0.009,
            inner_radius: 0.0085,
            motor_mount: true,
            motor_diameter: 0.018,
            motor_overhang: 0.0,
        }),
    );
    mount.instance_count = 0;
    rocket.stages[0].children[1].children.push(mount);

    let calc = StructuralMassCalculator;
    match RockSimExporter::new(&calc).assemble(&rocket) {
        Err(ExportError::EmptyCluster { name }) => assert_eq!(name, "Motor tube"),
        other => panic!("expected empty cluster error, got {other:?}"),
    }
}

#[test]
fn test_pods_and_parallel_stages_expand_with_flags() {
    let mut rocket = create_alpha_design();

    let mut pod = RocketComponent::new("Camera pod", ComponentKind::PodSet);
    pod.instance_count = 2;
    pod.radial_offset = 0.02;
    pod.children.push(make_body_tube("Pod tube", 0.1));
    rocket.stages[0].children[1].children.push(pod);

    let mut strap_on = RocketComponent::new("Strap-on", ComponentKind::ParallelStage);
    strap_on.radial_offset = 0.03;
    strap_on.children.push(make_body_tube("Strap-on tube", 0.2));
    rocket.stages[0].children[1].children.push(strap_on);

    let document = assemble(&rocket);
    let tube = document.slot(3).unwrap().parts.get(1).unwrap();
    let attached = tube.attached().unwrap();

    let pods: Vec<_> = attached
        .iter()
        .filter(|p| p.element_name() == "ExternalPod")
        .collect();
    assert_eq!(pods.len(), 3);

    for node in &pods {
        match &node.kind {
            PartKind::Pod {
                detachable,
                ejected,
                attached,
                ..
            } => {
                let expected = if node.data.name.starts_with("Strap-on") {
                    1
                } else {
                    0
                };
                assert_eq!(*detachable, expected);
                assert_eq!(*ejected, 0);
                assert_eq!(attached.len(), 1);
            }
            other => panic!("expected pod payload, got {other:?}"),
        }
    }

    assert_eq!(pods[0].data.name, "Camera pod #1");
    assert_eq!(pods[1].data.name, "Camera pod #2");
    assert_eq!(pods[2].data.name, "Strap-on");
}

// =============================================================================
// TUBE COUPLER FLATTENING TESTS
// =============================================================================

#[test]
fn test_coupler_contents_become_siblings_with_absolute_placement() {
    let mut rocket = create_alpha_design();
    let mut coupler = RocketComponent::new(
        "Coupler",
        ComponentKind::TubeCoupler(Ring {
            length: 0.05,
            outer_radius: 0.0115,
            inner_radius: 0.011,
        }),
    );
    coupler.axial_offset = 0.1;
    coupler.children.push(RocketComponent::new(
        "Bulkhead",
        ComponentKind::Bulkhead(Ring {
            length: 0.004,
            outer_radius: 0.011,
            inner_radius: 0.0,
        }),
    ));
    rocket.stages[0].children[1].children.push(coupler);

    let document = assemble(&rocket);
    let tube = document.slot(3).unwrap().parts.get(1).unwrap();
    let attached = tube.attached().unwrap();

    let coupler_part = attached
        .iter()
        .find(|p| p.data.name == "Coupler")
        .unwrap();
    let bulkhead = attached
        .iter()
        .find(|p| p.data.name == "Bulkhead")
        .unwrap();

    // the bulkhead sits beside the coupler, not inside it
    assert!(coupler_part.attached().is_none());
    // absolute placement keeps its physical position: 70 mm nose
    // + 100 mm into the tube
    assert_eq!(bulkhead.data.location_mode, 2);
    assert_eq!(bulkhead.data.xb, 170.0);
}

#[test]
fn test_nested_couplers_flatten_completely() {
    let mut rocket = create_alpha_design();
    let mut inner = RocketComponent::new(
        "Inner coupler",
        ComponentKind::TubeCoupler(Ring {
            length: 0.03,
            outer_radius: 0.011,
            inner_radius: 0.0105,
        }),
    );
    inner.children.push(RocketComponent::new(
        "Deep bulkhead",
        ComponentKind::Bulkhead(Ring {
            length: 0.004,
            outer_radius: 0.0105,
            inner_radius: 0.0,
        }),
    ));
    let mut outer = RocketComponent::new(
        "Outer coupler",
        ComponentKind::TubeCoupler(Ring {
            length: 0.05,
            outer_radius: 0.0115,
            inner_radius: 0.011,
        }),
    );
    outer.children.push(inner);
    rocket.stages[0].children[1].children.push(outer);

    let document = assemble(&rocket);
    let tube = document.slot(3).unwrap().parts.get(1).unwrap();
    let names: Vec<&str> = tube
        .attached()
        .unwrap()
        .iter()
        .map(|p| p.data.name.as_str())
        .collect();

    assert!(names.contains(&"Outer coupler"));
    assert!(names.contains(&"Inner coupler"));
    assert!(names.contains(&"Deep bulkhead"));
}

// =============================================================================
// STAGE LAYOUT AND SCENARIO TESTS
// =============================================================================

#[test]
fn test_single_stage_lands_in_slot_three() {
    let document = assemble(&create_alpha_design());

    assert!(!document.slot(3).unwrap().parts.is_empty());
    assert!(document.slot(2).unwrap().parts.is_empty());
    assert!(document.slot(1).unwrap().parts.is_empty());

    // empty slots still serialize, open and close
    let output = export_to_string(&create_alpha_design());
    assert!(output.contains("<Stage3Parts>"));
    assert!(output.contains("<Stage2Parts>"));
    assert!(output.contains("</Stage2Parts>"));
    assert!(output.contains("<Stage1Parts>"));
    assert!(output.contains("</Stage1Parts>"));
}

#[test]
fn test_two_stages_fill_slots_top_down() {
    let document = assemble(&create_two_stage_design());

    assert_eq!(document.stage_count, 2);
    let top = document.slot(3).unwrap();
    let booster = document.slot(2).unwrap();
    assert_eq!(top.parts.get(0).unwrap().data.name, "Nose cone");
    assert_eq!(booster.parts.get(0).unwrap().data.name, "Booster tube");
    assert!(document.slot(1).unwrap().parts.is_empty());

    // each slot runs its own stack, so the booster tube restarts at zero
    assert_eq!(booster.parts.get(0).unwrap().data.xb, 0.0);
}

#[test]
fn test_two_stage_scenario_cg_lands_in_combined_slot() {
    let document = assemble(&create_two_stage_design());

    assert!(document.stage32_cg > 0.0);
    assert_eq!(document.stage3_cg, 0.0);
    assert_eq!(document.stage321_cg, -1.0);
}

#[test]
fn test_three_stages_fill_every_slot() {
    let mut rocket = Rocket::new("Three stager");
    for (i, name) in ["Sustainer", "Booster", "Second booster"]
        .iter()
        .enumerate()
    {
        let mut stage = Stage::new(*name);
        stage
            .children
            .push(make_body_tube(&format!("Tube {}", i + 1), 0.2));
        rocket.stages.push(stage);
    }

    let document = assemble(&rocket);
    assert_eq!(document.stage_count, 3);
    let slot_names: Vec<&str> = [3, 2, 1]
        .iter()
        .map(|&n| document.slot(n).unwrap().parts.get(0).unwrap().data.name.as_str())
        .collect();
    assert_eq!(slot_names, vec!["Tube 1", "Tube 2", "Tube 3"]);

    // full-stack scenario CG, the shorter stacks stay at their defaults
    assert!(document.stage321_cg > 0.0);
    assert_eq!(document.stage32_cg, -1.0);
    assert_eq!(document.stage3_cg, 0.0);
    assert_eq!(document.last_serial, 3);
}

#[test]
fn test_stage_count_bounds() {
    let empty = Rocket::new("Empty");
    let calc = StructuralMassCalculator;
    match RockSimExporter::new(&calc).assemble(&empty) {
        Err(ExportError::StageCount { count }) => assert_eq!(count, 0),
        other => panic!("expected stage count error, got {other:?}"),
    }

    let mut tall = Rocket::new("Four stager");
    for i in 0..4 {
        let mut stage = Stage::new(format!("Stage {}", i + 1));
        stage.children.push(make_body_tube("Tube", 0.1));
        tall.stages.push(stage);
    }
    match RockSimExporter::new(&calc).assemble(&tall) {
        Err(ExportError::StageCount { count }) => assert_eq!(count, 4),
        other => panic!("expected stage count error, got {other:?}"),
    }
}

#[test]
fn test_stage_mass_override_flows_into_scenario() {
    let mut rocket = create_alpha_design();
    rocket.stages[0].override_mass = Some(0.25);

    let output = export_to_string(&rocket);
    assert!(output.contains("<Stage3Mass>250</Stage3Mass>"));
    assert!(output.contains("<UseKnownMass>1</UseKnownMass>"));
}

// =============================================================================
// RECOVERY AND DROPPED COMPONENT TESTS
// =============================================================================

#[test]
fn test_cords_and_ballast_export_as_mass_objects() {
    let mut rocket = create_alpha_design();
    let tube = &mut rocket.stages[0].children[1];
    tube.children.push(RocketComponent::new(
        "Shock cord",
        ComponentKind::ShockCord(ShockCord {
            packed_length: 0.03,
            packed_radius: 0.01,
            cord_length: 0.6,
        }),
    ));
    tube.children.push(RocketComponent::new(
        "Nose ballast",
        ComponentKind::MassComponent(MassComponent {
            length: 0.02,
            radius: 0.01,
            mass: 0.015,
        }),
    ));

    let output = export_to_string(&rocket);
    let mass_objects = output.matches("<MassObject>").count();
    assert_eq!(mass_objects, 2);
    assert!(output.contains("<TypeCode>0</TypeCode>"));
    assert!(output.contains("<Name>Shock cord</Name>"));
    assert!(output.contains("<Name>Nose ballast</Name>"));
}

#[test]
fn test_rail_buttons_are_dropped() {
    let mut rocket = create_alpha_design();
    let baseline = assemble(&rocket).part_count();

    rocket.stages[0].children[1].children.push(RocketComponent::new(
        "Rail button",
        ComponentKind::RailButton(RailButton {
            height: 0.01,
            outer_diameter: 0.009,
            inner_diameter: 0.004,
        }),
    ));

    let document = assemble(&rocket);
    assert_eq!(document.part_count(), baseline);

    let output = export_to_string(&rocket);
    assert!(!output.contains("Rail button"));
}

// =============================================================================
// DESIGN FILE ROUND-TRIP TESTS
// =============================================================================

const ALPHA_TOML: &str = r#"
[rocket]
name = "Alpha III"

[[rocket.stages]]
name = "Sustainer"

[[rocket.stages.children]]
kind = "nose_cone"
name = "Nose cone"
length = 0.07
base_radius = 0.0125
shape = "ogive"
thickness = 0.002

[[rocket.stages.children]]
kind = "body_tube"
name = "Body tube"
length = 0.3
outer_radius = 0.0125
inner_radius = 0.0115

[[rocket.stages.children.children]]
kind = "trapezoid_fin_set"
name = "Fin set"
fin_count = 3
root_chord = 0.05
tip_chord = 0.03
sweep = 0.02
height = 0.04
thickness = 0.003
"#;

#[test]
fn test_design_loaded_from_toml_exports() {
    let document = DesignDocument::parse_toml(ALPHA_TOML).unwrap();
    document.validate().unwrap();

    let output = export_to_string(&document.rocket);
    assert!(output.contains("<Name>Alpha III</Name>"));
    assert!(output.contains("<NoseCone>"));
    assert!(output.contains("<BodyTube>"));
    assert!(output.contains("<FinSet>"));
    assert!(output.contains("<FinCount>3</FinCount>"));
}

#[test]
fn test_design_file_exports_to_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let design_path = dir.path().join("alpha.toml");
    std::fs::write(&design_path, ALPHA_TOML).unwrap();

    let document = DesignDocument::from_file(&design_path).unwrap();
    let out_path = dir.path().join("alpha.rkt");
    let file = std::fs::File::create(&out_path).unwrap();
    let calc = StructuralMassCalculator;
    RockSimExporter::new(&calc)
        .export(&document.rocket, file)
        .unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("<?xml"));
    assert!(written.contains("<Name>Alpha III</Name>"));
}

#[test]
fn test_estimate_size_matches_actual_export() {
    let rocket = create_alpha_design();
    let calc = StructuralMassCalculator;
    let exporter = RockSimExporter::new(&calc);

    let estimated = exporter.estimate_size(&rocket).unwrap();
    let mut buffer = Vec::new();
    exporter.export(&rocket, &mut buffer).unwrap();
    assert_eq!(estimated, buffer.len());
}
