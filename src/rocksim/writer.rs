// src/rocksim/writer.rs

//! XML serialization of assembled documents
//!
//! Streams the document through quick-xml with two-space indentation.
//! Every emitted value is already in target units, so this layer only
//! formats. Numbers use the shortest plain representation, which the
//! format reads back without loss.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::rocksim::document::{RockSimDocument, StageSlot};
use crate::rocksim::parts::{AttachedParts, PartData, PartKind, PartNode};
use crate::rocksim::ExportError;

/// Version marker the target program expects in the file header.
const FILE_VERSION: &str = "4";

/// Serialize a document into `sink`.
pub fn write_document<W: Write>(document: &RockSimDocument, sink: W) -> Result<(), ExportError> {
    let mut xml = Writer::new_with_indent(sink, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    start(&mut xml, "RockSimDocument")?;
    text(&mut xml, "FileVersion", FILE_VERSION)?;
    start(&mut xml, "DesignInformation")?;
    start(&mut xml, "RocketDesign")?;

    text(&mut xml, "Name", &document.name)?;
    int(&mut xml, "StageCount", document.stage_count as i32)?;
    float(&mut xml, "Stage3Mass", document.slots[0].known_mass.unwrap_or(0.0))?;
    float(&mut xml, "Stage2Mass", document.slots[1].known_mass.unwrap_or(0.0))?;
    float(&mut xml, "Stage1Mass", document.slots[2].known_mass.unwrap_or(0.0))?;
    float(&mut xml, "Stage3CG", document.stage3_cg)?;
    float(&mut xml, "Stage2CGAlone", document.slots[1].known_cg.unwrap_or(0.0))?;
    float(&mut xml, "Stage1CGAlone", document.slots[2].known_cg.unwrap_or(0.0))?;
    float(&mut xml, "Stage321CG", document.stage321_cg)?;
    float(&mut xml, "Stage32CG", document.stage32_cg)?;
    int(&mut xml, "UseKnownMass", document.use_known_mass)?;

    write_slot(&mut xml, "Stage3Parts", &document.slots[0])?;
    write_slot(&mut xml, "Stage2Parts", &document.slots[1])?;
    write_slot(&mut xml, "Stage1Parts", &document.slots[2])?;

    int(&mut xml, "LastSerialNumber", document.last_serial)?;

    end(&mut xml, "RocketDesign")?;
    end(&mut xml, "DesignInformation")?;
    end(&mut xml, "RockSimDocument")?;
    Ok(())
}

/// Number of bytes `write_document` will produce for this document.
pub fn estimate_size(document: &RockSimDocument) -> Result<usize, ExportError> {
    let mut buffer = Vec::new();
    write_document(document, &mut buffer)?;
    Ok(buffer.len())
}

fn start<W: Write>(xml: &mut Writer<W>, tag: &str) -> Result<(), ExportError> {
    xml.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn end<W: Write>(xml: &mut Writer<W>, tag: &str) -> Result<(), ExportError> {
    xml.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn text<W: Write>(xml: &mut Writer<W>, tag: &str, value: &str) -> Result<(), ExportError> {
    xml.write_event(Event::Start(BytesStart::new(tag)))?;
    xml.write_event(Event::Text(BytesText::new(value)))?;
    xml.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn float<W: Write>(xml: &mut Writer<W>, tag: &str, value: f64) -> Result<(), ExportError> {
    text(xml, tag, &value.to_string())
}

fn int<W: Write>(xml: &mut Writer<W>, tag: &str, value: i32) -> Result<(), ExportError> {
    text(xml, tag, &value.to_string())
}

/// A stage slot element is always present, even when empty.
fn write_slot<W: Write>(
    xml: &mut Writer<W>,
    tag: &str,
    slot: &StageSlot,
) -> Result<(), ExportError> {
    start(xml, tag)?;
    for part in &slot.parts {
        write_part(xml, part)?;
    }
    end(xml, tag)
}

fn write_attached<W: Write>(
    xml: &mut Writer<W>,
    attached: &AttachedParts,
) -> Result<(), ExportError> {
    if attached.is_empty() {
        return Ok(());
    }
    start(xml, "AttachedParts")?;
    for part in attached {
        write_part(xml, part)?;
    }
    end(xml, "AttachedParts")
}

fn write_base<W: Write>(xml: &mut Writer<W>, data: &PartData) -> Result<(), ExportError> {
    float(xml, "KnownMass", data.known_mass)?;
    float(xml, "Density", data.density)?;
    text(xml, "Material", &data.material)?;
    text(xml, "Name", &data.name)?;
    float(xml, "KnownCG", data.known_cg)?;
    int(xml, "UseKnownCG", data.use_known_cg)?;
    float(xml, "Xb", data.xb)?;
    float(xml, "CalcMass", data.calc_mass)?;
    float(xml, "CalcCG", data.calc_cg)?;
    int(xml, "DensityType", data.density_type)?;
    float(xml, "RadialLoc", data.radial_loc)?;
    float(xml, "RadialAngle", data.radial_angle)?;
    int(xml, "LocationMode", data.location_mode)?;
    float(xml, "Len", data.len)?;
    int(xml, "FinishCode", data.finish_code)?;
    int(xml, "SerialNumber", data.serial)?;
    Ok(())
}

fn write_part<W: Write>(xml: &mut Writer<W>, node: &PartNode) -> Result<(), ExportError> {
    let element = node.element_name();
    start(xml, element)?;
    write_base(xml, &node.data)?;

    match &node.kind {
        PartKind::BodyTube {
            od,
            id,
            is_motor_mount,
            motor_dia,
            engine_overhang,
            is_inside_tube,
            attached,
        } => {
            float(xml, "OD", *od)?;
            float(xml, "ID", *id)?;
            int(xml, "IsMotorMount", *is_motor_mount)?;
            float(xml, "MotorDia", *motor_dia)?;
            float(xml, "EngineOverhang", *engine_overhang)?;
            int(xml, "IsInsideTube", *is_inside_tube)?;
            write_attached(xml, attached)?;
        }
        PartKind::NoseCone {
            shape_code,
            shape_parameter,
            construction_type,
            wall_thickness,
            base_dia,
            shoulder_od,
            shoulder_len,
            attached,
        } => {
            int(xml, "ShapeCode", *shape_code)?;
            float(xml, "ShapeParameter", *shape_parameter)?;
            int(xml, "ConstructionType", *construction_type)?;
            float(xml, "WallThickness", *wall_thickness)?;
            float(xml, "BaseDia", *base_dia)?;
            float(xml, "ShoulderOD", *shoulder_od)?;
            float(xml, "ShoulderLen", *shoulder_len)?;
            write_attached(xml, attached)?;
        }
        PartKind::Transition {
            shape_code,
            shape_parameter,
            construction_type,
            wall_thickness,
            front_dia,
            rear_dia,
            front_shoulder_dia,
            front_shoulder_len,
            rear_shoulder_dia,
            rear_shoulder_len,
            attached,
        } => {
            int(xml, "ShapeCode", *shape_code)?;
            float(xml, "ShapeParameter", *shape_parameter)?;
            int(xml, "ConstructionType", *construction_type)?;
            float(xml, "WallThickness", *wall_thickness)?;
            float(xml, "FrontDia", *front_dia)?;
            float(xml, "RearDia", *rear_dia)?;
            float(xml, "FrontShoulderDia", *front_shoulder_dia)?;
            float(xml, "FrontShoulderLen", *front_shoulder_len)?;
            float(xml, "RearShoulderDia", *rear_shoulder_dia)?;
            float(xml, "RearShoulderLen", *rear_shoulder_len)?;
            write_attached(xml, attached)?;
        }
        PartKind::Ring { usage, od, id } => {
            float(xml, "OD", *od)?;
            float(xml, "ID", *id)?;
            int(xml, "UsageCode", usage.code())?;
        }
        PartKind::FinSet {
            shape_code,
            fin_count,
            root_chord,
            tip_chord,
            semi_span,
            sweep_distance,
            thickness,
            tip_shape_code,
            tab_length,
            tab_depth,
            tab_offset,
            cant_angle,
        } => {
            int(xml, "ShapeCode", *shape_code)?;
            int(xml, "FinCount", *fin_count)?;
            float(xml, "RootChord", *root_chord)?;
            float(xml, "TipChord", *tip_chord)?;
            float(xml, "SemiSpan", *semi_span)?;
            float(xml, "SweepDistance", *sweep_distance)?;
            float(xml, "Thickness", *thickness)?;
            int(xml, "TipShapeCode", *tip_shape_code)?;
            float(xml, "TabLength", *tab_length)?;
            float(xml, "TabDepth", *tab_depth)?;
            float(xml, "TabOffset", *tab_offset)?;
            float(xml, "CantAngle", *cant_angle)?;
        }
        PartKind::CustomFinSet {
            fin_count,
            point_list,
            thickness,
            tip_shape_code,
            cant_angle,
        } => {
            int(xml, "ShapeCode", 2)?;
            int(xml, "FinCount", *fin_count)?;
            float(xml, "Thickness", *thickness)?;
            int(xml, "TipShapeCode", *tip_shape_code)?;
            float(xml, "CantAngle", *cant_angle)?;
            text(xml, "PointList", point_list)?;
        }
        PartKind::TubeFinSet { tube_count, od, id } => {
            int(xml, "TubeCount", *tube_count)?;
            float(xml, "OD", *od)?;
            float(xml, "ID", *id)?;
        }
        PartKind::LaunchLug { od, id } => {
            float(xml, "OD", *od)?;
            float(xml, "ID", *id)?;
        }
        PartKind::Parachute {
            dia,
            shroud_line_count,
            shroud_line_len,
            drag_coefficient,
        } => {
            float(xml, "Dia", *dia)?;
            int(xml, "ShroudLineCount", *shroud_line_count)?;
            float(xml, "ShroudLineLen", *shroud_line_len)?;
            float(xml, "DragCoefficient", *drag_coefficient)?;
        }
        PartKind::Streamer {
            width,
            drag_coefficient,
        } => {
            float(xml, "Width", *width)?;
            float(xml, "DragCoefficient", *drag_coefficient)?;
        }
        PartKind::MassObject { type_code } => {
            int(xml, "TypeCode", *type_code)?;
        }
        PartKind::Pod {
            detachable,
            ejected,
            auto_calc_radial_distance,
            auto_calc_radial_angle,
            attached,
        } => {
            int(xml, "AutoCalcRadialDistance", *auto_calc_radial_distance)?;
            int(xml, "AutoCalcRadialAngle", *auto_calc_radial_angle)?;
            int(xml, "Detachable", *detachable)?;
            int(xml, "Ejected", *ejected)?;
            write_attached(xml, attached)?;
        }
    }

    end(xml, element)
}
