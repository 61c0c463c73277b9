//! Plan exporter interface
//!
//! The operation tree never formats machine instructions itself. Writing a
//! tree walks it in print order and calls one exporter method per emitted
//! instruction.

use printplan_core::{Coord, Point3, PrintFeatureType};
use serde::{Deserialize, Serialize};

/// Receiver of the flat instruction stream produced by [`crate::OperationPtr::write`]
pub trait PlanExporter {
    /// Emit an extruding move to `position`
    fn write_extrusion_move(
        &mut self,
        position: Point3,
        line_width_start: Coord,
        line_width_end: Coord,
        speed: f64,
        flow_ratio: f64,
    );

    /// Emit a non-extruding move to `position`
    fn write_travel_move(&mut self, position: Point3, speed: f64, feature_type: PrintFeatureType);

    /// Emit a temperature change for an extruder
    fn write_temperature_command(&mut self, extruder_nr: usize, temperature: f64, wait: bool);

    /// Called before the content of each layer plan
    fn write_layer_start(&mut self, _layer_index: i64, _z: Coord) {}
}

/// One instruction captured by a [`RecordingExporter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportedInstruction {
    ExtrusionMove {
        position: Point3,
        line_width_start: Coord,
        line_width_end: Coord,
        speed: f64,
        flow_ratio: f64,
    },
    TravelMove {
        position: Point3,
        speed: f64,
        feature_type: PrintFeatureType,
    },
    Temperature {
        extruder_nr: usize,
        temperature: f64,
        wait: bool,
    },
    LayerStart {
        layer_index: i64,
        z: Coord,
    },
}

impl ExportedInstruction {
    /// Target position of move instructions
    pub fn position(&self) -> Option<Point3> {
        match self {
            Self::ExtrusionMove { position, .. } | Self::TravelMove { position, .. } => {
                Some(*position)
            }
            Self::Temperature { .. } | Self::LayerStart { .. } => None,
        }
    }

    pub fn is_travel(&self) -> bool {
        matches!(self, Self::TravelMove { .. })
    }
}

/// Exporter that keeps every instruction in memory, in emission order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingExporter {
    instructions: Vec<ExportedInstruction>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[ExportedInstruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<ExportedInstruction> {
        self.instructions
    }

    /// Positions of every move, in order
    pub fn positions(&self) -> Vec<Point3> {
        self.instructions
            .iter()
            .filter_map(ExportedInstruction::position)
            .collect()
    }

    /// Dump the recorded stream as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.instructions)
    }
}

impl PlanExporter for RecordingExporter {
    fn write_extrusion_move(
        &mut self,
        position: Point3,
        line_width_start: Coord,
        line_width_end: Coord,
        speed: f64,
        flow_ratio: f64,
    ) {
        self.instructions.push(ExportedInstruction::ExtrusionMove {
            position,
            line_width_start,
            line_width_end,
            speed,
            flow_ratio,
        });
    }

    fn write_travel_move(&mut self, position: Point3, speed: f64, feature_type: PrintFeatureType) {
        self.instructions.push(ExportedInstruction::TravelMove {
            position,
            speed,
            feature_type,
        });
    }

    fn write_temperature_command(&mut self, extruder_nr: usize, temperature: f64, wait: bool) {
        self.instructions.push(ExportedInstruction::Temperature {
            extruder_nr,
            temperature,
            wait,
        });
    }

    fn write_layer_start(&mut self, layer_index: i64, z: Coord) {
        self.instructions
            .push(ExportedInstruction::LayerStart { layer_index, z });
    }
}
