//! Atomic print head moves

use printplan_core::{Coord, Point3};
use serde::{Deserialize, Serialize};

/// An extruding linear move to `position`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionMove {
    pub position: Point3,
    pub line_width_start: Coord,
    pub line_width_end: Coord,
    pub flow_ratio: f64,
    /// Feedrate in mm/s
    pub speed: f64,
}

impl ExtrusionMove {
    /// A move with a constant line width and nominal flow
    pub fn new(position: Point3, line_width: Coord, speed: f64) -> Self {
        Self {
            position,
            line_width_start: line_width,
            line_width_end: line_width,
            flow_ratio: 1.0,
            speed,
        }
    }

    pub fn with_line_widths(mut self, line_width_start: Coord, line_width_end: Coord) -> Self {
        self.line_width_start = line_width_start;
        self.line_width_end = line_width_end;
        self
    }

    pub fn with_flow_ratio(mut self, flow_ratio: f64) -> Self {
        self.flow_ratio = flow_ratio;
        self
    }
}

/// A non-extruding move; speed and feature type come from the enclosing travel route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelMove {
    pub position: Point3,
}

impl TravelMove {
    pub fn new(position: Point3) -> Self {
        Self { position }
    }
}
