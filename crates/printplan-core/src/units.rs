//! Unit conversion utilities
//!
//! Coordinates are stored as integer micrometres. Settings are expressed in
//! millimetres and degrees, so conversions happen at the settings boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::Coord;

/// Number of coordinate units per millimetre
pub const COORDS_PER_MM: f64 = 1000.0;

/// Convert millimetres to fixed-point coordinates, rounding to the nearest unit
pub fn mm_to_coord(value_mm: f64) -> Coord {
    (value_mm * COORDS_PER_MM).round() as Coord
}

/// Convert millimetres to coordinates, rejecting NaN and infinities
pub fn try_mm_to_coord(value_mm: f64) -> GeometryResult<Coord> {
    if !value_mm.is_finite() {
        return Err(GeometryError::NonFiniteCoordinate { value: value_mm });
    }
    Ok(mm_to_coord(value_mm))
}

/// Convert fixed-point coordinates back to millimetres
pub fn coord_to_mm(value: Coord) -> f64 {
    value as f64 / COORDS_PER_MM
}

/// An angle in degrees, always normalized to `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct AngleDegrees(f64);

impl AngleDegrees {
    /// Create a normalized angle
    pub fn new(value: f64) -> Self {
        let normalized = value.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if normalized >= 360.0 {
            Self(0.0)
        } else {
            Self(normalized)
        }
    }

    /// The angle value in degrees
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// The angle value in radians
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl Default for AngleDegrees {
    fn default() -> Self {
        Self(0.0)
    }
}

impl From<f64> for AngleDegrees {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<AngleDegrees> for f64 {
    fn from(angle: AngleDegrees) -> Self {
        angle.0
    }
}

impl Add<f64> for AngleDegrees {
    type Output = AngleDegrees;

    fn add(self, rhs: f64) -> Self::Output {
        Self::new(self.0 + rhs)
    }
}

impl Sub<f64> for AngleDegrees {
    type Output = AngleDegrees;

    fn sub(self, rhs: f64) -> Self::Output {
        Self::new(self.0 - rhs)
    }
}

impl fmt::Display for AngleDegrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
