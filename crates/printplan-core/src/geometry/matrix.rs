//! 2x2 rotation matrix for integer points

use serde::{Deserialize, Serialize};

use super::{Coord, Point2};
use crate::units::AngleDegrees;

/// Rotation matrix applied to fixed-point coordinates
///
/// Results are rounded to the nearest integer, so `unapply(apply(p))` may
/// differ from `p` by one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMatrix {
    matrix: [f64; 4],
}

impl PointMatrix {
    pub fn identity() -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 1.0],
        }
    }

    /// Rotation by the given angle, counter-clockwise
    pub fn from_angle(angle: AngleDegrees) -> Self {
        let (sin, cos) = angle.radians().sin_cos();
        Self {
            matrix: [cos, -sin, sin, cos],
        }
    }

    pub fn apply(&self, p: Point2) -> Point2 {
        let x = p.x as f64;
        let y = p.y as f64;
        Point2::new(
            (x * self.matrix[0] + y * self.matrix[1]).round() as Coord,
            (x * self.matrix[2] + y * self.matrix[3]).round() as Coord,
        )
    }

    /// Apply the inverse rotation
    pub fn unapply(&self, p: Point2) -> Point2 {
        let x = p.x as f64;
        let y = p.y as f64;
        Point2::new(
            (x * self.matrix[0] + y * self.matrix[2]).round() as Coord,
            (x * self.matrix[1] + y * self.matrix[3]).round() as Coord,
        )
    }

    /// The inverse rotation; the transpose for an orthonormal matrix
    pub fn inverse(&self) -> Self {
        Self {
            matrix: [self.matrix[0], self.matrix[2], self.matrix[1], self.matrix[3]],
        }
    }
}

impl Default for PointMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
