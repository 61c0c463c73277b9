//! Axis-aligned bounding boxes

use serde::{Deserialize, Serialize};

use super::{Coord, Point2};

/// Axis-aligned bounding box; empty until a point is included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Point2::new(Coord::MAX, Coord::MAX),
            max: Point2::new(Coord::MIN, Coord::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.include(point);
        }
        aabb
    }

    pub fn include(&mut self, point: Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn include_box(&mut self, other: &Aabb) {
        if !other.is_empty() {
            self.include(other.min);
            self.include(other.max);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Whether the two boxes touch or overlap
    pub fn hit(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
