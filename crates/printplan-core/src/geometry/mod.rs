//! Fixed-point 2D/3D geometry
//!
//! All coordinates are integer micrometres so that repeated additions and
//! subtractions are exact. Floating point only appears in derived values
//! (lengths, projections, rotations), which are rounded back on output.

pub mod aabb;
pub mod fuzzy;
pub mod linear_alg;
pub mod matrix;
pub mod point;
pub mod polygon;
pub mod shape;

/// Fixed-point coordinate in micrometres
pub type Coord = i64;

pub use aabb::Aabb;
pub use fuzzy::{
    fuzzy_equal, fuzzy_is_greater_or_equal, fuzzy_is_lesser_or_equal, fuzzy_not_equal, is_zero,
    sign, EPSILON,
};
pub use matrix::PointMatrix;
pub use point::{Point2, Point3};
pub use polygon::{Polygon, Polyline};
pub use shape::Shape;
