//! # printplan Core
//!
//! Core types and utilities shared by every printplan crate.
//! Provides fixed-point geometry, fuzzy coordinate comparison,
//! unit conversions and the print feature taxonomy.

pub mod error;
pub mod feature;
pub mod geometry;
pub mod types;
pub mod units;

pub use error::{GeometryError, GeometryResult};
pub use feature::PrintFeatureType;

pub use geometry::{
    fuzzy_equal, fuzzy_is_greater_or_equal, fuzzy_is_lesser_or_equal, fuzzy_not_equal, is_zero,
    sign, Aabb, Coord, Point2, Point3, PointMatrix, Polygon, Polyline, Shape, EPSILON,
};

pub use types::{shared, Shared, WeakShared};
pub use units::{coord_to_mm, mm_to_coord, AngleDegrees};
