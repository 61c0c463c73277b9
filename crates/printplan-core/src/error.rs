//! Error handling for printplan geometry
//!
//! Geometry is mostly infallible: absence of a result (no intersection,
//! no overlap) is expressed with `Option`. Errors only arise when data
//! crosses the boundary from floating point or external libraries.

use thiserror::Error;

/// Geometry error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate could not be represented in fixed point
    #[error("Non-finite coordinate: {value}")]
    NonFiniteCoordinate {
        /// The offending value.
        value: f64,
    },

    /// A polygon does not have enough vertices to enclose an area
    #[error("Degenerate polygon with {points} point(s)")]
    DegeneratePolygon {
        /// Number of points the polygon had.
        points: usize,
    },
}

/// Result type alias for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
