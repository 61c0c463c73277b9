//! Tolerant comparisons for derived coordinates
//!
//! Coordinates computed from rotations or intersections carry rounding noise
//! of a few units, so they must never be compared exactly.

use super::Coord;

/// Tolerance for fuzzy coordinate comparisons, in micrometres
pub const EPSILON: Coord = 5;

/// `a` and `b` are within [`EPSILON`] of each other
#[inline]
pub fn fuzzy_equal(a: Coord, b: Coord) -> bool {
    (a - b).abs() <= EPSILON
}

#[inline]
pub fn fuzzy_not_equal(a: Coord, b: Coord) -> bool {
    !fuzzy_equal(a, b)
}

/// `a >= b`, also true when `a` is slightly below `b`
#[inline]
pub fn fuzzy_is_greater_or_equal(a: Coord, b: Coord) -> bool {
    a > b - EPSILON
}

/// `a <= b`, also true when `a` is slightly above `b`
#[inline]
pub fn fuzzy_is_lesser_or_equal(a: Coord, b: Coord) -> bool {
    a < b + EPSILON
}

/// Whether a floating value is zero up to machine precision
#[inline]
pub fn is_zero(value: f64) -> bool {
    value.abs() < f64::EPSILON
}

/// Sign of a coordinate as -1, 0 or 1
#[inline]
pub fn sign(value: Coord) -> i8 {
    value.signum() as i8
}
