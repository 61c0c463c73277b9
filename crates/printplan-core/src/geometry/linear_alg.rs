//! Line and segment intersection helpers

use super::{Coord, Point2};

/// X coordinate where the infinite line through `a` and `b` crosses `y`
///
/// Returns `None` for horizontal lines, which either never cross or lie on `y`.
pub fn line_horizontal_line_intersection(a: Point2, b: Point2, y: Coord) -> Option<Coord> {
    let dy = b.y - a.y;
    if dy == 0 {
        return None;
    }
    let dx = (b.x - a.x) as f64;
    Some(a.x + ((y - a.y) as f64 * dx / dy as f64).round() as Coord)
}

/// Intersection parameters of segments `[p1, p2]` and `[p3, p4]`
///
/// Returns `(t, u)` such that the intersection is `lerp(p1, p2, t)` and
/// `lerp(p3, p4, u)`, or `None` when the segments are parallel or do not meet.
pub fn segment_segment_intersection(
    p1: Point2,
    p2: Point2,
    p3: Point2,
    p4: Point2,
) -> Option<(f64, f64)> {
    let r = p2 - p1;
    let s = p4 - p3;
    let denominator = r.cross(s) as f64;
    if denominator == 0.0 {
        return None;
    }

    let q = p3 - p1;
    let t = q.cross(s) as f64 / denominator;
    let u = q.cross(r) as f64 / denominator;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Linear interpolation between two points, rounded to the nearest unit
pub fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
    Point2::new(
        a.x + ((b.x - a.x) as f64 * t).round() as Coord,
        a.y + ((b.y - a.y) as f64 * t).round() as Coord,
    )
}

/// Angle at `b` from `ba` to `bc`, measured counter-clockwise, in `[0, 2π)`
///
/// Collinear points give 0 when `a` and `c` lie on the same side of `b` and π otherwise.
pub fn angle_left(a: Point2, b: Point2, c: Point2) -> f64 {
    let ba = a - b;
    let bc = c - b;
    let det = ba.cross(bc);
    if det == 0 {
        let same_side = if ba.x != 0 {
            (ba.x > 0) == (bc.x > 0)
        } else {
            (ba.y > 0) == (bc.y > 0)
        };
        return if same_side { 0.0 } else { std::f64::consts::PI };
    }

    let angle = -(det as f64).atan2(ba.dot(bc) as f64);
    if angle >= 0.0 {
        angle
    } else {
        std::f64::consts::TAU + angle
    }
}
