//! Polygon booleans and offsets used by bridge detection
//!
//! The bridging code only needs a handful of area operations, so they sit
//! behind the [`ShapeOps`] trait. [`CavalierShapeOps`] implements them with
//! `cavalier_contours`, converting micrometre shapes to millimetre polylines.

use std::panic;

use cavalier_contours::polyline::{BooleanOp, PlineSource, PlineSourceMut, PlineVertex, Polyline as Pline};
use printplan_core::{coord_to_mm, mm_to_coord, Coord, Point2, Polygon, Shape};
use tracing::warn;

/// Area operations on shapes made of counter-clockwise outlines and clockwise holes
pub trait ShapeOps: Send + Sync {
    fn union(&self, a: &Shape, b: &Shape) -> Shape;

    fn intersection(&self, a: &Shape, b: &Shape) -> Shape;

    fn difference(&self, a: &Shape, b: &Shape) -> Shape;

    /// Grow the area by `delta`, or shrink it when `delta` is negative
    fn offset(&self, shape: &Shape, delta: Coord) -> Shape;
}

/// [`ShapeOps`] backed by `cavalier_contours`
///
/// Arcs created by outward offsets are flattened to their end points.
#[derive(Debug, Clone, Copy, Default)]
pub struct CavalierShapeOps;

impl CavalierShapeOps {
    pub fn new() -> Self {
        Self
    }
}

impl ShapeOps for CavalierShapeOps {
    fn union(&self, a: &Shape, b: &Shape) -> Shape {
        let a = Region::from_shape(a);
        let b = Region::from_shape(b);

        let (a_holes, _) = subtract(a.holes, &b.outlines);
        let (b_holes, _) = subtract(b.holes, &a.outlines);
        let mut outlines = a.outlines;
        outlines.extend(b.outlines);
        let mut holes = a_holes;
        holes.extend(b_holes);

        Region { outlines, holes }.normalized().to_shape()
    }

    fn intersection(&self, a: &Shape, b: &Shape) -> Shape {
        let a = Region::from_shape(a);
        let b = Region::from_shape(b);

        let mut outlines = Vec::new();
        for outline_a in &a.outlines {
            for outline_b in &b.outlines {
                let result = outline_a.boolean(outline_b, BooleanOp::And);
                outlines.extend(result.pos_plines.into_iter().map(|part| part.pline));
            }
        }
        let mut holes = a.holes;
        holes.extend(b.holes);

        Region { outlines, holes }.normalized().to_shape()
    }

    fn difference(&self, a: &Shape, b: &Shape) -> Shape {
        let a = Region::from_shape(a);
        let b = Region::from_shape(b);

        let (mut outlines, mut holes) = subtract(a.outlines.clone(), &b.outlines);
        // Islands: holes of `b` inside `a` are kept
        for hole in &b.holes {
            for outline in &a.outlines {
                let result = hole.boolean(outline, BooleanOp::And);
                outlines.extend(result.pos_plines.into_iter().map(|part| part.pline));
            }
        }
        holes.extend(a.holes);

        Region { outlines, holes }.normalized().to_shape()
    }

    fn offset(&self, shape: &Shape, delta: Coord) -> Shape {
        if delta == 0 {
            return shape.clone();
        }
        let region = Region::from_shape(shape);
        let delta_mm = coord_to_mm(delta);

        // Stored counter-clockwise: a negative offset grows a ring, a positive one shrinks it
        let outlines = region
            .outlines
            .iter()
            .flat_map(|outline| parallel_offset(outline, -delta_mm))
            .collect();
        let holes = region
            .holes
            .iter()
            .flat_map(|hole| parallel_offset(hole, delta_mm))
            .collect();

        Region { outlines, holes }.normalized().to_shape()
    }
}

/// An area as the union of its outlines minus the union of its holes
///
/// Every ring is stored counter-clockwise, in millimetres.
struct Region {
    outlines: Vec<Pline<f64>>,
    holes: Vec<Pline<f64>>,
}

impl Region {
    fn from_shape(shape: &Shape) -> Self {
        let mut region = Self {
            outlines: Vec::new(),
            holes: Vec::new(),
        };

        for polygon in shape {
            let Some(mut pline) = to_pline(polygon) else {
                continue;
            };
            if pline.area() < 0.0 {
                pline.invert_direction_mut();
                region.holes.push(pline);
            } else {
                region.outlines.push(pline);
            }
        }
        region
    }

    /// Merge overlapping outlines and cut the holes out of them
    fn normalized(self) -> Self {
        let (outlines, mut holes) = union_all(self.outlines);
        let (cutters, _) = union_all(self.holes);
        let (outlines, cut_holes) = subtract(outlines, &cutters);
        holes.extend(cut_holes);
        Self { outlines, holes }
    }

    fn to_shape(&self) -> Shape {
        let mut shape = Shape::default();
        for outline in &self.outlines {
            shape.push(to_polygon(outline));
        }
        for hole in &self.holes {
            let mut polygon = to_polygon(hole);
            polygon.reverse();
            shape.push(polygon);
        }
        shape
    }
}

fn to_pline(polygon: &Polygon) -> Option<Pline<f64>> {
    let mut points: Vec<Point2> = Vec::with_capacity(polygon.len());
    for point in &polygon.points {
        if points.last() != Some(point) {
            points.push(*point);
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return None;
    }

    let mut pline = Pline::new();
    for point in points {
        pline.add_vertex(PlineVertex::new(coord_to_mm(point.x), coord_to_mm(point.y), 0.0));
    }
    pline.set_is_closed(true);
    Some(pline)
}

fn to_polygon(pline: &Pline<f64>) -> Polygon {
    let mut polygon = Polygon::default();
    for vertex in &pline.vertex_data {
        polygon.push_if_forming_segment(Point2::new(mm_to_coord(vertex.x), mm_to_coord(vertex.y)));
    }
    polygon
}

fn parallel_offset(pline: &Pline<f64>, offset: f64) -> Vec<Pline<f64>> {
    match panic::catch_unwind(panic::AssertUnwindSafe(|| pline.parallel_offset(offset))) {
        Ok(offsets) => offsets,
        Err(_) => {
            warn!("Panic during parallel offset of a {} vertex ring", pline.vertex_data.len());
            Vec::new()
        }
    }
}

/// Merge overlapping rings; returns the merged outlines and the holes the merges enclosed
fn union_all(plines: Vec<Pline<f64>>) -> (Vec<Pline<f64>>, Vec<Pline<f64>>) {
    let mut merged: Vec<Pline<f64>> = Vec::new();
    let mut holes = Vec::new();

    for pline in plines {
        let mut current = pline;
        loop {
            let mut absorbed = false;
            let mut kept = Vec::with_capacity(merged.len());
            for other in merged.drain(..) {
                let result = current.boolean(&other, BooleanOp::Or);
                if result.pos_plines.len() == 1 {
                    holes.extend(result.neg_plines.into_iter().map(|part| part.pline));
                    if let Some(part) = result.pos_plines.into_iter().next() {
                        current = part.pline;
                    }
                    absorbed = true;
                } else {
                    kept.push(other);
                }
            }
            merged = kept;
            if !absorbed {
                break;
            }
        }
        merged.push(current);
    }

    (merged, holes)
}

/// Cut every ring of `cutters` out of `subject`; returns the remaining outlines and new holes
fn subtract(subject: Vec<Pline<f64>>, cutters: &[Pline<f64>]) -> (Vec<Pline<f64>>, Vec<Pline<f64>>) {
    let mut pieces = subject;
    let mut holes = Vec::new();

    for cutter in cutters {
        let mut next = Vec::with_capacity(pieces.len());
        for piece in &pieces {
            let result = piece.boolean(cutter, BooleanOp::Not);
            next.extend(result.pos_plines.into_iter().map(|part| part.pline));
            holes.extend(result.neg_plines.into_iter().map(|part| part.pline));
        }
        pieces = next;
    }

    (pieces, holes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: Coord, y: Coord, size: Coord) -> Shape {
        Shape::from(Polygon::rectangle(Point2::new(x, y), Point2::new(x + size, y + size)))
    }

    fn assert_area(shape: &Shape, expected: f64) {
        let area = shape.area();
        assert!(
            (area - expected).abs() <= expected.abs() * 0.01,
            "area {} expected {}",
            area,
            expected
        );
    }

    #[test]
    fn test_intersection_of_overlapping_squares() {
        let ops = CavalierShapeOps::new();
        let result = ops.intersection(&square(0, 0, 10_000), &square(5_000, 5_000, 10_000));
        assert_area(&result, 25_000_000.0);
    }

    #[test]
    fn test_intersection_of_disjoint_squares_is_empty() {
        let ops = CavalierShapeOps::new();
        let result = ops.intersection(&square(0, 0, 10_000), &square(50_000, 0, 10_000));
        assert!(result.is_empty());
    }

    #[test]
    fn test_union_and_difference() {
        let ops = CavalierShapeOps::new();
        let a = square(0, 0, 10_000);
        let b = square(5_000, 5_000, 10_000);
        assert_area(&ops.union(&a, &b), 175_000_000.0);
        assert_area(&ops.difference(&a, &b), 75_000_000.0);
    }

    #[test]
    fn test_difference_leaves_hole() {
        let ops = CavalierShapeOps::new();
        let result = ops.difference(&square(0, 0, 30_000), &square(10_000, 10_000, 10_000));
        assert_area(&result, 800_000_000.0);
        assert!(result.iter().any(|polygon| !polygon.is_ccw()));
    }

    #[test]
    fn test_closing_keeps_a_square() {
        let ops = CavalierShapeOps::new();
        let shape = square(0, 0, 10_000);
        let closed = ops.offset(&ops.offset(&shape, 5), -5);
        assert_area(&closed, 100_000_000.0);
    }

    #[test]
    fn test_shrinking_offset() {
        let ops = CavalierShapeOps::new();
        let shrunk = ops.offset(&square(0, 0, 10_000), -1_000);
        assert_area(&shrunk, 64_000_000.0);
    }
}
