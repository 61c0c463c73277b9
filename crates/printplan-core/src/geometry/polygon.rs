//! Open polylines and closed polygons

use serde::{Deserialize, Serialize};

use super::{Aabb, Point2, PointMatrix};

/// An open chain of points
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point2>,
}

impl Polyline {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: Point2) {
        self.points.push(point);
    }

    /// Consecutive point pairs, without a closing segment
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).vsize()).sum()
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.points.iter().copied())
    }
}

/// A closed ring of points; the last point connects back to the first
///
/// Counter-clockwise rings have positive area and describe outlines,
/// clockwise rings describe holes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point2>,
}

impl Polygon {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle from two opposite corners, counter-clockwise
    pub fn rectangle(min: Point2, max: Point2) -> Self {
        Self::new(vec![
            min,
            Point2::new(max.x, min.y),
            max,
            Point2::new(min.x, max.y),
        ])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: Point2) {
        self.points.push(point);
    }

    /// Append a point unless it duplicates the last one
    pub fn push_if_forming_segment(&mut self, point: Point2) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    /// All edges including the closing one
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let count = self.points.len();
        let closing = if count > 2 { count } else { count.saturating_sub(1) };
        (0..closing).map(move |i| (self.points[i], self.points[(i + 1) % count]))
    }

    /// Signed area, positive for counter-clockwise rings
    pub fn area(&self) -> f64 {
        let twice: i128 = self
            .segments()
            .map(|(a, b)| a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128)
            .sum();
        twice as f64 / 2.0
    }

    pub fn is_ccw(&self) -> bool {
        self.area() > 0.0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.points.iter().copied())
    }

    pub fn apply_matrix(&mut self, matrix: &PointMatrix) {
        for point in &mut self.points {
            *point = matrix.apply(*point);
        }
    }
}

impl From<Vec<Point2>> for Polygon {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_area_and_orientation() {
        let mut square = Polygon::rectangle(Point2::new(0, 0), Point2::new(100, 100));
        assert_eq!(square.area(), 10_000.0);
        assert!(square.is_ccw());

        square.reverse();
        assert_eq!(square.area(), -10_000.0);
        assert!(!square.is_ccw());
    }

    #[test]
    fn test_polygon_segments_close_the_ring() {
        let triangle = Polygon::new(vec![
            Point2::new(0, 0),
            Point2::new(10, 0),
            Point2::new(0, 10),
        ]);
        let segments: Vec<_> = triangle.segments().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], (Point2::new(0, 10), Point2::new(0, 0)));
    }

    #[test]
    fn test_polyline_segments_stay_open() {
        let line = Polyline::new(vec![Point2::new(0, 0), Point2::new(3, 4), Point2::new(3, 10)]);
        assert_eq!(line.segments().count(), 2);
        assert_eq!(line.length(), 11.0);
    }

    #[test]
    fn test_push_if_forming_segment_skips_duplicates() {
        let mut polygon = Polygon::default();
        polygon.push_if_forming_segment(Point2::new(1, 1));
        polygon.push_if_forming_segment(Point2::new(1, 1));
        polygon.push_if_forming_segment(Point2::new(2, 1));
        assert_eq!(polygon.len(), 2);
    }
}
