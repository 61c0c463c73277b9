//! A set of segments rotated into the bridging frame

use printplan_core::{fuzzy_equal, Coord, Point2, PointMatrix, Polygon, Polyline, Shape};

use crate::segment::TransformedSegment;

/// Segments of shapes and lines, rotated by one matrix, with their overall vertical extent
///
/// An empty set has `min_y() > max_y()`.
#[derive(Debug, Clone)]
pub struct TransformedShape {
    matrix: PointMatrix,
    segments: Vec<TransformedSegment>,
    min_y: Coord,
    max_y: Coord,
}

impl TransformedShape {
    pub fn new(matrix: PointMatrix) -> Self {
        Self {
            matrix,
            segments: Vec::new(),
            min_y: Coord::MAX,
            max_y: Coord::MIN,
        }
    }

    /// Every edge of `shape`, horizontal ones included
    pub fn from_shape(shape: &Shape, matrix: PointMatrix) -> Self {
        let mut transformed = Self::new(matrix);
        transformed.add_shape(shape, false);
        transformed
    }

    /// Every edge of one polygon, horizontal ones included
    pub fn from_polygon(polygon: &Polygon, matrix: PointMatrix) -> Self {
        let mut transformed = Self::new(matrix);
        for (start, end) in polygon.segments() {
            transformed.add_segment(start, end, false);
        }
        transformed
    }

    pub fn segments(&self) -> &[TransformedSegment] {
        &self.segments
    }

    pub fn min_y(&self) -> Coord {
        self.min_y
    }

    pub fn max_y(&self) -> Coord {
        self.max_y
    }

    /// Rotate and store one segment
    ///
    /// With `filter_out_horizontal`, segments that end up (almost) horizontal
    /// in the rotated frame are dropped.
    pub fn add_segment(&mut self, start: Point2, end: Point2, filter_out_horizontal: bool) {
        let segment = TransformedSegment::from_matrix(start, end, &self.matrix);
        if filter_out_horizontal && fuzzy_equal(segment.min_y(), segment.max_y()) {
            return;
        }

        self.min_y = self.min_y.min(segment.min_y());
        self.max_y = self.max_y.max(segment.max_y());
        self.segments.push(segment);
    }

    pub fn add_shape(&mut self, shape: &Shape, filter_out_horizontal: bool) {
        for (start, end) in shape.segments() {
            self.add_segment(start, end, filter_out_horizontal);
        }
    }

    pub fn add_polyline(&mut self, polyline: &Polyline, filter_out_horizontal: bool) {
        for (start, end) in polyline.segments() {
            self.add_segment(start, end, filter_out_horizontal);
        }
    }
}
