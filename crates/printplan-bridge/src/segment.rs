//! Segments in a rotated frame and their horizontal overlapping
//!
//! Bridging works in a frame where the expansion direction is horizontal.
//! A [`TransformedSegment`] is an edge expressed in that frame, and
//! [`TransformedSegment::calculate_overlapping`] tells whether another
//! segment lies beside it, within the same horizontal band, on the side the
//! segment should be expanded to.

use printplan_core::geometry::linear_alg::{
    lerp, line_horizontal_line_intersection, segment_segment_intersection,
};
use printplan_core::{
    fuzzy_equal, fuzzy_is_greater_or_equal, fuzzy_is_lesser_or_equal, sign, Coord, Point2,
    PointMatrix, EPSILON,
};

/// Which part of the base segment's band an overlapping segment covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentOverlappingType {
    /// The whole vertical range of the base segment
    Full,
    /// From somewhere inside the range up to its top
    Top,
    /// From its bottom up to somewhere inside the range
    Bottom,
    /// Strictly inside the range
    Middle,
}

/// Result of a successful overlap test
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOverlapping {
    pub overlap_type: SegmentOverlappingType,
    /// The part of the other segment that lies in the shared band, bottom to top
    pub other_overlapping_part: TransformedSegment,
}

/// A segment in the rotated frame, with its cached vertical extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformedSegment {
    start: Point2,
    end: Point2,
    min_y: Coord,
    max_y: Coord,
}

impl TransformedSegment {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            min_y: start.y.min(end.y),
            max_y: start.y.max(end.y),
        }
    }

    /// Segment between two untransformed points, rotated by `matrix`
    pub fn from_matrix(start: Point2, end: Point2, matrix: &PointMatrix) -> Self {
        Self::new(matrix.apply(start), matrix.apply(end))
    }

    pub fn start(&self) -> Point2 {
        self.start
    }

    pub fn end(&self) -> Point2 {
        self.end
    }

    pub fn min_y(&self) -> Coord {
        self.min_y
    }

    pub fn max_y(&self) -> Coord {
        self.max_y
    }

    pub fn set_start(&mut self, start: Point2) {
        self.start = start;
        self.update_min_max();
    }

    pub fn set_end(&mut self, end: Point2) {
        self.end = end;
        self.update_min_max();
    }

    fn update_min_max(&mut self) {
        self.min_y = self.start.y.min(self.end.y);
        self.max_y = self.start.y.max(self.end.y);
    }

    /// X of the segment's line at height `y`, 0 for horizontal segments
    pub fn x_at(&self, y: Coord) -> Coord {
        line_horizontal_line_intersection(self.start, self.end, y).unwrap_or(0)
    }

    /// Move the end down to `new_max_y`, along the segment's line
    pub fn crop_top(&mut self, new_max_y: Coord) {
        self.set_end(Point2::new(self.x_at(new_max_y), new_max_y));
    }

    /// Move the start up to `new_min_y`, along the segment's line
    pub fn crop_bottom(&mut self, new_min_y: Coord) {
        self.set_start(Point2::new(self.x_at(new_min_y), new_min_y));
    }

    /// How `other` overlaps this segment on the `expand_direction` side
    ///
    /// `expand_direction` is 1 to look on the right and -1 to look on the left.
    /// Segments that do not share a band, that coincide, or that stand on the
    /// other side give `None`. When the segments cross inside the band, only
    /// the part of `other` on the expansion side is returned.
    pub fn calculate_overlapping(&self, other: &TransformedSegment, expand_direction: i8) -> Option<SegmentOverlapping> {
        if fuzzy_is_greater_or_equal(other.min_y, self.max_y) || fuzzy_is_lesser_or_equal(other.max_y, self.min_y) {
            return None;
        }

        let band = OverlappingBand::new(self, other);
        if fuzzy_equal(band.this_x_min, band.other_x_min) && fuzzy_equal(band.this_x_max, band.other_x_max) {
            return None;
        }

        let mut sign_min = sign(band.other_x_min - band.this_x_min);
        let mut sign_max = sign(band.other_x_max - band.this_x_max);
        let overlap_top = band.y_max == self.max_y;
        let overlap_bottom = band.y_min == self.min_y;

        let mut line_part = band.other_part();

        if sign_min != sign_max {
            if let Some((t, _)) = segment_segment_intersection(self.start, self.end, other.start, other.end) {
                let intersection = lerp(self.start, self.end, t);
                if intersection.y >= band.y_max - EPSILON {
                    sign_max = sign_min;
                } else if intersection.y <= band.y_min + EPSILON {
                    sign_min = sign_max;
                } else {
                    let overlap_type = if sign_max == expand_direction {
                        line_part.set_start(intersection);
                        if overlap_top {
                            SegmentOverlappingType::Top
                        } else {
                            SegmentOverlappingType::Middle
                        }
                    } else {
                        line_part.set_end(intersection);
                        if overlap_bottom {
                            SegmentOverlappingType::Bottom
                        } else {
                            SegmentOverlappingType::Middle
                        }
                    };
                    return Some(SegmentOverlapping {
                        overlap_type,
                        other_overlapping_part: line_part,
                    });
                }
            }
        }

        if sign_min != expand_direction {
            return None;
        }

        Some(SegmentOverlapping {
            overlap_type: make_non_intersecting_overlapping(overlap_top, overlap_bottom),
            other_overlapping_part: line_part,
        })
    }
}

/// Classify an overlap from which edges of the base segment's band it reaches
pub fn make_non_intersecting_overlapping(overlap_top: bool, overlap_bottom: bool) -> SegmentOverlappingType {
    match (overlap_top, overlap_bottom) {
        (true, true) => SegmentOverlappingType::Full,
        (false, true) => SegmentOverlappingType::Bottom,
        (true, false) => SegmentOverlappingType::Top,
        (false, false) => SegmentOverlappingType::Middle,
    }
}

/// Horizontal band shared by two segments, with both X positions at its edges
struct OverlappingBand {
    y_min: Coord,
    y_max: Coord,
    this_x_min: Coord,
    this_x_max: Coord,
    other_x_min: Coord,
    other_x_max: Coord,
}

impl OverlappingBand {
    fn new(this: &TransformedSegment, other: &TransformedSegment) -> Self {
        let y_min = this.min_y.max(other.min_y);
        let y_max = this.max_y.min(other.max_y);
        Self {
            y_min,
            y_max,
            this_x_min: this.x_at(y_min),
            this_x_max: this.x_at(y_max),
            other_x_min: other.x_at(y_min),
            other_x_max: other.x_at(y_max),
        }
    }

    fn other_part(&self) -> TransformedSegment {
        TransformedSegment::new(
            Point2::new(self.other_x_min, self.y_min),
            Point2::new(self.other_x_max, self.y_max),
        )
    }
}

/// The part of `segment` between heights `y_min` and `y_max`, bottom to top
pub(crate) fn band_part(segment: &TransformedSegment, y_min: Coord, y_max: Coord) -> TransformedSegment {
    TransformedSegment::new(
        Point2::new(segment.x_at(y_min), y_min),
        Point2::new(segment.x_at(y_max), y_max),
    )
}
