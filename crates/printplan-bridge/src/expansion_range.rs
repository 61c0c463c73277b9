//! Vertical ranges of an expanded segment and what supports them

use printplan_core::{fuzzy_is_greater_or_equal, fuzzy_is_lesser_or_equal, fuzzy_not_equal, Coord, Point2};

use crate::segment::{band_part, make_non_intersecting_overlapping, SegmentOverlapping, TransformedSegment};

/// The segment a range leans on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportingSegment {
    /// Index of the expanded polygon segment, for ranges not projected yet
    Expanded(usize),
    /// Index of the infill line below the range has been projected onto
    InfillLine(usize),
}

/// A part of the vertical extent of an expanded segment
#[derive(Debug, Clone, PartialEq)]
pub enum ExpansionRange {
    /// Projected onto an infill line; `segment` is that line cropped to the range
    Projected {
        segment: TransformedSegment,
        infill_line: usize,
    },
    /// Not projected: an unbounded horizontal band beside the expanded segment
    Unprojected {
        min_y: Coord,
        max_y: Coord,
        expanded_segment: usize,
    },
}

impl ExpansionRange {
    pub fn projected(segment: TransformedSegment, infill_line: usize) -> Self {
        Self::Projected { segment, infill_line }
    }

    pub fn unprojected(min_y: Coord, max_y: Coord, expanded_segment: usize) -> Self {
        Self::Unprojected {
            min_y,
            max_y,
            expanded_segment,
        }
    }

    pub fn min_y(&self) -> Coord {
        match self {
            Self::Projected { segment, .. } => segment.min_y(),
            Self::Unprojected { min_y, .. } => *min_y,
        }
    }

    pub fn max_y(&self) -> Coord {
        match self {
            Self::Projected { segment, .. } => segment.max_y(),
            Self::Unprojected { max_y, .. } => *max_y,
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, Self::Projected { .. })
    }

    pub fn projected_segment(&self) -> Option<&TransformedSegment> {
        match self {
            Self::Projected { segment, .. } => Some(segment),
            Self::Unprojected { .. } => None,
        }
    }

    pub fn supporting_segment(&self) -> SupportingSegment {
        match self {
            Self::Projected { infill_line, .. } => SupportingSegment::InfillLine(*infill_line),
            Self::Unprojected { expanded_segment, .. } => SupportingSegment::Expanded(*expanded_segment),
        }
    }

    /// How `other` overlaps this range on the `expand_direction` side
    ///
    /// A projected range compares against its supporting line. An unprojected
    /// range reaches infinitely far, so any segment sharing its band overlaps.
    pub fn calculate_overlapping(&self, other: &TransformedSegment, expand_direction: i8) -> Option<SegmentOverlapping> {
        let (min_y, max_y) = match self {
            Self::Projected { segment, .. } => return segment.calculate_overlapping(other, expand_direction),
            Self::Unprojected { min_y, max_y, .. } => (*min_y, *max_y),
        };

        if fuzzy_is_greater_or_equal(other.min_y(), max_y) || fuzzy_is_lesser_or_equal(other.max_y(), min_y) {
            return None;
        }

        let y_min = min_y.max(other.min_y());
        let y_max = max_y.min(other.max_y());
        Some(SegmentOverlapping {
            overlap_type: make_non_intersecting_overlapping(y_max == max_y, y_min == min_y),
            other_overlapping_part: band_part(other, y_min, y_max),
        })
    }

    /// Move the top of the range down to `new_max_y`
    pub fn crop_top(&mut self, new_max_y: Coord) {
        match self {
            Self::Projected { segment, .. } => segment.crop_top(new_max_y),
            Self::Unprojected { max_y, .. } => *max_y = new_max_y,
        }
    }

    /// Move the bottom of the range up to `new_min_y`
    pub fn crop_bottom(&mut self, new_min_y: Coord) {
        match self {
            Self::Projected { segment, .. } => segment.crop_bottom(new_min_y),
            Self::Unprojected { min_y, .. } => *min_y = new_min_y,
        }
    }

    /// A range of (almost) zero height is dropped
    pub fn is_valid(&self) -> bool {
        fuzzy_not_equal(self.max_y(), self.min_y())
    }

    /// Extend a projected range up to `end`; unprojected ranges are unchanged
    pub fn set_projected_end(&mut self, end: Point2) {
        if let Self::Projected { segment, .. } = self {
            segment.set_end(end);
        }
    }
}
