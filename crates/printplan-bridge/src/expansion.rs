//! Expansion of bridges over infill so that every bridge line is anchored
//!
//! The area under a skin that bridges over sparse infill is widened until its
//! edges lie on the infill lines of the layer below. Work happens in a frame
//! where the expansion is horizontal: each edge of the area owns a horizontal
//! band, initially unbounded, which every infill line beside the edge may
//! narrow down to itself. What remains is, for each part of the edge, the
//! closest infill line on the expansion side.

use std::sync::Arc;

use printplan_core::{
    fuzzy_equal, sign, AngleDegrees, Point2, PointMatrix, Polygon, Polyline, PrintFeatureType, Shape,
    EPSILON,
};
use printplan_planner::{OperationPtr, SearchOrder};
use printplan_settings::MeshSettings;
use tracing::debug;

use crate::angle::bridge_over_infill_angle;
use crate::error::BridgeResult;
use crate::expansion_range::{ExpansionRange, SupportingSegment};
use crate::segment::{SegmentOverlappingType, TransformedSegment};
use crate::shape_ops::ShapeOps;
use crate::transformed_shape::TransformedShape;

/// Infill lines of `mesh` printed in `layer_plan`, in print order
///
/// Each continuous move sequence of an infill feature becomes one polyline
/// from its start position through every extrusion.
pub fn generated_infill_lines(layer_plan: &OperationPtr, mesh: &Arc<MeshSettings>) -> Vec<Polyline> {
    let is_mesh_infill = |operation: &OperationPtr| {
        operation.feature_info().is_some_and(|info| {
            info.feature_type == PrintFeatureType::Infill
                && info.mesh.as_ref().is_some_and(|own| Arc::ptr_eq(own, mesh))
        })
    };

    let mut lines = Vec::new();
    for feature in layer_plan.find_operations(&is_mesh_infill, SearchOrder::Forward, None) {
        for sequence in feature.find_operations(&OperationPtr::is_continuous_sequence, SearchOrder::Forward, None) {
            let Some(start) = sequence.find_start_position() else {
                continue;
            };
            let mut line = Polyline::new(vec![start.to_point2()]);
            for extrusion in sequence.operations_of(OperationPtr::is_extrusion_move) {
                if let Some(position) = extrusion.position() {
                    line.push(position.to_point2());
                }
            }
            if line.len() > 1 {
                lines.push(line);
            }
        }
    }
    lines
}

/// Split the band of `segment` into ranges, each supported by the closest line beside it
///
/// `segment_index` identifies `segment` within its polygon. Ranges are
/// returned bottom to top and cover the vertical extent of `segment`.
pub fn make_expanded_ranges(
    segment: &TransformedSegment,
    segment_index: usize,
    infill_lines_below: &[TransformedSegment],
    expand_direction: i8,
) -> Vec<ExpansionRange> {
    let mut ranges = vec![ExpansionRange::unprojected(segment.min_y(), segment.max_y(), segment_index)];

    for (line_index, infill_line) in infill_lines_below.iter().enumerate() {
        let Some(overlapping) = segment.calculate_overlapping(infill_line, expand_direction) else {
            continue;
        };
        let line_part = overlapping.other_overlapping_part;

        let mut new_ranges = Vec::with_capacity(ranges.len() + 2);
        let mut replacing: Option<ExpansionRange> = None;

        for range in &ranges {
            // Reverse direction: keep the lines closest to the segment
            let Some(range_overlapping) = range.calculate_overlapping(&line_part, -expand_direction) else {
                commit_replacing_range(&mut replacing, &mut new_ranges);
                new_ranges.push(range.clone());
                continue;
            };
            let covered = range_overlapping.other_overlapping_part;
            let overlap_type = range_overlapping.overlap_type;

            if !matches!(overlap_type, SegmentOverlappingType::Bottom | SegmentOverlappingType::Full) {
                commit_replacing_range(&mut replacing, &mut new_ranges);
                let mut below = range.clone();
                below.crop_top(covered.min_y());
                if below.is_valid() {
                    new_ranges.push(below);
                }
            }

            if let Some(in_progress) = replacing.as_mut() {
                in_progress.set_projected_end(covered.end());
            } else {
                replacing = Some(ExpansionRange::projected(covered, line_index));
            }

            if !matches!(overlap_type, SegmentOverlappingType::Top | SegmentOverlappingType::Full) {
                commit_replacing_range(&mut replacing, &mut new_ranges);
                let mut above = range.clone();
                above.crop_bottom(covered.max_y());
                if above.is_valid() {
                    new_ranges.push(above);
                }
            }
        }

        commit_replacing_range(&mut replacing, &mut new_ranges);
        if !new_ranges.is_empty() {
            ranges = new_ranges;
        }
    }

    ranges
}

fn commit_replacing_range(replacing: &mut Option<ExpansionRange>, ranges: &mut Vec<ExpansionRange>) {
    if let Some(range) = replacing.take() {
        if range.is_valid() {
            ranges.push(range);
        }
    }
}

/// Segments an expanded polygon is built from, and the infill lines it may lean on
pub struct ExpansionFrame<'a> {
    pub polygon_segments: &'a [TransformedSegment],
    pub infill_lines_below: &'a [TransformedSegment],
}

impl ExpansionFrame<'_> {
    fn supporting_line(&self, supporting: SupportingSegment) -> Option<&TransformedSegment> {
        match supporting {
            SupportingSegment::Expanded(index) => self.polygon_segments.get(index),
            SupportingSegment::InfillLine(index) => self.infill_lines_below.get(index),
        }
    }

    /// Append the outline of the expansion of polygon segment `segment_index`
    ///
    /// Points are only added where the supporting line changes; `current`
    /// carries the supporting line from one segment to the next.
    pub fn expand_segment(
        &self,
        segment_index: usize,
        expanded_polygon: &mut Polygon,
        current: &mut Option<SupportingSegment>,
    ) {
        let Some(segment) = self.polygon_segments.get(segment_index) else {
            return;
        };
        // Horizontal edges are covered by expanding their neighbours
        if fuzzy_equal(segment.min_y(), segment.max_y()) {
            return;
        }

        let expand_direction = sign(segment.end().y - segment.start().y);
        let mut ranges = make_expanded_ranges(segment, segment_index, self.infill_lines_below, expand_direction);
        if expand_direction < 0 {
            ranges.reverse();
        }

        self.update_expanded_polygon(segment, &ranges, expand_direction, expanded_polygon, current);
    }

    fn update_expanded_polygon(
        &self,
        segment: &TransformedSegment,
        ranges: &[ExpansionRange],
        expand_direction: i8,
        expanded_polygon: &mut Polygon,
        current: &mut Option<SupportingSegment>,
    ) {
        for range in ranges {
            let supporting = range.supporting_segment();
            if *current == Some(supporting) {
                continue;
            }

            let next_start = match range.projected_segment() {
                Some(projected) if expand_direction > 0 => projected.start(),
                Some(projected) => projected.end(),
                None => {
                    let switch_y = if expand_direction > 0 { range.min_y() } else { range.max_y() };
                    Point2::new(segment.x_at(switch_y), switch_y)
                }
            };

            match current.and_then(|previous| self.supporting_line(previous)) {
                None => {
                    let first = if range.is_projected() { next_start } else { segment.start() };
                    expanded_polygon.push(first);
                }
                Some(previous_line) => {
                    // Close the anchoring on the previous line, then start on the new one
                    expanded_polygon.push_if_forming_segment(Point2::new(previous_line.x_at(next_start.y), next_start.y));
                    expanded_polygon.push_if_forming_segment(next_start);
                }
            }

            *current = Some(supporting);
        }
    }

    /// Finish the anchoring on the last supporting line, level with the first point
    pub fn close_expanded_polygon(&self, expanded_polygon: &mut Polygon, current: Option<SupportingSegment>) {
        let Some(first) = expanded_polygon.points.first().copied() else {
            return;
        };
        let Some(last_line) = current.and_then(|supporting| self.supporting_line(supporting)) else {
            return;
        };

        let closing = Point2::new(last_line.x_at(first.y), first.y);
        if closing != first {
            expanded_polygon.push_if_forming_segment(closing);
        }
    }
}

/// Widen the area under a skin so that bridges over infill end on infill lines
///
/// `infill_contour` is the infill area of the layer below; the infill lines
/// are read from `layer_plan_below`. Returns the expanded area, clipped to
/// the contour, and the bridge angle. Layer 0 and empty areas give an empty
/// shape and a zero angle.
pub fn make_bridge_over_infill_printable(
    infill_contour: &Shape,
    infill_below_skin_area: &Shape,
    mesh: &Arc<MeshSettings>,
    layer_plan_below: Option<&OperationPtr>,
    layer_nr: usize,
    shape_ops: &dyn ShapeOps,
) -> BridgeResult<(Shape, AngleDegrees)> {
    if layer_nr == 0 || infill_below_skin_area.is_empty() {
        return Ok((Shape::default(), AngleDegrees::default()));
    }

    let bridge_angle = bridge_over_infill_angle(mesh, layer_nr)?;
    let matrix = PointMatrix::from_angle(bridge_angle + 90.0);

    let mut infill_lines_below = TransformedShape::new(matrix);
    if let Some(layer_plan) = layer_plan_below {
        for line in generated_infill_lines(layer_plan, mesh) {
            infill_lines_below.add_polyline(&line, true);
        }
    }
    infill_lines_below.add_shape(infill_contour, true);
    debug!(
        "Expanding bridge over {} infill segment(s) on layer {}",
        infill_lines_below.segments().len(),
        layer_nr
    );

    let mut expanded = Shape::default();
    for polygon in infill_below_skin_area {
        let transformed = TransformedShape::from_polygon(polygon, matrix);
        let frame = ExpansionFrame {
            polygon_segments: transformed.segments(),
            infill_lines_below: infill_lines_below.segments(),
        };

        let mut expanded_polygon = Polygon::default();
        let mut current = None;
        for segment_index in 0..frame.polygon_segments.len() {
            frame.expand_segment(segment_index, &mut expanded_polygon, &mut current);
        }
        frame.close_expanded_polygon(&mut expanded_polygon, current);
        expanded.push(expanded_polygon);
    }
    expanded.apply_matrix(&matrix.inverse());

    // Morphological closing removes slivers between overlapping expansions
    let closed = shape_ops.offset(&shape_ops.offset(&expanded, EPSILON), -EPSILON);
    Ok((shape_ops.intersection(&closed, infill_contour), bridge_angle))
}
