//! # printplan Bridge
//!
//! Bridge detection and bridge-over-infill expansion. Segments are rotated
//! into a frame where the direction of interest is horizontal, then compared
//! band by band to find which lines below can anchor a bridge.

pub mod angle;
pub mod error;
pub mod expansion;
pub mod expansion_range;
pub mod segment;
pub mod shape_ops;
pub mod transformed_shape;

pub use angle::{
    bridge_angle, bridge_over_infill_angle, evaluate_bridge_line, evaluate_bridge_lines,
    shape_line_intersections, LayerBelow, LayerPartBelow, MeshLayerBelow, SupportLayerBelow,
};
pub use error::{BridgeError, BridgeResult};
pub use expansion::{generated_infill_lines, make_bridge_over_infill_printable, make_expanded_ranges, ExpansionFrame};
pub use expansion_range::{ExpansionRange, SupportingSegment};
pub use segment::{make_non_intersecting_overlapping, SegmentOverlapping, SegmentOverlappingType, TransformedSegment};
pub use shape_ops::{CavalierShapeOps, ShapeOps};
pub use transformed_shape::TransformedShape;
