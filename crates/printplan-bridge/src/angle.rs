//! Bridge detection and bridge line angle
//!
//! A skin area is a bridge when too little of it rests on the layer below.
//! Its lines are then laid at the angle that maximizes the length anchored on
//! both ends, or across the infill lines below when the skin lies on infill.

use std::sync::Arc;

use printplan_core::geometry::linear_alg::line_horizontal_line_intersection;
use printplan_core::{is_zero, AngleDegrees, Coord, PointMatrix, Shape};
use printplan_settings::{EFillMethod, MeshSettings};
use tracing::{debug, trace};

use crate::error::{BridgeError, BridgeResult};
use crate::shape_ops::ShapeOps;
use crate::transformed_shape::TransformedShape;

/// A part of a mesh on the layer a bridge rests on
#[derive(Debug, Clone, Default)]
pub struct LayerPartBelow {
    pub outline: Shape,
    /// Sparse infill area of the part itself
    pub infill_area: Shape,
}

/// One mesh on the layer a bridge rests on
#[derive(Debug, Clone)]
pub struct MeshLayerBelow {
    pub mesh: Arc<MeshSettings>,
    pub parts: Vec<LayerPartBelow>,
}

/// Support printed on the layer a bridge rests on
#[derive(Debug, Clone, Default)]
pub struct SupportLayerBelow {
    pub support_roof: Shape,
    pub support_infill_parts: Vec<Shape>,
}

/// Everything printed on the layer a bridge rests on
#[derive(Debug, Clone, Default)]
pub struct LayerBelow {
    pub meshes: Vec<MeshLayerBelow>,
    pub support: Option<SupportLayerBelow>,
}

/// X coordinates where the horizontal line at `line_y` crosses the shape's segments, unsorted
pub fn shape_line_intersections(line_y: Coord, transformed_shape: &TransformedShape) -> Vec<Coord> {
    transformed_shape
        .segments()
        .iter()
        .filter(|segment| segment.min_y() <= line_y && segment.max_y() >= line_y)
        .filter_map(|segment| line_horizontal_line_intersection(segment.start(), segment.end(), line_y))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeStatus {
    /// Outside the skin
    Outside,
    /// Started over air
    Hanging,
    /// Left a supported area and is now over air
    Anchored,
    /// Over a supported area
    Supported,
}

/// Score one horizontal bridge line at `line_y`
///
/// Parts between two supported areas add their length, parts hanging on one
/// side or both subtract it. Parts over supported areas do not count.
pub fn evaluate_bridge_line(
    line_y: Coord,
    transformed_skin_area: &TransformedShape,
    transformed_supported_area: &TransformedShape,
) -> Coord {
    let mut skin_intersections = shape_line_intersections(line_y, transformed_skin_area);
    if skin_intersections.len() < 2 {
        return 0;
    }
    skin_intersections.sort();
    let mut supported_intersections = shape_line_intersections(line_y, transformed_supported_area);
    supported_intersections.sort();

    let mut skin = skin_intersections.into_iter().peekable();
    let mut supported = supported_intersections.into_iter().peekable();

    let mut inside_skin = false;
    let mut inside_supported = false;
    let mut last_position: Coord = 0;
    let mut score: Coord = 0;
    let mut status = BridgeStatus::Outside;

    loop {
        let (is_skin, is_supported) = match (skin.peek(), supported.peek()) {
            (None, None) => break,
            (None, Some(_)) => (false, true),
            (Some(_), None) => (true, false),
            (Some(&next_skin), Some(&next_supported)) => {
                if is_zero((next_skin - next_supported) as f64) {
                    (true, true)
                } else if next_skin <= next_supported {
                    // Leaving the skin also leaves the supported area, whatever the rounding says
                    (true, inside_skin && inside_supported)
                } else {
                    // Reaching the supported area also enters the skin
                    (!inside_supported && !inside_skin, true)
                }
            }
        };

        let mut next_inside_skin = inside_skin;
        let mut next_inside_supported = inside_supported;
        let mut position = last_position;
        if is_skin {
            if let Some(x) = skin.next() {
                position = x;
                next_inside_skin = !next_inside_skin;
            }
        }
        if is_supported {
            if let Some(x) = supported.next() {
                position = x;
                next_inside_supported = !next_inside_supported;
            }
        }

        let leaving_skin = is_skin && !next_inside_skin;
        let reaching_supported = is_supported && next_inside_supported;

        let mut bridging = false;
        let mut hanging = false;
        status = match status {
            BridgeStatus::Outside if reaching_supported => BridgeStatus::Supported,
            BridgeStatus::Outside => BridgeStatus::Hanging,
            BridgeStatus::Supported if leaving_skin => BridgeStatus::Outside,
            BridgeStatus::Supported => BridgeStatus::Anchored,
            BridgeStatus::Hanging => {
                hanging = true;
                if reaching_supported {
                    BridgeStatus::Supported
                } else {
                    BridgeStatus::Outside
                }
            }
            BridgeStatus::Anchored if reaching_supported => {
                bridging = true;
                BridgeStatus::Supported
            }
            BridgeStatus::Anchored if leaving_skin => {
                hanging = true;
                BridgeStatus::Outside
            }
            BridgeStatus::Anchored => BridgeStatus::Anchored,
        };

        let length = position - last_position;
        if bridging {
            score += length;
        } else if hanging {
            score -= length;
        }

        last_position = position;
        inside_skin = next_inside_skin;
        inside_supported = next_inside_supported;
    }

    score
}

/// Score of bridging `skin_outline` with lines at `angle`
///
/// Lines are one `line_width` apart, the first one half a width above the
/// bottom of the skin. Degenerate areas score the lowest possible value.
pub fn evaluate_bridge_lines(
    skin_outline: &Shape,
    supported_regions: &Shape,
    line_width: Coord,
    angle: AngleDegrees,
) -> Coord {
    let matrix = PointMatrix::from_angle(angle);
    let skin = TransformedShape::from_shape(skin_outline, matrix);
    let supported = TransformedShape::from_shape(supported_regions, matrix);

    if line_width <= 0 || skin.min_y() >= skin.max_y() || supported.min_y() >= supported.max_y() {
        return Coord::MIN;
    }

    let line_count = (skin.max_y() - skin.min_y()) / line_width;
    if line_count == 0 {
        return Coord::MIN;
    }

    let line_min = skin.min_y() + line_width / 2;
    let no_support = TransformedShape::new(matrix);
    (0..line_count)
        .map(|i| {
            let line_y = line_min + i * line_width;
            let has_supports = line_y >= supported.min_y() && line_y <= supported.max_y();
            evaluate_bridge_line(line_y, &skin, if has_supports { &supported } else { &no_support })
        })
        .sum()
}

/// Bridge angle when bridging over the infill of the layer below
///
/// Lines go across the infill lines for line-based patterns; patterns
/// without straight lines use a fixed angle.
pub fn bridge_over_infill_angle(mesh: &MeshSettings, layer_nr: usize) -> BridgeResult<AngleDegrees> {
    if layer_nr == 0 {
        return Ok(AngleDegrees::new(0.0));
    }
    if mesh.infill_angles.is_empty() {
        return Err(BridgeError::NoInfillAngles(mesh.name.clone()));
    }

    let infill_angle_below = mesh.infill_angles[(layer_nr - 1) % mesh.infill_angles.len()];
    let pattern: EFillMethod = mesh.settings.get("infill_pattern")?;

    let angle = match pattern {
        EFillMethod::Cross | EFillMethod::Cross3D => AngleDegrees::new(22.5),
        EFillMethod::Gyroid
        | EFillMethod::Concentric
        | EFillMethod::Lightning
        | EFillMethod::Plugin
        | EFillMethod::None => AngleDegrees::new(45.0),
        EFillMethod::CubicSubdiv => infill_angle_below + 45.0,
        EFillMethod::Lines
        | EFillMethod::Triangles
        | EFillMethod::Trihexagon
        | EFillMethod::Cubic
        | EFillMethod::ZigZag => infill_angle_below + 90.0,
        EFillMethod::QuarterCubic | EFillMethod::Tetrahedral | EFillMethod::Grid => infill_angle_below,
    };
    Ok(angle)
}

/// Detect whether `skin_outline` is a bridge and find its line angle
///
/// `layer_below` describes layer `layer_nr - bridge_layer`. Returns `None`
/// as the angle when bridge settings are disabled or the skin is supported
/// enough, together with the supported parts of the skin.
pub fn bridge_angle(
    mesh: &MeshSettings,
    skin_outline: &Shape,
    layer_below: &LayerBelow,
    layer_nr: usize,
    bridge_layer: usize,
    shape_ops: &dyn ShapeOps,
) -> BridgeResult<(Option<AngleDegrees>, Shape)> {
    let settings = &mesh.settings;
    if !settings.get::<bool>("bridge_settings_enabled")? {
        return Ok((None, Shape::default()));
    }

    let boundary_box = skin_outline.bounding_box();
    let line_width = settings.get_coord("skin_line_width")?;
    if line_width <= 0 {
        return Err(BridgeError::InvalidLineWidth(line_width));
    }

    let mut islands = Shape::default();
    let mut below_infill = Shape::default();
    for mesh_below in layer_below.meshes.iter().filter(|below| below.mesh.is_printed()) {
        let infill_line_distance = mesh_below.mesh.settings.get_coord("infill_line_distance")?;
        let subtract_infill = bridge_layer == 1 && infill_line_distance == 0;

        for part in &mesh_below.parts {
            below_infill = shape_ops.union(&below_infill, &part.infill_area);

            let solid_below = if subtract_infill {
                shape_ops.difference(&part.outline, &part.infill_area)
            } else {
                part.outline.clone()
            };
            if !boundary_box.hit(&part.outline.bounding_box()) {
                continue;
            }
            islands.push_shape(shape_ops.intersection(skin_outline, &solid_below));
        }
    }

    let mut supported_regions = islands;
    if let Some(support) = &layer_below.support {
        // Supported skin counts as supported, but never as an island
        let support_areas: Vec<&Shape> = if support.support_roof.is_empty() {
            support.support_infill_parts.iter().collect()
        } else {
            vec![&support.support_roof]
        };
        for area in support_areas {
            if !boundary_box.hit(&area.bounding_box()) {
                continue;
            }
            let supported_skin = shape_ops.intersection(skin_outline, area);
            if !supported_skin.is_empty() {
                supported_regions.push_shape(supported_skin);
            }
        }
    }

    let support_threshold = settings.get_ratio("bridge_skin_support_threshold")?;
    let skin_area = skin_outline.area() + 1.0;
    let supported_ratio = supported_regions.area() / skin_area;
    if support_threshold == 0.0 || supported_ratio >= support_threshold {
        debug!(
            "Skin on layer {} is {:.0}% supported, not a bridge",
            layer_nr,
            supported_ratio * 100.0
        );
        return Ok((None, supported_regions));
    }

    let infill_ratio = shape_ops.intersection(skin_outline, &below_infill).area() / skin_area;
    if infill_ratio > 0.5 {
        let angle = bridge_over_infill_angle(mesh, layer_nr)?;
        debug!("Bridging over infill on layer {} at {}", layer_nr, angle);
        return Ok((Some(angle), supported_regions));
    }

    let mut best_score = Coord::MIN;
    let mut best_angle = None;
    for degrees in 0..180 {
        let angle = AngleDegrees::new(f64::from(degrees));
        let score = evaluate_bridge_lines(skin_outline, &supported_regions, line_width, angle);
        if score > best_score {
            best_score = score;
            best_angle = Some(angle + 90.0);
        }
    }
    trace!("Best bridge score {} on layer {}", best_score, layer_nr);

    Ok((best_angle, supported_regions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape_ops::CavalierShapeOps;
    use printplan_core::{Point2, Polygon};
    use printplan_settings::Settings;

    fn rectangle(x0: Coord, y0: Coord, x1: Coord, y1: Coord) -> Shape {
        Shape::from(Polygon::rectangle(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    fn mesh(settings: Settings) -> Arc<MeshSettings> {
        Arc::new(MeshSettings::from_settings("part", settings).unwrap())
    }

    fn bridge_settings() -> Settings {
        Settings::new()
            .with("bridge_settings_enabled", true)
            .with("skin_line_width", 0.4)
            .with("bridge_skin_support_threshold", 50)
            .with("infill_line_distance", 6)
            .with("infill_pattern", "lines")
    }

    #[test]
    fn test_line_between_two_supports_is_bridging() {
        let matrix = PointMatrix::identity();
        let skin = TransformedShape::from_shape(&rectangle(0, 0, 10_000, 1_000), matrix);
        let mut supports = rectangle(0, 0, 2_000, 1_000);
        supports.push_shape(rectangle(8_000, 0, 10_000, 1_000));
        let supported = TransformedShape::from_shape(&supports, matrix);

        assert_eq!(evaluate_bridge_line(500, &skin, &supported), 6_000);
    }

    #[test]
    fn test_line_with_one_support_is_hanging() {
        let matrix = PointMatrix::identity();
        let skin = TransformedShape::from_shape(&rectangle(0, 0, 10_000, 1_000), matrix);
        let supported = TransformedShape::from_shape(&rectangle(0, 0, 2_000, 1_000), matrix);

        assert_eq!(evaluate_bridge_line(500, &skin, &supported), -8_000);
        assert_eq!(evaluate_bridge_line(5_000, &skin, &supported), 0);
    }

    #[test]
    fn test_degenerate_areas_score_lowest() {
        let skin = rectangle(0, 0, 10_000, 1_000);
        assert_eq!(
            evaluate_bridge_lines(&skin, &Shape::default(), 400, AngleDegrees::new(0.0)),
            Coord::MIN
        );
        assert_eq!(
            evaluate_bridge_lines(&rectangle(0, 0, 10_000, 300), &skin, 400, AngleDegrees::new(0.0)),
            Coord::MIN
        );
    }

    #[test]
    fn test_over_infill_angle_by_pattern() {
        let lines = mesh(Settings::new().with("infill_pattern", "lines").with("infill_angles", "[30]"));
        assert_eq!(bridge_over_infill_angle(&lines, 0).unwrap(), AngleDegrees::new(0.0));
        assert_eq!(bridge_over_infill_angle(&lines, 3).unwrap(), AngleDegrees::new(120.0));

        let grid = mesh(Settings::new().with("infill_pattern", "grid").with("infill_angles", "[10, 20]"));
        assert_eq!(bridge_over_infill_angle(&grid, 2).unwrap(), AngleDegrees::new(20.0));

        let gyroid = mesh(Settings::new().with("infill_pattern", "gyroid"));
        assert_eq!(bridge_over_infill_angle(&gyroid, 5).unwrap(), AngleDegrees::new(45.0));

        let cross = mesh(Settings::new().with("infill_pattern", "cross"));
        assert_eq!(bridge_over_infill_angle(&cross, 5).unwrap(), AngleDegrees::new(22.5));
    }

    #[test]
    fn test_disabled_bridges() {
        let part = mesh(Settings::new().with("bridge_settings_enabled", false));
        let (angle, supported) = bridge_angle(
            &part,
            &rectangle(0, 0, 10_000, 10_000),
            &LayerBelow::default(),
            3,
            1,
            &CavalierShapeOps::new(),
        )
        .unwrap();
        assert!(angle.is_none());
        assert!(supported.is_empty());
    }

    #[test]
    fn test_missing_line_width_is_an_error() {
        let part = mesh(Settings::new().with("bridge_settings_enabled", true));
        let result = bridge_angle(
            &part,
            &rectangle(0, 0, 10_000, 10_000),
            &LayerBelow::default(),
            3,
            1,
            &CavalierShapeOps::new(),
        );
        assert!(matches!(result, Err(BridgeError::Settings(_))));
    }

    #[test]
    fn test_bridge_between_two_pillars_runs_across_the_gap() {
        let part = mesh(bridge_settings());
        let below = LayerBelow {
            meshes: vec![MeshLayerBelow {
                mesh: part.clone(),
                parts: vec![
                    LayerPartBelow {
                        outline: rectangle(0, 0, 3_000, 10_000),
                        infill_area: Shape::default(),
                    },
                    LayerPartBelow {
                        outline: rectangle(17_000, 0, 20_000, 10_000),
                        infill_area: Shape::default(),
                    },
                ],
            }],
            support: None,
        };

        let (angle, supported) = bridge_angle(
            &part,
            &rectangle(1_000, 1_000, 19_000, 9_000),
            &below,
            3,
            1,
            &CavalierShapeOps::new(),
        )
        .unwrap();

        assert!(supported.area() > 0.0);
        // Lines run along X, across the gap
        let angle = angle.unwrap().degrees();
        assert!((angle - 90.0).abs() < 1.0 || (angle - 270.0).abs() < 1.0, "angle {}", angle);
    }
}
