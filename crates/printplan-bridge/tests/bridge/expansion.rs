use std::sync::Arc;

use printplan_bridge::{generated_infill_lines, make_bridge_over_infill_printable, CavalierShapeOps};
use printplan_core::{AngleDegrees, Point2, Point3, Polygon, PrintFeatureType, Shape};
use printplan_planner::{ExtrusionMove, FeatureExtrusionInfo, OperationPtr};
use printplan_settings::{MeshSettings, Settings};

fn lines_mesh() -> Arc<MeshSettings> {
    let settings = Settings::new()
        .with("infill_pattern", "lines")
        .with("infill_angles", "[0]");
    Arc::new(MeshSettings::from_settings("part", settings).unwrap())
}

/// A layer with vertical infill lines every 2 mm, from x = 0 to x = 10 mm
fn layer_with_vertical_infill(mesh: &Arc<MeshSettings>) -> OperationPtr {
    let layer = OperationPtr::layer_plan(0, 200);
    let plan = OperationPtr::extruder_plan(0);
    let infill = OperationPtr::feature_extrusion(
        FeatureExtrusionInfo::new(PrintFeatureType::Infill, 400).with_mesh(mesh.clone()),
    );
    for x in (0..=10_000).step_by(2_000) {
        let line = OperationPtr::open_sequence(Point3::new(x, 0, 200));
        line.append_operation(&ExtrusionMove::new(Point3::new(x, 10_000, 200), 400, 60.0).into())
            .unwrap();
        infill.append_operation(&line).unwrap();
    }
    plan.append_operation(&infill).unwrap();
    layer.append_operation(&plan).unwrap();
    layer
}

fn rectangle(x0: i64, y0: i64, x1: i64, y1: i64) -> Shape {
    Shape::from(Polygon::rectangle(Point2::new(x0, y0), Point2::new(x1, y1)))
}

#[test]
fn test_infill_lines_come_from_the_same_mesh() {
    let mesh = lines_mesh();
    let layer = layer_with_vertical_infill(&mesh);

    let lines = generated_infill_lines(&layer, &mesh);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1].points, vec![Point2::new(2_000, 0), Point2::new(2_000, 10_000)]);

    let other_mesh = lines_mesh();
    assert!(generated_infill_lines(&layer, &other_mesh).is_empty());
}

#[test]
fn test_area_expands_to_the_nearest_infill_lines() {
    let mesh = lines_mesh();
    let layer = layer_with_vertical_infill(&mesh);
    let contour = rectangle(-1_000, -1_000, 11_000, 11_000);
    let under_skin = rectangle(2_500, 3_000, 5_500, 7_000);

    let (expanded, angle) = make_bridge_over_infill_printable(
        &contour,
        &under_skin,
        &mesh,
        Some(&layer),
        1,
        &CavalierShapeOps::new(),
    )
    .unwrap();

    assert_eq!(angle, AngleDegrees::new(90.0));
    let bounds = expanded.bounding_box();
    assert!((bounds.min.x - 2_000).abs() <= 10, "min x {}", bounds.min.x);
    assert!((bounds.max.x - 6_000).abs() <= 10, "max x {}", bounds.max.x);
    assert!((bounds.min.y - 3_000).abs() <= 10 && (bounds.max.y - 7_000).abs() <= 10);
    assert!((expanded.area() - 16_000_000.0).abs() < 160_000.0);
}

#[test]
fn test_first_layer_and_empty_areas_are_not_expanded() {
    let mesh = lines_mesh();
    let contour = rectangle(0, 0, 10_000, 10_000);
    let ops = CavalierShapeOps::new();

    let (expanded, angle) =
        make_bridge_over_infill_printable(&contour, &rectangle(0, 0, 10, 10), &mesh, None, 0, &ops).unwrap();
    assert!(expanded.is_empty());
    assert_eq!(angle, AngleDegrees::new(0.0));

    let (expanded, _) =
        make_bridge_over_infill_printable(&contour, &Shape::default(), &mesh, None, 4, &ops).unwrap();
    assert!(expanded.is_empty());
}
