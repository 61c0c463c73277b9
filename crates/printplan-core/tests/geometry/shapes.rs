use printplan_core::{Point2, PointMatrix, Polygon, Shape, AngleDegrees};

#[test]
fn test_rotated_shape_keeps_its_area() {
    let mut shape = Shape::from(Polygon::rectangle(Point2::new(0, 0), Point2::new(20_000, 10_000)));
    let original = shape.area();

    shape.apply_matrix(&PointMatrix::from_angle(AngleDegrees::new(30.0)));

    // rounding each vertex to the micrometre grid moves the area a little
    assert!((shape.area() - original).abs() / original < 1e-3);
}

#[test]
fn test_shape_serializes_as_nested_points() {
    let shape = Shape::from(Polygon::rectangle(Point2::new(0, 0), Point2::new(1, 1)));
    let json = serde_json::to_string(&shape).unwrap();
    assert!(json.starts_with("{\"polygons\":[{\"points\":[{\"x\":0,\"y\":0}"));

    let parsed: Shape = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, shape);
}
