use printplan_core::Point3;
use printplan_planner::{ExtrusionMove, OperationPtr, RecordingExporter, SearchOrder};
use proptest::prelude::*;

fn extrusion(x: i64, y: i64) -> OperationPtr {
    ExtrusionMove::new(Point3::new(x, y, 0), 400, 30.0).into()
}

fn positions(sequence: &OperationPtr) -> Vec<Point3> {
    sequence
        .operations()
        .iter()
        .filter_map(OperationPtr::position)
        .collect()
}

proptest! {
    #[test]
    fn append_moves_operation_between_sequences(count in 1usize..8, moved in 0usize..8) {
        let first = OperationPtr::closed_sequence();
        let second = OperationPtr::closed_sequence();
        let moves: Vec<OperationPtr> = (0..count).map(|i| extrusion(i as i64, 0)).collect();
        for operation in &moves {
            first.append_operation(operation).unwrap();
        }

        let operation = &moves[moved % count];
        second.append_operation(operation).unwrap();
        second.append_operation(operation).unwrap();

        prop_assert!(!first.operations().contains(operation));
        prop_assert_eq!(first.len(), count - 1);
        prop_assert_eq!(second.operations().iter().filter(|child| *child == operation).count(), 1);
        prop_assert_eq!(operation.parent(), Some(second.clone()));
    }

    #[test]
    fn reorder_is_a_rotation_ending_with_move(
        points in prop::collection::vec((-10_000i64..10_000, -10_000i64..10_000), 1..12),
        last in 0usize..12,
    ) {
        let sequence = OperationPtr::closed_sequence();
        let moves: Vec<OperationPtr> = points.iter().map(|&(x, y)| extrusion(x, y)).collect();
        for operation in &moves {
            sequence.append_operation(operation).unwrap();
        }

        let last = last % moves.len();
        sequence.reorder_to_end_with(&moves[last]).unwrap();

        let reordered = sequence.operations();
        prop_assert_eq!(reordered.last(), Some(&moves[last]));
        let offset = (last + 1) % moves.len();
        for (index, operation) in reordered.iter().enumerate() {
            prop_assert_eq!(operation, &moves[(index + offset) % moves.len()]);
        }
        prop_assert_eq!(sequence.find_start_position(), moves[last].position());
    }

    #[test]
    fn reverse_swaps_start_and_targets(
        start in (-10_000i64..10_000, -10_000i64..10_000),
        points in prop::collection::vec((-10_000i64..10_000, -10_000i64..10_000), 1..12),
    ) {
        let start = Point3::new(start.0, start.1, 0);
        let sequence = OperationPtr::open_sequence(start);
        for &(x, y) in &points {
            sequence.append_operation(&extrusion(x, y)).unwrap();
        }

        sequence.reverse().unwrap();

        let targets: Vec<Point3> = points.iter().map(|&(x, y)| Point3::new(x, y, 0)).collect();
        let mut expected: Vec<Point3> = targets[..targets.len() - 1].iter().rev().copied().collect();
        expected.push(start);

        prop_assert_eq!(sequence.find_start_position(), targets.last().copied());
        prop_assert_eq!(positions(&sequence), expected);
        prop_assert_eq!(sequence.find_end_position(), Some(start));
    }
}

#[test]
fn reverse_swaps_line_widths() {
    let sequence = OperationPtr::open_sequence(Point3::ORIGIN);
    let tapered = ExtrusionMove::new(Point3::new(100, 0, 0), 400, 30.0).with_line_widths(300, 500);
    sequence.append_operation(&tapered.into()).unwrap();

    sequence.reverse().unwrap();

    let reversed = sequence.operations()[0].extrusion().unwrap();
    assert_eq!((reversed.line_width_start, reversed.line_width_end), (500, 300));
    assert_eq!(reversed.position, Point3::ORIGIN);
}

#[test]
fn search_respects_depth_and_order() {
    let plan = OperationPtr::extruder_plan(0);
    let sequence = OperationPtr::closed_sequence();
    plan.append_operation(&sequence).unwrap();
    let nested = extrusion(1, 1);
    sequence.append_operation(&nested).unwrap();
    sequence.append_operation(&extrusion(2, 2)).unwrap();

    let is_move = |operation: &OperationPtr| operation.is_extrusion_move();
    assert!(plan.find_operation(&is_move, SearchOrder::Forward, Some(0)).is_none());
    assert_eq!(plan.find_operation(&is_move, SearchOrder::Forward, Some(1)), Some(nested.clone()));
    assert_eq!(
        plan.find_operation(&is_move, SearchOrder::Backward, None).and_then(|op| op.position()),
        Some(Point3::new(2, 2, 0))
    );
    assert_eq!(plan.find_operations(&is_move, SearchOrder::Forward, None).len(), 2);
    assert_eq!(nested.find_parent(OperationPtr::is_extruder_plan), Some(plan));
}

#[test]
fn write_emits_in_tree_order() {
    let layer = OperationPtr::layer_plan(2, 600);
    let plan = OperationPtr::extruder_plan_with_temperature(1, 210.0, true);
    layer.append_operation(&plan).unwrap();
    let loop_ = OperationPtr::closed_sequence();
    plan.append_operation(&loop_).unwrap();
    for (x, y) in [(0, 0), (10, 0), (10, 10)] {
        loop_.append_operation(&extrusion(x, y)).unwrap();
    }

    let mut exporter = RecordingExporter::new();
    layer.write(&mut exporter);

    let json = exporter.to_json().unwrap();
    assert!(json.contains("\"type\": \"layer_start\""));
    assert!(json.contains("\"type\": \"temperature\""));
    assert_eq!(exporter.instructions().len(), 5);
    assert_eq!(
        exporter.positions(),
        vec![Point3::new(0, 0, 0), Point3::new(10, 0, 0), Point3::new(10, 10, 0)]
    );
}
