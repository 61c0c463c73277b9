use std::sync::Arc;

use printplan_core::{Point3, PrintFeatureType};
use printplan_planner::{
    ExportedInstruction, ExtruderPlanScheduler, ExtrusionMove, FeatureExtrusionInfo, OperationPtr,
    PrintOperationTransformer, RecordingExporter, SpeedDerivatives, TransformerHandle,
    TransformerRegistry, TravelMoveGenerator, TravelMovesInserter,
};
use printplan_settings::{Scene, Settings};

fn scene() -> Arc<Scene> {
    let extruder = Settings::new()
        .with("speed_travel", 120)
        .with("acceleration_travel", 2000)
        .with("jerk_travel", 15)
        .with("speed_travel_layer_0", 60)
        .with("acceleration_travel_layer_0", 1000)
        .with("jerk_travel_layer_0", 10);
    Arc::new(Scene::new(Settings::new().with("speed_slowdown_layers", 1)).with_extruder(extruder))
}

fn infill_line(from: (i64, i64), to: (i64, i64)) -> OperationPtr {
    let feature = OperationPtr::feature_extrusion(FeatureExtrusionInfo::new(PrintFeatureType::Infill, 400));
    let sequence = OperationPtr::open_sequence(Point3::new(from.0, from.1, 0));
    sequence
        .append_operation(&ExtrusionMove::new(Point3::new(to.0, to.1, 0), 400, 30.0).into())
        .unwrap();
    feature.append_operation(&sequence).unwrap();
    feature
}

fn registry(scene: Arc<Scene>) -> TransformerRegistry {
    let mut registry = TransformerRegistry::new();
    registry
        .register("extruder_plan_scheduler", || {
            Arc::new(ExtruderPlanScheduler::new()) as TransformerHandle
        })
        .register("travel_moves_inserter", move || {
            Arc::new(TravelMovesInserter::new(scene.clone())) as TransformerHandle
        });
    registry
}

#[test]
fn scheduled_layer_is_linked_by_travels() {
    let print_plan = OperationPtr::print_plan();
    let layer = OperationPtr::layer_plan(3, 800);
    let plan = OperationPtr::extruder_plan(0);
    print_plan.append_operation(&layer).unwrap();
    layer.append_operation(&plan).unwrap();
    plan.append_operation(&infill_line((5000, 0), (6000, 0))).unwrap();
    plan.append_operation(&infill_line((0, 0), (1000, 0))).unwrap();

    let pipeline = registry(scene())
        .create_pipeline(&["extruder_plan_scheduler", "travel_moves_inserter"])
        .unwrap();
    pipeline.process(&print_plan).unwrap();

    let mut exporter = RecordingExporter::new();
    print_plan.write(&mut exporter);
    let travels: Vec<&ExportedInstruction> = exporter
        .instructions()
        .iter()
        .filter(|instruction| instruction.is_travel())
        .collect();

    assert_eq!(travels.len(), 1);
    assert_eq!(
        travels[0],
        &ExportedInstruction::TravelMove {
            position: Point3::new(5000, 0, 0),
            speed: 120.0,
            feature_type: PrintFeatureType::MoveCombing,
        }
    );
    assert_eq!(
        exporter.positions(),
        vec![
            Point3::new(1000, 0, 0),
            Point3::new(5000, 0, 0),
            Point3::new(6000, 0, 0)
        ]
    );
}

/// Refuses every route, so the next generator is used
struct NoRoute;

impl TravelMoveGenerator for NoRoute {
    fn name(&self) -> &str {
        "no_route"
    }

    fn generate_travel_route(&self, _start: Point3, _end: Point3, _speed: SpeedDerivatives) -> Option<OperationPtr> {
        None
    }
}

#[test]
fn generators_are_tried_in_order() {
    let inserter = TravelMovesInserter::new(scene()).with_generators(vec![
        Arc::new(NoRoute),
        Arc::new(printplan_planner::DirectTravelMoveGenerator),
    ]);
    let speed = SpeedDerivatives::new(100.0, 1000.0, 10.0);

    let route = inserter
        .make_travel_route(Point3::ORIGIN, Point3::new(10, 0, 0), speed)
        .unwrap();
    assert!(route.is_travel_route());
    assert_eq!(route.find_end_position(), Some(Point3::new(10, 0, 0)));

    let only_refusing = TravelMovesInserter::new(scene()).with_generators(vec![Arc::new(NoRoute)]);
    assert!(only_refusing
        .make_travel_route(Point3::ORIGIN, Point3::new(10, 0, 0), speed)
        .is_none());
}

#[test]
fn missing_extruder_settings_fail_the_pass() {
    let layer = OperationPtr::layer_plan(0, 200);
    let plan = OperationPtr::extruder_plan(4);
    layer.append_operation(&plan).unwrap();
    plan.append_operation(&infill_line((0, 0), (10, 0))).unwrap();

    assert!(TravelMovesInserter::new(scene()).process(&layer).is_err());
}
