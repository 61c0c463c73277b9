use std::sync::Arc;

use printplan_core::{Point3, PrintFeatureType};
use printplan_planner::schedule::{MonotonicConstraintsGenerator, MoveSequencesConstraints, MoveSequencesConstraintsGenerator};
use printplan_planner::{
    ExtruderPlanScheduler, ExtrusionMove, FeatureExtrusionInfo, FeatureExtrusionScheduler, OperationPtr,
};
use printplan_settings::{MeshSettings, Settings};
use proptest::prelude::*;

fn line(from: (i64, i64), to: (i64, i64)) -> OperationPtr {
    let sequence = OperationPtr::open_sequence(Point3::new(from.0, from.1, 0));
    sequence
        .append_operation(&ExtrusionMove::new(Point3::new(to.0, to.1, 0), 400, 30.0).into())
        .unwrap();
    sequence
}

fn index_of(items: &[OperationPtr], item: &OperationPtr) -> usize {
    items.iter().position(|other| other == item).unwrap()
}

fn monotonic_mesh() -> Arc<MeshSettings> {
    Arc::new(
        MeshSettings::from_settings(
            "part",
            Settings::new().with("skin_monotonic", true).with("skin_angles", "[90]"),
        )
        .unwrap(),
    )
}

fn feature_type_for(kind: u8) -> (PrintFeatureType, Option<usize>) {
    match kind % 6 {
        0 => (PrintFeatureType::OuterWall, Some(0)),
        1 => (PrintFeatureType::InnerWall, Some(1)),
        2 => (PrintFeatureType::InnerWall, Some(2)),
        3 => (PrintFeatureType::Infill, None),
        4 => (PrintFeatureType::SkirtBrim, None),
        _ => (PrintFeatureType::Support, None),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn monotonic_skin_covers_every_line_in_order(
        lines in prop::collection::vec((0i64..10, -2_000i64..2_000, 200i64..3_000, any::<bool>()), 1..16),
        head in (-5_000i64..5_000, -5_000i64..5_000),
    ) {
        let skin = OperationPtr::feature_extrusion(
            FeatureExtrusionInfo::new(PrintFeatureType::Skin, 400).with_mesh(monotonic_mesh()),
        );
        let sequences: Vec<OperationPtr> = lines
            .iter()
            .map(|&(row, x, length, flipped)| {
                let (from, to) = ((x, row * 400), (x + length, row * 400));
                let sequence = if flipped { line(to, from) } else { line(from, to) };
                skin.append_operation(&sequence).unwrap();
                sequence
            })
            .collect();

        let mut constraints = MoveSequencesConstraints::new();
        MonotonicConstraintsGenerator.append_constraints(&skin, &mut constraints);

        let mut scheduler = FeatureExtrusionScheduler::new(&skin, &[skin.clone()]);
        let mut closest = None;
        let head = Point3::new(head.0, head.1, 0);
        scheduler.evaluate_closest_point(head, &mut closest);
        let start = closest.unwrap().point;
        let mut position = head;
        scheduler.optimize(&start, &mut position).unwrap();

        let ordered = skin.operations();
        prop_assert_eq!(ordered.len(), sequences.len());
        for sequence in &sequences {
            prop_assert_eq!(ordered.iter().filter(|other| *other == sequence).count(), 1);
        }
        for (before, afters) in &constraints {
            for after in afters {
                prop_assert!(index_of(&ordered, before) < index_of(&ordered, after));
            }
        }
        prop_assert_eq!(Some(position), ordered.last().and_then(OperationPtr::find_end_position));
    }

    #[test]
    fn extruder_plan_covers_every_feature_in_order(
        features in prop::collection::vec((any::<u8>(), -5_000i64..5_000, -5_000i64..5_000), 1..10),
    ) {
        let mesh = Arc::new(MeshSettings::from_settings("part", Settings::new()).unwrap());
        let plan = OperationPtr::extruder_plan(0);
        let inputs: Vec<OperationPtr> = features
            .iter()
            .map(|&(kind, x, y)| {
                let (feature_type, inset) = feature_type_for(kind);
                let mut info = FeatureExtrusionInfo::new(feature_type, 400).with_mesh(mesh.clone());
                if let Some(inset) = inset {
                    info = info.with_inset_index(inset);
                }
                let feature = OperationPtr::feature_extrusion(info);
                feature.append_operation(&line((x, y), (x + 500, y))).unwrap();
                plan.append_operation(&feature).unwrap();
                feature
            })
            .collect();

        let extrusions_after: Vec<Vec<OperationPtr>> = inputs
            .iter()
            .map(|feature| FeatureExtrusionScheduler::new(feature, &inputs).extrusions_after().to_vec())
            .collect();

        let mut position = Point3::ORIGIN;
        ExtruderPlanScheduler::new().schedule(&plan, &mut position).unwrap();

        let ordered = plan.operations();
        prop_assert_eq!(ordered.len(), inputs.len());
        for (feature, afters) in inputs.iter().zip(&extrusions_after) {
            prop_assert_eq!(ordered.iter().filter(|other| *other == feature).count(), 1);
            for after in afters {
                prop_assert!(index_of(&ordered, feature) < index_of(&ordered, after));
            }
        }
    }
}

#[test]
fn two_feature_layer_prints_skirt_then_nearest_corner() {
    let mesh = Arc::new(MeshSettings::from_settings("part", Settings::new()).unwrap());
    let plan = OperationPtr::extruder_plan(0);

    let wall = OperationPtr::feature_extrusion(
        FeatureExtrusionInfo::new(PrintFeatureType::InnerWall, 400)
            .with_mesh(mesh)
            .with_inset_index(1),
    );
    let square = OperationPtr::closed_sequence();
    for (x, y) in [(200, 200), (300, 200), (300, 300), (200, 300)] {
        square
            .append_operation(&ExtrusionMove::new(Point3::new(x, y, 0), 400, 30.0).into())
            .unwrap();
    }
    wall.append_operation(&square).unwrap();

    let skirt = OperationPtr::feature_extrusion(FeatureExtrusionInfo::new(PrintFeatureType::SkirtBrim, 400));
    skirt.append_operation(&line((0, 0), (100, 0))).unwrap();

    plan.append_operation(&wall).unwrap();
    plan.append_operation(&skirt).unwrap();

    let mut position = Point3::ORIGIN;
    ExtruderPlanScheduler::new().schedule(&plan, &mut position).unwrap();

    assert_eq!(plan.operations(), vec![skirt, wall]);
    assert_eq!(square.find_start_position(), Some(Point3::new(200, 200, 0)));
    assert_eq!(position, Point3::new(200, 200, 0));
}
