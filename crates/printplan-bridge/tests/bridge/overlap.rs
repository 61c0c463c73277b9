use printplan_bridge::{make_non_intersecting_overlapping, SegmentOverlappingType, TransformedSegment};
use printplan_core::{Coord, Point2};
use proptest::prelude::*;

fn vertical(x: Coord, y0: Coord, y1: Coord) -> TransformedSegment {
    TransformedSegment::new(Point2::new(x, y0), Point2::new(x, y1))
}

#[test]
fn test_candidate_reaching_the_top_is_a_top_overlap() {
    let base = vertical(0, 0, 100);
    let other = vertical(50, 20, 100);

    let overlap = base.calculate_overlapping(&other, 1).unwrap();
    assert_eq!(overlap.overlap_type, SegmentOverlappingType::Top);
    assert_eq!(overlap.other_overlapping_part, vertical(50, 20, 100));
}

proptest! {
    #[test]
    fn segments_in_separate_bands_never_overlap(
        base in ((-10_000i64..10_000, -10_000i64..10_000), (-10_000i64..10_000, 1i64..5_000)),
        other_x in (-10_000i64..10_000, -10_000i64..10_000),
        gap in 0i64..5_000,
        length in 1i64..5_000,
        above in any::<bool>(),
    ) {
        let ((x0, y0), (x1, height)) = base;
        let base = TransformedSegment::new(Point2::new(x0, y0), Point2::new(x1, y0 + height));
        let (other_y0, other_y1) = if above {
            (base.max_y() + gap, base.max_y() + gap + length)
        } else {
            (base.min_y() - gap - length, base.min_y() - gap)
        };
        let other = TransformedSegment::new(Point2::new(other_x.0, other_y0), Point2::new(other_x.1, other_y1));

        prop_assert!(base.calculate_overlapping(&other, 1).is_none());
        prop_assert!(base.calculate_overlapping(&other, -1).is_none());
    }

    #[test]
    fn side_by_side_segments_are_classified_once(
        base_min in -10_000i64..10_000,
        base_height in 20i64..5_000,
        other_min_offset in -5_000i64..5_000,
        other_height in 20i64..10_000,
        distance in 10i64..5_000,
        to_the_right in any::<bool>(),
    ) {
        let base_max = base_min + base_height;
        let other_min = base_min + other_min_offset;
        let other_max = other_min + other_height;
        prop_assume!(other_max - base_min > 10 && base_max - other_min > 10);

        let direction: i8 = if to_the_right { 1 } else { -1 };
        let base = vertical(0, base_min, base_max);
        let other = vertical(distance * Coord::from(direction), other_min, other_max);

        let overlap = base.calculate_overlapping(&other, direction);
        prop_assert!(overlap.is_some());
        prop_assert!(base.calculate_overlapping(&other, -direction).is_none());

        let covers_top = other_max >= base_max;
        let covers_bottom = other_min <= base_min;
        let overlap_type = overlap.map(|overlap| overlap.overlap_type);
        prop_assert_eq!(overlap_type, Some(make_non_intersecting_overlapping(covers_top, covers_bottom)));
        prop_assert_eq!(overlap_type == Some(SegmentOverlappingType::Full), covers_top && covers_bottom);
    }
}
