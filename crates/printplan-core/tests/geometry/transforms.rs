use printplan_core::{fuzzy_equal, AngleDegrees, Point2, PointMatrix};
use proptest::prelude::*;

proptest! {
    #[test]
    fn rotation_is_undone_by_inverse(
        x in -1_000_000i64..1_000_000,
        y in -1_000_000i64..1_000_000,
        angle in 0.0f64..360.0,
    ) {
        let matrix = PointMatrix::from_angle(AngleDegrees::new(angle));
        let p = Point2::new(x, y);
        let back = matrix.inverse().apply(matrix.apply(p));
        prop_assert!(fuzzy_equal(back.x, p.x));
        prop_assert!(fuzzy_equal(back.y, p.y));
    }

    #[test]
    fn fuzzy_equality_is_symmetric(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        prop_assert_eq!(fuzzy_equal(a, b), fuzzy_equal(b, a));
    }

    #[test]
    fn rotation_preserves_length(x in -100_000i64..100_000, y in -100_000i64..100_000, angle in 0.0f64..360.0) {
        let matrix = PointMatrix::from_angle(AngleDegrees::new(angle));
        let p = Point2::new(x, y);
        prop_assert!((matrix.apply(p).vsize() - p.vsize()).abs() <= 1.5);
    }
}
