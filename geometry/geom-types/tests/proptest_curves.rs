//! Property-based tests for curve evaluation.
//!
//! Run with: cargo test -p geom-types -- proptest

use geom_types::{
    Arc2d, CompositeCurve2d, Curve3d, CurveSegment2d, Line2d, PlanarCurve, Spiral2d,
};
use nalgebra::{Isometry2, Vector2};
use proptest::prelude::*;

fn placement() -> impl Strategy<Value = Isometry2<f64>> {
    (-100.0..100.0f64, -100.0..100.0f64, -3.14..3.14f64)
        .prop_map(|(x, y, hdg)| Isometry2::new(Vector2::new(x, y), hdg))
}

proptest! {
    /// Every point of an arc lies at the arc's radius from its centre.
    #[test]
    fn arc_points_keep_radius(
        curvature in prop::sample::select(vec![-0.5, -0.1, 0.01, 0.2, 1.0]),
        length in 0.1..50.0f64,
        placement in placement(),
        fraction in 0.0..1.0f64,
    ) {
        let arc = Arc2d::new(curvature, length, placement, 1e-9).unwrap();
        let radius = 1.0 / curvature;
        // Local centre sits at (0, 1/curvature).
        let center = placement * nalgebra::Point2::new(0.0, radius);
        let p = arc.point_global(fraction * length).unwrap();
        let distance = (p - center).norm();
        prop_assert!((distance - radius.abs()).abs() < 1e-9);
    }

    /// Line, arc, and spiral evaluation is always finite on the domain.
    #[test]
    fn segments_evaluate_finite(
        length in 0.5..100.0f64,
        curv_start in -0.1..0.1f64,
        curv_end in -0.1..0.1f64,
        placement in placement(),
        fraction in 0.0..1.0f64,
    ) {
        let s = fraction * length;

        let line = Line2d::new(length, placement, 1e-9).unwrap();
        let p = line.point_global(s).unwrap();
        prop_assert!(p.x.is_finite() && p.y.is_finite());

        let spiral = Spiral2d::new(curv_start, curv_end, length, placement, 1e-9).unwrap();
        let p = spiral.point_global(s).unwrap();
        prop_assert!(p.x.is_finite() && p.y.is_finite());

        let pose = spiral.pose_global(s).unwrap();
        prop_assert!(pose.heading.is_finite());
    }

    /// A flat 3D curve over a straight line stays inside the segment's
    /// bounding box inflated by the tolerance.
    #[test]
    fn flat_curve_stays_bounded(
        length in 0.5..100.0f64,
        fraction in 0.0..1.0f64,
    ) {
        let line = Line2d::new(length, Isometry2::new(Vector2::zeros(), 0.0), 1e-9).unwrap();
        let planar =
            CompositeCurve2d::new(vec![(0.0, CurveSegment2d::Line(line))], 1e-9).unwrap();
        let curve = Curve3d::flat(planar, 1e-9).unwrap();

        let p = curve.point(fraction * length).unwrap();
        prop_assert!(p.x >= -1e-9 && p.x <= length + 1e-9);
        prop_assert!(p.y.abs() < 1e-9);
        prop_assert!(p.z.abs() < 1e-9);
    }

    /// Out-of-domain parameters beyond the tolerance are rejected, not
    /// extrapolated.
    #[test]
    fn out_of_domain_is_rejected(length in 0.5..50.0f64, overshoot in 0.1..10.0f64) {
        let line = Line2d::new(length, Isometry2::new(Vector2::zeros(), 0.0), 1e-9).unwrap();
        prop_assert!(line.point_local(length + overshoot).is_err());
        prop_assert!(line.point_local(-overshoot).is_err());
    }
}
