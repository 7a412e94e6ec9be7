//! Spatial curves: a planar curve lifted by height and torsion functions.

use nalgebra::Point3;

use crate::{
    CompositeCurve2d, GeomError, Interval, LineString3d, Pose3, Result, StackedFunction,
    UnivariateFunction,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D curve over arc length `s`: plan-view position from a planar curve,
/// elevation from a height function, cross-section bank from a torsion
/// function.
///
/// The height and torsion domains must fuzzy-enclose the planar domain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Curve3d {
    planar: CompositeCurve2d,
    height: StackedFunction,
    torsion: StackedFunction,
    tolerance: f64,
}

impl Curve3d {
    /// Compose a spatial curve.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::DomainMismatch`] when the height or torsion
    /// domain does not cover the planar curve.
    pub fn new(
        planar: CompositeCurve2d,
        height: StackedFunction,
        torsion: StackedFunction,
        tolerance: f64,
    ) -> Result<Self> {
        let planar_domain = planar.domain();
        if !height.domain().fuzzy_encloses(&planar_domain, tolerance) {
            return Err(GeomError::domain_mismatch(format!(
                "height domain [{}, {}] does not enclose curve domain [{}, {}]",
                height.domain().start(),
                height.domain().end(),
                planar_domain.start(),
                planar_domain.end()
            )));
        }
        if !torsion.domain().fuzzy_encloses(&planar_domain, tolerance) {
            return Err(GeomError::domain_mismatch(format!(
                "torsion domain [{}, {}] does not enclose curve domain [{}, {}]",
                torsion.domain().start(),
                torsion.domain().end(),
                planar_domain.start(),
                planar_domain.end()
            )));
        }
        Ok(Self {
            planar,
            height,
            torsion,
            tolerance,
        })
    }

    /// Lift a planar curve with zero elevation and zero torsion.
    ///
    /// # Errors
    ///
    /// Never fails for a valid planar curve; the flat profiles cover any
    /// domain.
    pub fn flat(planar: CompositeCurve2d, tolerance: f64) -> Result<Self> {
        let domain = planar.domain();
        Self::new(
            planar,
            StackedFunction::constant(0.0, domain),
            StackedFunction::constant(0.0, domain),
            tolerance,
        )
    }

    /// Curve length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.planar.length()
    }

    /// Domain of the arc-length parameter.
    #[must_use]
    pub fn domain(&self) -> Interval {
        self.planar.domain()
    }

    /// Tolerance for fuzzy domain checks.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Point on the curve at arc length `s`.
    pub fn point(&self, s: f64) -> Result<Point3<f64>> {
        let xy = self.planar.point_global(s)?;
        let z = self.height.value_fuzzy(s, self.tolerance)?;
        Ok(Point3::new(xy.x, xy.y, z))
    }

    /// Pose on the curve: yaw from the planar tangent, zero pitch, roll from
    /// the torsion function.
    pub fn pose(&self, s: f64) -> Result<Pose3> {
        let planar = self.planar.pose_global(s)?;
        let z = self.height.value_fuzzy(s, self.tolerance)?;
        let roll = self.torsion.value_fuzzy(s, self.tolerance)?;
        Ok(Pose3::new(
            Point3::new(planar.position.x, planar.position.y, z),
            planar.heading,
            0.0,
            roll,
        ))
    }

    /// Sample the curve into a line string.
    ///
    /// Steps by `step` in arc length; the last sample lands exactly on the
    /// domain end.
    pub fn sample(&self, step: f64) -> Result<LineString3d> {
        if !step.is_finite() || step <= 0.0 {
            return Err(GeomError::InvalidParameter {
                parameter: "step",
                value: step,
            });
        }
        let mut vertices = Vec::new();
        for s in sample_positions(self.length(), step) {
            vertices.push(self.point(s)?);
        }
        LineString3d::new(vertices)
    }
}

/// Arc-length sample positions: multiples of `step` plus the exact endpoint.
///
/// Positions are computed by multiplication, not accumulation, so a length
/// that divides evenly by the step does not produce a near-duplicate sample
/// before the endpoint.
#[must_use]
pub fn sample_positions(length: f64, step: f64) -> Vec<f64> {
    let cutoff = length - 1e-12 * length.max(1.0);
    let mut positions = Vec::new();
    let mut i = 0u64;
    loop {
        let s = i as f64 * step;
        if s >= cutoff {
            break;
        }
        positions.push(s);
        i += 1;
    }
    positions.push(length);
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CubicFunction, CurveSegment2d, ExtrapolationPolicy, Line2d};
    use approx::assert_relative_eq;
    use nalgebra::{Isometry2, Vector2};

    fn straight(length: f64) -> CompositeCurve2d {
        let line = Line2d::new(
            length,
            Isometry2::new(Vector2::zeros(), 0.0),
            1e-9,
        )
        .unwrap();
        CompositeCurve2d::new(vec![(0.0, CurveSegment2d::Line(line))], 1e-9).unwrap()
    }

    fn ramp(length: f64, slope: f64) -> StackedFunction {
        StackedFunction::from_entries(
            vec![(
                0.0,
                CubicFunction::new(0.0, slope, 0.0, 0.0, Interval::unbounded()),
            )],
            Interval::new(0.0, length),
            ExtrapolationPolicy::ClampToNearest,
        )
        .unwrap()
    }

    #[test]
    fn test_flat_curve_points() {
        let curve = Curve3d::flat(straight(10.0), 1e-9).unwrap();
        let p = curve.point(4.0).unwrap();
        assert_relative_eq!(p.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_elevation_ramp() {
        let curve = Curve3d::new(
            straight(10.0),
            ramp(10.0, 0.1),
            StackedFunction::constant(0.0, Interval::new(0.0, 10.0)),
            1e-9,
        )
        .unwrap();
        assert_relative_eq!(curve.point(0.0).unwrap().z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(curve.point(10.0).unwrap().z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_torsion_reaches_pose() {
        let curve = Curve3d::new(
            straight(10.0),
            StackedFunction::constant(0.0, Interval::new(0.0, 10.0)),
            StackedFunction::constant(0.2, Interval::new(0.0, 10.0)),
            1e-9,
        )
        .unwrap();
        let pose = curve.pose(5.0).unwrap();
        assert_relative_eq!(pose.roll, 0.2, epsilon = 1e-12);
        assert_relative_eq!(pose.pitch, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_domain_mismatch() {
        let short_height = ramp(5.0, 0.0);
        let result = Curve3d::new(
            straight(10.0),
            short_height,
            StackedFunction::constant(0.0, Interval::new(0.0, 10.0)),
            1e-9,
        );
        assert!(matches!(result, Err(GeomError::DomainMismatch { .. })));
    }

    #[test]
    fn test_sample_endpoint_exact() {
        let curve = Curve3d::flat(straight(1.0), 1e-9).unwrap();
        let ls = curve.sample(0.3).unwrap();
        let last = ls.vertices().last().unwrap();
        assert_relative_eq!(last.x, 1.0, epsilon = 1e-12);
        // 0.0, 0.3, 0.6, 0.9, 1.0
        assert_eq!(ls.len(), 5);
    }

    #[test]
    fn test_sample_rejects_bad_step() {
        let curve = Curve3d::flat(straight(1.0), 1e-9).unwrap();
        assert!(curve.sample(0.0).is_err());
        assert!(curve.sample(-1.0).is_err());
    }
}
