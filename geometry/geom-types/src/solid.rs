//! Solid primitives: cylinders and parametric sweeps.

use crate::{Curve3d, GeomError, Pose3, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A right circular cylinder: base circle in the pose's local XY plane,
/// extruded along local +Z by `height`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cylinder3d {
    /// Pose of the base centre.
    pub pose: Pose3,
    /// Radius.
    pub radius: f64,
    /// Extrusion height along local +Z.
    pub height: f64,
}

impl Cylinder3d {
    /// Create a cylinder.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for non-positive radius or height.
    pub fn new(pose: Pose3, radius: f64, height: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeomError::degenerate(format!("cylinder radius {radius}")));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(GeomError::degenerate(format!("cylinder height {height}")));
        }
        Ok(Self {
            pose,
            radius,
            height,
        })
    }
}

/// A tube swept along a spine curve with a circular cross-section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParametricSweep3d {
    /// The spine curve.
    pub spine: Curve3d,
    /// Cross-section radius.
    pub radius: f64,
}

impl ParametricSweep3d {
    /// Create a sweep.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for a non-positive radius.
    pub fn new(spine: Curve3d, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeomError::degenerate(format!("sweep radius {radius}")));
        }
        Ok(Self { spine, radius })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompositeCurve2d, CurveSegment2d, Line2d};
    use nalgebra::{Isometry2, Vector2};

    #[test]
    fn test_cylinder_validation() {
        assert!(Cylinder3d::new(Pose3::identity(), 1.0, 2.0).is_ok());
        assert!(Cylinder3d::new(Pose3::identity(), -1.0, 2.0).is_err());
        assert!(Cylinder3d::new(Pose3::identity(), 1.0, 0.0).is_err());
    }

    #[test]
    fn test_sweep_validation() {
        let line = Line2d::new(5.0, Isometry2::new(Vector2::zeros(), 0.0), 1e-9).unwrap();
        let planar =
            CompositeCurve2d::new(vec![(0.0, CurveSegment2d::Line(line))], 1e-9).unwrap();
        let spine = Curve3d::flat(planar, 1e-9).unwrap();
        assert!(ParametricSweep3d::new(spine.clone(), 0.1).is_ok());
        assert!(ParametricSweep3d::new(spine, f64::NAN).is_err());
    }
}
