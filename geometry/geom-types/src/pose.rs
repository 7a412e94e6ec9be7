//! Position-plus-orientation types.

use nalgebra::{Isometry3, Point2, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A planar pose: a point and a heading angle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose2 {
    /// Position in the plane.
    pub position: Point2<f64>,
    /// Heading in radians, counter-clockwise from +X.
    pub heading: f64,
}

impl Pose2 {
    /// Create a pose from position and heading.
    #[must_use]
    pub fn new(position: Point2<f64>, heading: f64) -> Self {
        Self { position, heading }
    }
}

/// A spatial pose: a point and a rotation given as yaw, pitch, roll.
///
/// Yaw is the heading about +Z, pitch about the transverse axis, roll the
/// torsion about the tangent. The rotation convention matches
/// `nalgebra::Rotation3::from_euler_angles(roll, pitch, yaw)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose3 {
    /// Position in space.
    pub position: Point3<f64>,
    /// Heading about +Z in radians.
    pub yaw: f64,
    /// Pitch in radians.
    pub pitch: f64,
    /// Roll (torsion) in radians.
    pub roll: f64,
}

impl Pose3 {
    /// Create a pose from position and Euler angles.
    #[must_use]
    pub fn new(position: Point3<f64>, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            position,
            yaw,
            pitch,
            roll,
        }
    }

    /// A pose at the origin with identity rotation.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Point3::origin(), 0.0, 0.0, 0.0)
    }

    /// The rotation matrix of this pose.
    #[must_use]
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(self.roll, self.pitch, self.yaw)
    }

    /// The pose as a rigid transform (local frame -> world frame).
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.position.coords),
            UnitQuaternion::from_rotation_matrix(&self.rotation()),
        )
    }

    /// Transform a point given in this pose's local frame into world
    /// coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.to_isometry() * local
    }

    /// The unit tangent (local +X) of this pose in world coordinates.
    #[must_use]
    pub fn tangent(&self) -> Vector3<f64> {
        self.rotation() * Vector3::x()
    }

    /// The unit lateral direction (local +Y, left of travel) in world
    /// coordinates.
    #[must_use]
    pub fn lateral(&self) -> Vector3<f64> {
        self.rotation() * Vector3::y()
    }
}
