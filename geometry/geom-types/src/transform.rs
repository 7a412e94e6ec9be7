//! Affine transform sequences.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single affine transform in homogeneous coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Affine3 {
    matrix: Matrix4<f64>,
}

impl Affine3 {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// A pure translation.
    #[must_use]
    pub fn translation(offset: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// A pure rotation.
    #[must_use]
    pub fn rotation(rotation: Rotation3<f64>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Wrap a homogeneous matrix.
    #[must_use]
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// The homogeneous matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Apply to a point.
    #[must_use]
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(p)
    }

    /// Extract the rotation block as Euler angles `(roll, pitch, yaw)`.
    ///
    /// Assumes the transform is a rigid motion (no shear or scale).
    #[must_use]
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        let r = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        Rotation3::from_matrix_unchecked(r).euler_angles()
    }
}

/// An ordered composition of affine transforms.
///
/// Transforms apply right-to-left: the first entry in the sequence is applied
/// to the point first.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AffineSequence3d {
    transforms: Vec<Affine3>,
}

impl AffineSequence3d {
    /// An empty (identity) sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform to be applied after the existing ones.
    #[must_use]
    pub fn then(mut self, transform: Affine3) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Reduce the sequence to a single transform.
    #[must_use]
    pub fn solve(&self) -> Affine3 {
        let mut result = Matrix4::identity();
        for t in &self.transforms {
            result = t.matrix() * result;
        }
        Affine3::from_matrix(result)
    }
}
