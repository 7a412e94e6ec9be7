//! Linear geometry in 3D: line strings, polygons, circles.

use nalgebra::{Point3, Vector3};

use crate::{GeomError, Pose3, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A polyline with at least two vertices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineString3d {
    vertices: Vec<Point3<f64>>,
}

impl LineString3d {
    /// Create a line string.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] with fewer than two vertices or any
    /// non-finite coordinate.
    pub fn new(vertices: Vec<Point3<f64>>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(GeomError::degenerate(format!(
                "line string with {} vertices",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.coords.iter().all(|c| c.is_finite())) {
            return Err(GeomError::degenerate("line string with non-finite vertex"));
        }
        Ok(Self { vertices })
    }

    /// The vertices in order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a line string has at least two vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sum of segment lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum()
    }

    /// Translate every vertex.
    #[must_use]
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v + offset).collect(),
        }
    }
}

/// A planar polygon given by its boundary ring (not closed; the closing edge
/// is implicit).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon3d {
    vertices: Vec<Point3<f64>>,
}

impl Polygon3d {
    /// Create a polygon from its boundary vertices.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] with fewer than three vertices or
    /// any non-finite coordinate.
    pub fn new(vertices: Vec<Point3<f64>>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "polygon with {} vertices",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.coords.iter().all(|c| c.is_finite())) {
            return Err(GeomError::degenerate("polygon with non-finite vertex"));
        }
        Ok(Self { vertices })
    }

    /// The boundary vertices in order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Number of boundary vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a polygon has at least three vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Area-weighted normal (Newell's method); zero for degenerate rings.
    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        let mut n = Vector3::zeros();
        for i in 0..self.vertices.len() {
            let a = &self.vertices[i];
            let b = &self.vertices[(i + 1) % self.vertices.len()];
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        n * 0.5
    }

    /// Unsigned area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal().norm()
    }

    /// Translate every vertex.
    #[must_use]
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v + offset).collect(),
        }
    }
}

/// A circle in 3D given by the pose of its centre; the circle lies in the
/// pose's local XY plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle3d {
    /// Pose of the centre; local +Z is the circle normal.
    pub pose: Pose3,
    /// Radius.
    pub radius: f64,
}

impl Circle3d {
    /// Create a circle.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for a non-positive radius.
    pub fn new(pose: Pose3, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeomError::degenerate(format!("circle radius {radius}")));
        }
        Ok(Self { pose, radius })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_string_length() {
        let ls = LineString3d::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(3.0, 4.0, 2.0),
        ])
        .unwrap();
        assert_relative_eq!(ls.length(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_line_string_too_short() {
        assert!(LineString3d::new(vec![Point3::origin()]).is_err());
    }

    #[test]
    fn test_polygon_normal_and_area() {
        // Unit square in the XY plane, counter-clockwise.
        let poly = Polygon3d::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        let n = poly.normal();
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(poly.area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polygon_rejects_non_finite() {
        let result = Polygon3d::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_circle_radius() {
        assert!(Circle3d::new(Pose3::identity(), 0.0).is_err());
        assert!(Circle3d::new(Pose3::identity(), 1.5).is_ok());
    }
}
