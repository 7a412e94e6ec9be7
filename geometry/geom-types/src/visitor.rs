//! Discretisation of geometry primitives.
//!
//! [`Geometry3d`] is the tagged union of everything the builders can attach
//! to a feature; [`discretize`] turns a primitive into polygons, a line
//! string, or a point for downstream surface construction. The match in
//! [`discretize`] replaces a double-dispatch visitor hierarchy.

use std::f64::consts::TAU;

use nalgebra::Point3;

use crate::curve3d::sample_positions;
use crate::{
    Circle3d, Curve3d, Cylinder3d, GeomError, LineString3d, ParametricSweep3d, Polygon3d, Pose3,
    Result,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The union of geometry primitives.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Geometry3d {
    /// A single point.
    Point(Point3<f64>),
    /// A polyline.
    LineString(LineString3d),
    /// A single polygon.
    Polygon(Polygon3d),
    /// A set of polygons forming one surface.
    MultiSurface(Vec<Polygon3d>),
    /// A circle (discretised to a disc polygon).
    Circle(Circle3d),
    /// A cylinder (discretised to a closed solid shell).
    Cylinder(Cylinder3d),
    /// A tube swept along a curve.
    Sweep(ParametricSweep3d),
    /// A bare curve.
    Curve(Curve3d),
}

/// Step sizes and tessellation counts used by [`discretize`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscretizationParams {
    /// Arc-length step for curves and boundaries.
    pub step_size: f64,
    /// Arc-length step along sweep spines.
    pub sweep_step_size: f64,
    /// Number of wedges for circles and cylinders (at least 3).
    pub circle_slices: usize,
}

impl Default for DiscretizationParams {
    fn default() -> Self {
        Self {
            step_size: 0.7,
            sweep_step_size: 0.3,
            circle_slices: 12,
        }
    }
}

impl DiscretizationParams {
    /// Check parameter sanity.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::InvalidParameter`] for a non-positive step or
    /// fewer than three slices.
    pub fn validate(&self) -> Result<()> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(GeomError::InvalidParameter {
                parameter: "step_size",
                value: self.step_size,
            });
        }
        if !self.sweep_step_size.is_finite() || self.sweep_step_size <= 0.0 {
            return Err(GeomError::InvalidParameter {
                parameter: "sweep_step_size",
                value: self.sweep_step_size,
            });
        }
        if self.circle_slices < 3 {
            return Err(GeomError::InvalidParameter {
                parameter: "circle_slices",
                value: self.circle_slices as f64,
            });
        }
        Ok(())
    }
}

/// The result of discretising a [`Geometry3d`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiscretizedGeometry {
    /// A single point.
    Point(Point3<f64>),
    /// A polyline.
    LineString(LineString3d),
    /// An open set of polygons.
    MultiSurface(Vec<Polygon3d>),
    /// A closed shell of polygons.
    Solid(Vec<Polygon3d>),
}

impl DiscretizedGeometry {
    /// True when the variant is a solid shell.
    #[must_use]
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid(_))
    }
}

/// Discretise a geometry primitive.
///
/// Circles and cylinders tessellate into `circle_slices` wedges with vertex 0
/// at local angle 0, counter-clockwise viewed from local +Z. Curve sampling
/// places the last vertex exactly at the domain end.
pub fn discretize(
    geometry: &Geometry3d,
    params: &DiscretizationParams,
) -> Result<DiscretizedGeometry> {
    params.validate()?;
    match geometry {
        Geometry3d::Point(p) => Ok(DiscretizedGeometry::Point(*p)),
        Geometry3d::LineString(ls) => Ok(DiscretizedGeometry::LineString(ls.clone())),
        Geometry3d::Polygon(poly) => Ok(DiscretizedGeometry::MultiSurface(vec![poly.clone()])),
        Geometry3d::MultiSurface(polys) => Ok(DiscretizedGeometry::MultiSurface(polys.clone())),
        Geometry3d::Circle(circle) => {
            let ring = circle_ring(&circle.pose, circle.radius, 0.0, params.circle_slices);
            Ok(DiscretizedGeometry::MultiSurface(vec![Polygon3d::new(
                ring,
            )?]))
        }
        Geometry3d::Cylinder(cylinder) => {
            Ok(DiscretizedGeometry::Solid(tessellate_cylinder(
                cylinder,
                params.circle_slices,
            )?))
        }
        Geometry3d::Sweep(sweep) => Ok(DiscretizedGeometry::Solid(tessellate_sweep(
            sweep, params,
        )?)),
        Geometry3d::Curve(curve) => Ok(DiscretizedGeometry::LineString(
            curve.sample(params.step_size)?,
        )),
    }
}

/// Ring of `slices` vertices of a circle at local height `z`.
fn circle_ring(pose: &Pose3, radius: f64, z: f64, slices: usize) -> Vec<Point3<f64>> {
    (0..slices)
        .map(|i| {
            let angle = TAU * i as f64 / slices as f64;
            pose.transform_point(&Point3::new(
                radius * angle.cos(),
                radius * angle.sin(),
                z,
            ))
        })
        .collect()
}

/// Closed shell of a cylinder: bottom cap, top cap, side quads.
fn tessellate_cylinder(cylinder: &Cylinder3d, slices: usize) -> Result<Vec<Polygon3d>> {
    let bottom = circle_ring(&cylinder.pose, cylinder.radius, 0.0, slices);
    let top = circle_ring(&cylinder.pose, cylinder.radius, cylinder.height, slices);

    let mut polygons = Vec::with_capacity(slices + 2);
    // Bottom cap wound to face outward (local -Z).
    let mut bottom_ring = bottom.clone();
    bottom_ring.reverse();
    polygons.push(Polygon3d::new(bottom_ring)?);
    polygons.push(Polygon3d::new(top.clone())?);

    for i in 0..slices {
        let j = (i + 1) % slices;
        polygons.push(Polygon3d::new(vec![bottom[i], bottom[j], top[j], top[i]])?);
    }
    Ok(polygons)
}

/// Shell of a tube around the sweep spine.
fn tessellate_sweep(sweep: &ParametricSweep3d, params: &DiscretizationParams) -> Result<Vec<Polygon3d>> {
    let positions = sample_positions(sweep.spine.length(), params.sweep_step_size);
    if positions.len() < 2 {
        return Err(GeomError::degenerate("sweep spine too short"));
    }

    // Cross-section rings live in the local YZ plane of each spine pose.
    let mut rings: Vec<Vec<Point3<f64>>> = Vec::with_capacity(positions.len());
    for &s in &positions {
        let pose = sweep.spine.pose(s)?;
        let ring = (0..params.circle_slices)
            .map(|i| {
                let angle = TAU * i as f64 / params.circle_slices as f64;
                pose.transform_point(&Point3::new(
                    0.0,
                    sweep.radius * angle.cos(),
                    sweep.radius * angle.sin(),
                ))
            })
            .collect();
        rings.push(ring);
    }

    let slices = params.circle_slices;
    let mut polygons = Vec::new();
    // End caps.
    let mut start_cap = rings[0].clone();
    start_cap.reverse();
    polygons.push(Polygon3d::new(start_cap)?);
    polygons.push(Polygon3d::new(rings[rings.len() - 1].clone())?);
    // Side quads between consecutive rings.
    for w in rings.windows(2) {
        for i in 0..slices {
            let j = (i + 1) % slices;
            polygons.push(Polygon3d::new(vec![w[0][i], w[0][j], w[1][j], w[1][i]])?);
        }
    }
    Ok(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompositeCurve2d, CurveSegment2d, Line2d};
    use approx::assert_relative_eq;
    use nalgebra::{Isometry2, Vector2};

    fn params() -> DiscretizationParams {
        DiscretizationParams {
            step_size: 0.5,
            sweep_step_size: 0.5,
            circle_slices: 8,
        }
    }

    fn straight_spine(length: f64) -> Curve3d {
        let line = Line2d::new(length, Isometry2::new(Vector2::zeros(), 0.0), 1e-9).unwrap();
        let planar = CompositeCurve2d::new(vec![(0.0, CurveSegment2d::Line(line))], 1e-9).unwrap();
        Curve3d::flat(planar, 1e-9).unwrap()
    }

    #[test]
    fn test_point_passthrough() {
        let g = Geometry3d::Point(Point3::new(1.0, 2.0, 3.0));
        let d = discretize(&g, &params()).unwrap();
        assert!(matches!(d, DiscretizedGeometry::Point(p) if p.x == 1.0));
    }

    #[test]
    fn test_circle_tessellation() {
        let circle = Circle3d::new(Pose3::identity(), 2.0, ).unwrap();
        let d = discretize(&Geometry3d::Circle(circle), &params()).unwrap();
        let DiscretizedGeometry::MultiSurface(polys) = d else {
            panic!("expected multi-surface");
        };
        assert_eq!(polys.len(), 1);
        let ring = polys[0].vertices();
        assert_eq!(ring.len(), 8);
        // Vertex 0 at local angle 0.
        assert_relative_eq!(ring[0].x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(ring[0].y, 0.0, epsilon = 1e-12);
        // Counter-clockwise from +Z.
        assert!(ring[1].y > 0.0);
        assert_relative_eq!(polys[0].normal().normalize().z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_shell() {
        let cylinder = Cylinder3d::new(Pose3::identity(), 1.0, 2.0).unwrap();
        let d = discretize(&Geometry3d::Cylinder(cylinder), &params()).unwrap();
        let DiscretizedGeometry::Solid(polys) = d else {
            panic!("expected solid");
        };
        // Two caps plus eight side quads.
        assert_eq!(polys.len(), 10);
        // Bottom cap faces down.
        assert!(polys[0].normal().z < 0.0);
        // Top cap faces up.
        assert!(polys[1].normal().z > 0.0);
    }

    #[test]
    fn test_sweep_shell() {
        let sweep = ParametricSweep3d::new(straight_spine(1.0), 0.2).unwrap();
        let d = discretize(&Geometry3d::Sweep(sweep), &params()).unwrap();
        let DiscretizedGeometry::Solid(polys) = d else {
            panic!("expected solid");
        };
        // 3 rings (0.0, 0.5, 1.0) -> 2 bands of 8 quads, plus 2 caps.
        assert_eq!(polys.len(), 2 + 2 * 8);
    }

    #[test]
    fn test_curve_sampling() {
        let d = discretize(&Geometry3d::Curve(straight_spine(1.0)), &params()).unwrap();
        let DiscretizedGeometry::LineString(ls) = d else {
            panic!("expected line string");
        };
        // 0.0, 0.5, then the exact endpoint.
        assert_eq!(ls.len(), 3);
        assert_relative_eq!(ls.vertices()[2].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_params() {
        let bad = DiscretizationParams {
            circle_slices: 2,
            ..params()
        };
        let g = Geometry3d::Point(Point3::origin());
        assert!(discretize(&g, &bad).is_err());
    }
}
