//! Numeric primitives for road geometry.
//!
//! This crate provides the math kernel used by the road-network builders:
//!
//! - [`Interval`] - closed ranges with fuzzy containment
//! - [`UnivariateFunction`] - [`LinearFunction`], [`CubicFunction`], and the
//!   piecewise [`StackedFunction`]
//! - [`PlanarCurve`] - plan-view primitives ([`Line2d`], [`Arc2d`],
//!   [`Spiral2d`], [`CubicCurve2d`], [`ParamCubicCurve2d`]) and the
//!   [`CompositeCurve2d`] reference line
//! - [`Curve3d`] - a planar curve lifted by height and torsion functions
//! - [`Geometry3d`] / [`discretize`] - the tagged geometry union and its
//!   discretisation into points, line strings, and polygon sets
//!
//! # Parameterisation
//!
//! Curves are parameterised by arc length `s in [0, length]`, not by a
//! normalised parameter. Every domain check takes a tolerance; the crate
//! never compares `s` values with bare floating-point equality.
//!
//! # Example
//!
//! ```
//! use geom_types::{Curve3d, CompositeCurve2d, CurveSegment2d, Line2d};
//! use nalgebra::{Isometry2, Vector2};
//!
//! // A 10 m straight reference line at the origin.
//! let line = Line2d::new(10.0, Isometry2::new(Vector2::zeros(), 0.0), 1e-9).unwrap();
//! let planar = CompositeCurve2d::new(vec![(0.0, CurveSegment2d::Line(line))], 1e-9).unwrap();
//! let curve = Curve3d::flat(planar, 1e-9).unwrap();
//!
//! let p = curve.point(4.0).unwrap();
//! assert!((p.x - 4.0).abs() < 1e-12);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod curve2d;
mod curve3d;
mod error;
mod function;
mod interval;
mod polygon;
mod pose;
mod solid;
pub mod spiral;
mod transform;
mod visitor;

pub use curve2d::{
    Arc2d, CompositeCurve2d, CubicCurve2d, CurveSegment2d, Line2d, ParamCubicCurve2d, ParamRange,
    PlanarCurve, Spiral2d,
};
pub use curve3d::{sample_positions, Curve3d};
pub use error::GeomError;
pub use function::{
    CubicFunction, ExtrapolationPolicy, LinearFunction, StackedFunction, UnivariateFunction,
};
pub use interval::Interval;
pub use polygon::{Circle3d, LineString3d, Polygon3d};
pub use pose::{Pose2, Pose3};
pub use solid::{Cylinder3d, ParametricSweep3d};
pub use transform::{Affine3, AffineSequence3d};
pub use visitor::{discretize, DiscretizationParams, DiscretizedGeometry, Geometry3d};

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry2, Point2, Point3, Vector2, Vector3};

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
