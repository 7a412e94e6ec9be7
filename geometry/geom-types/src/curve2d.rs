//! Planar curves parameterised by arc length.
//!
//! These are the plan-view primitives of a road reference line. Every curve
//! has a domain `[0, length]`, a tolerance for fuzzy domain checks, and a
//! rigid placement that maps its local frame into the map frame.

use nalgebra::{Isometry2, Point2, Vector2};

use crate::spiral::clothoid_local;
use crate::{GeomError, Interval, Pose2, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A planar curve over `s in [0, length]` with a placement in the map frame.
pub trait PlanarCurve {
    /// Curve length (the domain is `[0, length]`).
    fn length(&self) -> f64;

    /// Tolerance used for fuzzy domain checks.
    fn tolerance(&self) -> f64;

    /// Rigid placement of the curve's local frame in the map frame.
    fn placement(&self) -> Isometry2<f64>;

    /// Point on the curve in the curve's local frame.
    fn point_local(&self, s: f64) -> Result<Point2<f64>>;

    /// Point and tangent heading in the curve's local frame.
    fn pose_local(&self, s: f64) -> Result<Pose2>;

    /// Domain of the arc-length parameter.
    fn domain(&self) -> Interval {
        Interval::new(0.0, self.length())
    }

    /// Point on the curve in the map frame.
    fn point_global(&self, s: f64) -> Result<Point2<f64>> {
        Ok(self.placement() * self.point_local(s)?)
    }

    /// Pose on the curve in the map frame.
    fn pose_global(&self, s: f64) -> Result<Pose2> {
        let local = self.pose_local(s)?;
        let placement = self.placement();
        Ok(Pose2::new(
            placement * local.position,
            placement.rotation.angle() + local.heading,
        ))
    }
}

/// Clamp `s` into the domain, accepting values within the tolerance.
fn checked_s(domain: Interval, s: f64, tol: f64) -> Result<f64> {
    if domain.fuzzy_contains(s, tol) {
        Ok(domain.clamp(s))
    } else {
        Err(GeomError::out_of_domain(s, domain))
    }
}

/// A straight segment along local +X.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line2d {
    length: f64,
    placement: Isometry2<f64>,
    tolerance: f64,
}

impl Line2d {
    /// Create a line of the given length.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for non-finite or negative length.
    pub fn new(length: f64, placement: Isometry2<f64>, tolerance: f64) -> Result<Self> {
        if !length.is_finite() || length < 0.0 {
            return Err(GeomError::degenerate(format!("line length {length}")));
        }
        Ok(Self {
            length,
            placement,
            tolerance,
        })
    }
}

impl PlanarCurve for Line2d {
    fn length(&self) -> f64 {
        self.length
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn placement(&self) -> Isometry2<f64> {
        self.placement
    }

    fn point_local(&self, s: f64) -> Result<Point2<f64>> {
        let s = checked_s(self.domain(), s, self.tolerance)?;
        Ok(Point2::new(s, 0.0))
    }

    fn pose_local(&self, s: f64) -> Result<Pose2> {
        Ok(Pose2::new(self.point_local(s)?, 0.0))
    }
}

/// A circular arc with signed constant curvature (positive bends left).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arc2d {
    curvature: f64,
    length: f64,
    placement: Isometry2<f64>,
    tolerance: f64,
}

impl Arc2d {
    /// Create an arc from signed curvature and length.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for zero or non-finite curvature.
    pub fn new(
        curvature: f64,
        length: f64,
        placement: Isometry2<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        if !curvature.is_finite() || curvature.abs() < 1e-15 {
            return Err(GeomError::degenerate(format!("arc curvature {curvature}")));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(GeomError::degenerate(format!("arc length {length}")));
        }
        Ok(Self {
            curvature,
            length,
            placement,
            tolerance,
        })
    }

    /// The signed curvature.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.curvature
    }
}

impl PlanarCurve for Arc2d {
    fn length(&self) -> f64 {
        self.length
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn placement(&self) -> Isometry2<f64> {
        self.placement
    }

    fn point_local(&self, s: f64) -> Result<Point2<f64>> {
        let s = checked_s(self.domain(), s, self.tolerance)?;
        let angle = s * self.curvature;
        let radius = 1.0 / self.curvature;
        Ok(Point2::new(
            radius * angle.sin(),
            radius * (1.0 - angle.cos()),
        ))
    }

    fn pose_local(&self, s: f64) -> Result<Pose2> {
        let point = self.point_local(s)?;
        let s = self.domain().clamp(s);
        Ok(Pose2::new(point, s * self.curvature))
    }
}

/// An Euler spiral whose curvature interpolates linearly over the length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spiral2d {
    curv_start: f64,
    curv_end: f64,
    length: f64,
    placement: Isometry2<f64>,
    tolerance: f64,
}

impl Spiral2d {
    /// Create a spiral from its start and end curvature.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for non-finite curvatures or a
    /// non-positive length.
    pub fn new(
        curv_start: f64,
        curv_end: f64,
        length: f64,
        placement: Isometry2<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        if !curv_start.is_finite() || !curv_end.is_finite() {
            return Err(GeomError::degenerate("spiral curvature not finite"));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(GeomError::degenerate(format!("spiral length {length}")));
        }
        Ok(Self {
            curv_start,
            curv_end,
            length,
            placement,
            tolerance,
        })
    }

    fn curvature_rate(&self) -> f64 {
        (self.curv_end - self.curv_start) / self.length
    }
}

impl PlanarCurve for Spiral2d {
    fn length(&self) -> f64 {
        self.length
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn placement(&self) -> Isometry2<f64> {
        self.placement
    }

    fn point_local(&self, s: f64) -> Result<Point2<f64>> {
        let s = checked_s(self.domain(), s, self.tolerance)?;
        let (x, y, _) = clothoid_local(self.curv_start, self.curvature_rate(), s);
        if !x.is_finite() || !y.is_finite() {
            return Err(GeomError::numerical(format!(
                "clothoid evaluation at s={s} produced non-finite coordinates"
            )));
        }
        Ok(Point2::new(x, y))
    }

    fn pose_local(&self, s: f64) -> Result<Pose2> {
        let s = checked_s(self.domain(), s, self.tolerance)?;
        let (x, y, heading) = clothoid_local(self.curv_start, self.curvature_rate(), s);
        if !x.is_finite() || !y.is_finite() || !heading.is_finite() {
            return Err(GeomError::numerical(format!(
                "clothoid evaluation at s={s} produced non-finite pose"
            )));
        }
        Ok(Pose2::new(Point2::new(x, y), heading))
    }
}

/// A cubic polynomial `v = a + b u + c u^2 + d u^3` along the local abscissa.
///
/// The arc-length parameter is taken as the local abscissa `u`, matching the
/// reference implementations of the format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicCurve2d {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    length: f64,
    placement: Isometry2<f64>,
    tolerance: f64,
}

impl CubicCurve2d {
    /// Create a cubic polynomial curve.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for non-finite coefficients or a
    /// negative length.
    pub fn new(
        coefficients: [f64; 4],
        length: f64,
        placement: Isometry2<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(GeomError::degenerate("cubic coefficients not finite"));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(GeomError::degenerate(format!("cubic length {length}")));
        }
        let [a, b, c, d] = coefficients;
        Ok(Self {
            a,
            b,
            c,
            d,
            length,
            placement,
            tolerance,
        })
    }
}

impl PlanarCurve for CubicCurve2d {
    fn length(&self) -> f64 {
        self.length
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn placement(&self) -> Isometry2<f64> {
        self.placement
    }

    fn point_local(&self, s: f64) -> Result<Point2<f64>> {
        let u = checked_s(self.domain(), s, self.tolerance)?;
        let v = self.a + u * (self.b + u * (self.c + u * self.d));
        Ok(Point2::new(u, v))
    }

    fn pose_local(&self, s: f64) -> Result<Pose2> {
        let point = self.point_local(s)?;
        let u = point.x;
        let slope = self.b + u * (2.0 * self.c + u * 3.0 * self.d);
        Ok(Pose2::new(point, slope.atan()))
    }
}

/// Interpretation of the parameter of a [`ParamCubicCurve2d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamRange {
    /// `p` runs over `[0, length]`.
    #[default]
    ArcLength,
    /// `p` runs over `[0, 1]`.
    Normalized,
}

/// A parametric cubic `(u(p), v(p))` with cubic polynomials in `p`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamCubicCurve2d {
    u: [f64; 4],
    v: [f64; 4],
    p_range: ParamRange,
    length: f64,
    placement: Isometry2<f64>,
    tolerance: f64,
}

impl ParamCubicCurve2d {
    /// Create a parametric cubic from `aU..dU` and `aV..dV`.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] for non-finite coefficients or a
    /// non-positive length.
    pub fn new(
        u: [f64; 4],
        v: [f64; 4],
        p_range: ParamRange,
        length: f64,
        placement: Isometry2<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        if u.iter().chain(v.iter()).any(|c| !c.is_finite()) {
            return Err(GeomError::degenerate("parametric coefficients not finite"));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(GeomError::degenerate(format!(
                "parametric cubic length {length}"
            )));
        }
        Ok(Self {
            u,
            v,
            p_range,
            length,
            placement,
            tolerance,
        })
    }

    fn parameter(&self, s: f64) -> f64 {
        match self.p_range {
            ParamRange::ArcLength => s,
            ParamRange::Normalized => s / self.length,
        }
    }
}

fn horner(c: &[f64; 4], p: f64) -> f64 {
    c[0] + p * (c[1] + p * (c[2] + p * c[3]))
}

fn horner_slope(c: &[f64; 4], p: f64) -> f64 {
    c[1] + p * (2.0 * c[2] + p * 3.0 * c[3])
}

impl PlanarCurve for ParamCubicCurve2d {
    fn length(&self) -> f64 {
        self.length
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn placement(&self) -> Isometry2<f64> {
        self.placement
    }

    fn point_local(&self, s: f64) -> Result<Point2<f64>> {
        let s = checked_s(self.domain(), s, self.tolerance)?;
        let p = self.parameter(s);
        Ok(Point2::new(horner(&self.u, p), horner(&self.v, p)))
    }

    fn pose_local(&self, s: f64) -> Result<Pose2> {
        let point = self.point_local(s)?;
        let p = self.parameter(self.domain().clamp(s));
        let du = horner_slope(&self.u, p);
        let dv = horner_slope(&self.v, p);
        Ok(Pose2::new(point, dv.atan2(du)))
    }
}

/// The tagged union of planar curve segments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CurveSegment2d {
    /// Straight segment.
    Line(Line2d),
    /// Constant-curvature arc.
    Arc(Arc2d),
    /// Euler spiral.
    Spiral(Spiral2d),
    /// Cubic polynomial.
    Cubic(CubicCurve2d),
    /// Parametric cubic polynomial.
    ParamCubic(ParamCubicCurve2d),
}

impl PlanarCurve for CurveSegment2d {
    fn length(&self) -> f64 {
        match self {
            Self::Line(c) => c.length(),
            Self::Arc(c) => c.length(),
            Self::Spiral(c) => c.length(),
            Self::Cubic(c) => c.length(),
            Self::ParamCubic(c) => c.length(),
        }
    }

    fn tolerance(&self) -> f64 {
        match self {
            Self::Line(c) => c.tolerance(),
            Self::Arc(c) => c.tolerance(),
            Self::Spiral(c) => c.tolerance(),
            Self::Cubic(c) => c.tolerance(),
            Self::ParamCubic(c) => c.tolerance(),
        }
    }

    fn placement(&self) -> Isometry2<f64> {
        match self {
            Self::Line(c) => c.placement(),
            Self::Arc(c) => c.placement(),
            Self::Spiral(c) => c.placement(),
            Self::Cubic(c) => c.placement(),
            Self::ParamCubic(c) => c.placement(),
        }
    }

    fn point_local(&self, s: f64) -> Result<Point2<f64>> {
        match self {
            Self::Line(c) => c.point_local(s),
            Self::Arc(c) => c.point_local(s),
            Self::Spiral(c) => c.point_local(s),
            Self::Cubic(c) => c.point_local(s),
            Self::ParamCubic(c) => c.point_local(s),
        }
    }

    fn pose_local(&self, s: f64) -> Result<Pose2> {
        match self {
            Self::Line(c) => c.pose_local(s),
            Self::Arc(c) => c.pose_local(s),
            Self::Spiral(c) => c.pose_local(s),
            Self::Cubic(c) => c.pose_local(s),
            Self::ParamCubic(c) => c.pose_local(s),
        }
    }
}

/// An ordered sequence of placed segments butted along a shared arc-length
/// axis.
///
/// Lookup dispatches to the segment whose sub-range contains `s`; the seam
/// between two segments resolves to the later segment's start.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompositeCurve2d {
    segments: Vec<(f64, CurveSegment2d)>,
    length: f64,
    tolerance: f64,
}

impl CompositeCurve2d {
    /// Build from `(start_s, segment)` pairs in ascending start order.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Degenerate`] when `segments` is empty.
    pub fn new(segments: Vec<(f64, CurveSegment2d)>, tolerance: f64) -> Result<Self> {
        let Some(last) = segments.last() else {
            return Err(GeomError::degenerate("composite curve with no segments"));
        };
        let length = last.0 + last.1.length();
        Ok(Self {
            segments,
            length,
            tolerance,
        })
    }

    /// Total curve length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Tolerance used for fuzzy domain checks.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Domain of the arc-length parameter.
    #[must_use]
    pub fn domain(&self) -> Interval {
        Interval::new(0.0, self.length)
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The segments with their start offsets.
    #[must_use]
    pub fn segments(&self) -> &[(f64, CurveSegment2d)] {
        &self.segments
    }

    fn locate(&self, s: f64) -> Result<(f64, &CurveSegment2d)> {
        let s = checked_s(self.domain(), s, self.tolerance)?;
        let (start, segment) = self
            .segments
            .iter()
            .rev()
            .find(|(start, _)| *start <= s + self.tolerance)
            .ok_or_else(|| GeomError::out_of_domain(s, self.domain()))?;
        Ok((s - start, segment))
    }

    /// Point in the map frame at arc length `s`.
    pub fn point_global(&self, s: f64) -> Result<Point2<f64>> {
        let (local_s, segment) = self.locate(s)?;
        segment.point_global(local_s)
    }

    /// Pose in the map frame at arc length `s`.
    pub fn pose_global(&self, s: f64) -> Result<Pose2> {
        let (local_s, segment) = self.locate(s)?;
        segment.pose_global(local_s)
    }
}
