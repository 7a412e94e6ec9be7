//! Road-level elements: plan view, profiles, and links.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::lanes::Lanes;
use crate::objects::{RoadObject, RoadSignal};

/// Driving side declared on the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrafficRule {
    /// Right-hand traffic.
    #[default]
    Rht,
    /// Left-hand traffic.
    Lht,
}

/// Where a link attaches on the target element's reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactPoint {
    /// Attach at `s = 0`.
    Start,
    /// Attach at `s = length`.
    End,
}

/// The kind of element a road link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkedElement {
    /// Another road.
    Road,
    /// A junction.
    Junction,
}

/// A predecessor or successor reference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadLink {
    /// Kind of the linked element.
    pub element: LinkedElement,
    /// Identifier of the linked element.
    pub id: String,
    /// Contact point on the linked element (absent for junction links).
    pub contact_point: Option<ContactPoint>,
}

/// Predecessor/successor pair of a road.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    /// Element before the road start.
    pub predecessor: Option<RoadLink>,
    /// Element after the road end.
    pub successor: Option<RoadLink>,
}

/// Shape variant of a plan-view geometry segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometryKind {
    /// Straight line.
    Line,
    /// Constant-curvature arc.
    Arc {
        /// Signed curvature (positive bends left).
        curvature: f64,
    },
    /// Euler spiral with linearly interpolated curvature.
    Spiral {
        /// Curvature at the segment start.
        curv_start: f64,
        /// Curvature at the segment end.
        curv_end: f64,
    },
    /// Cubic polynomial `v = a + b u + c u^2 + d u^3`.
    Poly3 {
        /// Constant coefficient.
        a: f64,
        /// Linear coefficient.
        b: f64,
        /// Quadratic coefficient.
        c: f64,
        /// Cubic coefficient.
        d: f64,
    },
    /// Parametric cubic polynomial over `p`.
    ParamPoly3 {
        /// `u(p)` coefficients `aU..dU`.
        u: [f64; 4],
        /// `v(p)` coefficients `aV..dV`.
        v: [f64; 4],
        /// Whether `p` runs over arc length or `[0, 1]`.
        normalized: bool,
    },
}

/// One plan-view geometry segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanViewGeometry {
    /// Start position along the reference line.
    pub s: f64,
    /// Inertial x at the segment start.
    pub x: f64,
    /// Inertial y at the segment start.
    pub y: f64,
    /// Inertial heading at the segment start, radians.
    pub hdg: f64,
    /// Segment length.
    pub length: f64,
    /// Shape variant.
    pub kind: GeometryKind,
}

impl PlanViewGeometry {
    /// Whether the required numerics are finite.
    #[must_use]
    pub fn has_finite_fields(&self) -> bool {
        let base = self.s.is_finite()
            && self.x.is_finite()
            && self.y.is_finite()
            && self.hdg.is_finite()
            && self.length.is_finite();
        let kind = match &self.kind {
            GeometryKind::Line => true,
            GeometryKind::Arc { curvature } => curvature.is_finite(),
            GeometryKind::Spiral {
                curv_start,
                curv_end,
            } => curv_start.is_finite() && curv_end.is_finite(),
            GeometryKind::Poly3 { a, b, c, d } => {
                a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite()
            }
            GeometryKind::ParamPoly3 { u, v, .. } => {
                u.iter().all(|c| c.is_finite()) && v.iter().all(|c| c.is_finite())
            }
        };
        base && kind
    }
}

/// A cubic polynomial record keyed by `s`: `a + b ds + c ds^2 + d ds^3`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Poly3Entry {
    /// Start position of the record.
    pub s: f64,
    /// Constant coefficient.
    pub a: f64,
    /// Linear coefficient.
    pub b: f64,
    /// Quadratic coefficient.
    pub c: f64,
    /// Cubic coefficient.
    pub d: f64,
}

impl Poly3Entry {
    /// Whether all fields are finite.
    #[must_use]
    pub fn has_finite_fields(&self) -> bool {
        self.s.is_finite()
            && self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.d.is_finite()
    }
}

/// A road-shape record: a lateral polynomial at `(s, t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeEntry {
    /// Position along the reference line.
    pub s: f64,
    /// Lateral position of the record.
    pub t: f64,
    /// Constant coefficient.
    pub a: f64,
    /// Linear coefficient.
    pub b: f64,
    /// Quadratic coefficient.
    pub c: f64,
    /// Cubic coefficient.
    pub d: f64,
}

/// Elevation records of a road.
///
/// Present whenever the dataset declares an `<elevationProfile>` element,
/// even one without entries; the healer clears empty profiles.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElevationProfile {
    /// Elevation records, cubic in `s - entry.s`.
    pub entries: Vec<Poly3Entry>,
}

/// Superelevation and shape records of the lateral profile.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LateralProfile {
    /// Banking of the cross-section about the reference line.
    pub superelevation: Vec<Poly3Entry>,
    /// Free-form lateral shape records.
    pub shape: Vec<ShapeEntry>,
}

impl LateralProfile {
    /// Whether neither record list has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.superelevation.is_empty() && self.shape.is_empty()
    }
}

/// A road: reference line, profiles, lanes, objects, and links.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Road {
    /// Unique road identifier.
    pub id: String,
    /// Road name (may be empty).
    pub name: String,
    /// Total length of the reference line.
    pub length: f64,
    /// Junction this road belongs to, if any.
    pub junction: Option<String>,
    /// Driving side.
    pub rule: TrafficRule,
    /// Plan-view geometry segments.
    pub plan_view: Vec<PlanViewGeometry>,
    /// Elevation records, when an elevation profile is declared.
    pub elevation_profile: Option<ElevationProfile>,
    /// Superelevation and shape records.
    pub lateral_profile: LateralProfile,
    /// Lane offset and lane sections.
    pub lanes: Lanes,
    /// Road objects.
    pub objects: Vec<RoadObject>,
    /// Road signals.
    pub signals: Vec<RoadSignal>,
    /// Predecessor/successor links.
    pub link: Link,
}

impl Road {
    /// Whether the road declares at least one plan-view segment.
    #[must_use]
    pub fn has_plan_view(&self) -> bool {
        !self.plan_view.is_empty()
    }

    /// Whether a non-zero lane offset record exists.
    #[must_use]
    pub fn has_nonzero_lane_offset(&self) -> bool {
        self.lanes.lane_offset.iter().any(|entry| {
            entry.a.abs() > 0.0 || entry.b.abs() > 0.0 || entry.c.abs() > 0.0 || entry.d.abs() > 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_fields() {
        let geometry = PlanViewGeometry {
            s: 0.0,
            x: 0.0,
            y: 0.0,
            hdg: 0.0,
            length: 10.0,
            kind: GeometryKind::Arc { curvature: 0.01 },
        };
        assert!(geometry.has_finite_fields());

        let broken = PlanViewGeometry {
            kind: GeometryKind::Arc {
                curvature: f64::NAN,
            },
            ..geometry
        };
        assert!(!broken.has_finite_fields());
    }

    #[test]
    fn test_nonzero_lane_offset() {
        let mut road = Road {
            id: "1".into(),
            name: String::new(),
            length: 100.0,
            junction: None,
            rule: TrafficRule::default(),
            plan_view: Vec::new(),
            elevation_profile: None,
            lateral_profile: LateralProfile::default(),
            lanes: Lanes::default(),
            objects: Vec::new(),
            signals: Vec::new(),
            link: Link::default(),
        };
        assert!(!road.has_nonzero_lane_offset());

        road.lanes.lane_offset.push(Poly3Entry {
            s: 0.0,
            a: 0.5,
            b: 0.0,
            c: 0.0,
            d: 0.0,
        });
        assert!(road.has_nonzero_lane_offset());
    }
}
