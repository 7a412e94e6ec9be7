//! Reference-line construction.
//!
//! Composes the plan-view segments of a road into a [`CompositeCurve2d`],
//! stacks the elevation and superelevation profiles, and lifts the result to
//! a [`Curve3d`].

use geom_types::{
    Arc2d, CompositeCurve2d, CubicCurve2d, CubicFunction, Curve3d, CurveSegment2d,
    ExtrapolationPolicy, Interval, Line2d, ParamCubicCurve2d, ParamRange, PlanarCurve, Spiral2d,
    StackedFunction,
};
use nalgebra::{Isometry2, Vector2};
use opendrive_types::{GeometryKind, PlanViewGeometry, Poly3Entry, Road};

use opendrive_eval::{DataQualityMessage, MessageCode, MessageList, Severity, SourceId};

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};

/// Curvature magnitude below which an arc or spiral degenerates to a line.
const STRAIGHT_CURVATURE: f64 = 1e-12;

/// Build the 3D reference curve of a road.
///
/// Gaps or overlaps between consecutive plan-view segments beyond the
/// distance tolerance are reported as warnings, never aborts.
///
/// # Errors
///
/// Fails when the road has no plan-view geometry or a segment cannot be
/// constructed.
pub fn build_reference_curve(
    road: &Road,
    config: &BuildConfig,
    messages: &mut MessageList,
) -> Result<Curve3d> {
    if road.plan_view.is_empty() {
        return Err(BuildError::missing_geometry(&road.id, "empty plan view"));
    }

    let mut segments = Vec::with_capacity(road.plan_view.len());
    for geometry in &road.plan_view {
        let segment = build_segment(road, geometry, config)?;
        segments.push((geometry.s, segment));
    }

    report_discontinuities(road, &segments, config, messages);

    let planar = CompositeCurve2d::new(segments, config.tolerance)
        .map_err(|e| BuildError::numerical(&road.id, e))?;
    let domain = Interval::new(0.0, road.length.max(planar.length()));

    let height = stack_profile(
        road.elevation_profile
            .as_ref()
            .map_or(&[][..], |p| &p.entries),
        domain,
    )
    .map_err(|e| BuildError::numerical(&road.id, e))?;
    let torsion = stack_profile(&road.lateral_profile.superelevation, domain)
        .map_err(|e| BuildError::numerical(&road.id, e))?;

    Curve3d::new(planar, height, torsion, config.tolerance)
        .map_err(|e| BuildError::numerical(&road.id, e))
}

/// Build one plan-view segment with its rigid placement.
fn build_segment(
    road: &Road,
    geometry: &PlanViewGeometry,
    config: &BuildConfig,
) -> Result<CurveSegment2d> {
    let placement = Isometry2::new(Vector2::new(geometry.x, geometry.y), geometry.hdg);
    let tol = config.tolerance;
    let wrap = |e| BuildError::numerical(&road.id, e);

    let segment = match &geometry.kind {
        GeometryKind::Line => {
            CurveSegment2d::Line(Line2d::new(geometry.length, placement, tol).map_err(wrap)?)
        }
        GeometryKind::Arc { curvature } if curvature.abs() < STRAIGHT_CURVATURE => {
            CurveSegment2d::Line(Line2d::new(geometry.length, placement, tol).map_err(wrap)?)
        }
        GeometryKind::Arc { curvature } => CurveSegment2d::Arc(
            Arc2d::new(*curvature, geometry.length, placement, tol).map_err(wrap)?,
        ),
        GeometryKind::Spiral {
            curv_start,
            curv_end,
        } if (curv_end - curv_start).abs() < STRAIGHT_CURVATURE => {
            // Degenerate spiral: constant curvature.
            if curv_start.abs() < STRAIGHT_CURVATURE {
                CurveSegment2d::Line(Line2d::new(geometry.length, placement, tol).map_err(wrap)?)
            } else {
                CurveSegment2d::Arc(
                    Arc2d::new(*curv_start, geometry.length, placement, tol).map_err(wrap)?,
                )
            }
        }
        GeometryKind::Spiral {
            curv_start,
            curv_end,
        } => CurveSegment2d::Spiral(
            Spiral2d::new(*curv_start, *curv_end, geometry.length, placement, tol)
                .map_err(wrap)?,
        ),
        GeometryKind::Poly3 { a, b, c, d } => CurveSegment2d::Cubic(
            CubicCurve2d::new([*a, *b, *c, *d], geometry.length, placement, tol).map_err(wrap)?,
        ),
        GeometryKind::ParamPoly3 { u, v, normalized } => {
            let p_range = if *normalized {
                ParamRange::Normalized
            } else {
                ParamRange::ArcLength
            };
            CurveSegment2d::ParamCubic(
                ParamCubicCurve2d::new(*u, *v, p_range, geometry.length, placement, tol)
                    .map_err(wrap)?,
            )
        }
    };
    Ok(segment)
}

/// Report butt-joint gaps between consecutive segments.
fn report_discontinuities(
    road: &Road,
    segments: &[(f64, CurveSegment2d)],
    config: &BuildConfig,
    messages: &mut MessageList,
) {
    for (index, window) in segments.windows(2).enumerate() {
        let (_, previous) = &window[0];
        let (_, next) = &window[1];
        let Ok(end) = previous.point_global(previous.length()) else {
            continue;
        };
        let Ok(start) = next.point_global(0.0) else {
            continue;
        };
        let gap = (end - start).norm();
        if gap > config.distance_tolerance {
            messages.push(
                DataQualityMessage::reported(
                    MessageCode::ReferenceLineDiscontinuity,
                    SourceId::road(&road.id).element("planView"),
                    Severity::Warning,
                    format!(
                        "segments {index} and {} do not butt: gap {gap:.6} m",
                        index + 1
                    ),
                )
                .with_location("gap", gap),
            );
        }
    }
}

/// Stack cubic profile entries over a domain; empty profiles become the zero
/// function.
fn stack_profile(entries: &[Poly3Entry], domain: Interval) -> geom_types::Result<StackedFunction> {
    if entries.is_empty() {
        return Ok(StackedFunction::constant(0.0, domain));
    }
    let pieces = entries
        .iter()
        .map(|entry| {
            (
                entry.s,
                CubicFunction::new(entry.a, entry.b, entry.c, entry.d, Interval::unbounded()),
            )
        })
        .collect();
    StackedFunction::from_entries(pieces, domain, ExtrapolationPolicy::ClampToNearest)
}
