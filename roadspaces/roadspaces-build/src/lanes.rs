//! Lane-section construction.
//!
//! Lane boundaries are cumulative signed width offsets from the reference
//! line, sampled on a shared arc-length grid per section. Surfaces are quad
//! strips between consecutive samples, wound so their normals face up.

use geom_types::{
    sample_positions, Curve3d, CubicFunction, ExtrapolationPolicy, Interval, LineString3d,
    Point3, Polygon3d, Pose3, StackedFunction, UnivariateFunction, Vector3,
};
use opendrive_types::{Lane, Road, RoadMark, RoadMarkKind};
use roadspaces_types::{LaneId, LaneSectionSpace, LaneSpace, MarkingSpace, RoadspaceId};

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};

/// Build every lane section of a road.
///
/// # Errors
///
/// Fails when the road has no lane sections or the reference curve cannot be
/// evaluated on the section ranges.
pub fn build_lane_sections(
    road: &Road,
    reference: &Curve3d,
    roadspace_id: &RoadspaceId,
    config: &BuildConfig,
) -> Result<Vec<LaneSectionSpace>> {
    if road.lanes.sections.is_empty() {
        return Err(BuildError::missing_geometry(&road.id, "no lane sections"));
    }

    let lane_offset = lane_offset_function(road, config);
    let mut sections = Vec::with_capacity(road.lanes.sections.len());

    for (index, section) in road.lanes.sections.iter().enumerate() {
        let s_start = section.s.clamp(0.0, road.length);
        let s_end = road
            .lanes
            .sections
            .get(index + 1)
            .map_or(road.length, |next| next.s.clamp(0.0, road.length));
        if s_end - s_start <= config.tolerance {
            tracing::debug!(road = %road.id, section = index, "skipping zero-length lane section");
            continue;
        }

        // Lane ids index into the built stack, which may be shorter than the
        // source list when degenerate sections are skipped.
        let built_index = sections.len();
        sections.push(build_section(
            road,
            section,
            built_index,
            s_start,
            s_end,
            reference,
            &lane_offset,
            roadspace_id,
            config,
        )?);
    }

    if sections.is_empty() {
        return Err(BuildError::missing_geometry(
            &road.id,
            "all lane sections are degenerate",
        ));
    }
    Ok(sections)
}

/// The lateral offset of the lane reference from the road reference line.
fn lane_offset_function(road: &Road, _config: &BuildConfig) -> StackedFunction {
    let domain = Interval::new(0.0, road.length);
    if road.lanes.lane_offset.is_empty() {
        return StackedFunction::constant(0.0, domain);
    }
    let pieces = road
        .lanes
        .lane_offset
        .iter()
        .map(|entry| {
            (
                entry.s,
                CubicFunction::new(entry.a, entry.b, entry.c, entry.d, Interval::unbounded()),
            )
        })
        .collect();
    StackedFunction::from_entries(pieces, domain, ExtrapolationPolicy::ClampToNearest)
        .unwrap_or_else(|_| StackedFunction::constant(0.0, domain))
}

#[allow(clippy::too_many_arguments)]
fn build_section(
    road: &Road,
    section: &opendrive_types::LaneSection,
    section_index: usize,
    s_start: f64,
    s_end: f64,
    reference: &Curve3d,
    lane_offset: &StackedFunction,
    roadspace_id: &RoadspaceId,
    config: &BuildConfig,
) -> Result<LaneSectionSpace> {
    let positions: Vec<f64> = sample_positions(s_end - s_start, config.step_size)
        .into_iter()
        .map(|rel| s_start + rel)
        .collect();

    let mut poses = Vec::with_capacity(positions.len());
    let mut offsets = Vec::with_capacity(positions.len());
    for &s in &positions {
        poses.push(
            reference
                .pose(s)
                .map_err(|e| BuildError::numerical(&road.id, e))?,
        );
        offsets.push(
            lane_offset
                .value_fuzzy(s, config.tolerance)
                .map_err(|e| BuildError::numerical(&road.id, e))?,
        );
    }

    let mut lanes = Vec::with_capacity(section.lane_count());

    // Left lanes walk outward with ascending ids (1, 2, ...).
    let mut left: Vec<&Lane> = section.left.iter().collect();
    left.sort_by_key(|lane| lane.id);
    let mut inner_t = offsets.clone();
    for lane in left {
        let built = build_lane(
            lane,
            section_index,
            s_start,
            &positions,
            &poses,
            &mut inner_t,
            true,
            roadspace_id,
            road,
            config,
        )?;
        lanes.push(built);
    }

    // Right lanes walk outward with descending ids (-1, -2, ...).
    let mut right: Vec<&Lane> = section.right.iter().collect();
    right.sort_by_key(|lane| std::cmp::Reverse(lane.id));
    let mut inner_t = offsets.clone();
    for lane in right {
        let built = build_lane(
            lane,
            section_index,
            s_start,
            &positions,
            &poses,
            &mut inner_t,
            false,
            roadspace_id,
            road,
            config,
        )?;
        lanes.push(built);
    }

    let center_markings = build_markings(
        &section.center.road_marks,
        s_start,
        s_end,
        &positions,
        &poses,
        &offsets,
        road,
        config,
    )?;

    Ok(LaneSectionSpace {
        s_range: Interval::new(s_start, s_end),
        lanes,
        center_markings,
    })
}

/// Build one lane and advance the running boundary offsets to its outer edge.
#[allow(clippy::too_many_arguments)]
fn build_lane(
    lane: &Lane,
    section_index: usize,
    s_start: f64,
    positions: &[f64],
    poses: &[Pose3],
    inner_t: &mut Vec<f64>,
    is_left: bool,
    roadspace_id: &RoadspaceId,
    road: &Road,
    config: &BuildConfig,
) -> Result<LaneSpace> {
    let sign = if is_left { 1.0 } else { -1.0 };

    let mut outer_t = Vec::with_capacity(positions.len());
    let mut inner_points = Vec::with_capacity(positions.len());
    let mut outer_points = Vec::with_capacity(positions.len());
    let mut center_points = Vec::with_capacity(positions.len());

    for (i, &s) in positions.iter().enumerate() {
        let local_s = s - s_start;
        let width = width_at(lane, local_s).max(0.0);
        let (inner_h, outer_h) = height_at(lane, local_s);
        let t_in = inner_t[i];
        let t_out = t_in + sign * width;

        inner_points.push(lateral_point(&poses[i], t_in, inner_h));
        outer_points.push(lateral_point(&poses[i], t_out, outer_h));
        center_points.push(lateral_point(
            &poses[i],
            0.5 * (t_in + t_out),
            0.5 * (inner_h + outer_h),
        ));
        outer_t.push(t_out);
    }

    let surface = quad_strip(&inner_points, &outer_points, is_left)
        .map_err(|e| BuildError::numerical(&road.id, e))?;
    let inner_boundary =
        LineString3d::new(inner_points).map_err(|e| BuildError::numerical(&road.id, e))?;
    let outer_boundary = LineString3d::new(outer_points.clone())
        .map_err(|e| BuildError::numerical(&road.id, e))?;
    let center_line =
        LineString3d::new(center_points).map_err(|e| BuildError::numerical(&road.id, e))?;

    let markings = build_markings(
        &lane.road_marks,
        s_start,
        positions[positions.len() - 1],
        positions,
        poses,
        &outer_t,
        road,
        config,
    )?;

    // The next outward lane starts at this lane's outer edge.
    *inner_t = outer_t;

    Ok(LaneSpace {
        id: LaneId::new(roadspace_id.clone(), section_index, lane.id),
        kind: lane.kind,
        surface,
        center_line,
        inner_boundary,
        outer_boundary,
        markings,
        material: lane.material.clone(),
        speed: lane.speed,
        predecessor: lane.link.predecessor,
        successor: lane.link.successor,
    })
}

/// Lane width at a section-local position.
fn width_at(lane: &Lane, local_s: f64) -> f64 {
    let Some(entry) = lane
        .widths
        .iter()
        .rev()
        .find(|w| w.s <= local_s)
        .or_else(|| lane.widths.first())
    else {
        return 0.0;
    };
    let ds = local_s - entry.s;
    entry.a + ds * (entry.b + ds * (entry.c + ds * entry.d))
}

/// Inner/outer height offsets at a section-local position.
fn height_at(lane: &Lane, local_s: f64) -> (f64, f64) {
    lane.heights
        .iter()
        .rev()
        .find(|h| h.s_offset <= local_s)
        .or_else(|| lane.heights.first())
        .map_or((0.0, 0.0), |h| (h.inner, h.outer))
}

/// A point at lateral offset `t` and height offset `h` from a reference pose.
fn lateral_point(pose: &Pose3, t: f64, h: f64) -> Point3<f64> {
    let rotation = pose.rotation();
    pose.position + rotation * Vector3::new(0.0, t, h)
}

/// Quad polygons between two equally sampled boundaries, wound upward.
fn quad_strip(
    inner: &[Point3<f64>],
    outer: &[Point3<f64>],
    is_left: bool,
) -> geom_types::Result<Vec<Polygon3d>> {
    let mut polygons = Vec::with_capacity(inner.len().saturating_sub(1));
    for i in 0..inner.len().saturating_sub(1) {
        let ring = if is_left {
            vec![inner[i], inner[i + 1], outer[i + 1], outer[i]]
        } else {
            vec![inner[i + 1], inner[i], outer[i], outer[i + 1]]
        };
        polygons.push(Polygon3d::new(ring)?);
    }
    Ok(polygons)
}

/// Build marking ribbons along a boundary given its per-sample offsets.
#[allow(clippy::too_many_arguments)]
fn build_markings(
    road_marks: &[RoadMark],
    s_start: f64,
    s_end: f64,
    positions: &[f64],
    poses: &[Pose3],
    boundary_t: &[f64],
    road: &Road,
    config: &BuildConfig,
) -> Result<Vec<MarkingSpace>> {
    let mut markings = Vec::new();
    for (index, mark) in road_marks.iter().enumerate() {
        if mark.kind == RoadMarkKind::None {
            continue;
        }
        let mark_start = s_start + mark.s_offset;
        let mark_end = road_marks
            .get(index + 1)
            .map_or(s_end, |next| s_start + next.s_offset);

        // Samples covered by this mark.
        let covered: Vec<usize> = (0..positions.len())
            .filter(|&i| {
                positions[i] >= mark_start - config.tolerance
                    && positions[i] <= mark_end + config.tolerance
            })
            .collect();
        if covered.len() < 2 {
            continue;
        }

        let half_width = 0.5 * mark.width.unwrap_or(config.default_marking_width);
        let mut left_edge = Vec::with_capacity(covered.len());
        let mut right_edge = Vec::with_capacity(covered.len());
        let mut center = Vec::with_capacity(covered.len());
        for &i in &covered {
            left_edge.push(lateral_point(&poses[i], boundary_t[i] + half_width, 0.0));
            right_edge.push(lateral_point(&poses[i], boundary_t[i] - half_width, 0.0));
            center.push(lateral_point(&poses[i], boundary_t[i], 0.0));
        }

        let surface = quad_strip(&right_edge, &left_edge, true)
            .map_err(|e| BuildError::numerical(&road.id, e))?;
        let center_line =
            LineString3d::new(center).map_err(|e| BuildError::numerical(&road.id, e))?;

        markings.push(MarkingSpace {
            kind: mark.kind,
            color: mark.color,
            surface,
            center_line,
        });
    }
    Ok(markings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::build_reference_curve;
    use approx::assert_relative_eq;
    use opendrive_types::{
        GeometryKind, LaneLink, LaneSection, LaneType, Lanes, LateralProfile, Link,
        PlanViewGeometry, Poly3Entry, RoadMarkColor, TrafficRule,
    };

    fn straight_road(length: f64, lane_widths: &[(i32, [f64; 4])]) -> Road {
        let mut section = LaneSection {
            s: 0.0,
            ..LaneSection::default()
        };
        for &(id, [a, b, c, d]) in lane_widths {
            let lane = Lane {
                id,
                kind: LaneType::Driving,
                level: false,
                widths: vec![Poly3Entry { s: 0.0, a, b, c, d }],
                heights: Vec::new(),
                road_marks: Vec::new(),
                material: None,
                speed: None,
                link: LaneLink::default(),
            };
            if id > 0 {
                section.left.push(lane);
            } else {
                section.right.push(lane);
            }
        }
        Road {
            id: "1".into(),
            name: String::new(),
            length,
            junction: None,
            rule: TrafficRule::Rht,
            plan_view: vec![PlanViewGeometry {
                s: 0.0,
                x: 0.0,
                y: 0.0,
                hdg: 0.0,
                length,
                kind: GeometryKind::Line,
            }],
            elevation_profile: None,
            lateral_profile: LateralProfile::default(),
            lanes: Lanes {
                lane_offset: Vec::new(),
                sections: vec![section],
            },
            objects: Vec::new(),
            signals: Vec::new(),
            link: Link::default(),
        }
    }

    fn build(road: &Road) -> Vec<LaneSectionSpace> {
        let config = BuildConfig::default();
        let mut messages = opendrive_eval::MessageList::new();
        let reference = build_reference_curve(road, &config, &mut messages).unwrap();
        build_lane_sections(road, &reference, &RoadspaceId::new("1"), &config).unwrap()
    }

    #[test]
    fn test_constant_width_right_lane() {
        // One right lane of width 3.5 over 10 m.
        let road = straight_road(10.0, &[(-1, [3.5, 0.0, 0.0, 0.0])]);
        let sections = build(&road);
        assert_eq!(sections.len(), 1);
        let lane = sections[0].lane(-1).unwrap();

        // Inner boundary on the reference line, outer at t = -3.5.
        let first_inner = lane.inner_boundary.vertices()[0];
        let last_inner = lane.inner_boundary.vertices().last().unwrap();
        assert_relative_eq!(first_inner.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(last_inner.x, 10.0, epsilon = 1e-9);

        let first_outer = lane.outer_boundary.vertices()[0];
        let last_outer = lane.outer_boundary.vertices().last().unwrap();
        assert_relative_eq!(first_outer.y, -3.5, epsilon = 1e-9);
        assert_relative_eq!(last_outer.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(last_outer.y, -3.5, epsilon = 1e-9);
        assert_relative_eq!(last_outer.z, 0.0, epsilon = 1e-9);

        // Surface normals face up.
        for polygon in &lane.surface {
            assert!(polygon.normal().z > 0.0);
        }

        // Centre line halves the width.
        let mid = lane.center_line.vertices()[0];
        assert_relative_eq!(mid.y, -1.75, epsilon = 1e-9);
    }

    #[test]
    fn test_cubic_width_narrows_to_zero() {
        // width(s) = 3.5 - 0.035 s^2: 3.5 at s=0, 2.625 at s=5, 0 at s=10.
        let road = straight_road(10.0, &[(-1, [3.5, 0.0, -0.035, 0.0])]);
        let sections = build(&road);
        let lane = sections[0].lane(-1).unwrap();

        let outer = lane.outer_boundary.vertices();
        let at_end = outer.last().unwrap();
        assert_relative_eq!(at_end.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(at_end.y, 0.0, epsilon = 1e-9);

        // Find the sample at s = 5 (it is on the grid for step 0.7? no - use
        // interpolation-free check at the exact midpoint sample instead).
        let mid = outer
            .iter()
            .min_by(|a, b| {
                (a.x - 5.0)
                    .abs()
                    .partial_cmp(&(b.x - 5.0).abs())
                    .unwrap()
            })
            .unwrap();
        let expected = 3.5 - 0.035 * mid.x * mid.x;
        assert_relative_eq!(mid.y, -expected, epsilon = 1e-9);
    }

    #[test]
    fn test_two_lanes_stack_outward() {
        let road = straight_road(
            10.0,
            &[(-1, [3.5, 0.0, 0.0, 0.0]), (-2, [2.0, 0.0, 0.0, 0.0])],
        );
        let sections = build(&road);
        let outer_lane = sections[0].lane(-2).unwrap();
        let first = outer_lane.inner_boundary.vertices()[0];
        assert_relative_eq!(first.y, -3.5, epsilon = 1e-9);
        let first_outer = outer_lane.outer_boundary.vertices()[0];
        assert_relative_eq!(first_outer.y, -5.5, epsilon = 1e-9);
    }

    #[test]
    fn test_left_lane_positive_t() {
        let road = straight_road(10.0, &[(1, [2.0, 0.0, 0.0, 0.0])]);
        let sections = build(&road);
        let lane = sections[0].lane(1).unwrap();
        assert_relative_eq!(
            lane.outer_boundary.vertices()[0].y,
            2.0,
            epsilon = 1e-9
        );
        for polygon in &lane.surface {
            assert!(polygon.normal().z > 0.0);
        }
    }

    #[test]
    fn test_markings_on_boundary() {
        let mut road = straight_road(10.0, &[(-1, [3.5, 0.0, 0.0, 0.0])]);
        road.lanes.sections[0].right[0].road_marks.push(RoadMark {
            s_offset: 0.0,
            kind: RoadMarkKind::Solid,
            color: RoadMarkColor::White,
            width: Some(0.2),
        });
        let sections = build(&road);
        let lane = sections[0].lane(-1).unwrap();
        assert_eq!(lane.markings.len(), 1);
        let marking = &lane.markings[0];
        // Marking centre rides the outer boundary.
        assert_relative_eq!(
            marking.center_line.vertices()[0].y,
            -3.5,
            epsilon = 1e-9
        );
        assert!(!marking.surface.is_empty());
    }

    #[test]
    fn test_superelevation_tilts_lane() {
        let mut road = straight_road(10.0, &[(-1, [3.5, 0.0, 0.0, 0.0])]);
        road.lateral_profile.superelevation.push(Poly3Entry {
            s: 0.0,
            a: 0.1,
            b: 0.0,
            c: 0.0,
            d: 0.0,
        });
        let config = BuildConfig::default();
        let mut messages = opendrive_eval::MessageList::new();
        let reference = build_reference_curve(&road, &config, &mut messages).unwrap();
        let sections =
            build_lane_sections(&road, &reference, &RoadspaceId::new("1"), &config).unwrap();
        let lane = sections[0].lane(-1).unwrap();
        let outer = lane.outer_boundary.vertices()[0];
        // Right side of a positively banked road drops below the plane.
        assert!(outer.z < 0.0);
        assert_relative_eq!(outer.z, -3.5 * 0.1f64.sin(), epsilon = 1e-9);
    }
}
