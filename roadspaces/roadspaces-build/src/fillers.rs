//! Filler surfaces between lane surfaces.
//!
//! Three kinds of gaps are closed: lateral gaps between neighbouring lanes
//! of one section, longitudinal gaps between successive sections of one
//! road, and longitudinal gaps between two linked roads.

use geom_types::{LineString3d, Point3, Polygon3d};
use roadspaces_types::{FillerKind, FillerSurface, LaneSectionSpace, LaneSpace};

use crate::config::BuildConfig;

/// Maximum vertex distance between two equally sampled boundaries.
fn boundary_gap(a: &LineString3d, b: &LineString3d) -> f64 {
    a.vertices()
        .iter()
        .zip(b.vertices())
        .map(|(p, q)| (p - q).norm())
        .fold(0.0, f64::max)
}

/// A ribbon polygon between two boundaries (second one reversed).
fn ribbon(a: &LineString3d, b: &LineString3d) -> Option<Polygon3d> {
    let mut vertices: Vec<Point3<f64>> = a.vertices().to_vec();
    vertices.extend(b.vertices().iter().rev().copied());
    Polygon3d::new(vertices).ok()
}

/// Lateral fillers between neighbouring lanes within each section.
///
/// Neighbouring boundaries share their lateral offsets by construction, so a
/// gap can only open through lane height offsets.
#[must_use]
pub fn lateral_fillers(
    sections: &[LaneSectionSpace],
    config: &BuildConfig,
) -> Vec<FillerSurface> {
    let mut fillers = Vec::new();
    for section in sections {
        // Walk pairs of lanes adjacent in the outward order per side.
        for side in [true, false] {
            let mut side_lanes: Vec<&LaneSpace> = section
                .lanes
                .iter()
                .filter(|lane| (lane.id.lane > 0) == side && lane.id.lane != 0)
                .collect();
            side_lanes.sort_by_key(|lane| lane.id.lane.abs());

            for pair in side_lanes.windows(2) {
                let inner_lane = pair[0];
                let outer_lane = pair[1];
                let gap = boundary_gap(&inner_lane.outer_boundary, &outer_lane.inner_boundary);
                if gap > config.distance_tolerance {
                    if let Some(polygon) =
                        ribbon(&inner_lane.outer_boundary, &outer_lane.inner_boundary)
                    {
                        fillers.push(FillerSurface {
                            kind: FillerKind::Lateral,
                            polygon,
                            between: (inner_lane.id.clone(), outer_lane.id.clone()),
                        });
                    }
                }
            }
        }
    }
    fillers
}

/// Longitudinal fillers between successive sections of one road.
///
/// For every lane with a successor link, the section-end edge is compared
/// with the successor lane's section-start edge; a quad closes any gap.
#[must_use]
pub fn longitudinal_fillers_within_road(
    sections: &[LaneSectionSpace],
    config: &BuildConfig,
) -> Vec<FillerSurface> {
    let mut fillers = Vec::new();
    for window_index in 0..sections.len().saturating_sub(1) {
        let current = &sections[window_index];
        let next = &sections[window_index + 1];
        for lane in &current.lanes {
            let Some(successor) = lane.successor else {
                continue;
            };
            let Some(next_lane) = next.lane(successor) else {
                continue;
            };

            let end_inner = *last_vertex(&lane.inner_boundary);
            let end_outer = *last_vertex(&lane.outer_boundary);
            let start_inner = lane_first_vertex(&next_lane.inner_boundary);
            let start_outer = lane_first_vertex(&next_lane.outer_boundary);

            let gap = (end_inner - start_inner)
                .norm()
                .max((end_outer - start_outer).norm());
            if gap > config.distance_tolerance {
                if let Ok(polygon) =
                    Polygon3d::new(vec![end_inner, end_outer, start_outer, start_inner])
                {
                    fillers.push(FillerSurface {
                        kind: FillerKind::LongitudinalWithinRoad,
                        polygon,
                        between: (lane.id.clone(), next_lane.id.clone()),
                    });
                }
            }
        }
    }
    fillers
}

/// A longitudinal filler between the lanes of two linked roads.
///
/// `own_at_end` is this road's lane edge at the contact; `other` is the
/// linked road's lane with `other_at_start` naming which edge of it meets
/// this road (endpoints swap when the contact point is `End`).
#[must_use]
pub fn longitudinal_filler_between_roads(
    own: &LaneSpace,
    other: &LaneSpace,
    other_at_start: bool,
    config: &BuildConfig,
) -> Option<FillerSurface> {
    let end_inner = *last_vertex(&own.inner_boundary);
    let end_outer = *last_vertex(&own.outer_boundary);
    let (start_inner, start_outer) = if other_at_start {
        (
            lane_first_vertex(&other.inner_boundary),
            lane_first_vertex(&other.outer_boundary),
        )
    } else {
        (
            *last_vertex(&other.inner_boundary),
            *last_vertex(&other.outer_boundary),
        )
    };

    let gap = (end_inner - start_inner)
        .norm()
        .max((end_outer - start_outer).norm());
    if gap <= config.distance_tolerance {
        return None;
    }

    Polygon3d::new(vec![end_inner, end_outer, start_outer, start_inner])
        .ok()
        .map(|polygon| FillerSurface {
            kind: FillerKind::LongitudinalBetweenRoads,
            polygon,
            between: (own.id.clone(), other.id.clone()),
        })
}

fn last_vertex(boundary: &LineString3d) -> &Point3<f64> {
    &boundary.vertices()[boundary.len() - 1]
}

fn lane_first_vertex(boundary: &LineString3d) -> Point3<f64> {
    boundary.vertices()[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom_types::Interval;
    use opendrive_types::LaneType;
    use roadspaces_types::{LaneId, RoadspaceId};

    fn line(points: &[[f64; 3]]) -> LineString3d {
        LineString3d::new(points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect())
            .unwrap()
    }

    fn lane(id: i32, section: usize, inner: LineString3d, outer: LineString3d) -> LaneSpace {
        LaneSpace {
            id: LaneId::new(RoadspaceId::new("1"), section, id),
            kind: LaneType::Driving,
            surface: Vec::new(),
            center_line: inner.clone(),
            inner_boundary: inner,
            outer_boundary: outer,
            markings: Vec::new(),
            material: None,
            speed: None,
            predecessor: None,
            successor: Some(id),
        }
    }

    #[test]
    fn test_no_lateral_filler_for_shared_boundary() {
        let shared = line(&[[0.0, -3.5, 0.0], [10.0, -3.5, 0.0]]);
        let sections = vec![LaneSectionSpace {
            s_range: Interval::new(0.0, 10.0),
            lanes: vec![
                lane(
                    -1,
                    0,
                    line(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]),
                    shared.clone(),
                ),
                lane(-2, 0, shared, line(&[[0.0, -5.5, 0.0], [10.0, -5.5, 0.0]])),
            ],
            center_markings: Vec::new(),
        }];
        assert!(lateral_fillers(&sections, &BuildConfig::default()).is_empty());
    }

    #[test]
    fn test_lateral_filler_for_height_step() {
        // Outer lane sits 0.2 m above the inner lane's edge.
        let sections = vec![LaneSectionSpace {
            s_range: Interval::new(0.0, 10.0),
            lanes: vec![
                lane(
                    -1,
                    0,
                    line(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]),
                    line(&[[0.0, -3.5, 0.0], [10.0, -3.5, 0.0]]),
                ),
                lane(
                    -2,
                    0,
                    line(&[[0.0, -3.5, 0.2], [10.0, -3.5, 0.2]]),
                    line(&[[0.0, -5.5, 0.2], [10.0, -5.5, 0.2]]),
                ),
            ],
            center_markings: Vec::new(),
        }];
        let fillers = lateral_fillers(&sections, &BuildConfig::default());
        assert_eq!(fillers.len(), 1);
        assert_eq!(fillers[0].kind, FillerKind::Lateral);
    }

    #[test]
    fn test_longitudinal_filler_within_road() {
        // Section 1 ends with a narrower lane than section 2 starts with.
        let sections = vec![
            LaneSectionSpace {
                s_range: Interval::new(0.0, 5.0),
                lanes: vec![lane(
                    -1,
                    0,
                    line(&[[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]),
                    line(&[[0.0, -3.0, 0.0], [5.0, -3.0, 0.0]]),
                )],
                center_markings: Vec::new(),
            },
            LaneSectionSpace {
                s_range: Interval::new(5.0, 10.0),
                lanes: vec![lane(
                    -1,
                    1,
                    line(&[[5.0, 0.0, 0.0], [10.0, 0.0, 0.0]]),
                    line(&[[5.0, -3.5, 0.0], [10.0, -3.5, 0.0]]),
                )],
                center_markings: Vec::new(),
            },
        ];
        let fillers = longitudinal_fillers_within_road(&sections, &BuildConfig::default());
        assert_eq!(fillers.len(), 1);
        assert_eq!(fillers[0].kind, FillerKind::LongitudinalWithinRoad);
    }

    #[test]
    fn test_matched_sections_need_no_filler() {
        let sections = vec![
            LaneSectionSpace {
                s_range: Interval::new(0.0, 5.0),
                lanes: vec![lane(
                    -1,
                    0,
                    line(&[[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]),
                    line(&[[0.0, -3.5, 0.0], [5.0, -3.5, 0.0]]),
                )],
                center_markings: Vec::new(),
            },
            LaneSectionSpace {
                s_range: Interval::new(5.0, 10.0),
                lanes: vec![lane(
                    -1,
                    1,
                    line(&[[5.0, 0.0, 0.0], [10.0, 0.0, 0.0]]),
                    line(&[[5.0, -3.5, 0.0], [10.0, -3.5, 0.0]]),
                )],
                center_markings: Vec::new(),
            },
        ];
        assert!(longitudinal_fillers_within_road(&sections, &BuildConfig::default()).is_empty());
    }
}
