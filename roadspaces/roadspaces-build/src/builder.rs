//! Top-level road-space build.
//!
//! Consumes a healed OpenDRIVE model and produces the
//! [`RoadspacesModel`] plus the non-fatal findings of the build. Dangling
//! references abort the build; geometric mismatches between linked roads are
//! reported and closed with filler surfaces where lane links allow it.

use hashbrown::HashSet;

use opendrive_eval::{DataQualityMessage, MessageCode, MessageList, Severity, SourceId};
use opendrive_types::{ContactPoint, LinkedElement, OpendriveModel, Road, RoadLink};
use roadspaces_types::{
    JunctionConnection, JunctionSpace, RoadGeometry, Roadspace, RoadspaceId, RoadspaceLinkage,
    RoadspacesModel,
};

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::fillers::{
    lateral_fillers, longitudinal_filler_between_roads, longitudinal_fillers_within_road,
};
use crate::lanes::build_lane_sections;
use crate::objects::build_objects;
use crate::reference::build_reference_curve;

/// Build the road-space model from a healed OpenDRIVE model.
///
/// # Errors
///
/// Fails when a road or junction link references a missing id, or when
/// geometry construction fails numerically. Everything recoverable lands in
/// the returned message list.
pub fn build_roadspaces(
    model: &OpendriveModel,
    config: &BuildConfig,
) -> Result<(RoadspacesModel, MessageList)> {
    build_roadspaces_cancellable(model, config, &opendrive_eval::CancellationToken::new())
}

/// Build the road-space model, checking the cancellation token between roads.
///
/// # Errors
///
/// Like [`build_roadspaces`], plus [`BuildError::Cancelled`] when the host
/// requests cancellation.
pub fn build_roadspaces_cancellable(
    model: &OpendriveModel,
    config: &BuildConfig,
    cancel: &opendrive_eval::CancellationToken,
) -> Result<(RoadspacesModel, MessageList)> {
    let mut messages = MessageList::new();

    let road_ids: HashSet<&str> = model.roads.iter().map(|r| r.id.as_str()).collect();
    let junction_ids: HashSet<&str> = model.junctions.iter().map(|j| j.id.as_str()).collect();

    for road in &model.roads {
        validate_links(road, &road_ids, &junction_ids)?;
    }
    for junction in &model.junctions {
        for connection in &junction.connections {
            for (role, id) in [
                ("incomingRoad", &connection.incoming_road),
                ("connectingRoad", &connection.connecting_road),
            ] {
                if !road_ids.contains(id.as_str()) {
                    return Err(BuildError::unresolved(
                        format!("junction '{}' connection '{}' {role}", junction.id, connection.id),
                        "road",
                        id,
                    ));
                }
            }
        }
    }

    let mut roadspaces = Vec::with_capacity(model.roads.len());
    for road in &model.roads {
        if cancel.is_cancelled() {
            return Err(BuildError::Cancelled);
        }
        roadspaces.push(build_roadspace(road, config, &mut messages)?);
        tracing::debug!(road = %road.id, "built roadspace");
    }

    close_road_transitions(&mut roadspaces, config, &mut messages);

    let mut spaces_model = RoadspacesModel::new();
    for roadspace in roadspaces {
        spaces_model.insert_roadspace(roadspace)?;
    }
    for junction in &model.junctions {
        spaces_model.insert_junction(JunctionSpace {
            id: junction.id.clone(),
            name: junction.name.clone(),
            connections: junction
                .connections
                .iter()
                .map(|c| JunctionConnection {
                    id: c.id.clone(),
                    incoming: RoadspaceId::new(&c.incoming_road),
                    connecting: RoadspaceId::new(&c.connecting_road),
                    contact: c.contact_point,
                    lane_links: c.lane_links.iter().map(|l| (l.from, l.to)).collect(),
                })
                .collect(),
        })?;
    }

    tracing::info!(
        roadspaces = spaces_model.roadspaces().len(),
        junctions = spaces_model.junctions().len(),
        findings = messages.len(),
        "built road-space model"
    );
    Ok((spaces_model, messages))
}

/// A dangling predecessor/successor reference is fatal.
fn validate_links(
    road: &Road,
    road_ids: &HashSet<&str>,
    junction_ids: &HashSet<&str>,
) -> Result<()> {
    let check = |link: &RoadLink, role: &str| -> Result<()> {
        let (known, kind) = match link.element {
            LinkedElement::Road => (road_ids.contains(link.id.as_str()), "road"),
            LinkedElement::Junction => (junction_ids.contains(link.id.as_str()), "junction"),
        };
        if known {
            Ok(())
        } else {
            Err(BuildError::unresolved(
                format!("road '{}' {role}", road.id),
                kind,
                &link.id,
            ))
        }
    };

    if let Some(predecessor) = &road.link.predecessor {
        check(predecessor, "predecessor")?;
    }
    if let Some(successor) = &road.link.successor {
        check(successor, "successor")?;
    }
    if let Some(junction) = &road.junction {
        if !junction_ids.contains(junction.as_str()) {
            return Err(BuildError::unresolved(
                format!("road '{}' junction membership", road.id),
                "junction",
                junction,
            ));
        }
    }
    Ok(())
}

fn build_roadspace(
    road: &Road,
    config: &BuildConfig,
    messages: &mut MessageList,
) -> Result<Roadspace> {
    let roadspace_id = RoadspaceId::new(&road.id);
    let reference = build_reference_curve(road, config, messages)?;
    let sections = build_lane_sections(road, &reference, &roadspace_id, config)?;
    let objects = build_objects(road, &reference, &roadspace_id, config)?;

    let mut fillers = lateral_fillers(&sections, config);
    fillers.extend(longitudinal_fillers_within_road(&sections, config));

    Ok(Roadspace {
        id: roadspace_id,
        name: road.name.clone(),
        road: RoadGeometry {
            reference,
            sections,
            fillers,
            linkage: linkage_of(road),
        },
        objects,
    })
}

fn linkage_of(road: &Road) -> RoadspaceLinkage {
    let mut linkage = RoadspaceLinkage {
        member_of_junction: road.junction.clone(),
        ..RoadspaceLinkage::default()
    };
    if let Some(predecessor) = &road.link.predecessor {
        match predecessor.element {
            LinkedElement::Road => {
                linkage.predecessor = Some((
                    RoadspaceId::new(&predecessor.id),
                    predecessor.contact_point.unwrap_or(ContactPoint::End),
                ));
            }
            LinkedElement::Junction => {
                linkage.predecessor_junction = Some(predecessor.id.clone());
            }
        }
    }
    if let Some(successor) = &road.link.successor {
        match successor.element {
            LinkedElement::Road => {
                linkage.successor = Some((
                    RoadspaceId::new(&successor.id),
                    successor.contact_point.unwrap_or(ContactPoint::Start),
                ));
            }
            LinkedElement::Junction => {
                linkage.successor_junction = Some(successor.id.clone());
            }
        }
    }
    linkage
}

/// Verify road-to-road contacts and close remaining lane gaps with fillers.
fn close_road_transitions(
    roadspaces: &mut [Roadspace],
    config: &BuildConfig,
    messages: &mut MessageList,
) {
    let index: hashbrown::HashMap<RoadspaceId, usize> = roadspaces
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.clone(), i))
        .collect();

    for own_index in 0..roadspaces.len() {
        let Some((successor_id, contact)) = roadspaces[own_index].road.linkage.successor.clone()
        else {
            continue;
        };
        let Some(&other_index) = index.get(&successor_id) else {
            continue;
        };
        if other_index == own_index {
            continue;
        }

        let own_id = roadspaces[own_index].id.clone();
        let (own, other) = if own_index < other_index {
            let (a, b) = roadspaces.split_at_mut(other_index);
            (&mut a[own_index], &b[0])
        } else {
            let (a, b) = roadspaces.split_at_mut(own_index);
            (&mut b[0], &a[other_index])
        };

        // Contact semantics: END means the successor is traversed backwards,
        // so its far endpoint is the shared one.
        let own_end = own.road.reference.point(own.road.reference.length());
        let other_s = match contact {
            ContactPoint::Start => 0.0,
            ContactPoint::End => other.road.reference.length(),
        };
        let other_point = other.road.reference.point(other_s);

        if let (Ok(own_end), Ok(other_point)) = (own_end, other_point) {
            let gap = (own_end - other_point).norm();
            if gap > config.distance_tolerance {
                messages.push(
                    DataQualityMessage::reported(
                        MessageCode::UnclosedLaneBoundary,
                        SourceId::road(own_id.as_str()).element("successor"),
                        Severity::Warning,
                        format!(
                            "reference line does not meet successor '{successor_id}': gap {gap:.6} m"
                        ),
                    )
                    .with_location("gap", gap),
                );
            }
        }

        // Close per-lane gaps across the transition where lane links exist.
        let Some(last_section) = own.road.sections.last() else {
            continue;
        };
        let other_at_start = contact == ContactPoint::Start;
        let other_section = if other_at_start {
            other.road.sections.first()
        } else {
            other.road.sections.last()
        };
        let Some(other_section) = other_section else {
            continue;
        };

        let mut new_fillers = Vec::new();
        for lane in &last_section.lanes {
            let Some(successor_lane) = lane.successor else {
                continue;
            };
            let Some(other_lane) = other_section.lane(successor_lane) else {
                continue;
            };
            if let Some(filler) =
                longitudinal_filler_between_roads(lane, other_lane, other_at_start, config)
            {
                new_fillers.push(filler);
            }
        }
        own.road.fillers.extend(new_fillers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendrive_types::{
        GeometryKind, Lane, LaneLink, LaneSection, LaneType, Lanes, LateralProfile, Link,
        PlanViewGeometry, Poly3Entry, TrafficRule,
    };
    use roadspaces_types::FillerKind;

    fn lane(id: i32, width: f64, successor: Option<i32>) -> Lane {
        Lane {
            id,
            kind: LaneType::Driving,
            level: false,
            widths: vec![Poly3Entry {
                s: 0.0,
                a: width,
                b: 0.0,
                c: 0.0,
                d: 0.0,
            }],
            heights: Vec::new(),
            road_marks: Vec::new(),
            material: None,
            speed: None,
            link: LaneLink {
                predecessor: None,
                successor,
            },
        }
    }

    fn straight_road(id: &str, x: f64, y: f64, hdg: f64, length: f64, width: f64) -> Road {
        Road {
            id: id.into(),
            name: String::new(),
            length,
            junction: None,
            rule: TrafficRule::Rht,
            plan_view: vec![PlanViewGeometry {
                s: 0.0,
                x,
                y,
                hdg,
                length,
                kind: GeometryKind::Line,
            }],
            elevation_profile: None,
            lateral_profile: LateralProfile::default(),
            lanes: Lanes {
                lane_offset: Vec::new(),
                sections: vec![LaneSection {
                    s: 0.0,
                    right: vec![lane(-1, width, Some(-1))],
                    ..LaneSection::default()
                }],
            },
            objects: Vec::new(),
            signals: Vec::new(),
            link: Link::default(),
        }
    }

    fn successor_link(id: &str, contact: ContactPoint) -> Option<RoadLink> {
        Some(RoadLink {
            element: LinkedElement::Road,
            id: id.into(),
            contact_point: Some(contact),
        })
    }

    #[test]
    fn test_single_road_builds() {
        let model = OpendriveModel {
            roads: vec![straight_road("1", 0.0, 0.0, 0.0, 10.0, 3.5)],
            ..OpendriveModel::default()
        };
        let (spaces, messages) = build_roadspaces(&model, &BuildConfig::default()).unwrap();
        assert_eq!(spaces.roadspaces().len(), 1);
        assert!(messages.is_empty());

        let roadspace = spaces.roadspace(&RoadspaceId::new("1")).unwrap();
        assert_eq!(roadspace.road.sections.len(), 1);
        assert!(roadspace.road.fillers.is_empty());
    }

    #[test]
    fn test_butted_roads_report_nothing() {
        // Road B starts exactly where road A ends; no filler, empty report.
        let mut a = straight_road("A", 0.0, 0.0, 0.0, 10.0, 3.5);
        a.link.successor = successor_link("B", ContactPoint::Start);
        let b = straight_road("B", 10.0, 0.0, 0.0, 10.0, 3.5);

        let model = OpendriveModel {
            roads: vec![a, b],
            ..OpendriveModel::default()
        };
        let (spaces, messages) = build_roadspaces(&model, &BuildConfig::default()).unwrap();
        assert_eq!(messages.count_code(MessageCode::UnclosedLaneBoundary), 0);
        let a = spaces.roadspace(&RoadspaceId::new("A")).unwrap();
        assert!(a
            .road
            .fillers
            .iter()
            .all(|f| f.kind != FillerKind::LongitudinalBetweenRoads));
    }

    #[test]
    fn test_gap_between_roads_is_reported_and_closed() {
        let mut a = straight_road("A", 0.0, 0.0, 0.0, 10.0, 3.5);
        a.link.successor = successor_link("B", ContactPoint::Start);
        let b = straight_road("B", 10.5, 0.0, 0.0, 10.0, 3.5);

        let model = OpendriveModel {
            roads: vec![a, b],
            ..OpendriveModel::default()
        };
        let (spaces, messages) = build_roadspaces(&model, &BuildConfig::default()).unwrap();
        assert_eq!(messages.count_code(MessageCode::UnclosedLaneBoundary), 1);

        let a = spaces.roadspace(&RoadspaceId::new("A")).unwrap();
        assert!(a
            .road
            .fillers
            .iter()
            .any(|f| f.kind == FillerKind::LongitudinalBetweenRoads));
    }

    #[test]
    fn test_end_contact_swaps_endpoint() {
        // Road B runs toward road A: its END touches A's end.
        let mut a = straight_road("A", 0.0, 0.0, 0.0, 10.0, 3.5);
        a.link.successor = successor_link("B", ContactPoint::End);
        let b = straight_road("B", 20.0, 0.0, std::f64::consts::PI, 10.0, 3.5);

        let model = OpendriveModel {
            roads: vec![a, b],
            ..OpendriveModel::default()
        };
        let (_, messages) = build_roadspaces(&model, &BuildConfig::default()).unwrap();
        // B's reference ends at (10, 0), which meets A's end exactly.
        assert_eq!(messages.count_code(MessageCode::UnclosedLaneBoundary), 0);
    }

    #[test]
    fn test_dangling_successor_fails() {
        let mut a = straight_road("A", 0.0, 0.0, 0.0, 10.0, 3.5);
        a.link.successor = successor_link("missing", ContactPoint::Start);
        let model = OpendriveModel {
            roads: vec![a],
            ..OpendriveModel::default()
        };
        let err = build_roadspaces(&model, &BuildConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_junction_connection_must_resolve() {
        use opendrive_types::{Connection, Junction, JunctionLaneLink};
        let model = OpendriveModel {
            roads: vec![straight_road("1", 0.0, 0.0, 0.0, 10.0, 3.5)],
            junctions: vec![Junction {
                id: "j".into(),
                name: String::new(),
                connections: vec![Connection {
                    id: "0".into(),
                    incoming_road: "1".into(),
                    connecting_road: "ghost".into(),
                    contact_point: ContactPoint::Start,
                    lane_links: vec![JunctionLaneLink { from: -1, to: -1 }],
                }],
            }],
            ..OpendriveModel::default()
        };
        let err = build_roadspaces(&model, &BuildConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::UnresolvedReference { .. }));
    }
}
