//! Fatal-violation detection.
//!
//! This pass never mutates the model. A fatal finding means the geometry
//! engine cannot run on the road network at all.

use opendrive_types::{OpendriveModel, Road, LANE_LINK_SENTINEL};

use crate::message::{DataQualityMessage, MessageCode, MessageList, SourceId};

/// Detect unrecoverable defects.
///
/// Emits one fatal message per finding; an empty list means the model may be
/// healed and built.
#[must_use]
pub fn evaluate_fatal(model: &OpendriveModel) -> MessageList {
    let mut messages = MessageList::new();

    for road in &model.roads {
        evaluate_road(road, &mut messages);
    }

    for junction in &model.junctions {
        if junction.id.trim().is_empty() {
            messages.push(DataQualityMessage::fatal(
                MessageCode::BlankRequiredId,
                SourceId::dataset().element("junction"),
                "junction with blank id",
            ));
        }
        for connection in &junction.connections {
            if connection.incoming_road.trim().is_empty()
                || connection.connecting_road.trim().is_empty()
            {
                messages.push(DataQualityMessage::fatal(
                    MessageCode::BlankRequiredId,
                    SourceId::junction(&junction.id).element("connection"),
                    format!("connection '{}' references a blank road id", connection.id),
                ));
            }
            for link in &connection.lane_links {
                if link.from == LANE_LINK_SENTINEL || link.to == LANE_LINK_SENTINEL {
                    messages.push(DataQualityMessage::fatal(
                        MessageCode::SentinelLaneLink,
                        SourceId::junction(&junction.id).element("laneLink"),
                        format!(
                            "lane link in connection '{}' carries a sentinel value",
                            connection.id
                        ),
                    ));
                }
            }
        }
    }

    messages
}

fn evaluate_road(road: &Road, messages: &mut MessageList) {
    let source = || {
        if road.id.trim().is_empty() {
            SourceId::dataset().element("road")
        } else {
            SourceId::road(&road.id)
        }
    };

    if road.id.trim().is_empty() {
        messages.push(DataQualityMessage::fatal(
            MessageCode::BlankRequiredId,
            source(),
            "road with blank id",
        ));
    }

    if !road.length.is_finite() || road.length < 0.0 {
        messages.push(DataQualityMessage::fatal(
            MessageCode::NonFiniteRequiredValue,
            source(),
            format!("road length is {}", road.length),
        ));
    }

    if road.plan_view.is_empty() {
        messages.push(DataQualityMessage::fatal(
            MessageCode::NoPlanViewGeometry,
            source(),
            "road has no plan-view geometry",
        ));
    }
    for (index, geometry) in road.plan_view.iter().enumerate() {
        if !geometry.has_finite_fields() {
            messages.push(DataQualityMessage::fatal(
                MessageCode::NonFiniteRequiredValue,
                source().element("planView"),
                format!("geometry {index} carries a non-finite required value"),
            ));
        }
    }

    if road.lanes.sections.is_empty() {
        messages.push(DataQualityMessage::fatal(
            MessageCode::NoLaneSections,
            source(),
            "road has no lane sections",
        ));
    }
    for (index, section) in road.lanes.sections.iter().enumerate() {
        for lane in section.lanes() {
            if lane.id == LANE_LINK_SENTINEL {
                messages.push(DataQualityMessage::fatal(
                    MessageCode::SentinelLaneLink,
                    source().lane_section(index),
                    "lane id could not be read",
                ));
            }
        }
    }
}
