//! Road-space model to CityGML feature build.
//!
//! Walks every roadspace, turns lanes into traffic spaces with LoD0 centre
//! lines and LoD2 boundary surfaces, attaches fillers and markings, and maps
//! roadside objects to their target features. All coordinates receive the
//! configured offset translation.

use hashbrown::HashMap;

use citygml_types::{
    AttributeSet, CityModel, CityObject, GeometryProperty, RoadFeature, SimpleFeature,
    SurfaceKind, ThematicSurface, TrafficDirection, TrafficSpaceFeature,
};
use geom_types::{discretize, Polygon3d};
use opendrive_eval::{DataQualityMessage, MessageCode, MessageList, Severity, SourceId};
use roadspaces_types::{LaneId, LaneSpace, Roadspace, RoadspaceId, RoadspacesModel};

use crate::config::CityGmlConfig;
use crate::error::Result;
use crate::identifier::{derive_id, geometry_id};
use crate::mapping::{area_codes, object_target, ObjectTarget};

/// Build the city model from a road-space model.
///
/// # Errors
///
/// Fails only for unusable discretisation configuration; everything
/// recoverable is reported in the message list.
pub fn build_citygml(
    model: &RoadspacesModel,
    config: &CityGmlConfig,
) -> Result<(CityModel, MessageList)> {
    config.discretization.validate()?;
    let mut messages = MessageList::new();
    let mut city = CityModel {
        crs_epsg: config.crs_epsg,
        name: String::new(),
        members: Vec::new(),
    };

    let components = road_components(model, config.mapping_backwards_compatibility);
    for component in components {
        let mut road_feature: Option<RoadFeature> = None;
        for roadspace_id in &component {
            let Some(roadspace) = model.roadspace(roadspace_id) else {
                continue;
            };
            let spaces = build_traffic_spaces(roadspace, config, &mut messages);
            match &mut road_feature {
                None => {
                    road_feature = Some(RoadFeature {
                        id: derive_id(roadspace_id.as_str(), "Road"),
                        name: roadspace.name.clone(),
                        traffic_spaces: spaces,
                        attributes: AttributeSet::new(),
                    });
                }
                Some(feature) => feature.traffic_spaces.extend(spaces),
            }
        }
        if let Some(feature) = road_feature {
            city.members.push(CityObject::Road(feature));
        }
    }

    for roadspace in model.roadspaces() {
        build_object_features(roadspace, config, &mut city, &mut messages);
    }

    tracing::info!(
        members = city.members.len(),
        findings = messages.len(),
        "built city model"
    );
    Ok((city, messages))
}

/// Group roadspaces into connected components of the linkage graph when
/// backwards compatibility asks for merged roads; one component per
/// roadspace otherwise.
fn road_components(model: &RoadspacesModel, merge: bool) -> Vec<Vec<RoadspaceId>> {
    let ids: Vec<RoadspaceId> = model.roadspaces().iter().map(|r| r.id.clone()).collect();
    if !merge {
        return ids.into_iter().map(|id| vec![id]).collect();
    }

    let index: HashMap<&RoadspaceId, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let mut parent: Vec<usize> = (0..ids.len()).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        if parent[i] != i {
            let root = find(parent, parent[i]);
            parent[i] = root;
        }
        parent[i]
    }
    let union = |parent: &mut Vec<usize>, a: usize, b: usize| {
        let ra = find(parent, a);
        let rb = find(parent, b);
        if ra != rb {
            parent[ra] = rb;
        }
    };

    for roadspace in model.roadspaces() {
        let Some(&own) = index.get(&roadspace.id) else {
            continue;
        };
        let linkage = &roadspace.road.linkage;
        for neighbour in [&linkage.predecessor, &linkage.successor] {
            if let Some((other_id, _)) = neighbour {
                if let Some(&other) = index.get(other_id) {
                    union(&mut parent, own, other);
                }
            }
        }
    }

    let mut components: HashMap<usize, Vec<RoadspaceId>> = HashMap::new();
    for (i, id) in ids.iter().enumerate() {
        let root = find(&mut parent, i);
        components.entry(root).or_default().push(id.clone());
    }
    let mut result: Vec<Vec<RoadspaceId>> = components.into_values().collect();
    result.sort_by(|a, b| a[0].cmp(&b[0]));
    result
}

/// Build the traffic spaces of one roadspace.
fn build_traffic_spaces(
    roadspace: &Roadspace,
    config: &CityGmlConfig,
    messages: &mut MessageList,
) -> Vec<TrafficSpaceFeature> {
    // Fillers indexed by the lane they belong to.
    let mut fillers_by_lane: HashMap<&LaneId, Vec<&Polygon3d>> = HashMap::new();
    for filler in &roadspace.road.fillers {
        fillers_by_lane
            .entry(&filler.between.0)
            .or_default()
            .push(&filler.polygon);
    }

    let mut spaces = Vec::new();
    for section in &roadspace.road.sections {
        for lane in &section.lanes {
            let lane_fillers = fillers_by_lane
                .get(&lane.id)
                .map(|polygons| polygons.as_slice())
                .unwrap_or(&[]);
            spaces.push(build_traffic_space(lane, lane_fillers, config, messages));
        }
    }
    spaces
}

fn build_traffic_space(
    lane: &LaneSpace,
    fillers: &[&Polygon3d],
    config: &CityGmlConfig,
    messages: &mut MessageList,
) -> TrafficSpaceFeature {
    let source = lane.id.to_string();
    let is_auxiliary = !lane.kind.is_drivable();
    // Right-hand traffic: lanes right of the reference line run forwards.
    let direction = if lane.id.lane > 0 {
        TrafficDirection::Backwards
    } else {
        TrafficDirection::Forwards
    };

    let codes = area_codes(lane.kind);
    let area_kind = if is_auxiliary {
        SurfaceKind::AuxiliaryTrafficArea
    } else {
        SurfaceKind::TrafficArea
    };

    let mut attributes = AttributeSet::new();
    if let Some(speed) = lane.speed {
        attributes.push_number("maximumSpeed", speed);
    }
    if let Some(material) = &lane.material {
        let mut nested = AttributeSet::new();
        nested.push_text("surface", &material.surface);
        if let Some(friction) = material.friction {
            nested.push_number("friction", friction);
        }
        if let Some(roughness) = material.roughness {
            nested.push_number("roughness", roughness);
        }
        attributes.push_nested("material", nested);
    }
    if config.flatten_generic_attribute_sets {
        attributes = attributes.flattened();
    }

    let mut boundaries = Vec::new();

    if lane.surface.is_empty() {
        messages.push(DataQualityMessage::reported(
            MessageCode::NumericalFailure,
            SourceId::road(lane.id.roadspace.as_str()).lane_section(lane.id.section).lane(lane.id.lane),
            Severity::Warning,
            "lane has no surface polygons; boundary surface omitted",
        ));
    } else {
        let mut polygons = lane.surface.clone();
        polygons.extend(fillers.iter().map(|p| (*p).clone()));
        boundaries.push(ThematicSurface {
            id: geometry_id(&source, "TrafficArea", config.generate_random_geometry_ids),
            kind: area_kind,
            usage: Some(codes.usage.to_string()),
            function: Some(codes.function.to_string()),
            geometry: GeometryProperty::MultiSurface(polygons).translated(config.offset),
            attributes: AttributeSet::new(),
        });
    }

    for (index, marking) in lane.markings.iter().enumerate() {
        let kind = if config.mapping_backwards_compatibility {
            SurfaceKind::AuxiliaryTrafficArea
        } else {
            SurfaceKind::Marking
        };
        let mut marking_attributes = AttributeSet::new();
        marking_attributes.push_text("markingType", format!("{:?}", marking.kind));
        marking_attributes.push_text("markingColor", format!("{:?}", marking.color));
        boundaries.push(ThematicSurface {
            id: geometry_id(
                &format!("{source}_marking_{index}"),
                "Marking",
                config.generate_random_geometry_ids,
            ),
            kind,
            usage: None,
            function: None,
            geometry: GeometryProperty::MultiSurface(marking.surface.clone())
                .translated(config.offset),
            attributes: marking_attributes,
        });
    }

    let lod0_line = Some(lane.center_line.translated(config.offset));

    TrafficSpaceFeature {
        id: derive_id(&source, "TrafficSpace"),
        is_auxiliary,
        direction,
        lod0_line,
        boundaries,
        attributes,
    }
}

/// Map every roadside object of a roadspace to its target feature.
fn build_object_features(
    roadspace: &Roadspace,
    config: &CityGmlConfig,
    city: &mut CityModel,
    messages: &mut MessageList,
) {
    for object in &roadspace.objects {
        let geometry = match discretize(&object.geometry, &config.discretization) {
            Ok(discretized) => {
                GeometryProperty::from_discretized(discretized).translated(config.offset)
            }
            Err(error) => {
                messages.push(DataQualityMessage::reported(
                    MessageCode::NumericalFailure,
                    SourceId::road(roadspace.id.as_str()).element("object"),
                    Severity::Warning,
                    format!("object '{}' geometry failed to discretise: {error}", object.id),
                ));
                // Degrade to the object's anchor point.
                GeometryProperty::Point(object.pose.position).translated(config.offset)
            }
        };

        let mut attributes = AttributeSet::new();
        attributes.push_text("name", &object.name);
        for (key, value) in &object.attributes {
            attributes.push_text(key, value);
        }
        if config.flatten_generic_attribute_sets {
            attributes = attributes.flattened();
        }

        let feature = SimpleFeature {
            id: derive_id(&object.id.to_string(), "Object"),
            name: object.name.clone(),
            geometry,
            attributes,
        };

        let member = match object_target(&object.name, object.kind) {
            ObjectTarget::CityFurniture => CityObject::CityFurniture(feature),
            ObjectTarget::TransportationComplex => CityObject::TransportationComplex(feature),
            ObjectTarget::SolitaryVegetation => CityObject::SolitaryVegetationObject(feature),
            ObjectTarget::PlantCover => CityObject::PlantCover(feature),
            ObjectTarget::Building => CityObject::Building(feature),
            ObjectTarget::Generic => CityObject::GenericCityObject(feature),
        };
        city.members.push(member);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geom_types::Vector3;
    use opendrive_types::{
        GeometryKind, Lane, LaneLink, LaneSection, LaneType, Lanes, LateralProfile, Link,
        ObjectType, Orientation, PlanViewGeometry, Poly3Entry, RoadObject, TrafficRule,
    };
    use roadspaces_build::{build_roadspaces, BuildConfig};

    fn straight_road_model(lane_type: LaneType) -> RoadspacesModel {
        let road = opendrive_types::Road {
            id: "1".into(),
            name: "main".into(),
            length: 10.0,
            junction: None,
            rule: TrafficRule::Rht,
            plan_view: vec![PlanViewGeometry {
                s: 0.0,
                x: 0.0,
                y: 0.0,
                hdg: 0.0,
                length: 10.0,
                kind: GeometryKind::Line,
            }],
            elevation_profile: None,
            lateral_profile: LateralProfile::default(),
            lanes: Lanes {
                lane_offset: Vec::new(),
                sections: vec![LaneSection {
                    s: 0.0,
                    right: vec![Lane {
                        id: -1,
                        kind: lane_type,
                        level: false,
                        widths: vec![Poly3Entry {
                            s: 0.0,
                            a: 3.5,
                            b: 0.0,
                            c: 0.0,
                            d: 0.0,
                        }],
                        heights: Vec::new(),
                        road_marks: Vec::new(),
                        material: None,
                        speed: None,
                        link: LaneLink::default(),
                    }],
                    ..LaneSection::default()
                }],
            },
            objects: vec![RoadObject {
                id: "o1".into(),
                name: "trafficSign".into(),
                kind: ObjectType::Pole,
                s: 5.0,
                t: -5.0,
                z_offset: 0.0,
                orientation: Orientation::None,
                hdg: 0.0,
                pitch: 0.0,
                roll: 0.0,
                length: None,
                width: None,
                height: Some(2.5),
                radius: Some(0.05),
                repeat: None,
                outline: Vec::new(),
            }],
            signals: Vec::new(),
            link: Link::default(),
        };
        let model = opendrive_types::OpendriveModel {
            roads: vec![road],
            ..opendrive_types::OpendriveModel::default()
        };
        build_roadspaces(&model, &BuildConfig::default()).unwrap().0
    }

    #[test]
    fn test_driving_lane_becomes_traffic_space() {
        let spaces = straight_road_model(LaneType::Driving);
        let (city, messages) = build_citygml(&spaces, &CityGmlConfig::default()).unwrap();

        let road = city.roads().next().unwrap();
        assert_eq!(road.traffic_spaces.len(), 1);
        let space = &road.traffic_spaces[0];
        assert!(!space.is_auxiliary);
        assert_eq!(space.direction, TrafficDirection::Forwards);
        assert!(space.lod0_line.is_some());

        let surface = &space.boundaries[0];
        assert_eq!(surface.kind, SurfaceKind::TrafficArea);
        assert_eq!(surface.usage.as_deref(), Some("driving"));

        // The LoD2 multi-surface spans the expected rectangle.
        let GeometryProperty::MultiSurface(polygons) = &surface.geometry else {
            panic!("expected multi-surface");
        };
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        for polygon in polygons {
            for v in polygon.vertices() {
                min_y = min_y.min(v.y);
                max_x = max_x.max(v.x);
                assert_relative_eq!(v.z, 0.0, epsilon = 1e-9);
            }
        }
        assert_relative_eq!(min_y, -3.5, epsilon = 1e-9);
        assert_relative_eq!(max_x, 10.0, epsilon = 1e-9);

        assert!(messages.is_empty());
    }

    #[test]
    fn test_sidewalk_becomes_auxiliary() {
        let spaces = straight_road_model(LaneType::Sidewalk);
        let (city, _) = build_citygml(&spaces, &CityGmlConfig::default()).unwrap();
        let road = city.roads().next().unwrap();
        let space = &road.traffic_spaces[0];
        assert!(space.is_auxiliary);
        assert_eq!(space.boundaries[0].kind, SurfaceKind::AuxiliaryTrafficArea);
    }

    #[test]
    fn test_object_mapping_and_offset() {
        let spaces = straight_road_model(LaneType::Driving);
        let config = CityGmlConfig {
            offset: Vector3::new(100.0, 200.0, 10.0),
            ..CityGmlConfig::default()
        };
        let (city, _) = build_citygml(&spaces, &config).unwrap();

        // The pole-with-name-trafficSign becomes city furniture.
        let furniture = city
            .members
            .iter()
            .find_map(|m| match m {
                CityObject::CityFurniture(f) => Some(f),
                _ => None,
            })
            .unwrap();
        // Cylinder discretises to a solid; the offset shifts it.
        let GeometryProperty::Solid(polygons) = &furniture.geometry else {
            panic!("expected solid, got {:?}", furniture.geometry.priority_rank());
        };
        let v = polygons[0].vertices()[0];
        assert!(v.x > 100.0);
        assert!(v.y > 190.0);
        assert!(v.z >= 10.0 - 1e-9);
    }

    #[test]
    fn test_geometry_priority_respected() {
        let spaces = straight_road_model(LaneType::Driving);
        let (city, _) = build_citygml(&spaces, &CityGmlConfig::default()).unwrap();
        for member in &city.members {
            let rank = match member {
                CityObject::Road(road) => road
                    .traffic_spaces
                    .iter()
                    .flat_map(|s| s.boundaries.iter())
                    .map(|b| b.geometry.priority_rank())
                    .max()
                    .unwrap_or(0),
                CityObject::TransportationComplex(f)
                | CityObject::CityFurniture(f)
                | CityObject::Building(f)
                | CityObject::SolitaryVegetationObject(f)
                | CityObject::PlantCover(f)
                | CityObject::GenericCityObject(f) => f.geometry.priority_rank(),
            };
            // Solids and multi-surfaces only in this scene; nothing degraded
            // to a bare point or line.
            assert!(rank <= 1, "feature degraded to rank {rank}");
        }
    }

    #[test]
    fn test_random_geometry_ids() {
        let spaces = straight_road_model(LaneType::Driving);
        let config = CityGmlConfig {
            generate_random_geometry_ids: true,
            ..CityGmlConfig::default()
        };
        let (city, _) = build_citygml(&spaces, &config).unwrap();
        let road = city.roads().next().unwrap();
        assert!(road.traffic_spaces[0].boundaries[0].id.starts_with("UUID_"));
    }

    #[test]
    fn test_deterministic_ids_by_default() {
        let spaces = straight_road_model(LaneType::Driving);
        let (a, _) = build_citygml(&spaces, &CityGmlConfig::default()).unwrap();
        let (b, _) = build_citygml(&spaces, &CityGmlConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
