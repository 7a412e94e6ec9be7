//! Roadside-object construction.
//!
//! An object's pose composes the reference-line pose at its `s` position
//! with the lateral/vertical offset and the object's own rotation. The
//! geometry variant is chosen from the shape fields: radius and height make
//! a cylinder, box dimensions a multi-surface shell, an outline a polygon, a
//! repeat record a sweep, and anything else a point.

use geom_types::{
    CompositeCurve2d, Curve3d, CurveSegment2d, Cylinder3d, Geometry3d, Line2d, ParametricSweep3d,
    Point3, Polygon3d, Pose3, Vector3,
};
use nalgebra::{Isometry2, Vector2};
use opendrive_types::{Road, RoadObject};
use roadspaces_types::{RoadspaceId, RoadspaceObject, RoadspaceObjectId};

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};

/// Build every object of a road.
///
/// # Errors
///
/// Fails when the reference curve cannot be evaluated at an object position.
pub fn build_objects(
    road: &Road,
    reference: &Curve3d,
    roadspace_id: &RoadspaceId,
    config: &BuildConfig,
) -> Result<Vec<RoadspaceObject>> {
    let mut objects = Vec::with_capacity(road.objects.len());
    for object in &road.objects {
        objects.push(build_object(road, object, reference, roadspace_id, config)?);
    }
    Ok(objects)
}

fn build_object(
    road: &Road,
    object: &RoadObject,
    reference: &Curve3d,
    roadspace_id: &RoadspaceId,
    config: &BuildConfig,
) -> Result<RoadspaceObject> {
    let s = object.s.clamp(0.0, reference.length());
    let reference_pose = reference
        .pose(s)
        .map_err(|e| BuildError::numerical(&road.id, e))?;

    let rotation = reference_pose.rotation();
    let position =
        reference_pose.position + rotation * Vector3::new(0.0, object.t, object.z_offset);
    let pose = Pose3::new(
        position,
        reference_pose.yaw + object.hdg,
        reference_pose.pitch + object.pitch,
        reference_pose.roll + object.roll,
    );

    let geometry = object_geometry(road, object, &pose, config)?;

    let mut attributes = vec![("sourceType".to_string(), format!("{:?}", object.kind))];
    if let Some(h) = object.height {
        attributes.push(("height".to_string(), h.to_string()));
    }

    Ok(RoadspaceObject {
        id: RoadspaceObjectId {
            roadspace: roadspace_id.clone(),
            object: object.id.clone(),
        },
        name: object.name.clone(),
        kind: object.kind,
        pose,
        geometry,
        attributes,
    })
}

/// Choose the geometry variant from the object's shape fields.
fn object_geometry(
    road: &Road,
    object: &RoadObject,
    pose: &Pose3,
    config: &BuildConfig,
) -> Result<Geometry3d> {
    let wrap = |e| BuildError::numerical(&road.id, e);

    // A repeated object stretches along the road as a swept tube.
    if let Some(repeat) = object.repeat {
        if repeat.length > config.tolerance {
            let radius = object
                .radius
                .or(object.width.map(|w| 0.5 * w))
                .or(object.height.map(|h| 0.5 * h))
                .unwrap_or(0.1)
                .max(1e-3);
            let spine_line = Line2d::new(
                repeat.length,
                Isometry2::new(
                    Vector2::new(pose.position.x, pose.position.y),
                    pose.yaw,
                ),
                config.tolerance,
            )
            .map_err(wrap)?;
            let planar = CompositeCurve2d::new(
                vec![(0.0, CurveSegment2d::Line(spine_line))],
                config.tolerance,
            )
            .map_err(wrap)?;
            let spine = Curve3d::flat(planar, config.tolerance).map_err(wrap)?;
            let sweep = ParametricSweep3d::new(spine, radius).map_err(wrap)?;
            return Ok(Geometry3d::Sweep(sweep));
        }
    }

    // Rotationally symmetric: cylinder.
    if let (Some(radius), Some(height)) = (object.radius, object.height) {
        if radius > 0.0 && height > 0.0 {
            let cylinder = Cylinder3d::new(*pose, radius, height).map_err(wrap)?;
            return Ok(Geometry3d::Cylinder(cylinder));
        }
    }

    // Explicit outline: polygon in the object's local frame.
    if object.outline.len() >= 3 {
        let vertices: Vec<Point3<f64>> = object
            .outline
            .iter()
            .map(|corner| pose.transform_point(&Point3::new(corner.u, corner.v, corner.height)))
            .collect();
        let polygon = Polygon3d::new(vertices).map_err(wrap)?;
        return Ok(Geometry3d::Polygon(polygon));
    }

    // Box dimensions: closed shell around the pose.
    if let (Some(length), Some(width), Some(height)) =
        (object.length, object.width, object.height)
    {
        if length > 0.0 && width > 0.0 && height > 0.0 {
            return Ok(Geometry3d::MultiSurface(box_shell(
                pose, length, width, height,
            )?));
        }
    }

    Ok(Geometry3d::Point(pose.position))
}

/// The six faces of an axis-aligned box in the pose's local frame, centred
/// laterally and resting on the pose origin.
fn box_shell(pose: &Pose3, length: f64, width: f64, height: f64) -> Result<Vec<Polygon3d>> {
    let hl = 0.5 * length;
    let hw = 0.5 * width;
    let corner = |u: f64, v: f64, w: f64| pose.transform_point(&Point3::new(u, v, w));

    // Bottom ring (z = 0) and top ring (z = height), counter-clockwise.
    let b = [
        corner(-hl, -hw, 0.0),
        corner(hl, -hw, 0.0),
        corner(hl, hw, 0.0),
        corner(-hl, hw, 0.0),
    ];
    let t = [
        corner(-hl, -hw, height),
        corner(hl, -hw, height),
        corner(hl, hw, height),
        corner(-hl, hw, height),
    ];

    let faces = vec![
        vec![b[3], b[2], b[1], b[0]], // bottom, facing down
        vec![t[0], t[1], t[2], t[3]], // top, facing up
        vec![b[0], b[1], t[1], t[0]],
        vec![b[1], b[2], t[2], t[1]],
        vec![b[2], b[3], t[3], t[2]],
        vec![b[3], b[0], t[0], t[3]],
    ];

    faces
        .into_iter()
        .map(|ring| Polygon3d::new(ring).map_err(|e| BuildError::numerical("object", e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::build_reference_curve;
    use approx::assert_relative_eq;
    use opendrive_types::{
        GeometryKind, Lanes, LateralProfile, Link, ObjectType, Orientation, PlanViewGeometry,
        TrafficRule,
    };

    fn road_with_object(object: RoadObject) -> Road {
        Road {
            id: "1".into(),
            name: String::new(),
            length: 20.0,
            junction: None,
            rule: TrafficRule::Rht,
            plan_view: vec![PlanViewGeometry {
                s: 0.0,
                x: 0.0,
                y: 0.0,
                hdg: 0.0,
                length: 20.0,
                kind: GeometryKind::Line,
            }],
            elevation_profile: None,
            lateral_profile: LateralProfile::default(),
            lanes: Lanes::default(),
            objects: vec![object],
            signals: Vec::new(),
            link: Link::default(),
        }
    }

    fn object(id: &str) -> RoadObject {
        RoadObject {
            id: id.into(),
            name: "trafficSign".into(),
            kind: ObjectType::Pole,
            s: 5.0,
            t: -4.0,
            z_offset: 0.0,
            orientation: Orientation::None,
            hdg: 0.0,
            pitch: 0.0,
            roll: 0.0,
            length: None,
            width: None,
            height: None,
            radius: None,
            repeat: None,
            outline: Vec::new(),
        }
    }

    fn build(road: &Road) -> Vec<RoadspaceObject> {
        let config = BuildConfig::default();
        let mut messages = opendrive_eval::MessageList::new();
        let reference = build_reference_curve(road, &config, &mut messages).unwrap();
        build_objects(road, &reference, &RoadspaceId::new("1"), &config).unwrap()
    }

    #[test]
    fn test_point_object_pose() {
        let road = road_with_object(object("o1"));
        let objects = build(&road);
        assert_eq!(objects.len(), 1);
        let built = &objects[0];
        assert!(matches!(built.geometry, Geometry3d::Point(_)));
        assert_relative_eq!(built.pose.position.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(built.pose.position.y, -4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cylinder_object() {
        let mut o = object("o2");
        o.radius = Some(0.05);
        o.height = Some(2.5);
        let objects = build(&road_with_object(o));
        assert!(matches!(
            objects[0].geometry,
            Geometry3d::Cylinder(ref c) if (c.radius - 0.05).abs() < 1e-12
        ));
    }

    #[test]
    fn test_box_object() {
        let mut o = object("o3");
        o.length = Some(2.0);
        o.width = Some(1.0);
        o.height = Some(1.5);
        let objects = build(&road_with_object(o));
        let Geometry3d::MultiSurface(ref faces) = objects[0].geometry else {
            panic!("expected multi-surface");
        };
        assert_eq!(faces.len(), 6);
    }

    #[test]
    fn test_repeat_becomes_sweep() {
        let mut o = object("o4");
        o.repeat = Some(opendrive_types::ObjectRepeat {
            length: 10.0,
            distance: 0.0,
        });
        o.width = Some(0.4);
        let objects = build(&road_with_object(o));
        assert!(matches!(objects[0].geometry, Geometry3d::Sweep(_)));
    }

    #[test]
    fn test_outline_becomes_polygon() {
        let mut o = object("o5");
        o.outline = vec![
            opendrive_types::OutlineCorner { u: 0.0, v: 0.0, height: 0.0 },
            opendrive_types::OutlineCorner { u: 1.0, v: 0.0, height: 0.0 },
            opendrive_types::OutlineCorner { u: 1.0, v: 1.0, height: 0.0 },
        ];
        let objects = build(&road_with_object(o));
        assert!(matches!(objects[0].geometry, Geometry3d::Polygon(_)));
    }
}
