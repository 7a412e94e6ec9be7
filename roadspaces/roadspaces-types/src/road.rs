//! Built roadspaces: reference curve, lane-section stack, linkage.

use geom_types::Curve3d;
use opendrive_types::ContactPoint;

use crate::identifier::RoadspaceId;
use crate::lane::{FillerSurface, LaneSectionSpace};
use crate::object::RoadspaceObject;

/// Predecessor/successor relations of a roadspace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoadspaceLinkage {
    /// Roadspace before the start, with the contact point on *that* road.
    pub predecessor: Option<(RoadspaceId, ContactPoint)>,
    /// Roadspace after the end, with the contact point on *that* road.
    pub successor: Option<(RoadspaceId, ContactPoint)>,
    /// Junction the successor link goes through, if any.
    pub successor_junction: Option<String>,
    /// Junction the predecessor link goes through, if any.
    pub predecessor_junction: Option<String>,
    /// Junction this road itself belongs to (connecting roads).
    pub member_of_junction: Option<String>,
}

/// The built geometric road of a roadspace.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadGeometry {
    /// The 3D reference curve over `[0, length]`.
    pub reference: Curve3d,
    /// Built lane sections in ascending `s` order.
    pub sections: Vec<LaneSectionSpace>,
    /// Filler surfaces closing gaps between lane surfaces.
    pub fillers: Vec<FillerSurface>,
    /// Predecessor/successor relations.
    pub linkage: RoadspaceLinkage,
}

/// A roadspace: the built road plus its objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Roadspace {
    /// Identifier (derived from the source road id).
    pub id: RoadspaceId,
    /// Source road name.
    pub name: String,
    /// The built geometric road.
    pub road: RoadGeometry,
    /// Built roadside objects.
    pub objects: Vec<RoadspaceObject>,
}
