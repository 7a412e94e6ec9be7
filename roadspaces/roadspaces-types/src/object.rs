//! Built roadside objects.

use geom_types::{Geometry3d, Pose3};
use opendrive_types::ObjectType;

use crate::identifier::RoadspaceObjectId;

/// A built roadside object with resolved pose and geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadspaceObject {
    /// Object identifier.
    pub id: RoadspaceObjectId,
    /// Source object name (drives feature mapping downstream).
    pub name: String,
    /// Source object type.
    pub kind: ObjectType,
    /// Pose in the map frame.
    pub pose: Pose3,
    /// Resolved geometry.
    pub geometry: Geometry3d,
    /// Flat source attributes carried through to the output.
    pub attributes: Vec<(String, String)>,
}
