//! Identifiers of road-space elements.
//!
//! Cross-references in the model are by value through these identifiers;
//! lookups go through [`crate::RoadspacesModel`]. No element holds a
//! back-pointer.

use std::fmt;

/// Identifier of a roadspace (derived from the source road id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadspaceId(String);

impl RoadspaceId {
    /// Create from a source road id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoadspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoadspaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of a lane: roadspace, lane-section index, signed lane id.
///
/// Negative lane ids lie right of the reference line, positive left; id 0 is
/// the centre lane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaneId {
    /// The containing roadspace.
    pub roadspace: RoadspaceId,
    /// Index of the lane section within the roadspace.
    pub section: usize,
    /// Signed lane id within the section.
    pub lane: i32,
}

impl LaneId {
    /// Create a lane identifier.
    #[must_use]
    pub fn new(roadspace: RoadspaceId, section: usize, lane: i32) -> Self {
        Self {
            roadspace,
            section,
            lane,
        }
    }

    /// Whether the lane lies left of the reference line.
    #[must_use]
    pub fn is_left(&self) -> bool {
        self.lane > 0
    }

    /// Whether the lane lies right of the reference line.
    #[must_use]
    pub fn is_right(&self) -> bool {
        self.lane < 0
    }

    /// Whether this is the centre lane.
    #[must_use]
    pub fn is_center(&self) -> bool {
        self.lane == 0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.roadspace, self.section, self.lane)
    }
}

/// Identifier of a roadspace object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoadspaceObjectId {
    /// The containing roadspace.
    pub roadspace: RoadspaceId,
    /// Source object id.
    pub object: String,
}

impl fmt::Display for RoadspaceObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/object {}", self.roadspace, self.object)
    }
}
