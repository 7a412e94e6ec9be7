//! The road-space model: an arena of roadspaces and junctions.
//!
//! Roadspaces and junctions are stored in arenas with id-to-index maps, and
//! every cross-reference goes through the model by identifier. This keeps the
//! graph free of cyclic ownership.

use hashbrown::HashMap;

use crate::error::RoadspacesError;
use crate::identifier::{LaneId, RoadspaceId};
use crate::junction::JunctionSpace;
use crate::road::Roadspace;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, RoadspacesError>;

/// The complete built model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoadspacesModel {
    roadspaces: Vec<Roadspace>,
    roadspace_index: HashMap<RoadspaceId, usize>,
    junctions: Vec<JunctionSpace>,
    junction_index: HashMap<String, usize>,
}

impl RoadspacesModel {
    /// An empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a roadspace.
    ///
    /// # Errors
    ///
    /// Returns [`RoadspacesError::DuplicateId`] when the id is taken.
    pub fn insert_roadspace(&mut self, roadspace: Roadspace) -> Result<()> {
        if self.roadspace_index.contains_key(&roadspace.id) {
            return Err(RoadspacesError::duplicate(
                "roadspace",
                roadspace.id.as_str(),
            ));
        }
        self.roadspace_index
            .insert(roadspace.id.clone(), self.roadspaces.len());
        self.roadspaces.push(roadspace);
        Ok(())
    }

    /// Insert a junction.
    ///
    /// # Errors
    ///
    /// Returns [`RoadspacesError::DuplicateId`] when the id is taken.
    pub fn insert_junction(&mut self, junction: JunctionSpace) -> Result<()> {
        if self.junction_index.contains_key(&junction.id) {
            return Err(RoadspacesError::duplicate("junction", &junction.id));
        }
        self.junction_index
            .insert(junction.id.clone(), self.junctions.len());
        self.junctions.push(junction);
        Ok(())
    }

    /// All roadspaces in insertion order.
    #[must_use]
    pub fn roadspaces(&self) -> &[Roadspace] {
        &self.roadspaces
    }

    /// All junctions in insertion order.
    #[must_use]
    pub fn junctions(&self) -> &[JunctionSpace] {
        &self.junctions
    }

    /// Look up a roadspace by id.
    #[must_use]
    pub fn roadspace(&self, id: &RoadspaceId) -> Option<&Roadspace> {
        self.roadspace_index.get(id).map(|&i| &self.roadspaces[i])
    }

    /// Look up a junction by id.
    #[must_use]
    pub fn junction(&self, id: &str) -> Option<&JunctionSpace> {
        self.junction_index.get(id).map(|&i| &self.junctions[i])
    }

    /// Resolve a roadspace or fail.
    ///
    /// # Errors
    ///
    /// Returns [`RoadspacesError::UnresolvedReference`] when absent.
    pub fn require_roadspace(&self, id: &RoadspaceId) -> Result<&Roadspace> {
        self.roadspace(id)
            .ok_or_else(|| RoadspacesError::unresolved("roadspace", id.as_str()))
    }

    /// Resolve a junction or fail.
    ///
    /// # Errors
    ///
    /// Returns [`RoadspacesError::UnresolvedReference`] when absent.
    pub fn require_junction(&self, id: &str) -> Result<&JunctionSpace> {
        self.junction(id)
            .ok_or_else(|| RoadspacesError::unresolved("junction", id))
    }

    /// The lanes a lane flows into.
    ///
    /// Follows the next section within the roadspace, the direct successor
    /// road, or the junction connection map when the successor is a junction.
    ///
    /// # Errors
    ///
    /// Fails when a referenced roadspace, junction, section, or lane does not
    /// resolve.
    pub fn successor_lane_ids(&self, lane_id: &LaneId) -> Result<Vec<LaneId>> {
        let roadspace = self.require_roadspace(&lane_id.roadspace)?;
        let sections = &roadspace.road.sections;
        let section = sections
            .get(lane_id.section)
            .ok_or_else(|| RoadspacesError::SectionOutOfBounds {
                roadspace: lane_id.roadspace.to_string(),
                index: lane_id.section,
            })?;
        let lane = section
            .lane(lane_id.lane)
            .ok_or_else(|| RoadspacesError::unresolved("lane", lane_id.to_string()))?;

        // Within the same roadspace the next section is the successor.
        if lane_id.section + 1 < sections.len() {
            return Ok(lane
                .successor
                .map(|target| LaneId::new(lane_id.roadspace.clone(), lane_id.section + 1, target))
                .into_iter()
                .collect());
        }

        let linkage = &roadspace.road.linkage;

        if let Some(junction_id) = &linkage.successor_junction {
            let junction = self.require_junction(junction_id)?;
            let mut successors = Vec::new();
            for connection in junction.connections_from(&lane_id.roadspace) {
                if let Some(target) = connection.connecting_lane(lane_id.lane) {
                    let connecting = self.require_roadspace(&connection.connecting)?;
                    let section = entry_section(connecting, connection.contact);
                    successors.push(LaneId::new(connection.connecting.clone(), section, target));
                }
            }
            return Ok(successors);
        }

        if let Some((successor_id, contact)) = &linkage.successor {
            let successor = self.require_roadspace(successor_id)?;
            let section = entry_section(successor, *contact);
            return Ok(lane
                .successor
                .map(|target| LaneId::new(successor_id.clone(), section, target))
                .into_iter()
                .collect());
        }

        Ok(Vec::new())
    }
}

/// The section index where traffic enters a roadspace at a contact point.
fn entry_section(roadspace: &Roadspace, contact: opendrive_types::ContactPoint) -> usize {
    match contact {
        opendrive_types::ContactPoint::Start => 0,
        opendrive_types::ContactPoint::End => roadspace.road.sections.len().saturating_sub(1),
    }
}
