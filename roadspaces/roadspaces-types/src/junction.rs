//! Built junctions: the connection graph between roadspaces.

use opendrive_types::ContactPoint;

use crate::identifier::RoadspaceId;

/// One movement through a junction.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionConnection {
    /// Connection identifier from the source model.
    pub id: String,
    /// Roadspace entering the junction.
    pub incoming: RoadspaceId,
    /// Roadspace carrying the movement inside the junction.
    pub connecting: RoadspaceId,
    /// Where the connecting roadspace attaches.
    pub contact: ContactPoint,
    /// Lane pairings `(incoming lane id, connecting lane id)`.
    pub lane_links: Vec<(i32, i32)>,
}

impl JunctionConnection {
    /// The connecting lane for an incoming lane, if linked.
    #[must_use]
    pub fn connecting_lane(&self, incoming_lane: i32) -> Option<i32> {
        self.lane_links
            .iter()
            .find(|(from, _)| *from == incoming_lane)
            .map(|(_, to)| *to)
    }
}

/// A built junction.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionSpace {
    /// Junction identifier.
    pub id: String,
    /// Junction name.
    pub name: String,
    /// The connection graph.
    pub connections: Vec<JunctionConnection>,
}

impl JunctionSpace {
    /// Connections whose incoming roadspace matches.
    pub fn connections_from<'a>(&'a self, incoming: &'a RoadspaceId) -> impl Iterator<Item = &'a JunctionConnection> + 'a {
        self.connections
            .iter()
            .filter(move |c| &c.incoming == incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connecting_lane() {
        let connection = JunctionConnection {
            id: "0".into(),
            incoming: RoadspaceId::new("1"),
            connecting: RoadspaceId::new("5"),
            contact: ContactPoint::Start,
            lane_links: vec![(-1, -1), (-2, -1)],
        };
        assert_eq!(connection.connecting_lane(-1), Some(-1));
        assert_eq!(connection.connecting_lane(3), None);
    }
}
