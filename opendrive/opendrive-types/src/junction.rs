//! Junctions and their lane connections.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::road::ContactPoint;

/// A single `from -> to` lane pairing in a junction connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JunctionLaneLink {
    /// Lane id on the incoming road.
    pub from: i32,
    /// Lane id on the connecting road.
    pub to: i32,
}

/// A connection between an incoming road and a connecting road.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connection {
    /// Connection identifier.
    pub id: String,
    /// Road entering the junction.
    pub incoming_road: String,
    /// Road inside the junction carrying the movement.
    pub connecting_road: String,
    /// Where the connecting road attaches.
    pub contact_point: ContactPoint,
    /// Lane pairings.
    pub lane_links: Vec<JunctionLaneLink>,
}

/// A junction of connecting roads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Junction {
    /// Junction identifier.
    pub id: String,
    /// Junction name (may be empty).
    pub name: String,
    /// The connections.
    pub connections: Vec<Connection>,
}

impl Junction {
    /// Connections whose incoming road matches `road_id`.
    pub fn connections_from<'a>(&'a self, road_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |c| c.incoming_road == road_id)
    }
}
