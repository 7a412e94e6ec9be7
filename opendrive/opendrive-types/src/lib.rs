//! Plain data model for ASAM OpenDRIVE road networks.
//!
//! The types in this crate mirror the union of the supported schema versions
//! (1.1 through 1.7) but use Rust-native representations: optional attributes
//! are `Option`, enumerated attributes are enums with `from_str` parsing, and
//! nothing here owns behaviour beyond small local validity helpers.
//!
//! Reading XML into this model lives in `opendrive-xml`; data-quality
//! evaluation and healing live in `opendrive-eval`.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod header;
mod junction;
mod lanes;
mod objects;
mod road;

pub use header::{GeoReference, Header, SchemaVersion};
pub use junction::{Connection, Junction, JunctionLaneLink};
pub use lanes::{
    CenterLane, Lane, LaneHeightEntry, LaneLink, LaneMaterial, LaneSection, LaneType, Lanes,
    RoadMark, RoadMarkColor, RoadMarkKind, LANE_LINK_SENTINEL,
};
pub use objects::{
    ObjectRepeat, ObjectType, Orientation, OutlineCorner, RoadObject, RoadSignal,
};
pub use road::{
    ContactPoint, ElevationProfile, GeometryKind, LateralProfile, Link, LinkedElement,
    PlanViewGeometry, Poly3Entry, Road, RoadLink, ShapeEntry, TrafficRule,
};

/// A complete OpenDRIVE dataset.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpendriveModel {
    /// Header metadata.
    pub header: Option<Header>,
    /// Roads in document order.
    pub roads: Vec<Road>,
    /// Junctions in document order.
    pub junctions: Vec<Junction>,
}

impl OpendriveModel {
    /// Find a road by id.
    #[must_use]
    pub fn road(&self, id: &str) -> Option<&Road> {
        self.roads.iter().find(|r| r.id == id)
    }

    /// Find a junction by id.
    #[must_use]
    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junctions.iter().find(|j| j.id == id)
    }
}
