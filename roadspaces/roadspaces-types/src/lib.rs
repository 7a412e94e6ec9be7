//! Intermediate road-space model.
//!
//! A [`RoadspacesModel`] owns the fully built geometry of a road network:
//! per roadspace a 3D reference curve, the lane-section stack with lane
//! surfaces and boundaries, filler surfaces, roadside objects, and the
//! linkage graph between roadspaces and junctions.
//!
//! The model exclusively owns its geometry; the healed source model it was
//! built from can be dropped after the build. Cross-references are by value
//! through [`RoadspaceId`] and [`LaneId`], never by back-pointer.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod identifier;
mod junction;
mod lane;
mod model;
mod object;
mod road;

pub use error::RoadspacesError;
pub use identifier::{LaneId, RoadspaceId, RoadspaceObjectId};
pub use junction::{JunctionConnection, JunctionSpace};
pub use lane::{FillerKind, FillerSurface, LaneSectionSpace, LaneSpace, MarkingSpace};
pub use model::{Result, RoadspacesModel};
pub use object::RoadspaceObject;
pub use road::{RoadGeometry, Roadspace, RoadspaceLinkage};
