//! CityGML feature graph for transportation networks.
//!
//! The types here are output-shaped: a [`CityModel`] owns member features
//! ([`CityObject`]), roads own traffic spaces, and traffic spaces own
//! thematic boundary surfaces with LoD2 geometry and optional LoD0 lines.
//! Serialisation is external and consumed through [`CityGmlWriter`].

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod attributes;
mod geometry;
mod model;
mod transportation;
mod writer;

pub use attributes::{Attribute, AttributeSet, AttributeValue};
pub use geometry::GeometryProperty;
pub use model::{CityModel, CityObject, SimpleFeature};
pub use transportation::{
    RoadFeature, SurfaceKind, ThematicSurface, TrafficDirection, TrafficSpaceFeature,
};
pub use writer::{CityGmlWriter, NullWriter, WriteError};
