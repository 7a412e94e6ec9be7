//! CityGML feature builder.
//!
//! Consumes a built road-space model and emits the CityGML feature graph:
//! one road per roadspace (or per connected component under backwards
//! compatibility), traffic and auxiliary-traffic spaces per lane with LoD0
//! centre lines and LoD2 boundary surfaces, markings, and roadside objects
//! mapped to city furniture, vegetation, buildings, or generic city objects.
//!
//! Geometry conversion goes through the discretisation visitor of
//! `geom-types`; the chosen [`citygml_types::GeometryProperty`] follows the
//! solid, multi-surface, line-string, point priority.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod identifier;
mod mapping;

pub use builder::build_citygml;
pub use config::CityGmlConfig;
pub use error::{CityGmlBuildError, Result};
pub use identifier::{derive_id, generate_random_uuid, geometry_id};
pub use mapping::{area_codes, object_target, AreaCodes, ObjectTarget};
