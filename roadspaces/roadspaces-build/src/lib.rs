//! Road-space builder: healed OpenDRIVE in, built road geometry out.
//!
//! For every road the builder composes the 2D reference line from the
//! plan-view segments, stacks elevation and superelevation into height and
//! torsion functions, lifts the result into a 3D reference curve, samples
//! lane boundaries and surfaces, closes gaps with filler surfaces, and
//! resolves roadside objects. Dangling references abort with a
//! [`BuildError`]; every recoverable finding is returned as a message.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod fillers;
mod lanes;
mod objects;
mod reference;

pub use builder::{build_roadspaces, build_roadspaces_cancellable};
pub use config::BuildConfig;
pub use error::{BuildError, Result};
pub use lanes::build_lane_sections;
pub use objects::build_objects;
pub use reference::build_reference_curve;
