//! Per-input conversion pipeline.
//!
//! For each input document the driver runs read, fatal evaluation (abort on
//! any fatal), healing, road-space build, CityGML build, and write through
//! an injected [`citygml_types::CityGmlWriter`]. A JSON report is produced
//! for every input regardless of outcome.
//!
//! The core is single-threaded per input; hosts may run several inputs on
//! worker threads, each owning its models exclusively. Cancellation is
//! cooperative through [`CancellationToken`], checked between phases and
//! between roads.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod config;
mod driver;
mod report;

pub use config::{PipelineConfig, TOLERANCE_FLOOR};
pub use driver::{convert_str, process_str};
pub use report::{exit_code, Outcome, PipelineReport};

// The host-facing surface re-exports what callers need to run a conversion.
pub use citygml_types::{CityGmlWriter, CityModel, NullWriter};
pub use opendrive_eval::{CancellationToken, MessageCode, MessageList, Severity};
