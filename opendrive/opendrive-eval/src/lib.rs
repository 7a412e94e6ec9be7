//! Data-quality evaluation and healing for OpenDRIVE models.
//!
//! Two pure operations over an [`opendrive_types::OpendriveModel`]:
//!
//! - [`evaluate_fatal`] detects unrecoverable defects and never mutates;
//! - [`evaluate_non_fatal`] returns a deep-cloned, repaired model together
//!   with a message per applied repair.
//!
//! Repairs are encoded as ordered plans of [`Rule`] values with stable
//! [`MessageCode`]s (see [`basic_data_type_plan`] and
//! [`modeling_rules_plan`]); downstream tooling and the test suite bind to
//! those codes.
//!
//! # Example
//!
//! ```
//! use opendrive_eval::{evaluate_fatal, evaluate_non_fatal, EvalConfig};
//! use opendrive_types::OpendriveModel;
//!
//! let model = OpendriveModel::default();
//! let fatals = evaluate_fatal(&model);
//! assert!(fatals.is_empty());
//!
//! let (healed, report) = evaluate_non_fatal(&model, &EvalConfig::default());
//! assert!(report.is_empty());
//! assert_eq!(healed, model);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod cancel;
mod fatal;
mod heal;
mod message;

pub use cancel::CancellationToken;
pub use fatal::evaluate_fatal;
pub use heal::{
    basic_data_type_plan, evaluate_non_fatal, modeling_rules_plan, EvalConfig, Rule,
};
pub use message::{DataQualityMessage, MessageCode, MessageList, Severity, SourceId};
