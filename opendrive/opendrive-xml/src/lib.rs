//! OpenDRIVE XML reading.
//!
//! This crate detects the declared schema version of an OpenDRIVE document,
//! selects a version adapter from a small registry, and reads the document
//! into the normalised model of `opendrive-types` with an event-based
//! `quick-xml` reader.
//!
//! The reader is permissive by design: structurally broken values survive as
//! NaN or sentinel markers so the evaluator in `opendrive-eval` can classify
//! every defect with a stable diagnostic code. Only malformed XML, a missing
//! header, and unsupported schema versions fail here.
//!
//! # Example
//!
//! ```
//! use opendrive_xml::read_opendrive_str;
//!
//! let xml = r#"
//!     <OpenDRIVE>
//!         <header revMajor="1" revMinor="4" name="minimal"/>
//!         <road id="1" length="10.0" junction="-1">
//!             <planView>
//!                 <geometry s="0.0" x="0.0" y="0.0" hdg="0.0" length="10.0">
//!                     <line/>
//!                 </geometry>
//!             </planView>
//!             <lanes>
//!                 <laneSection s="0.0">
//!                     <right>
//!                         <lane id="-1" type="driving" level="false">
//!                             <width sOffset="0.0" a="3.5" b="0.0" c="0.0" d="0.0"/>
//!                         </lane>
//!                     </right>
//!                 </laneSection>
//!             </lanes>
//!         </road>
//!     </OpenDRIVE>
//! "#;
//!
//! let (model, version) = read_opendrive_str(xml).unwrap();
//! assert_eq!(version.to_string(), "1.4");
//! assert_eq!(model.roads.len(), 1);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod parser;
mod version;

pub use error::{OdrXmlError, Result};
pub use parser::{read_opendrive_str, read_opendrive_with};
pub use version::{adapter_for, detect_version, VersionAdapter, SUPPORTED_VERSIONS};
