//! Header metadata of an OpenDRIVE dataset.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

/// A schema version as declared by `revMajor`/`revMinor` in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaVersion {
    /// Major revision.
    pub major: u16,
    /// Minor revision.
    pub minor: u16,
}

impl SchemaVersion {
    /// Create a version.
    #[must_use]
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Geographic reference of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoReference {
    /// Raw PROJ string or WKT from the `<geoReference>` element.
    pub proj_string: String,
    /// EPSG code scraped from the PROJ string when present.
    pub epsg: Option<u32>,
}

/// Header information from the `<header>` element.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// Declared schema version.
    pub version: SchemaVersion,
    /// Dataset name.
    pub name: String,
    /// Free-form version string of the dataset itself.
    pub data_version: String,
    /// Creation date string.
    pub date: String,
    /// Inertial extent: maximum y.
    pub north: Option<f64>,
    /// Inertial extent: minimum y.
    pub south: Option<f64>,
    /// Inertial extent: maximum x.
    pub east: Option<f64>,
    /// Inertial extent: minimum x.
    pub west: Option<f64>,
    /// Vendor name.
    pub vendor: String,
    /// Geographic reference, if declared.
    pub geo_reference: Option<GeoReference>,
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self { major: 1, minor: 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display_and_order() {
        assert_eq!(SchemaVersion::new(1, 6).to_string(), "1.6");
        assert!(SchemaVersion::new(1, 4) < SchemaVersion::new(1, 6));
        assert!(SchemaVersion::new(1, 7) < SchemaVersion::new(2, 0));
    }
}
