//! Schema-version detection and the reader registry.
//!
//! Each supported version gets a [`VersionAdapter`] carrying the quirks the
//! shared event reader needs to interpret that revision. Unknown versions
//! fail with a typed error; there is no runtime reflection.

use quick_xml::events::Event;
use quick_xml::Reader;

use opendrive_types::SchemaVersion;

use crate::error::{OdrXmlError, Result};
use crate::parser::attribute;

/// Versions a reader adapter exists for.
pub const SUPPORTED_VERSIONS: [SchemaVersion; 7] = [
    SchemaVersion { major: 1, minor: 1 },
    SchemaVersion { major: 1, minor: 2 },
    SchemaVersion { major: 1, minor: 3 },
    SchemaVersion { major: 1, minor: 4 },
    SchemaVersion { major: 1, minor: 5 },
    SchemaVersion { major: 1, minor: 6 },
    SchemaVersion { major: 1, minor: 7 },
];

/// Per-version interpretation quirks for the shared event reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionAdapter {
    /// The version this adapter reads.
    pub version: SchemaVersion,
    /// Whether an absent `pRange` on `<paramPoly3>` means normalized
    /// (1.5 onwards) rather than arc length.
    pub param_poly_default_normalized: bool,
    /// Whether the `rule` attribute exists on `<road>` (1.4 onwards).
    pub road_rule_attribute: bool,
}

/// Select the adapter for a declared version.
///
/// # Errors
///
/// - [`OdrXmlError::NoDedicatedSchemaAvailable`] for revisions before 1.1
/// - [`OdrXmlError::NoDedicatedReaderAvailable`] for any other unsupported
///   revision
pub fn adapter_for(version: SchemaVersion) -> Result<VersionAdapter> {
    if version.major == 1 && version.minor < 1 {
        return Err(OdrXmlError::NoDedicatedSchemaAvailable(version));
    }
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(OdrXmlError::NoDedicatedReaderAvailable(version));
    }
    Ok(VersionAdapter {
        version,
        param_poly_default_normalized: version >= SchemaVersion::new(1, 5),
        road_rule_attribute: version >= SchemaVersion::new(1, 4),
    })
}

/// Scan the document prologue for the declared schema version.
///
/// Only reads up to the `<header>` element; the full document is not
/// traversed.
///
/// # Errors
///
/// Returns [`OdrXmlError::XmlParse`] for malformed XML and
/// [`OdrXmlError::MissingElement`] when no header is present.
pub fn detect_version(xml: &str) -> Result<SchemaVersion> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"header" {
                    let major = attribute(e, "revMajor")
                        .and_then(|v| v.parse::<u16>().ok())
                        .unwrap_or(1);
                    let minor = attribute(e, "revMinor")
                        .and_then(|v| v.parse::<u16>().ok())
                        .unwrap_or(0);
                    return Ok(SchemaVersion::new(major, minor));
                }
            }
            Ok(Event::Eof) => {
                return Err(OdrXmlError::missing_element("header", "OpenDRIVE document"))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_selection() {
        assert!(adapter_for(SchemaVersion::new(1, 4)).is_ok());
        assert!(adapter_for(SchemaVersion::new(1, 7)).is_ok());

        let err = adapter_for(SchemaVersion::new(1, 0)).unwrap_err();
        assert!(matches!(err, OdrXmlError::NoDedicatedSchemaAvailable(_)));

        let err = adapter_for(SchemaVersion::new(2, 0)).unwrap_err();
        assert!(matches!(err, OdrXmlError::NoDedicatedReaderAvailable(_)));
    }

    #[test]
    fn test_adapter_quirks() {
        let old = adapter_for(SchemaVersion::new(1, 4)).unwrap();
        assert!(!old.param_poly_default_normalized);
        assert!(old.road_rule_attribute);

        let older = adapter_for(SchemaVersion::new(1, 3)).unwrap();
        assert!(!older.road_rule_attribute);

        let new = adapter_for(SchemaVersion::new(1, 6)).unwrap();
        assert!(new.param_poly_default_normalized);
    }

    #[test]
    fn test_detect_version() {
        let xml = r#"<?xml version="1.0"?>
            <OpenDRIVE>
                <header revMajor="1" revMinor="6" name="test"/>
            </OpenDRIVE>"#;
        assert_eq!(detect_version(xml).unwrap(), SchemaVersion::new(1, 6));
    }

    #[test]
    fn test_detect_version_missing_header() {
        let err = detect_version("<OpenDRIVE></OpenDRIVE>").unwrap_err();
        assert!(matches!(err, OdrXmlError::MissingElement { .. }));
    }
}
