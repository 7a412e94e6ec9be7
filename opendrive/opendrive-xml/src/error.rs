//! Error types for OpenDRIVE reading.

use opendrive_types::SchemaVersion;
use thiserror::Error;

/// Errors that can occur while detecting the schema version or reading the
/// document.
#[derive(Debug, Error)]
pub enum OdrXmlError {
    /// XML is malformed or truncated.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The document declares a version no reader adapter exists for.
    #[error("no dedicated reader available for OpenDRIVE {0}")]
    NoDedicatedReaderAvailable(SchemaVersion),

    /// The document declares a version no schema is bundled for.
    #[error("no dedicated schema available for OpenDRIVE {0}")]
    NoDedicatedSchemaAvailable(SchemaVersion),

    /// A required element is missing.
    #[error("missing required element: {element} in {context}")]
    MissingElement {
        /// The missing element name.
        element: &'static str,
        /// Where the element was expected.
        context: String,
    },

    /// The root element is not `<OpenDRIVE>`.
    #[error("not an OpenDRIVE document: root element is <{0}>")]
    WrongRootElement(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OdrXmlError {
    /// Create a missing element error.
    pub fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element,
            context: context.into(),
        }
    }

    /// Whether this error is a version-support failure.
    #[must_use]
    pub fn is_unsupported_version(&self) -> bool {
        matches!(
            self,
            Self::NoDedicatedReaderAvailable(_) | Self::NoDedicatedSchemaAvailable(_)
        )
    }
}

/// Result type for OpenDRIVE reading.
pub type Result<T> = std::result::Result<T, OdrXmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OdrXmlError::NoDedicatedSchemaAvailable(SchemaVersion::new(1, 0));
        assert!(err.to_string().contains("1.0"));
        assert!(err.is_unsupported_version());

        let err = OdrXmlError::missing_element("planView", "road '12'");
        assert!(err.to_string().contains("planView"));
        assert!(!err.is_unsupported_version());
    }
}
