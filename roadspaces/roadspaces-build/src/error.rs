//! Error types for the road-space build.

use thiserror::Error;

/// Errors that abort the build of a road network.
///
/// Everything recoverable is reported through the message list instead.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A road or junction link references an id that does not exist.
    #[error("unresolved reference from {source_element} to {kind} '{id}'")]
    UnresolvedReference {
        /// The element holding the dangling reference.
        source_element: String,
        /// The kind of the referenced element.
        kind: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// A road has nothing to build geometry from.
    #[error("road '{id}' has no buildable geometry: {reason}")]
    MissingGeometry {
        /// The road id.
        id: String,
        /// What is missing.
        reason: String,
    },

    /// Numerical failure in the geometry kernel.
    #[error("geometry construction failed for road '{id}': {source}")]
    Numerical {
        /// The road id.
        id: String,
        /// The underlying kernel error.
        #[source]
        source: geom_types::GeomError,
    },

    /// Model assembly failed.
    #[error(transparent)]
    Model(#[from] roadspaces_types::RoadspacesError),

    /// The host requested cancellation between roads.
    #[error("build cancelled")]
    Cancelled,
}

impl BuildError {
    /// Create an unresolved reference error.
    #[must_use]
    pub fn unresolved(
        source_element: impl Into<String>,
        kind: &'static str,
        id: impl Into<String>,
    ) -> Self {
        Self::UnresolvedReference {
            source_element: source_element.into(),
            kind,
            id: id.into(),
        }
    }

    /// Create a missing geometry error.
    #[must_use]
    pub fn missing_geometry(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingGeometry {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a kernel error with the road it occurred on.
    #[must_use]
    pub fn numerical(id: impl Into<String>, source: geom_types::GeomError) -> Self {
        Self::Numerical {
            id: id.into(),
            source,
        }
    }
}

/// Result type for the build.
pub type Result<T> = std::result::Result<T, BuildError>;
