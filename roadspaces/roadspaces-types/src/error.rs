//! Error types for the road-space model.

use thiserror::Error;

/// Errors raised by model construction and lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoadspacesError {
    /// A lookup referenced an id that is not in the model.
    #[error("unresolved reference to {kind} '{id}'")]
    UnresolvedReference {
        /// What kind of element was referenced.
        kind: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// Two elements carry the same id.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId {
        /// What kind of element collided.
        kind: &'static str,
        /// The colliding id.
        id: String,
    },

    /// An index is outside the model.
    #[error("lane section index {index} out of bounds for roadspace '{roadspace}'")]
    SectionOutOfBounds {
        /// The roadspace id.
        roadspace: String,
        /// The offending index.
        index: usize,
    },
}

impl RoadspacesError {
    /// Create an unresolved reference error.
    #[must_use]
    pub fn unresolved(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            id: id.into(),
        }
    }

    /// Create a duplicate id error.
    #[must_use]
    pub fn duplicate(kind: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }
}
