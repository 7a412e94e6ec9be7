//! The writer interface for serialising city models.
//!
//! Serialisation itself is external; the pipeline consumes any
//! [`CityGmlWriter`] implementation. A no-op writer is provided for tests.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::CityModel;

/// Errors a writer can raise.
#[derive(Debug, Error)]
pub enum WriteError {
    /// I/O failure.
    #[error("I/O error writing city model: {0}")]
    Io(#[from] std::io::Error),

    /// The model cannot be represented by the target format version.
    #[error("unsupported content for target format: {0}")]
    Unsupported(String),
}

/// Serialises a [`CityModel`] to a target path.
pub trait CityGmlWriter {
    /// Write the model and return the path actually written.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or unrepresentable content.
    fn write(&self, model: &CityModel, target: &Path) -> Result<PathBuf, WriteError>;
}

/// A writer that records nothing; used by tests and dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl CityGmlWriter for NullWriter {
    fn write(&self, _model: &CityModel, target: &Path) -> Result<PathBuf, WriteError> {
        Ok(target.to_path_buf())
    }
}
