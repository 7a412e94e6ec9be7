//! Error types for the CityGML build.

use thiserror::Error;

/// Errors that abort the feature build.
#[derive(Debug, Error)]
pub enum CityGmlBuildError {
    /// Discretisation parameters are unusable.
    #[error("invalid discretisation configuration: {0}")]
    InvalidConfiguration(#[from] geom_types::GeomError),
}

/// Result type for the feature build.
pub type Result<T> = std::result::Result<T, CityGmlBuildError>;
