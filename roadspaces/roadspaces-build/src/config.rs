//! Build configuration.

/// Parameters of the road-space build.
///
/// # Example
///
/// ```
/// use roadspaces_build::BuildConfig;
///
/// let config = BuildConfig {
///     step_size: 0.5,
///     ..BuildConfig::default()
/// };
/// assert!(config.step_size < BuildConfig::default().step_size);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Arc-length step for boundary and surface sampling.
    pub step_size: f64,
    /// Distance below which endpoints are considered coincident.
    pub distance_tolerance: f64,
    /// Parameter tolerance for fuzzy domain checks.
    pub tolerance: f64,
    /// Width of markings without a declared width.
    pub default_marking_width: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            step_size: 0.7,
            distance_tolerance: 1e-3,
            tolerance: 1e-9,
            default_marking_width: 0.12,
        }
    }
}
