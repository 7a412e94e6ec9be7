//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use citygml_build::CityGmlConfig;
use geom_types::{DiscretizationParams, Vector3};
use opendrive_eval::EvalConfig;
use roadspaces_build::BuildConfig;

/// Hard floor for every tolerance, regardless of configuration.
pub const TOLERANCE_FLOOR: f64 = 1e-9;

/// All recognised pipeline options.
///
/// # Example
///
/// ```
/// use rf_pipeline::PipelineConfig;
///
/// let config: PipelineConfig = serde_json::from_str(
///     r#"{ "crs_epsg": 25832, "step_size": 0.5 }"#,
/// ).unwrap();
/// assert_eq!(config.crs_epsg, Some(25832));
/// assert_eq!(config.circle_slices, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// EPSG code of the map CRS.
    pub crs_epsg: Option<u32>,
    /// Translation applied to every point after build.
    pub offset_x: f64,
    /// Translation applied to every point after build.
    pub offset_y: f64,
    /// Translation applied to every point after build.
    pub offset_z: f64,
    /// Default curve discretisation step.
    pub step_size: f64,
    /// Step along parametric sweeps.
    pub sweep_step_size: f64,
    /// Circle and cylinder tessellation count.
    pub circle_slices: usize,
    /// Fuzzy endpoint matching distance.
    pub distance_tolerance: f64,
    /// Parameter tolerance; floored at [`TOLERANCE_FLOOR`].
    pub tolerance: f64,
    /// Flatten nested attribute groups to dotted keys.
    pub flatten_generic_attribute_sets: bool,
    /// Random UUIDs on every geometry.
    pub generate_random_geometry_ids: bool,
    /// Emit markings as auxiliary traffic areas for older consumers.
    pub mapping_backwards_compatibility: bool,
    /// Suppress the lateral-profile-shape repair.
    pub skip_road_shape_removal: bool,
    /// Non-zero exit on fatal findings.
    pub strict: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            crs_epsg: None,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_z: 0.0,
            step_size: 0.7,
            sweep_step_size: 0.3,
            circle_slices: 12,
            distance_tolerance: 1e-3,
            tolerance: 1e-9,
            flatten_generic_attribute_sets: false,
            generate_random_geometry_ids: false,
            mapping_backwards_compatibility: false,
            skip_road_shape_removal: false,
            strict: false,
        }
    }
}

impl PipelineConfig {
    /// The effective parameter tolerance, never below the floor.
    #[must_use]
    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.max(TOLERANCE_FLOOR)
    }

    /// Evaluator configuration.
    #[must_use]
    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            skip_road_shape_removal: self.skip_road_shape_removal,
            tolerance: self.effective_tolerance(),
        }
    }

    /// Road-space builder configuration.
    #[must_use]
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            step_size: self.step_size,
            distance_tolerance: self.distance_tolerance.max(0.0),
            tolerance: self.effective_tolerance(),
            ..BuildConfig::default()
        }
    }

    /// CityGML builder configuration.
    #[must_use]
    pub fn citygml_config(&self) -> CityGmlConfig {
        CityGmlConfig {
            crs_epsg: self.crs_epsg,
            offset: Vector3::new(self.offset_x, self.offset_y, self.offset_z),
            discretization: DiscretizationParams {
                step_size: self.step_size,
                sweep_step_size: self.sweep_step_size,
                circle_slices: self.circle_slices,
            },
            flatten_generic_attribute_sets: self.flatten_generic_attribute_sets,
            generate_random_geometry_ids: self.generate_random_geometry_ids,
            mapping_backwards_compatibility: self.mapping_backwards_compatibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_floor() {
        let config = PipelineConfig {
            tolerance: 0.0,
            ..PipelineConfig::default()
        };
        assert_eq!(config.effective_tolerance(), TOLERANCE_FLOOR);

        let config = PipelineConfig {
            tolerance: 1e-6,
            ..PipelineConfig::default()
        };
        assert_eq!(config.effective_tolerance(), 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_sub_configs_inherit() {
        let config = PipelineConfig {
            step_size: 0.25,
            skip_road_shape_removal: true,
            crs_epsg: Some(32632),
            ..PipelineConfig::default()
        };
        assert_eq!(config.build_config().step_size, 0.25);
        assert!(config.eval_config().skip_road_shape_removal);
        assert_eq!(config.citygml_config().crs_epsg, Some(32632));
        assert_eq!(config.citygml_config().discretization.step_size, 0.25);
    }
}
