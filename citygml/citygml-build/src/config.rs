//! Configuration of the CityGML build.

use geom_types::{DiscretizationParams, Vector3};

/// Parameters of the feature build.
#[derive(Debug, Clone, PartialEq)]
pub struct CityGmlConfig {
    /// EPSG code stamped onto the city model.
    pub crs_epsg: Option<u32>,
    /// Translation applied to every output coordinate.
    pub offset: Vector3<f64>,
    /// Discretisation parameters for geometry conversion.
    pub discretization: DiscretizationParams,
    /// Flatten nested attribute groups into dotted keys.
    pub flatten_generic_attribute_sets: bool,
    /// Mint random UUIDs for geometry identifiers.
    pub generate_random_geometry_ids: bool,
    /// Emit markings as auxiliary traffic areas and merge linked roads, for
    /// older consumers.
    pub mapping_backwards_compatibility: bool,
}

impl Default for CityGmlConfig {
    fn default() -> Self {
        Self {
            crs_epsg: None,
            offset: Vector3::zeros(),
            discretization: DiscretizationParams::default(),
            flatten_generic_attribute_sets: false,
            generate_random_geometry_ids: false,
            mapping_backwards_compatibility: false,
        }
    }
}
