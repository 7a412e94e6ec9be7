//! The city model and its member features.

use crate::attributes::AttributeSet;
use crate::geometry::GeometryProperty;
use crate::transportation::RoadFeature;

/// A feature that is not transportation-specific.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFeature {
    /// Stable identifier.
    pub id: String,
    /// Feature name.
    pub name: String,
    /// Geometry.
    pub geometry: GeometryProperty,
    /// Generic attributes.
    pub attributes: AttributeSet,
}

/// The member union of a [`CityModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum CityObject {
    /// A transportation road with traffic spaces.
    Road(RoadFeature),
    /// A transportation complex without lane semantics (crosswalks, bus
    /// stops).
    TransportationComplex(SimpleFeature),
    /// Street furniture.
    CityFurniture(SimpleFeature),
    /// A building.
    Building(SimpleFeature),
    /// A single vegetation object (tree).
    SolitaryVegetationObject(SimpleFeature),
    /// An areal vegetation cover.
    PlantCover(SimpleFeature),
    /// Anything else.
    GenericCityObject(SimpleFeature),
}

impl CityObject {
    /// The feature identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Road(road) => &road.id,
            Self::TransportationComplex(f)
            | Self::CityFurniture(f)
            | Self::Building(f)
            | Self::SolitaryVegetationObject(f)
            | Self::PlantCover(f)
            | Self::GenericCityObject(f) => &f.id,
        }
    }
}

/// A complete city model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CityModel {
    /// EPSG code of the model CRS, when configured.
    pub crs_epsg: Option<u32>,
    /// Model name.
    pub name: String,
    /// The member features.
    pub members: Vec<CityObject>,
}

impl CityModel {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the model has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All road features.
    pub fn roads(&self) -> impl Iterator<Item = &RoadFeature> {
        self.members.iter().filter_map(|member| match member {
            CityObject::Road(road) => Some(road),
            _ => None,
        })
    }
}
