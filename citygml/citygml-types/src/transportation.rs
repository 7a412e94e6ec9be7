//! Transportation features: roads, traffic spaces, thematic surfaces.

use geom_types::LineString3d;

use crate::attributes::AttributeSet;
use crate::geometry::GeometryProperty;

/// Driving direction of a traffic space relative to its centre line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficDirection {
    /// Along the centre line.
    Forwards,
    /// Against the centre line.
    Backwards,
}

/// The thematic role of a boundary surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// A drivable area.
    TrafficArea,
    /// A non-drivable companion area (sidewalk, shoulder, ...).
    AuxiliaryTrafficArea,
    /// A road marking.
    Marking,
}

/// A thematic boundary surface of a traffic space.
#[derive(Debug, Clone, PartialEq)]
pub struct ThematicSurface {
    /// Stable identifier.
    pub id: String,
    /// Thematic role.
    pub kind: SurfaceKind,
    /// Usage code from the lane-type table.
    pub usage: Option<String>,
    /// Function code from the lane-type table.
    pub function: Option<String>,
    /// LoD2 geometry.
    pub geometry: GeometryProperty,
    /// Generic attributes.
    pub attributes: AttributeSet,
}

/// A traffic or auxiliary-traffic space of one lane.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSpaceFeature {
    /// Stable identifier.
    pub id: String,
    /// Whether the space is drivable.
    pub is_auxiliary: bool,
    /// Driving direction (right-hand traffic convention).
    pub direction: TrafficDirection,
    /// LoD0 centre line.
    pub lod0_line: Option<LineString3d>,
    /// Boundary surfaces.
    pub boundaries: Vec<ThematicSurface>,
    /// Generic attributes.
    pub attributes: AttributeSet,
}

/// A CityGML road feature covering one roadspace.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadFeature {
    /// Stable identifier.
    pub id: String,
    /// Feature name.
    pub name: String,
    /// Traffic spaces of the road's lanes.
    pub traffic_spaces: Vec<TrafficSpaceFeature>,
    /// Generic attributes.
    pub attributes: AttributeSet,
}

impl RoadFeature {
    /// Traffic spaces that are drivable.
    pub fn drivable_spaces(&self) -> impl Iterator<Item = &TrafficSpaceFeature> {
        self.traffic_spaces.iter().filter(|t| !t.is_auxiliary)
    }

    /// Traffic spaces that are auxiliary.
    pub fn auxiliary_spaces(&self) -> impl Iterator<Item = &TrafficSpaceFeature> {
        self.traffic_spaces.iter().filter(|t| t.is_auxiliary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_filters() {
        let space = |aux: bool| TrafficSpaceFeature {
            id: String::new(),
            is_auxiliary: aux,
            direction: TrafficDirection::Forwards,
            lod0_line: None,
            boundaries: Vec::new(),
            attributes: AttributeSet::new(),
        };
        let road = RoadFeature {
            id: "r".into(),
            name: String::new(),
            traffic_spaces: vec![space(false), space(true), space(false)],
            attributes: AttributeSet::new(),
        };
        assert_eq!(road.drivable_spaces().count(), 2);
        assert_eq!(road.auxiliary_spaces().count(), 1);
    }
}
