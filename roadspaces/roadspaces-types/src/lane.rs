//! Built lanes, markings, and filler surfaces.

use geom_types::{Interval, LineString3d, Polygon3d};
use opendrive_types::{LaneMaterial, LaneType, RoadMarkColor, RoadMarkKind};

use crate::identifier::LaneId;

/// A built road marking.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkingSpace {
    /// Line pattern of the source road mark.
    pub kind: RoadMarkKind,
    /// Colour of the source road mark.
    pub color: RoadMarkColor,
    /// Marking geometry along the lane boundary.
    pub surface: Vec<Polygon3d>,
    /// Marking centre line.
    pub center_line: LineString3d,
}

/// A built lane with its surfaces and boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSpace {
    /// Lane identifier.
    pub id: LaneId,
    /// Lane type from the source model.
    pub kind: LaneType,
    /// Lane surface polygons between the boundaries.
    pub surface: Vec<Polygon3d>,
    /// Centre line at half width.
    pub center_line: LineString3d,
    /// Boundary nearer the reference line.
    pub inner_boundary: LineString3d,
    /// Boundary farther from the reference line.
    pub outer_boundary: LineString3d,
    /// Built markings on the outer boundary.
    pub markings: Vec<MarkingSpace>,
    /// Surface material, when declared.
    pub material: Option<LaneMaterial>,
    /// Speed limit in m/s, when declared.
    pub speed: Option<f64>,
    /// Lane id linked in the predecessor section.
    pub predecessor: Option<i32>,
    /// Lane id linked in the successor section.
    pub successor: Option<i32>,
}

/// A built lane section over a contiguous `s` range.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSectionSpace {
    /// Range of `s` the section covers.
    pub s_range: Interval,
    /// Lanes of the section (left and right; the centre lane has no width).
    pub lanes: Vec<LaneSpace>,
    /// Markings along the reference line (centre lane).
    pub center_markings: Vec<MarkingSpace>,
}

impl LaneSectionSpace {
    /// Find a lane by signed id.
    #[must_use]
    pub fn lane(&self, id: i32) -> Option<&LaneSpace> {
        self.lanes.iter().find(|lane| lane.id.lane == id)
    }
}

/// The position of a filler surface relative to the lanes it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillerKind {
    /// Between two adjacent lanes of one section.
    Lateral,
    /// Between successive lane sections of one road.
    LongitudinalWithinRoad,
    /// Between the lanes of two linked roads.
    LongitudinalBetweenRoads,
}

/// A polygon closing a gap between lane surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct FillerSurface {
    /// Where the filler sits.
    pub kind: FillerKind,
    /// The closing polygon.
    pub polygon: Polygon3d,
    /// The lanes the filler closes between.
    pub between: (LaneId, LaneId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::RoadspaceId;
    use geom_types::Point3;

    fn line(points: &[[f64; 3]]) -> LineString3d {
        LineString3d::new(points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect()).unwrap()
    }

    #[test]
    fn test_section_lane_lookup() {
        let lane = LaneSpace {
            id: LaneId::new(RoadspaceId::new("1"), 0, -1),
            kind: LaneType::Driving,
            surface: Vec::new(),
            center_line: line(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
            inner_boundary: line(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
            outer_boundary: line(&[[0.0, -3.5, 0.0], [1.0, -3.5, 0.0]]),
            markings: Vec::new(),
            material: None,
            speed: None,
            predecessor: None,
            successor: None,
        };
        let section = LaneSectionSpace {
            s_range: Interval::new(0.0, 1.0),
            lanes: vec![lane],
            center_markings: Vec::new(),
        };
        assert!(section.lane(-1).is_some());
        assert!(section.lane(1).is_none());
    }
}
