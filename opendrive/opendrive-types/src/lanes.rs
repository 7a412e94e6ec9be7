//! Lane sections, lanes, and road marks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::road::Poly3Entry;

/// Sentinel lane-link value written by some exporters for "no link".
///
/// A junction lane link carrying this value is unrecoverable and treated as
/// a fatal defect.
pub const LANE_LINK_SENTINEL: i32 = i32::MIN;

/// Lane type union across the supported schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LaneType {
    /// Normal drivable lane.
    #[default]
    Driving,
    /// Hard stop / emergency lane.
    Stop,
    /// Soft shoulder.
    Shoulder,
    /// Bicycle lane.
    Biking,
    /// Pedestrian sidewalk.
    Sidewalk,
    /// Border strip.
    Border,
    /// Restricted lane.
    Restricted,
    /// Parking lane.
    Parking,
    /// Bidirectional lane.
    Bidirectional,
    /// Median strip.
    Median,
    /// Vendor-specific.
    Special1,
    /// Vendor-specific.
    Special2,
    /// Vendor-specific.
    Special3,
    /// Road-works lane.
    RoadWorks,
    /// Tram lane.
    Tram,
    /// Rail lane.
    Rail,
    /// Junction entry lane.
    Entry,
    /// Junction exit lane.
    Exit,
    /// Off-ramp.
    OffRamp,
    /// On-ramp.
    OnRamp,
    /// No declared use.
    None,
}

impl LaneType {
    /// Parse from the schema attribute value; unknown values map to `None`.
    #[must_use]
    pub fn from_str(value: &str) -> Self {
        match value {
            "driving" => Self::Driving,
            "stop" => Self::Stop,
            "shoulder" => Self::Shoulder,
            "biking" => Self::Biking,
            "sidewalk" | "walking" => Self::Sidewalk,
            "border" => Self::Border,
            "restricted" => Self::Restricted,
            "parking" => Self::Parking,
            "bidirectional" => Self::Bidirectional,
            "median" => Self::Median,
            "special1" => Self::Special1,
            "special2" => Self::Special2,
            "special3" => Self::Special3,
            "roadWorks" => Self::RoadWorks,
            "tram" => Self::Tram,
            "rail" => Self::Rail,
            "entry" => Self::Entry,
            "exit" => Self::Exit,
            "offRamp" => Self::OffRamp,
            "onRamp" => Self::OnRamp,
            _ => Self::None,
        }
    }

    /// Whether vehicles drive on this lane type.
    #[must_use]
    pub fn is_drivable(&self) -> bool {
        matches!(
            self,
            Self::Driving
                | Self::Bidirectional
                | Self::Entry
                | Self::Exit
                | Self::OffRamp
                | Self::OnRamp
                | Self::Stop
        )
    }
}

/// Road-mark line pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoadMarkKind {
    /// No marking.
    #[default]
    None,
    /// Continuous line.
    Solid,
    /// Dashed line.
    Broken,
    /// Double continuous line.
    SolidSolid,
    /// Continuous next to dashed.
    SolidBroken,
    /// Dashed next to continuous.
    BrokenSolid,
    /// Double dashed line.
    BrokenBroken,
    /// Botts' dots.
    BottsDots,
    /// Grass edge.
    Grass,
    /// Raised curb.
    Curb,
    /// Edge line.
    Edge,
}

impl RoadMarkKind {
    /// Parse from the schema attribute value; unknown values map to `None`.
    #[must_use]
    pub fn from_str(value: &str) -> Self {
        match value {
            "solid" => Self::Solid,
            "broken" => Self::Broken,
            "solid solid" => Self::SolidSolid,
            "solid broken" => Self::SolidBroken,
            "broken solid" => Self::BrokenSolid,
            "broken broken" => Self::BrokenBroken,
            "botts dots" => Self::BottsDots,
            "grass" => Self::Grass,
            "curb" => Self::Curb,
            "edge" => Self::Edge,
            _ => Self::None,
        }
    }
}

/// Road-mark colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoadMarkColor {
    /// Standard white.
    #[default]
    White,
    /// Yellow.
    Yellow,
    /// Red.
    Red,
    /// Blue.
    Blue,
    /// Green.
    Green,
}

impl RoadMarkColor {
    /// Parse from the schema attribute value; unknown values map to `White`.
    #[must_use]
    pub fn from_str(value: &str) -> Self {
        match value {
            "yellow" => Self::Yellow,
            "red" => Self::Red,
            "blue" => Self::Blue,
            "green" => Self::Green,
            _ => Self::White,
        }
    }
}

/// A road marking on a lane boundary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadMark {
    /// Offset from the lane-section start.
    pub s_offset: f64,
    /// Line pattern.
    pub kind: RoadMarkKind,
    /// Colour.
    pub color: RoadMarkColor,
    /// Marking width, when declared.
    pub width: Option<f64>,
}

/// Lane surface material.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneMaterial {
    /// Surface code.
    pub surface: String,
    /// Friction coefficient.
    pub friction: Option<f64>,
    /// Surface roughness.
    pub roughness: Option<f64>,
}

/// Inner/outer height offsets of a lane relative to the road surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneHeightEntry {
    /// Offset from the lane-section start.
    pub s_offset: f64,
    /// Height at the inner boundary.
    pub inner: f64,
    /// Height at the outer boundary.
    pub outer: f64,
}

/// Link of a lane to lanes in the neighbouring sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneLink {
    /// Lane id in the predecessor section.
    pub predecessor: Option<i32>,
    /// Lane id in the successor section.
    pub successor: Option<i32>,
}

/// A left or right lane of a lane section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lane {
    /// Signed lane id: positive left of the reference line, negative right.
    pub id: i32,
    /// Lane type.
    pub kind: LaneType,
    /// Whether the lane keeps the level of the reference line.
    pub level: bool,
    /// Width records, cubic in `s - s_offset`.
    pub widths: Vec<Poly3Entry>,
    /// Height records.
    pub heights: Vec<LaneHeightEntry>,
    /// Road marks on the outer boundary.
    pub road_marks: Vec<RoadMark>,
    /// Surface material.
    pub material: Option<LaneMaterial>,
    /// Speed limit in m/s.
    pub speed: Option<f64>,
    /// Neighbour-section links.
    pub link: LaneLink,
}

/// The centre lane of a lane section (id 0, no width).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CenterLane {
    /// Road marks along the reference line.
    pub road_marks: Vec<RoadMark>,
}

/// A lane section: fixed lane topology over a contiguous `s` range.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneSection {
    /// Section start along the reference line.
    pub s: f64,
    /// Left lanes ordered by ascending id (1, 2, ...).
    pub left: Vec<Lane>,
    /// Centre lane.
    pub center: CenterLane,
    /// Right lanes ordered by descending id (-1, -2, ...).
    pub right: Vec<Lane>,
}

impl LaneSection {
    /// Total number of left and right lanes.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Iterate over left and right lanes.
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.left.iter().chain(self.right.iter())
    }
}

/// Lane offset records and lane sections of a road.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lanes {
    /// Lateral offset of the lane reference from the road reference line.
    pub lane_offset: Vec<Poly3Entry>,
    /// Lane sections in ascending `s` order.
    pub sections: Vec<LaneSection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_type_parsing() {
        assert_eq!(LaneType::from_str("driving"), LaneType::Driving);
        assert_eq!(LaneType::from_str("offRamp"), LaneType::OffRamp);
        assert_eq!(LaneType::from_str("hovercraft"), LaneType::None);
    }

    #[test]
    fn test_drivable_classification() {
        assert!(LaneType::Driving.is_drivable());
        assert!(LaneType::OnRamp.is_drivable());
        assert!(!LaneType::Sidewalk.is_drivable());
        assert!(!LaneType::Median.is_drivable());
    }

    #[test]
    fn test_road_mark_parsing() {
        assert_eq!(RoadMarkKind::from_str("solid"), RoadMarkKind::Solid);
        assert_eq!(
            RoadMarkKind::from_str("broken solid"),
            RoadMarkKind::BrokenSolid
        );
        assert_eq!(RoadMarkKind::from_str("chevrons"), RoadMarkKind::None);
        assert_eq!(RoadMarkColor::from_str("yellow"), RoadMarkColor::Yellow);
        assert_eq!(RoadMarkColor::from_str(""), RoadMarkColor::White);
    }

    #[test]
    fn test_section_lane_count() {
        let lane = Lane {
            id: 1,
            kind: LaneType::Driving,
            level: false,
            widths: Vec::new(),
            heights: Vec::new(),
            road_marks: Vec::new(),
            material: None,
            speed: None,
            link: LaneLink::default(),
        };
        let section = LaneSection {
            s: 0.0,
            left: vec![lane.clone()],
            center: CenterLane::default(),
            right: vec![Lane { id: -1, ..lane.clone() }, Lane { id: -2, ..lane }],
        };
        assert_eq!(section.lane_count(), 3);
        assert_eq!(section.lanes().count(), 3);
    }
}
