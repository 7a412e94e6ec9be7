//! Road objects and signals.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Object type union across the supported schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectType {
    /// No declared type.
    #[default]
    None,
    /// Obstacle of unspecified nature.
    Obstacle,
    /// Guard rail, wall, or similar barrier.
    Barrier,
    /// Building.
    Building,
    /// Parking space.
    ParkingSpace,
    /// Patch on the road surface.
    Patch,
    /// Pole.
    Pole,
    /// Street lamp.
    StreetLamp,
    /// Traffic island.
    TrafficIsland,
    /// Tree.
    Tree,
    /// Other vegetation.
    Vegetation,
    /// Signal device carried as an object.
    Signal,
    /// Crosswalk.
    Crosswalk,
    /// Gantry spanning the road.
    Gantry,
    /// Road surface marking carried as an object.
    RoadMark,
}

impl ObjectType {
    /// Parse from the schema attribute value; unknown values map to `None`.
    #[must_use]
    pub fn from_str(value: &str) -> Self {
        match value {
            "obstacle" => Self::Obstacle,
            "barrier" | "railing" => Self::Barrier,
            "building" => Self::Building,
            "parkingSpace" => Self::ParkingSpace,
            "patch" => Self::Patch,
            "pole" => Self::Pole,
            "streetLamp" => Self::StreetLamp,
            "trafficIsland" => Self::TrafficIsland,
            "tree" => Self::Tree,
            "vegetation" => Self::Vegetation,
            "signal" => Self::Signal,
            "crosswalk" => Self::Crosswalk,
            "gantry" => Self::Gantry,
            "roadMark" => Self::RoadMark,
            _ => Self::None,
        }
    }
}

/// Orientation of an object relative to the road direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Valid in the direction of increasing `s`.
    Plus,
    /// Valid against the direction of increasing `s`.
    Minus,
    /// Valid in both directions.
    #[default]
    None,
}

impl Orientation {
    /// Parse from the schema attribute value.
    #[must_use]
    pub fn from_str(value: &str) -> Self {
        match value {
            "+" => Self::Plus,
            "-" => Self::Minus,
            _ => Self::None,
        }
    }
}

/// Repetition record of an object along the road.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectRepeat {
    /// Length of the repeated stretch along `s`.
    pub length: f64,
    /// Distance between instances; `0` means continuous.
    pub distance: f64,
}

/// A corner of an object outline, local to the object.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutlineCorner {
    /// Local u coordinate.
    pub u: f64,
    /// Local v coordinate.
    pub v: f64,
    /// Local height of the corner.
    pub height: f64,
}

/// A road-side or on-road object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadObject {
    /// Object identifier.
    pub id: String,
    /// Object name (drives the target-feature mapping, may be empty).
    pub name: String,
    /// Declared type.
    pub kind: ObjectType,
    /// Position along the reference line.
    pub s: f64,
    /// Lateral position, positive left.
    pub t: f64,
    /// Height offset above the road surface.
    pub z_offset: f64,
    /// Validity orientation.
    pub orientation: Orientation,
    /// Local yaw.
    pub hdg: f64,
    /// Local pitch.
    pub pitch: f64,
    /// Local roll.
    pub roll: f64,
    /// Bounding length, when declared.
    pub length: Option<f64>,
    /// Bounding width, when declared.
    pub width: Option<f64>,
    /// Bounding height, when declared.
    pub height: Option<f64>,
    /// Radius for rotationally symmetric objects.
    pub radius: Option<f64>,
    /// Repetition along the road.
    pub repeat: Option<ObjectRepeat>,
    /// Polygonal outline, local to the object.
    pub outline: Vec<OutlineCorner>,
}

/// A traffic signal along the road.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadSignal {
    /// Signal identifier.
    pub id: String,
    /// Signal name (may be empty).
    pub name: String,
    /// Position along the reference line.
    pub s: f64,
    /// Lateral position, positive left.
    pub t: f64,
    /// Height offset above the road surface.
    pub z_offset: f64,
    /// Country-specific type code.
    pub type_code: String,
    /// Country-specific subtype code.
    pub subtype: String,
    /// Whether the signal state can change.
    pub dynamic: bool,
    /// Validity orientation.
    pub orientation: Orientation,
}
