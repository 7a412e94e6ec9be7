//! Mapping tables: lane types to area codes, roadside objects to target
//! features.

use opendrive_types::{LaneType, ObjectType};

/// Usage/function codes of a traffic or auxiliary area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaCodes {
    /// Usage code.
    pub usage: &'static str,
    /// Function code.
    pub function: &'static str,
}

/// Fixed lane-type table for boundary surface codes.
#[must_use]
pub fn area_codes(lane_type: LaneType) -> AreaCodes {
    match lane_type {
        LaneType::Driving
        | LaneType::Entry
        | LaneType::Exit
        | LaneType::OffRamp
        | LaneType::OnRamp
        | LaneType::Bidirectional => AreaCodes {
            usage: "driving",
            function: "road",
        },
        LaneType::Stop => AreaCodes {
            usage: "driving",
            function: "emergencyLane",
        },
        LaneType::Shoulder | LaneType::Border => AreaCodes {
            usage: "shoulder",
            function: "road",
        },
        LaneType::Biking => AreaCodes {
            usage: "cycling",
            function: "cyclepath",
        },
        LaneType::Sidewalk => AreaCodes {
            usage: "walking",
            function: "footpath",
        },
        LaneType::Parking => AreaCodes {
            usage: "parking",
            function: "parkingBay",
        },
        LaneType::Median | LaneType::Restricted => AreaCodes {
            usage: "restricted",
            function: "trafficIsland",
        },
        LaneType::Tram | LaneType::Rail => AreaCodes {
            usage: "rail",
            function: "railway",
        },
        _ => AreaCodes {
            usage: "unknown",
            function: "road",
        },
    }
}

/// Target feature of a roadside object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectTarget {
    /// Street furniture.
    CityFurniture,
    /// A transportation complex with ROAD function.
    TransportationComplex,
    /// A single tree.
    SolitaryVegetation,
    /// Areal vegetation.
    PlantCover,
    /// A building.
    Building,
    /// A generic city object.
    Generic,
}

/// Decide the target feature from the object's name and type.
///
/// The name wins over the declared type; unknown combinations fall back to a
/// generic city object.
#[must_use]
pub fn object_target(name: &str, kind: ObjectType) -> ObjectTarget {
    match name {
        "bench" | "controllerBox" | "fence" | "railing" | "raiseMedian" | "trafficLight"
        | "trafficSign" | "unknown" | "wall" => return ObjectTarget::CityFurniture,
        "bus" | "crossWalk" | "noParkingArea" => return ObjectTarget::TransportationComplex,
        _ => {}
    }
    match kind {
        ObjectType::Barrier | ObjectType::StreetLamp | ObjectType::Signal | ObjectType::Pole => {
            ObjectTarget::CityFurniture
        }
        ObjectType::Tree => ObjectTarget::SolitaryVegetation,
        ObjectType::Vegetation => ObjectTarget::PlantCover,
        ObjectType::Building => ObjectTarget::Building,
        _ => ObjectTarget::Generic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_wins_over_type() {
        // A bench declared as a building is still city furniture.
        assert_eq!(
            object_target("bench", ObjectType::Building),
            ObjectTarget::CityFurniture
        );
    }

    #[test]
    fn test_type_fallback() {
        assert_eq!(
            object_target("", ObjectType::StreetLamp),
            ObjectTarget::CityFurniture
        );
        assert_eq!(
            object_target("", ObjectType::Tree),
            ObjectTarget::SolitaryVegetation
        );
        assert_eq!(
            object_target("", ObjectType::Vegetation),
            ObjectTarget::PlantCover
        );
        assert_eq!(object_target("", ObjectType::Building), ObjectTarget::Building);
        assert_eq!(object_target("", ObjectType::Obstacle), ObjectTarget::Generic);
    }

    #[test]
    fn test_transportation_names() {
        assert_eq!(
            object_target("crossWalk", ObjectType::None),
            ObjectTarget::TransportationComplex
        );
    }

    #[test]
    fn test_area_codes() {
        assert_eq!(area_codes(LaneType::Driving).usage, "driving");
        assert_eq!(area_codes(LaneType::Sidewalk).function, "footpath");
        assert_eq!(area_codes(LaneType::Biking).usage, "cycling");
    }
}
