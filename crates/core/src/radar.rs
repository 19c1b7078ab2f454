use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

use crate::units::{Centimeters, Coordinates};

/// The circle around the player inside which markers can be answered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadarZone {
    pub center: Coordinates,
    pub radius: Centimeters,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Proximity {
    Hit,
    Miss,
}

impl RadarZone {
    pub fn new(center: Coordinates, radius: Centimeters) -> Self {
        RadarZone { center, radius }
    }

    /// Great-circle distance from the zone center, in meters.
    pub fn distance_to(&self, point: Coordinates) -> f64 {
        Haversine.distance(self.center.to_point(), point.to_point())
    }

    /// Points on the boundary count as inside.
    pub fn probe(&self, point: Coordinates) -> Proximity {
        if self.distance_to(point) <= self.radius.as_meters() {
            Proximity::Hit
        } else {
            Proximity::Miss
        }
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        self.probe(point) == Proximity::Hit
    }
}
