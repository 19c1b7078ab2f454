use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub i32);

impl Centimeters {
    pub fn as_meters(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn from_meters(m: f64) -> Self {
        Centimeters((m * 100.0).round() as i32)
    }
}

/// A WGS84 longitude/latitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    pub fn to_point(self) -> geo::Point {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl From<geo::Point> for Coordinates {
    fn from(point: geo::Point) -> Self {
        Self::new(point.x(), point.y())
    }
}

/// Marker files store positions as `[longitude, latitude]`.
impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}
