//! Player location tracking.
//!
//! Each position update fully replaces the previous fix and its radar zone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{QuizError, Result},
    radar::RadarZone,
    units::{Centimeters, Coordinates},
};

/// A single reading from the position stream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
    /// Reported accuracy in meters.
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Position {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.longitude, self.latitude)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct PositionError {
    pub code: PositionErrorCode,
    #[serde(default)]
    pub message: String,
}

/// Options a host passes to its platform position watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

/// The last accepted position and the radar drawn around it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fix {
    pub position: Position,
    pub accuracy_m: u32,
    pub radar: RadarZone,
}

pub struct LocationTracker {
    radius: Centimeters,
    fix: Option<Fix>,
    last_error: Option<PositionError>,
}

impl LocationTracker {
    pub fn new(radius: Centimeters) -> Self {
        Self {
            radius,
            fix: None,
            last_error: None,
        }
    }

    /// Replace the current fix. Invalid coordinates are rejected and leave the
    /// previous fix in place.
    pub fn update(&mut self, position: Position) -> Result<&Fix> {
        let center = position.coordinates();
        if !center.is_valid() {
            return Err(QuizError::InvalidPosition(format!(
                "({}, {})",
                position.longitude, position.latitude
            )));
        }

        let accuracy_m = if position.accuracy.is_finite() && position.accuracy > 0.0 {
            position.accuracy.round() as u32
        } else {
            0
        };

        debug!(
            longitude = position.longitude,
            latitude = position.latitude,
            accuracy_m,
            "position updated"
        );

        self.last_error = None;
        Ok(&*self.fix.insert(Fix {
            position,
            accuracy_m,
            radar: RadarZone::new(center, self.radius),
        }))
    }

    /// Stream errors are not fatal; the previous fix, if any, is kept.
    pub fn fail(&mut self, error: PositionError) {
        warn!(%error, has_fix = self.fix.is_some(), "failed to obtain location");
        self.last_error = Some(error);
    }

    pub fn fix(&self) -> Option<&Fix> {
        self.fix.as_ref()
    }

    pub fn radar(&self) -> Option<&RadarZone> {
        self.fix.as_ref().map(|fix| &fix.radar)
    }

    pub fn last_error(&self) -> Option<&PositionError> {
        self.last_error.as_ref()
    }
}
