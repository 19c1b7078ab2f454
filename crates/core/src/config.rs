use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{QuizError, Result},
    identifiers::CityIdentifier,
    store::{CitySource, DataSource},
    tracker::GeolocationOptions,
    units::{Centimeters, Coordinates},
};

/// Smaller radii round to zero centimeters; larger ones overflow the `i32`.
const RADAR_RADIUS_METERS: std::ops::RangeInclusive<f64> = 0.01..=1_000_000.0;

const DEFAULT_MARKERS_URL: &str =
    "https://raw.githubusercontent.com/mireya-sp/ProyectoFinal/main/markers.json";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub center: Coordinates,
    pub zoom: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub radar_radius_meters: f64,
    /// How long the "correct" panel stays up before closing on its own.
    pub dismiss_delay_ms: u64,
    pub initial_view: ViewConfig,
    /// Zoom used when following the player.
    pub tracking_zoom: f64,
    pub recenter_duration_ms: u64,
    pub geolocation: GeolocationOptions,
    pub bypass_proximity: bool,
    pub cities: Vec<CitySource>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            radar_radius_meters: 200.0,
            dismiss_delay_ms: 1500,
            initial_view: ViewConfig {
                center: Coordinates::new(0.111, 38.795),
                zoom: 12.0,
            },
            tracking_zoom: 15.0,
            recenter_duration_ms: 1000,
            geolocation: GeolocationOptions::default(),
            bypass_proximity: false,
            cities: vec![CitySource {
                id: CityIdentifier::new("default"),
                name: "Default".into(),
                source: DataSource::Url(DEFAULT_MARKERS_URL.into()),
            }],
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !RADAR_RADIUS_METERS.contains(&self.radar_radius_meters) {
            return Err(QuizError::Config(format!(
                "radar_radius_meters must be within {}..={}, got {}",
                RADAR_RADIUS_METERS.start(),
                RADAR_RADIUS_METERS.end(),
                self.radar_radius_meters
            )));
        }

        if !self.initial_view.center.is_valid() {
            return Err(QuizError::Config("initial_view.center is out of range".into()));
        }

        let mut seen = HashSet::new();
        for city in &self.cities {
            if !seen.insert(&city.id) {
                return Err(QuizError::Config(format!("duplicate city id: {}", city.id)));
            }
        }

        Ok(())
    }

    pub fn radar_radius(&self) -> Centimeters {
        Centimeters::from_meters(self.radar_radius_meters)
    }

    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_delay_ms)
    }
}
