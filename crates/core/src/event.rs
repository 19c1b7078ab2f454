//! Everything that flows into and out of a [`crate::quiz::session::QuizSession`].
//!
//! Hosts translate platform callbacks (position watcher, network responses,
//! clicks, timers) into [`GameEvent`]s and render the returned [`Effect`]s.

use palette::Srgba;
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;

use crate::{
    identifiers::{CityIdentifier, MarkerIdentifier},
    quiz::{marker::MarkerRecord, panel::PanelView, score::Score},
    radar::RadarZone,
    store::{DataSource, LoadTicket},
    style::{MarkerStyle, Style},
    tracker::{GeolocationOptions, Position, PositionError},
    units::Coordinates,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DismissToken(pub u64);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "marker", rename_all = "snake_case")]
pub enum MapTarget {
    Marker(MarkerIdentifier),
    UserLocation,
    Empty,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(name(GameEventKind), derive(strum::Display))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PositionUpdated {
        position: Position,
    },
    PositionFailed {
        error: PositionError,
    },
    CitySelected {
        city: CityIdentifier,
    },
    MarkersLoaded {
        ticket: LoadTicket,
        records: Result<Vec<MarkerRecord>, String>,
    },
    MapClicked {
        target: MapTarget,
    },
    AnswerSubmitted {
        marker: MarkerIdentifier,
        answer: String,
    },
    BypassToggled {
        enabled: bool,
    },
    DismissTimerFired {
        token: DismissToken,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, EnumDiscriminants)]
#[strum_discriminants(name(EffectKind), derive(strum::Display))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Start the platform position watcher.
    WatchPosition {
        options: GeolocationOptions,
    },
    /// Replace the previously drawn player dot and radar.
    DrawUserLocation {
        position: Coordinates,
        accuracy_m: u32,
        radar: RadarZone,
        radar_style: Style,
        dot_style: Style,
    },
    Recenter {
        center: Coordinates,
        zoom: f64,
        duration_ms: u64,
    },
    ClearMarkers,
    DrawMarker {
        id: MarkerIdentifier,
        title: String,
        position: Coordinates,
        style: MarkerStyle,
        color: Srgba<f32>,
    },
    RestyleMarker {
        id: MarkerIdentifier,
        style: MarkerStyle,
        color: Srgba<f32>,
    },
    FetchMarkers {
        ticket: LoadTicket,
        source: DataSource,
    },
    ShowPanel {
        view: PanelView,
    },
    HidePanel,
    /// Send back `DismissTimerFired { token }` after `after_ms`.
    ScheduleDismiss {
        after_ms: u64,
        token: DismissToken,
    },
    ScoreChanged {
        score: Score,
    },
}
