//! # radar-quiz-core
//!
//! A geolocated quiz: markers on a map carry trivia questions, and a marker can
//! only be answered while it lies inside the radar zone around the player.
//!
//! The crate holds no platform code. A host feeds [`event::GameEvent`]s into a
//! [`quiz::session::QuizSession`] and renders the [`event::Effect`]s it returns.
//!
//! ## Example
//!
//! ```
//! use radar_quiz_core::prelude::*;
//!
//! let mut session = QuizSession::new(GameConfig::default());
//! session.dispatch(GameEvent::BypassToggled { enabled: true });
//!
//! let effects = session.dispatch(GameEvent::CitySelected {
//!     city: CityIdentifier::new("default"),
//! });
//! assert!(effects.iter().any(|e| matches!(e, Effect::FetchMarkers { .. })));
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod identifiers;
pub mod quiz;
pub mod radar;
pub mod store;
pub mod style;
pub mod tracker;
pub mod units;

pub mod prelude {
    pub use crate::config::GameConfig;
    pub use crate::error::{QuizError, Result};
    pub use crate::event::{DismissToken, Effect, GameEvent, MapTarget};
    pub use crate::identifiers::*;
    pub use crate::quiz::{
        marker::{Marker, MarkerRecord},
        normalize::normalize,
        panel::PanelView,
        score::Score,
        session::QuizSession,
    };
    pub use crate::radar::RadarZone;
    pub use crate::store::{
        CitySource, DataSource, LoadTicket,
        fetch::{DataFetcher, MarkerLoader, SourceFetcher},
    };
    pub use crate::tracker::{Position, PositionError, PositionErrorCode};
    pub use crate::units::{Centimeters, Coordinates};
}
