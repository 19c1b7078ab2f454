use tracing::{debug, info, warn};

use crate::{
    config::GameConfig,
    event::{DismissToken, Effect, GameEvent, GameEventKind, MapTarget},
    identifiers::{CityIdentifier, MarkerIdentifier},
    quiz::{
        marker::{AnswerCheck, MarkerRecord},
        panel::{Feedback, PanelView},
        score::Score,
    },
    store::{LoadOutcome, LoadTicket, MarkerStore},
    style::{MarkerStyle, Style},
    tracker::{LocationTracker, Position, PositionError},
};

/// All state for one page session: player position, loaded markers, score and
/// the info panel. Mutated only through [`QuizSession::dispatch`].
pub struct QuizSession {
    config: GameConfig,
    tracker: LocationTracker,
    store: MarkerStore,
    score: Score,
    panel: Option<PanelView>,
    bypass: bool,
    dismiss_token: DismissToken,
}

impl QuizSession {
    pub fn new(config: GameConfig) -> Self {
        Self {
            tracker: LocationTracker::new(config.radar_radius()),
            store: MarkerStore::new(config.cities.clone()),
            score: Score::default(),
            panel: None,
            bypass: config.bypass_proximity,
            dismiss_token: DismissToken(0),
            config,
        }
    }

    /// Effects a host should apply once before sending any event.
    pub fn start(&self) -> Vec<Effect> {
        vec![
            Effect::Recenter {
                center: self.config.initial_view.center,
                zoom: self.config.initial_view.zoom,
                duration_ms: 0,
            },
            Effect::WatchPosition {
                options: self.config.geolocation,
            },
            Effect::ScoreChanged { score: self.score },
        ]
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn panel(&self) -> Option<&PanelView> {
        self.panel.as_ref()
    }

    pub fn bypass(&self) -> bool {
        self.bypass
    }

    pub fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// Markers inside the current radar zone.
    pub fn markers_in_range(&self) -> Vec<&MarkerIdentifier> {
        match self.tracker.radar() {
            Some(radar) => self.store.within(radar).into_iter().map(|m| &m.id).collect(),
            None => Vec::new(),
        }
    }

    pub fn dispatch(&mut self, event: GameEvent) -> Vec<Effect> {
        debug!(event = %GameEventKind::from(&event), "dispatching");

        let mut effects = Vec::new();
        match event {
            GameEvent::PositionUpdated { position } => self.on_position(position, &mut effects),
            GameEvent::PositionFailed { error } => self.on_position_error(error),
            GameEvent::CitySelected { city } => self.on_city_selected(&city, &mut effects),
            GameEvent::MarkersLoaded { ticket, records } => {
                self.on_markers_loaded(&ticket, records, &mut effects)
            }
            GameEvent::MapClicked { target } => self.on_click(target, &mut effects),
            GameEvent::AnswerSubmitted { marker, answer } => {
                self.on_answer(&marker, &answer, &mut effects)
            }
            GameEvent::BypassToggled { enabled } => {
                info!(enabled, "proximity bypass toggled");
                self.bypass = enabled;
            }
            GameEvent::DismissTimerFired { token } => self.on_dismiss_timer(token, &mut effects),
        }
        effects
    }

    fn on_position(&mut self, position: Position, effects: &mut Vec<Effect>) {
        let fix = match self.tracker.update(position) {
            Ok(fix) => *fix,
            Err(error) => {
                warn!(%error, "ignoring position update");
                return;
            }
        };

        effects.push(Effect::DrawUserLocation {
            position: fix.radar.center,
            accuracy_m: fix.accuracy_m,
            radar: fix.radar,
            radar_style: Style::radar(),
            dot_style: Style::user_location(),
        });
        effects.push(Effect::Recenter {
            center: fix.radar.center,
            zoom: self.config.tracking_zoom,
            duration_ms: self.config.recenter_duration_ms,
        });

        for marker in self.store.within(&fix.radar) {
            info!(title = %marker.title, id = %marker.id, "inside radar");
        }
    }

    fn on_position_error(&mut self, error: PositionError) {
        self.tracker.fail(error);
        if self.tracker.fix().is_none() && !self.bypass {
            info!("no location available; markers can only be answered with the bypass enabled");
        }
    }

    fn on_city_selected(&mut self, city: &CityIdentifier, effects: &mut Vec<Effect>) {
        let (ticket, source) = match self.store.select(city) {
            Ok(selection) => selection,
            Err(error) => {
                warn!(%error, "city selection rejected");
                return;
            }
        };

        self.score.reset();
        self.hide_panel(effects);
        effects.push(Effect::ClearMarkers);
        effects.push(Effect::ScoreChanged { score: self.score });
        effects.push(Effect::FetchMarkers { ticket, source });
    }

    fn on_markers_loaded(
        &mut self,
        ticket: &LoadTicket,
        records: Result<Vec<MarkerRecord>, String>,
        effects: &mut Vec<Effect>,
    ) {
        match self.store.complete(ticket, records) {
            LoadOutcome::Applied { .. } => {}
            LoadOutcome::Stale | LoadOutcome::Failed => return,
        }

        self.score = Score {
            total: self.store.answerable_count(),
            correct: 0,
        };

        effects.extend(self.store.markers().iter().map(|marker| Effect::DrawMarker {
            id: marker.id.clone(),
            title: marker.title.clone(),
            position: marker.position,
            style: MarkerStyle::Unsolved,
            color: MarkerStyle::Unsolved.pin_color(),
        }));
        effects.push(Effect::ScoreChanged { score: self.score });
    }

    fn on_click(&mut self, target: MapTarget, effects: &mut Vec<Effect>) {
        let view = match target {
            MapTarget::Empty => {
                self.hide_panel(effects);
                return;
            }
            MapTarget::UserLocation => PanelView::UserLocation {
                accuracy_m: self.tracker.fix().map(|fix| fix.accuracy_m),
            },
            MapTarget::Marker(id) => {
                let Some(marker) = self.store.get(&id) else {
                    debug!(%id, "click on unknown marker ignored");
                    return;
                };

                if marker.locked {
                    PanelView::AlreadySolved {
                        marker: id,
                        title: marker.title.clone(),
                    }
                } else if let Some(question) = PanelView::question(marker) {
                    let radar = self.tracker.radar();
                    let in_range = radar.is_some_and(|r| r.contains(marker.position));

                    if in_range || self.bypass {
                        question
                    } else {
                        debug!(%id, has_radar = radar.is_some(), "marker out of range");
                        PanelView::OutOfRange {
                            marker: id,
                            title: marker.title.clone(),
                            distance_m: radar.map(|r| r.distance_to(marker.position)),
                        }
                    }
                } else {
                    PanelView::NoQuestion {
                        marker: id,
                        title: marker.title.clone(),
                    }
                }
            }
        };

        self.show_panel(view, effects);
    }

    fn on_answer(&mut self, id: &MarkerIdentifier, answer: &str, effects: &mut Vec<Effect>) {
        if !self.panel.as_ref().is_some_and(|p| p.is_asking(id)) {
            debug!(%id, "answer for a question that is not on screen ignored");
            return;
        }

        let Some(marker) = self.store.get_mut(id) else {
            return;
        };

        let check = marker.check(answer);
        let matching = marker.matching_options(answer);

        let feedback = match check {
            AnswerCheck::Closed => {
                debug!(%id, "answer for a closed marker ignored");
                return;
            }
            AnswerCheck::Correct => {
                marker.locked = true;
                self.score.record_correct();
                info!(%id, title = %marker.title, score = ?self.score, "correct answer");
                Feedback::Correct
            }
            AnswerCheck::Incorrect => {
                debug!(%id, answer, "incorrect answer");
                Feedback::Incorrect
            }
        };

        let mut view = self.panel.clone();
        if let Some(PanelView::Question {
            options,
            feedback: shown,
            ..
        }) = view.as_mut()
        {
            *shown = Some(feedback);
            for (i, option) in options.iter_mut().enumerate() {
                if feedback == Feedback::Correct || matching.contains(&i) {
                    option.enabled = false;
                }
            }
        }
        let Some(view) = view else {
            return;
        };

        if feedback == Feedback::Correct {
            effects.push(Effect::RestyleMarker {
                id: id.clone(),
                style: MarkerStyle::Solved,
                color: MarkerStyle::Solved.pin_color(),
            });
            effects.push(Effect::ScoreChanged { score: self.score });
        }

        self.show_panel(view, effects);

        if feedback == Feedback::Correct {
            effects.push(Effect::ScheduleDismiss {
                after_ms: self.config.dismiss_delay_ms,
                token: self.dismiss_token,
            });
        }
    }

    fn on_dismiss_timer(&mut self, token: DismissToken, effects: &mut Vec<Effect>) {
        if token != self.dismiss_token {
            debug!(?token, current = ?self.dismiss_token, "stale dismiss timer ignored");
            return;
        }
        self.hide_panel(effects);
    }

    /// Every panel change invalidates pending dismiss timers.
    fn show_panel(&mut self, view: PanelView, effects: &mut Vec<Effect>) {
        self.dismiss_token.0 += 1;
        self.panel = Some(view.clone());
        effects.push(Effect::ShowPanel { view });
    }

    fn hide_panel(&mut self, effects: &mut Vec<Effect>) {
        self.dismiss_token.0 += 1;
        if self.panel.take().is_some() {
            effects.push(Effect::HidePanel);
        }
    }
}
