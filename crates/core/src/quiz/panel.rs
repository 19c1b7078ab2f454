use serde::Serialize;
use strum::EnumDiscriminants;

use crate::{identifiers::MarkerIdentifier, quiz::marker::Marker};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub text: String,
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// Contents of the single info panel.
#[derive(Clone, Debug, PartialEq, Serialize, EnumDiscriminants)]
#[strum_discriminants(name(PanelKind), derive(strum::Display))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelView {
    UserLocation {
        /// `None` until a fix has been received.
        accuracy_m: Option<u32>,
    },
    Question {
        marker: MarkerIdentifier,
        title: String,
        question: String,
        options: Vec<AnswerOption>,
        feedback: Option<Feedback>,
    },
    NoQuestion {
        marker: MarkerIdentifier,
        title: String,
    },
    OutOfRange {
        marker: MarkerIdentifier,
        title: String,
        /// Distance to the radar center, when there is a radar.
        distance_m: Option<f64>,
    },
    AlreadySolved {
        marker: MarkerIdentifier,
        title: String,
    },
}

impl PanelView {
    /// A fresh question panel with every option enabled. `None` when the
    /// marker has nothing to ask.
    pub fn question(marker: &Marker) -> Option<Self> {
        let question = marker.question.clone().filter(|_| marker.is_answerable())?;

        Some(PanelView::Question {
            marker: marker.id.clone(),
            title: marker.title.clone(),
            question,
            options: marker
                .answers
                .iter()
                .map(|text| AnswerOption {
                    text: text.clone(),
                    enabled: true,
                })
                .collect(),
            feedback: None,
        })
    }

    /// Whether `marker`'s question is on screen and still accepting answers.
    pub fn is_asking(&self, marker: &MarkerIdentifier) -> bool {
        matches!(
            self,
            PanelView::Question { marker: shown, feedback, .. }
                if shown == marker && *feedback != Some(Feedback::Correct)
        )
    }
}
