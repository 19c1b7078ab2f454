use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::{
    identifiers::{CityIdentifier, MarkerIdentifier},
    quiz::normalize::{answers_match, normalize},
    units::Coordinates,
};

/// A marker as it appears in a city's JSON file.
///
/// `title` and `coordinates` are required. The question fields never fail a
/// record: a value of the wrong shape reads as absent, and non-string answers
/// read as empty options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRecord {
    pub title: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    #[serde(default, deserialize_with = "or_default")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "answer_list")]
    pub answers: Vec<Option<String>>,
    #[serde(default, deserialize_with = "or_default")]
    pub correct_answer_index: Option<usize>,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|error| {
        warn!(%error, "ignoring malformed question field");
        T::default()
    }))
}

fn answer_list<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let answers = match Value::deserialize(deserializer)? {
        Value::Array(answers) => answers,
        Value::Null => Vec::new(),
        other => {
            warn!(answers = %other, "answers is not a list; ignoring");
            Vec::new()
        }
    };

    Ok(answers
        .into_iter()
        .map(|answer| match answer {
            Value::String(text) => Some(text),
            Value::Null => None,
            other => {
                warn!(answer = %other, "ignoring non-text answer");
                None
            }
        })
        .collect())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerCheck {
    Correct,
    Incorrect,
    /// The marker was already solved or has nothing to answer.
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: MarkerIdentifier,
    pub title: String,
    pub position: Coordinates,
    pub question: Option<String>,
    /// Non-empty options only, in file order.
    pub answers: Vec<String>,
    /// Index into `answers`, remapped past any dropped empty options.
    pub correct_answer_index: Option<usize>,
    pub locked: bool,
}

impl Marker {
    /// Returns `None` when the record has no usable position.
    pub fn from_record(city: &CityIdentifier, index: usize, record: MarkerRecord) -> Option<Self> {
        let position = Coordinates::from(record.coordinates);
        if !position.is_valid() {
            warn!(
                title = %record.title,
                coordinates = ?record.coordinates,
                "skipping marker with invalid coordinates"
            );
            return None;
        }

        let mut answers = Vec::with_capacity(record.answers.len());
        let mut correct_answer_index = None;
        for (i, answer) in record.answers.into_iter().enumerate() {
            let Some(answer) = answer.filter(|a| !a.trim().is_empty()) else {
                continue;
            };
            if record.correct_answer_index == Some(i) {
                correct_answer_index = Some(answers.len());
            }
            answers.push(answer);
        }

        let question = record.question.filter(|q| !q.trim().is_empty());

        if question.is_some() && !answers.is_empty() && correct_answer_index.is_none() {
            warn!(
                title = %record.title,
                index = ?record.correct_answer_index,
                "correct answer index does not point at an answer; marker has no question"
            );
        }

        Some(Marker {
            id: MarkerIdentifier::for_marker(city, index),
            title: record.title,
            position,
            question,
            answers,
            correct_answer_index,
            locked: false,
        })
    }

    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer_index
            .and_then(|i| self.answers.get(i))
            .map(String::as_str)
    }

    pub fn is_answerable(&self) -> bool {
        self.question.is_some() && self.correct_answer().is_some()
    }

    pub fn check(&self, submitted: &str) -> AnswerCheck {
        match self.correct_answer() {
            Some(_) if self.locked => AnswerCheck::Closed,
            Some(correct) if answers_match(submitted, correct) => AnswerCheck::Correct,
            Some(_) => AnswerCheck::Incorrect,
            None => AnswerCheck::Closed,
        }
    }

    /// Indices of every option equal to `submitted` after normalization.
    pub fn matching_options(&self, submitted: &str) -> Vec<usize> {
        let submitted = normalize(submitted);
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, answer)| normalize(answer) == submitted)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faro() -> MarkerRecord {
        MarkerRecord {
            title: "Faro".into(),
            coordinates: [0.2346, 38.7984],
            question: Some("¿Año?".into()),
            answers: vec![Some("1900".into()), Some("1920".into()), Some("1950".into())],
            correct_answer_index: Some(1),
        }
    }

    fn marker(record: MarkerRecord) -> Marker {
        Marker::from_record(&CityIdentifier::new("xabia"), 0, record).unwrap()
    }

    #[test]
    fn test_record_parses_wire_format() {
        let json = r#"{
            "title": "Faro",
            "coordinates": [0.2346, 38.7984],
            "question": "¿Año?",
            "answers": ["1900", "1920", "1950"],
            "correctAnswerIndex": 1
        }"#;

        let record: MarkerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, faro());
    }

    #[test]
    fn test_malformed_question_data_reads_as_no_question() {
        for json in [
            r#"{ "title": "Faro", "coordinates": [0.23, 38.79], "question": "¿Año?",
                 "answers": [1900, 1920], "correctAnswerIndex": 1 }"#,
            r#"{ "title": "Faro", "coordinates": [0.23, 38.79], "question": "¿Año?",
                 "answers": ["1900", "1920"], "correctAnswerIndex": -1 }"#,
            r#"{ "title": "Faro", "coordinates": [0.23, 38.79], "question": "¿Año?",
                 "answers": "a", "correctAnswerIndex": 0 }"#,
            r#"{ "title": "Faro", "coordinates": [0.23, 38.79], "question": 42,
                 "answers": ["1900"], "correctAnswerIndex": 0 }"#,
        ] {
            let record: MarkerRecord = serde_json::from_str(json).unwrap();
            let m = marker(record);
            assert_eq!(m.title, "Faro");
            assert!(!m.is_answerable(), "{json}");
        }
    }

    #[test]
    fn test_mixed_answer_types_keep_text_options() {
        let json = r#"{
            "title": "Faro",
            "coordinates": [0.23, 38.79],
            "question": "¿Año?",
            "answers": [1900, "1920", null],
            "correctAnswerIndex": 1
        }"#;

        let m = marker(serde_json::from_str(json).unwrap());
        assert_eq!(m.answers, vec!["1920"]);
        assert_eq!(m.correct_answer(), Some("1920"));
    }

    #[test]
    fn test_record_without_title_is_rejected() {
        let json = r#"{ "coordinates": [0.1, 38.7], "question": "?" }"#;
        assert!(serde_json::from_str::<MarkerRecord>(json).is_err());
    }

    #[test]
    fn test_record_without_question() {
        let json = r#"{ "title": "Mirador", "coordinates": [0.1, 38.7] }"#;
        let record: MarkerRecord = serde_json::from_str(json).unwrap();

        let m = marker(record);
        assert!(!m.is_answerable());
        assert_eq!(m.check("anything"), AnswerCheck::Closed);
    }

    #[test]
    fn test_correct_answer() {
        let m = marker(faro());
        assert!(m.is_answerable());
        assert_eq!(m.correct_answer(), Some("1920"));
        assert_eq!(m.check(" 1920"), AnswerCheck::Correct);
        assert_eq!(m.check("1900"), AnswerCheck::Incorrect);
    }

    #[test]
    fn test_locked_marker_is_closed() {
        let mut m = marker(faro());
        m.locked = true;
        assert_eq!(m.check("1920"), AnswerCheck::Closed);
    }

    #[test]
    fn test_empty_answers_are_dropped_and_index_remapped() {
        let mut record = faro();
        record.answers = vec![Some(String::new()), None, Some("1900".into()), Some("1920".into())];
        record.correct_answer_index = Some(3);

        let m = marker(record);
        assert_eq!(m.answers, vec!["1900", "1920"]);
        assert_eq!(m.correct_answer(), Some("1920"));
    }

    #[test]
    fn test_index_pointing_at_empty_answer() {
        let mut record = faro();
        record.answers = vec![Some("1900".into()), Some("  ".into())];
        record.correct_answer_index = Some(1);

        let m = marker(record);
        assert!(!m.is_answerable());
    }

    #[test]
    fn test_out_of_range_index() {
        let mut record = faro();
        record.correct_answer_index = Some(7);
        assert!(!marker(record).is_answerable());
    }

    #[test]
    fn test_invalid_coordinates_are_skipped() {
        let mut record = faro();
        record.coordinates = [200.0, 38.0];
        assert!(Marker::from_record(&CityIdentifier::new("xabia"), 0, record).is_none());
    }

    #[test]
    fn test_matching_options() {
        let mut record = faro();
        record.answers.push(Some("1 900".into()));
        record.answers.push(Some(" 1900 ".into()));

        let m = marker(record);
        assert_eq!(m.matching_options("1900"), vec![0, 4]);
    }
}
