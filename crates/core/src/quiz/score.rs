use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Answerable questions in the loaded city.
    pub total: u32,
    pub correct: u32,
}

impl Score {
    pub fn reset(&mut self) {
        *self = Score::default();
    }

    pub fn record_correct(&mut self) {
        self.correct += 1;
    }
}
