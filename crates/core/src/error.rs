use crate::identifiers::CityIdentifier;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("Unknown city: {0}")]
    UnknownCity(CityIdentifier),

    #[error("Failed to fetch {location}: {message}")]
    Fetch { location: String, message: String },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QuizError>;
