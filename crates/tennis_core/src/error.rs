use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Invalid match format: {0}")]
    InvalidFormat(String),

    #[error("Unknown format preset: {0}")]
    UnknownPreset(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("Match already complete: {winner:?} won, point {point_number} rejected")]
    MatchComplete {
        winner: crate::types::Side,
        point_number: u32,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ScoreError {
    /// Whether the caller can fix the input and retry.
    pub fn is_input_error(&self) -> bool {
        match self {
            ScoreError::InvalidFormat(_) => true,
            ScoreError::UnknownPreset(_) => true,
            ScoreError::UnsupportedSchema { .. } => true,
            ScoreError::Json(_) | ScoreError::Yaml(_) => true,
            ScoreError::MatchComplete { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
