//! tennis_adapter: convert stored / external match payloads into the
//! canonical `tennis_core` records before the engine sees them.
//!
//! The engine only knows one shape (`MatchRecord`). Everything else lives
//! here: `p1`/`player1` side names, legacy format keys, string-encoded point
//! logs, and materialized scores stored next to the log.
//!
//! ## Usage
//! ```rust
//! use tennis_adapter::normalize_match_json;
//!
//! let payload = r#"{
//!     "matchFormat": { "sets": 3, "noAd": false, "tiebreak": true },
//!     "pointLog": [
//!         "{\"winner\":\"p1\",\"server\":\"p1\",\"setNumber\":1,\"gameNumber\":1}"
//!     ],
//!     "score": { "sets": [], "games": [0, 0], "points": [1, 0] }
//! }"#;
//! let normalized = normalize_match_json(payload).unwrap();
//! assert_eq!(normalized.record.point_log.len(), 1);
//! assert!(normalized.reconcile().unwrap().is_consistent());
//! ```

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use tennis_core::point::MatchRecord;
use tennis_core::ScoreError;

pub mod legacy;
pub mod mapper;

pub use legacy::{reconcile, Reconciliation, ScoreMismatch, StoredScore};
pub use mapper::{map_format, map_point, map_point_log, parse_side};

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown side: {0:?}")]
    UnknownSide(String),
    #[error("missing field {field} in {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("invalid stored score: {0}")]
    InvalidScore(String),
    #[error(transparent)]
    Core(#[from] ScoreError),
}

pub type Result<T> = std::result::Result<T, AdapterError>;

/// A normalized match document: canonical record plus the stored score, if any
#[derive(Debug, Clone)]
pub struct NormalizedMatch {
    pub record: MatchRecord,
    pub stored_score: Option<StoredScore>,
}

impl NormalizedMatch {
    /// Compare the stored score with the replay. `None` without a stored score.
    pub fn reconcile(&self) -> Option<Reconciliation> {
        self.stored_score
            .as_ref()
            .map(|stored| reconcile(&self.record, stored))
    }
}

/// Normalize a match document (`matchFormat`, `pointLog`, optional `score`).
pub fn normalize_match_value(value: &Value) -> Result<NormalizedMatch> {
    let object = value.as_object().ok_or_else(|| AdapterError::InvalidField {
        field: "match",
        reason: format!("expected an object, got {value}"),
    })?;
    let format_value = object
        .get("matchFormat")
        .or_else(|| object.get("format"))
        .ok_or(AdapterError::MissingField {
            field: "matchFormat",
            context: "match".to_string(),
        })?;

    let match_format = map_format(format_value)?;
    let point_log = match object.get("pointLog") {
        Some(log) => map_point_log(log)?,
        None => Vec::new(),
    };
    let stored_score = match object.get("score") {
        None | Some(Value::Null) => None,
        Some(score) => Some(StoredScore::from_value(score)?),
    };
    debug!(
        points = point_log.len(),
        has_stored_score = stored_score.is_some(),
        "match document normalized"
    );
    Ok(NormalizedMatch {
        record: MatchRecord::new(match_format, point_log),
        stored_score,
    })
}

pub fn normalize_match_json(json: &str) -> Result<NormalizedMatch> {
    let value: Value = serde_json::from_str(json)?;
    normalize_match_value(&value)
}

/// Normalize straight to the canonical record, dropping any stored score.
pub fn normalize_match_record(value: &Value) -> Result<MatchRecord> {
    normalize_match_value(value).map(|normalized| normalized.record)
}
