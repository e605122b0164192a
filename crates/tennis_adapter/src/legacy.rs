//! Stored legacy scores and reconciliation against the replay
//!
//! Older match documents carry a materialized score next to the point log.
//! The replay is authoritative; the stored score is only compared against
//! it so drift can be reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use tennis_core::point::MatchRecord;
use tennis_core::score::{compute_score, ScoreState};
use tennis_core::types::ScorePair;

use crate::mapper::{is_single_pair, parse_pair, parse_pairs};
use crate::{AdapterError, Result};

/// A stored score in canonical shape
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScore {
    pub sets: Vec<ScorePair>,
    pub games: ScorePair,
    pub points: ScorePair,
    #[serde(default)]
    pub is_tiebreak: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak_points: Option<ScorePair>,
}

impl StoredScore {
    /// Parse any of the stored shapes.
    ///
    /// `sets` is a list of pairs; `games` is either the current pair or one
    /// pair per set (the last is current); pairs are arrays or side-keyed
    /// objects.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| AdapterError::InvalidScore(format!(
            "expected a score object, got {value}"
        )))?;

        let sets = match object.get("sets") {
            Some(sets) => parse_pairs(sets, "sets")?,
            None => Vec::new(),
        };
        let games = match object.get("games") {
            None | Some(Value::Null) => ScorePair::ZERO,
            Some(games) if is_single_pair(games) => parse_pair(games, "games")?,
            Some(games) => parse_pairs(games, "games")?
                .last()
                .copied()
                .unwrap_or(ScorePair::ZERO),
        };
        let points = match object.get("points") {
            None | Some(Value::Null) => ScorePair::ZERO,
            Some(points) => parse_pair(points, "points")?,
        };
        let tiebreak_points = match object.get("tiebreakPoints") {
            None | Some(Value::Null) => None,
            Some(points) => Some(parse_pair(points, "tiebreakPoints")?),
        };
        Ok(Self {
            sets,
            games,
            points,
            is_tiebreak: object
                .get("isTiebreak")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            tiebreak_points,
        })
    }
}

/// One field where the stored score and the replay disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum ScoreMismatch {
    Sets {
        stored: Vec<ScorePair>,
        replayed: Vec<ScorePair>,
    },
    Games {
        stored: ScorePair,
        replayed: ScorePair,
    },
    Points {
        stored: ScorePair,
        replayed: ScorePair,
    },
    Tiebreak {
        stored: bool,
        replayed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub replayed: ScoreState,
    pub mismatches: Vec<ScoreMismatch>,
}

impl Reconciliation {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Replay `record` and compare it with a stored score.
///
/// Game and point counters are only compared while the match is in
/// progress; a finished match is compared on its sets.
pub fn reconcile(record: &MatchRecord, stored: &StoredScore) -> Reconciliation {
    let replayed = compute_score(&record.match_format, &record.point_log);
    let mut mismatches = Vec::new();

    if stored.sets != replayed.sets {
        mismatches.push(ScoreMismatch::Sets {
            stored: stored.sets.clone(),
            replayed: replayed.sets.clone(),
        });
    }
    if !replayed.is_complete() {
        if stored.games != replayed.current_games {
            mismatches.push(ScoreMismatch::Games {
                stored: stored.games,
                replayed: replayed.current_games,
            });
        }
        if stored.is_tiebreak != replayed.is_tiebreak {
            mismatches.push(ScoreMismatch::Tiebreak {
                stored: stored.is_tiebreak,
                replayed: replayed.is_tiebreak,
            });
        }
        let stored_points = if replayed.is_tiebreak {
            stored.tiebreak_points.unwrap_or(stored.points)
        } else {
            stored.points
        };
        if stored_points != replayed.active_points() {
            mismatches.push(ScoreMismatch::Points {
                stored: stored_points,
                replayed: replayed.active_points(),
            });
        }
    }

    if !mismatches.is_empty() {
        warn!(
            mismatches = mismatches.len(),
            points = record.point_log.len(),
            "stored score disagrees with replay"
        );
    }
    Reconciliation {
        replayed,
        mismatches,
    }
}
