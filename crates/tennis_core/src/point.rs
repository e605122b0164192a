//! Point records: the authoritative, append-only match history.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::MatchFormat;
use crate::types::Side;

/// How the point ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PointOutcome {
    Ace,
    Winner,
    UnforcedError,
    ForcedError,
    DoubleFault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServeType {
    First,
    Second,
}

/// Shot that ended the point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Forehand,
    Backhand,
    Volley,
    Overhead,
    DropShot,
    Lob,
    Serve,
}

/// Outcome metadata. The scoring fold never reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PointOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_type: Option<ServeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shot: Option<ShotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rally_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One point played.
///
/// `set_number` is the 1-indexed set within the match, `game_number` the
/// 1-indexed game within that set (a tiebreak is one game).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub winner: Side,
    pub server: Side,
    pub set_number: u32,
    pub game_number: u32,
    #[serde(default, alias = "isTiebreak")]
    pub is_tiebreak_point: bool,
    /// 1-indexed position in the match log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_number: Option<u32>,
    #[serde(flatten)]
    pub metadata: PointMetadata,
}

impl PointRecord {
    pub fn new(winner: Side, server: Side, set_number: u32, game_number: u32) -> Self {
        Self {
            winner,
            server,
            set_number,
            game_number,
            is_tiebreak_point: false,
            point_number: None,
            metadata: PointMetadata::default(),
        }
    }

    pub fn tiebreak(mut self) -> Self {
        self.is_tiebreak_point = true;
        self
    }

    pub fn with_metadata(mut self, metadata: PointMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether the server won the point
    pub fn is_hold(&self) -> bool {
        self.winner == self.server
    }
}

/// Stored match: format plus ordered point log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub match_format: MatchFormat,
    #[serde(default)]
    pub point_log: Vec<PointRecord>,
}

impl MatchRecord {
    pub fn new(match_format: MatchFormat, point_log: Vec<PointRecord>) -> Self {
        Self {
            match_format,
            point_log,
        }
    }
}
