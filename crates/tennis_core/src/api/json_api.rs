use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ScoreError};
use crate::format::MatchFormat;
use crate::point::{MatchRecord, PointRecord};
use crate::pressure::{Badge, Pressure};
use crate::score::{compute_score, ScoreState};
use crate::timeline::{annotate, PointAnnotation};
use crate::types::Side;

pub const SCHEMA_VERSION: u8 = 1;

// ============================================================================
// Request / response
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub schema_version: u8,
    pub match_format: MatchFormat,
    #[serde(default)]
    pub point_log: Vec<PointRecord>,
}

impl ScoreRequest {
    pub fn new(record: MatchRecord) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            match_format: record.match_format,
            point_log: record.point_log,
        }
    }

    fn parse(request_json: &str) -> Result<Self> {
        let request: ScoreRequest = serde_json::from_str(request_json)?;
        if request.schema_version != SCHEMA_VERSION {
            return Err(ScoreError::UnsupportedSchema {
                found: request.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        request.match_format.validate()?;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub schema_version: u8,
    pub score: ScoreState,
    pub winner: Option<Side>,
    pub scoreline: String,
    pub next_server: Option<Side>,
    pub pressure: Pressure,
    pub badge: Option<Badge>,
    /// SHA-256 of the canonical score JSON
    pub digest: String,
}

impl ScoreResponse {
    pub fn from_state(format: &MatchFormat, score: ScoreState) -> Self {
        let pressure = Pressure::of_state(&score, format, None);
        Self {
            schema_version: SCHEMA_VERSION,
            winner: score.winner,
            scoreline: score.scoreline(format.no_ad),
            next_server: score.next_server(),
            pressure,
            badge: pressure.badge(),
            digest: score.digest(),
            score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub schema_version: u8,
    pub points: Vec<PointAnnotation>,
    pub score: ScoreState,
}

// ============================================================================
// Entry points
// ============================================================================

/// Replay a JSON `ScoreRequest` and return a JSON `ScoreResponse`.
pub fn compute_score_json(request_json: &str) -> Result<String> {
    let request = ScoreRequest::parse(request_json)?;
    info!(
        points = request.point_log.len(),
        sets_to_play = request.match_format.sets_to_play,
        "compute_score_json"
    );
    let score = compute_score(&request.match_format, &request.point_log);
    let response = ScoreResponse::from_state(&request.match_format, score);
    Ok(serde_json::to_string(&response)?)
}

/// Replay a JSON `ScoreRequest` and return the per-point timeline.
pub fn annotate_match_json(request_json: &str) -> Result<String> {
    let request = ScoreRequest::parse(request_json)?;
    info!(points = request.point_log.len(), "annotate_match_json");
    let points = annotate(&request.match_format, &request.point_log);
    let score = compute_score(&request.match_format, &request.point_log);
    let response = TimelineResponse {
        schema_version: SCHEMA_VERSION,
        points,
        score,
    };
    Ok(serde_json::to_string(&response)?)
}

/// Replay many matches in parallel. Each replay is independent.
pub fn compute_scores_batch(records: &[MatchRecord]) -> Vec<ScoreState> {
    info!(matches = records.len(), "compute_scores_batch");
    records
        .par_iter()
        .map(|record| compute_score(&record.match_format, &record.point_log))
        .collect()
}

/// JSON Schema of `ScoreRequest`, pretty printed.
pub fn score_request_schema_json() -> Result<String> {
    let schema = schemars::schema_for!(ScoreRequest);
    Ok(serde_json::to_string_pretty(&schema)?)
}
