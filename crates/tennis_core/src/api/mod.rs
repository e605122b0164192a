pub mod json_api;

pub use json_api::{
    annotate_match_json, compute_score_json, compute_scores_batch, score_request_schema_json,
    ScoreRequest, ScoreResponse, TimelineResponse, SCHEMA_VERSION,
};
