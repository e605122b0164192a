//! # tennis_core - Deterministic Tennis Match Scoring Engine
//!
//! Computes the full score of a tennis match by replaying an ordered point
//! log. The score is never stored: the log is the only source of truth and
//! every view (score, server, break/set/match point) is derived from it.
//!
//! ## Features
//! - Pure replay: same format + same log = same score, bit for bit
//! - Ad / no-ad games, tiebreaks, advantage or super-tiebreak final sets
//! - Server rotation including tiebreak serve order
//! - Break point / set point / match point detection
//! - JSON API with schema versioning
//!
//! ## Usage
//! ```rust
//! use tennis_core::{compute_score, MatchFormat, MatchRecorder, Side};
//!
//! let format = MatchFormat::best_of(3);
//! let mut recorder = MatchRecorder::new(format.clone(), Side::SideA);
//! for _ in 0..24 {
//!     recorder.record(Side::SideA).unwrap();
//! }
//! let state = compute_score(&format, recorder.log());
//! assert_eq!(state.sets.len(), 1);
//! assert_eq!(state.sets_won().0, 1);
//! ```

pub mod api;
pub mod display;
pub mod error;
pub mod format;
pub mod point;
pub mod presets;
pub mod pressure;
pub mod recorder;
pub mod rules;
pub mod score;
pub mod server;
pub mod timeline;
pub mod types;

#[cfg(test)]
mod proptest_gen;
#[cfg(test)]
mod test_fixtures;

// Re-export main API
pub use api::{
    annotate_match_json, compute_score_json, compute_scores_batch, score_request_schema_json,
    ScoreRequest, ScoreResponse,
};
pub use error::{Result, ScoreError};
pub use format::{FinalSetTiebreak, MatchFormat};
pub use point::{MatchRecord, PointMetadata, PointOutcome, PointRecord};
pub use pressure::{is_break_point, is_match_point, is_set_point, Badge, Pressure};
pub use recorder::MatchRecorder;
pub use rules::is_match_won;
pub use score::{compute_score, PointEffect, ScoreState};
pub use server::{regular_game_server, tiebreak_server};
pub use timeline::{annotate, PointAnnotation};
pub use types::{ScorePair, Side};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use api::SCHEMA_VERSION;
