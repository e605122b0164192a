//! Per-point annotation of a match log
//!
//! Walks the fold once and records, for every point, the situation it was
//! played at and the score it produced. Used by point-by-point views that
//! show a badge next to each score.
//!
//! ## Usage
//! ```rust
//! use tennis_core::format::MatchFormat;
//! use tennis_core::recorder::MatchRecorder;
//! use tennis_core::timeline::annotate;
//! use tennis_core::types::Side;
//!
//! let format = MatchFormat::best_of(3);
//! let mut recorder = MatchRecorder::new(format.clone(), Side::SideA);
//! for _ in 0..3 {
//!     recorder.record(Side::SideB).unwrap();
//! }
//! let timeline = annotate(&format, recorder.log());
//! assert_eq!(timeline[2].score_after.game_score, "0-40");
//! assert!(timeline[2].pressure_after.break_point.is_some());
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::display::game_score_display;
use crate::format::MatchFormat;
use crate::point::PointRecord;
use crate::pressure::{Badge, Pressure};
use crate::score::ScoreState;
use crate::types::{ScorePair, Side};

/// Compact score after a point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub sets: Vec<ScorePair>,
    pub games: ScorePair,
    /// Game points, or tiebreak points while `is_tiebreak`
    pub points: ScorePair,
    pub is_tiebreak: bool,
    /// `"30-15"`, `"Deuce"`, or the tiebreak count
    pub game_score: String,
    pub scoreline: String,
}

impl ScoreSnapshot {
    pub fn of_state(state: &ScoreState, format: &MatchFormat) -> Self {
        let points = state.active_points();
        let game_score = if state.is_tiebreak {
            crate::display::tiebreak_display(points.0, points.1)
        } else {
            game_score_display(points.0, points.1, format.no_ad)
        };
        Self {
            sets: state.sets.clone(),
            games: state.current_games,
            points,
            is_tiebreak: state.is_tiebreak,
            game_score,
            scoreline: state.scoreline(format.no_ad),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointAnnotation {
    /// 0-based position in the log
    pub index: usize,
    pub winner: Side,
    pub server: Side,
    pub score_after: ScoreSnapshot,
    /// Situation the point was played at, with the recorded server
    pub pressure_before: Pressure,
    /// Situation after the point, for the badge next to the new score
    pub pressure_after: Pressure,
    pub badge: Option<Badge>,
    pub is_game_winning: bool,
    pub is_set_winning: bool,
    pub is_match_winning: bool,
    /// Point came after the match was decided and was not counted
    pub ignored: bool,
    /// Server predicted by rotation; unknown for the first point
    pub expected_server: Option<Side>,
    pub server_matches: bool,
}

/// Annotate every point of `points`, in order.
pub fn annotate(format: &MatchFormat, points: &[PointRecord]) -> Vec<PointAnnotation> {
    let mut state = ScoreState::start(format);
    let mut annotations = Vec::with_capacity(points.len());

    for (index, point) in points.iter().enumerate() {
        let complete_before = state.is_complete();
        let expected_server = if complete_before {
            None
        } else {
            state.next_server()
        };
        let pressure_before = Pressure::of_state(&state, format, Some(point.server));
        let effect = state.apply_point(format, point);
        let pressure_after = Pressure::of_state(&state, format, None);

        let server_matches = expected_server.map_or(true, |expected| expected == point.server);
        if !server_matches {
            debug!(
                index,
                recorded = ?point.server,
                expected = ?expected_server,
                "recorded server differs from rotation"
            );
        }

        annotations.push(PointAnnotation {
            index,
            winner: point.winner,
            server: point.server,
            score_after: ScoreSnapshot::of_state(&state, format),
            pressure_before,
            pressure_after,
            badge: pressure_after.badge(),
            is_game_winning: effect.game_won.is_some(),
            is_set_winning: effect.set_won.is_some(),
            is_match_winning: effect.match_won.is_some(),
            ignored: effect.ignored,
            expected_server,
            server_matches,
        });
    }
    annotations
}
