//! Score state and the replay fold
//!
//! `ScoreState` is never ground truth. It is recomputed by folding the
//! ordered point log through the rules:
//!
//! ```text
//! PointRecord[0..k] ──fold──▶ ScoreState_k
//!                                │
//!                 point k+1 ─────┴──▶ ScoreState_k+1
//! ```
//!
//! ## Fold step
//! 1. Ignore the point if the match is already won
//! 2. Route it to the tiebreak counter or the game counter
//! 3. On game/tiebreak completion, cascade into set and match completion
//! 4. Recompute the derived deciding-set / super-tiebreak fields
//!
//! The derived fields (`is_deciding_set`, `is_super_tiebreak`,
//! `tiebreak_target`) are computed from the completed sets and the format,
//! never inferred from point or game magnitudes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::format::MatchFormat;
use crate::point::PointRecord;
use crate::rules;
use crate::server::{regular_game_server, tiebreak_server};
use crate::types::{ScorePair, Side};

/// What a single fold step changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointEffect {
    /// Point arrived after the match was over and was not counted
    pub ignored: bool,
    pub game_won: Option<Side>,
    pub set_won: Option<Side>,
    pub match_won: Option<Side>,
}

impl PointEffect {
    fn ignored() -> Self {
        Self {
            ignored: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    /// Completed sets in games, or tiebreak points for a super-tiebreak set
    pub sets: Vec<ScorePair>,
    pub current_games: ScorePair,
    /// Points in the regular game in progress (unused while `is_tiebreak`)
    pub current_points: ScorePair,
    pub is_tiebreak: bool,
    pub tiebreak_points: ScorePair,
    /// Points target of the active tiebreak
    pub tiebreak_target: Option<u32>,
    /// The set in progress is one super tiebreak
    pub is_super_tiebreak: bool,
    /// The set in progress decides the match
    pub is_deciding_set: bool,
    pub initial_tiebreak_server: Option<Side>,
    /// Server of the first point of the match
    pub starting_server: Option<Side>,
    /// Server of the most recent counted point
    pub last_server: Option<Side>,
    /// Completed games across the whole match, tiebreaks included
    pub games_played: u32,
    /// Points counted by the fold
    pub points_played: u32,
    pub winner: Option<Side>,
}

impl ScoreState {
    /// Empty state, without format-derived fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state for `format`, with the deciding-set fields already derived.
    ///
    /// In a one-set match with a super final set this already enters the
    /// match tiebreak.
    pub fn start(format: &MatchFormat) -> Self {
        let mut state = Self::new();
        state.refresh_derived(format);
        state
    }

    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    pub fn sets_won(&self) -> ScorePair {
        rules::sets_won(&self.sets)
    }

    /// 1-indexed number of the set in progress (or the last set once complete)
    pub fn set_number(&self) -> u32 {
        if self.is_complete() {
            self.sets.len() as u32
        } else {
            self.sets.len() as u32 + 1
        }
    }

    /// 1-indexed number of the game in progress within its set
    pub fn game_in_set(&self) -> u32 {
        self.current_games.total() + 1
    }

    /// Points of the game in progress, whichever counter is active
    pub fn active_points(&self) -> ScorePair {
        if self.is_tiebreak {
            self.tiebreak_points
        } else {
            self.current_points
        }
    }

    /// Who serves the next point.
    ///
    /// Needs a known starting server. Once the match is over this is the
    /// last-known server rather than a prediction.
    pub fn next_server(&self) -> Option<Side> {
        if self.is_complete() {
            return self.last_server;
        }
        if self.is_tiebreak {
            if let Some(initial) = self.initial_tiebreak_server {
                return Some(tiebreak_server(self.tiebreak_points.total(), initial));
            }
        }
        self.starting_server
            .map(|start| regular_game_server(self.games_played + 1, start))
    }

    /// Fold one point into the state.
    pub fn apply_point(&mut self, format: &MatchFormat, point: &PointRecord) -> PointEffect {
        if let Some(winner) = self.winner {
            debug!(
                ?winner,
                set = point.set_number,
                game = point.game_number,
                "point after match completion ignored"
            );
            return PointEffect::ignored();
        }

        self.refresh_derived(format);
        self.check_contract(point);

        if self.starting_server.is_none() {
            self.starting_server = Some(point.server);
        }
        if self.is_tiebreak && self.initial_tiebreak_server.is_none() {
            self.initial_tiebreak_server = Some(point.server);
        }
        self.points_played += 1;
        self.last_server = Some(point.server);

        let mut effect = PointEffect::default();
        let game_winner = if self.is_tiebreak {
            self.tiebreak_points.increment(point.winner);
            let target = self
                .tiebreak_target
                .unwrap_or_else(|| rules::tiebreak_target(format, self.is_deciding_set));
            rules::is_tiebreak_won(self.tiebreak_points.0, self.tiebreak_points.1, target)
        } else {
            self.current_points.increment(point.winner);
            rules::is_game_won(self.current_points.0, self.current_points.1, format.no_ad)
        };

        if let Some(side) = game_winner {
            effect.game_won = Some(side);
            self.complete_game(format, side, &mut effect);
        }
        effect
    }

    fn complete_game(&mut self, format: &MatchFormat, side: Side, effect: &mut PointEffect) {
        self.games_played += 1;

        let finished_set = if self.is_super_tiebreak {
            // The tiebreak score itself is the set score
            Some(self.tiebreak_points)
        } else {
            self.current_games.increment(side);
            let games = self.current_games;
            rules::is_set_won(games.0, games.1, format, self.is_deciding_set).map(|_| games)
        };

        self.current_points = ScorePair::ZERO;
        self.tiebreak_points = ScorePair::ZERO;
        self.is_tiebreak = false;
        self.is_super_tiebreak = false;
        self.tiebreak_target = None;
        self.initial_tiebreak_server = None;

        match finished_set {
            Some(set_score) => {
                self.sets.push(set_score);
                self.current_games = ScorePair::ZERO;
                effect.set_won = Some(side);
                debug!(set = self.sets.len(), ?set_score, winner = ?side, "set complete");

                if let Some(winner) = rules::is_match_won(&self.sets, format) {
                    self.winner = Some(winner);
                    effect.match_won = Some(winner);
                    debug!(?winner, sets = ?self.sets, "match complete");
                    return;
                }
                self.refresh_derived(format);
            }
            None => {
                let games = self.current_games;
                if rules::should_enter_tiebreak(games.0, games.1, format, self.is_deciding_set) {
                    self.enter_tiebreak(rules::tiebreak_target(format, self.is_deciding_set));
                }
            }
        }
    }

    /// Recompute the deciding-set flag and activate a super tiebreak at the
    /// start of a deciding super set. Idempotent.
    fn refresh_derived(&mut self, format: &MatchFormat) {
        if self.is_complete() {
            self.is_deciding_set = false;
            return;
        }
        self.is_deciding_set = rules::is_deciding_set_after(&self.sets, format);

        let set_not_started = self.current_games.is_zero() && self.current_points.is_zero();
        if !self.is_tiebreak
            && set_not_started
            && rules::is_super_tiebreak_set(format, self.is_deciding_set)
        {
            self.enter_tiebreak(format.super_tiebreak_target());
            self.is_super_tiebreak = true;
        }
    }

    fn enter_tiebreak(&mut self, target: u32) {
        self.is_tiebreak = true;
        self.tiebreak_points = ScorePair::ZERO;
        self.tiebreak_target = Some(target);
        // Unknown before the first point of a match; filled in from that point
        self.initial_tiebreak_server = self
            .starting_server
            .map(|start| regular_game_server(self.games_played + 1, start));
    }

    /// Log (or, with `strict_contracts`, panic on) point metadata that
    /// disagrees with the replayed state. Never repaired.
    fn check_contract(&self, point: &PointRecord) {
        let mut problems = Vec::new();
        if point.set_number != self.set_number() {
            problems.push(format!(
                "set number {} but replay is in set {}",
                point.set_number,
                self.set_number()
            ));
        }
        if point.is_tiebreak_point != self.is_tiebreak {
            problems.push(format!(
                "tiebreak flag {} but replay tiebreak is {}",
                point.is_tiebreak_point, self.is_tiebreak
            ));
        }
        if problems.is_empty() {
            return;
        }
        if cfg!(feature = "strict_contracts") {
            panic!("point log contract violation: {}", problems.join("; "));
        }
        warn!(
            point = self.points_played + 1,
            problems = %problems.join("; "),
            "point log disagrees with replayed score"
        );
    }

    /// SHA-256 over the canonical JSON form, hex encoded.
    pub fn digest(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let hash = Sha256::digest(&canonical);
        hash.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

/// Replay `points` in order from an empty state.
///
/// Points after the match is decided are ignored.
pub fn compute_score(format: &MatchFormat, points: &[PointRecord]) -> ScoreState {
    points.iter().fold(ScoreState::start(format), |mut state, point| {
        state.apply_point(format, point);
        state
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FinalSetTiebreak;
    use crate::test_fixtures::{game, games, play, tiebreak_points};

    const A: Side = Side::SideA;
    const B: Side = Side::SideB;

    #[test]
    fn test_empty_log() {
        let format = MatchFormat::best_of(3);
        let state = compute_score(&format, &[]);
        assert_eq!(state, ScoreState::start(&format));
        assert!(state.sets.is_empty());
        assert!(!state.is_tiebreak);
        assert_eq!(state.next_server(), None);
    }

    #[test]
    fn test_points_accumulate_in_game() {
        let format = MatchFormat::best_of(3);
        let points = play(&format, A, &[A, B, A]);
        let state = compute_score(&format, &points);
        assert_eq!(state.current_points, ScorePair(2, 1));
        assert_eq!(state.current_games, ScorePair::ZERO);
        assert_eq!(state.points_played, 3);
        assert_eq!(state.starting_server, Some(A));
    }

    #[test]
    fn test_game_completion_resets_points() {
        let format = MatchFormat::best_of(3);
        let points = play(&format, A, &game(B));
        let state = compute_score(&format, &points);
        assert_eq!(state.current_games, ScorePair(0, 1));
        assert_eq!(state.current_points, ScorePair::ZERO);
        assert_eq!(state.games_played, 1);
        assert_eq!(state.next_server(), Some(B));
    }

    #[test]
    fn test_deuce_game() {
        let format = MatchFormat::best_of(3);
        let winners = [A, A, A, B, B, B, A, B, B, B];
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.current_games, ScorePair(0, 1));
    }

    #[test]
    fn test_no_ad_deciding_point() {
        let format = MatchFormat::best_of(3).with_no_ad(true);
        let winners = [A, A, A, B, B, B, A];
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.current_games, ScorePair(1, 0));
    }

    #[test]
    fn test_set_completion() {
        let format = MatchFormat::best_of(3);
        let mut winners = games(A, 4);
        winners.extend(games(B, 2));
        winners.extend(games(A, 2));
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.sets, vec![ScorePair(6, 2)]);
        assert_eq!(state.current_games, ScorePair::ZERO);
        assert_eq!(state.games_played, 8);
        assert!(!state.is_deciding_set);
    }

    #[test]
    fn test_tiebreak_entry_and_win() {
        let format = MatchFormat::best_of(3);
        let mut winners = Vec::new();
        for _ in 0..6 {
            winners.extend(game(A));
            winners.extend(game(B));
        }
        let points = play(&format, A, &winners);
        let state = compute_score(&format, &points);
        assert!(state.is_tiebreak);
        assert_eq!(state.tiebreak_target, Some(7));
        assert_eq!(state.current_games, ScorePair(6, 6));
        // Game 13 of the match: A started, so A opens the tiebreak
        assert_eq!(state.initial_tiebreak_server, Some(A));

        winners.extend(tiebreak_points(B, 7, 5));
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.sets, vec![ScorePair(6, 7)]);
        assert!(!state.is_tiebreak);
        assert_eq!(state.tiebreak_target, None);
        // The side that received first in the tiebreak serves first in set 2
        assert_eq!(state.next_server(), Some(B));
    }

    #[test]
    fn test_tiebreak_disabled_plays_on() {
        let format = MatchFormat::best_of(3).with_tiebreaks(false);
        let mut winners = Vec::new();
        for _ in 0..6 {
            winners.extend(game(A));
            winners.extend(game(B));
        }
        winners.extend(games(A, 2));
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.sets, vec![ScorePair(8, 6)]);
    }

    #[test]
    fn test_super_tiebreak_deciding_set() {
        let format = MatchFormat::best_of(3).with_super_tiebreak_at(10);
        let mut winners = games(A, 6);
        winners.extend(games(B, 6));
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.sets, vec![ScorePair(6, 0), ScorePair(0, 6)]);
        assert!(state.is_deciding_set);
        assert!(state.is_tiebreak);
        assert!(state.is_super_tiebreak);
        assert_eq!(state.tiebreak_target, Some(10));
        assert_eq!(state.current_games, ScorePair::ZERO);

        winners.extend(tiebreak_points(A, 10, 8));
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(
            state.sets,
            vec![ScorePair(6, 0), ScorePair(0, 6), ScorePair(10, 8)]
        );
        assert_eq!(state.winner, Some(A));
        assert!(!state.is_tiebreak);
        assert!(!state.is_super_tiebreak);
    }

    #[test]
    fn test_super_tiebreak_extends_past_target() {
        let format = MatchFormat::best_of(3).with_super_tiebreak_at(10);
        let mut winners = games(A, 6);
        winners.extend(games(B, 6));
        winners.extend(tiebreak_points(B, 12, 10));
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.sets.last(), Some(&ScorePair(10, 12)));
        assert_eq!(state.winner, Some(B));
    }

    #[test]
    fn test_one_set_match_tiebreak_starts_immediately() {
        let format = MatchFormat::best_of(1).with_final_set(FinalSetTiebreak::Super);
        let state = ScoreState::start(&format);
        assert!(state.is_tiebreak);
        assert!(state.is_super_tiebreak);
        assert_eq!(state.initial_tiebreak_server, None);

        let points = play(&format, B, &tiebreak_points(A, 10, 3));
        let state = compute_score(&format, &points);
        assert_eq!(state.sets, vec![ScorePair(10, 3)]);
        assert_eq!(state.winner, Some(A));
    }

    #[test]
    fn test_advantage_final_set() {
        let format = MatchFormat::best_of(3).with_final_set(FinalSetTiebreak::None);
        let mut winners = games(A, 6);
        winners.extend(games(B, 6));
        for _ in 0..6 {
            winners.extend(game(A));
            winners.extend(game(B));
        }
        let state = compute_score(&format, &play(&format, A, &winners));
        assert!(!state.is_tiebreak);
        assert_eq!(state.current_games, ScorePair(6, 6));
        winners.extend(games(B, 2));
        let state = compute_score(&format, &play(&format, A, &winners));
        assert_eq!(state.sets.last(), Some(&ScorePair(6, 8)));
        assert_eq!(state.winner, Some(B));
    }

    #[test]
    fn test_points_after_match_ignored() {
        let format = MatchFormat::best_of(1);
        let winners = games(A, 6);
        let mut points = play(&format, A, &winners);
        let finished = compute_score(&format, &points);
        assert_eq!(finished.winner, Some(A));

        let extra = points[0].clone();
        let mut state = finished.clone();
        let effect = state.apply_point(&format, &extra);
        assert!(effect.ignored);
        assert_eq!(state, finished);

        points.push(extra);
        assert_eq!(compute_score(&format, &points), finished);
    }

    #[test]
    fn test_next_server_after_completion_is_last_known() {
        let format = MatchFormat::best_of(1);
        let points = play(&format, A, &games(A, 6));
        let state = compute_score(&format, &points);
        assert_eq!(state.next_server(), points.last().map(|p| p.server));
    }

    #[test]
    fn test_incremental_equals_replay() {
        let format = MatchFormat::best_of(3).with_super_tiebreak_at(10);
        let mut winners = games(A, 5);
        winners.extend(games(B, 7));
        winners.extend(tiebreak_points(A, 10, 6));
        let points = play(&format, B, &winners);

        let mut incremental = ScoreState::start(&format);
        for (k, point) in points.iter().enumerate() {
            incremental.apply_point(&format, point);
            assert_eq!(incremental, compute_score(&format, &points[..=k]), "prefix {k}");
        }
    }

    #[test]
    fn test_digest_is_stable() {
        let format = MatchFormat::best_of(3);
        let points = play(&format, A, &games(B, 3));
        let first = compute_score(&format, &points).digest();
        let second = compute_score(&format, &points).digest();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_ne!(first, ScoreState::new().digest());
    }
}
