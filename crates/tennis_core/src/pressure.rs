//! Pressure detection (break point / set point / match point)
//!
//! Every detector works by simulation: "if this side wins the next point,
//! does that end the game / set / match?" The answers are derived purely
//! from the score, so they are recomputed per point and never stored.
//!
//! ## Rules of thumb
//! - Break point is a regular-game concept; it never applies in a tiebreak.
//! - Under ad scoring deuce (40-40) is not a break/set/match point: the
//!   next point only produces an advantage.
//! - Past match completion every detector reports no pressure.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::MatchFormat;
use crate::rules;
use crate::score::ScoreState;
use crate::types::{ScorePair, Side};

const SIDES: [Side; 2] = [Side::SideA, Side::SideB];

// ============================================================================
// Detectors
// ============================================================================

/// Whether the returner is one point from breaking serve.
///
/// Ad scoring: returner at 40 with the server at 30 or less, or returner
/// holding advantage. No-ad: returner at 40 and not behind.
pub fn is_break_point(server_points: u32, returner_points: u32, no_ad: bool) -> bool {
    if no_ad {
        return returner_points == 3 && returner_points >= server_points;
    }
    (returner_points == 3 && server_points <= 2)
        || (returner_points >= 4 && returner_points == server_points + 1)
}

/// Whether `side` wins the regular game in progress by winning the next point.
pub fn has_game_point(side: Side, points: ScorePair, no_ad: bool) -> bool {
    let next = points.plus_one(side);
    rules::is_game_won(points.0, points.1, no_ad).is_none()
        && rules::is_game_won(next.0, next.1, no_ad) == Some(side)
}

/// Side one point from taking the regular game in progress.
///
/// At the no-ad deciding point both sides qualify; the server is reported.
pub fn game_point_for(points: ScorePair, server: Side, no_ad: bool) -> Option<Side> {
    [server, server.opponent()]
        .into_iter()
        .find(|side| has_game_point(*side, points, no_ad))
}

fn wins_set_with_next_point(
    side: Side,
    games: ScorePair,
    points: ScorePair,
    format: &MatchFormat,
    is_tiebreak: bool,
    deciding: bool,
) -> bool {
    if is_tiebreak {
        let target = rules::tiebreak_target(format, deciding);
        let next = points.plus_one(side);
        return rules::is_tiebreak_won(points.0, points.1, target).is_none()
            && rules::is_tiebreak_won(next.0, next.1, target) == Some(side);
    }
    if !has_game_point(side, points, format.no_ad) {
        return false;
    }
    let next_games = games.plus_one(side);
    rules::is_set_won(next_games.0, next_games.1, format, deciding) == Some(side)
}

/// Side at set point, if any.
///
/// In a tiebreak `points` are tiebreak points; otherwise they are the points
/// of the regular game and `games` the games of the set in progress.
pub fn is_set_point(
    games: ScorePair,
    points: ScorePair,
    format: &MatchFormat,
    is_tiebreak: bool,
    completed_sets: &[ScorePair],
) -> Option<Side> {
    if rules::is_match_won(completed_sets, format).is_some() {
        return None;
    }
    let deciding = rules::is_deciding_set_after(completed_sets, format);
    SIDES
        .into_iter()
        .find(|side| wins_set_with_next_point(*side, games, points, format, is_tiebreak, deciding))
}

/// Side at match point, if any: a set point for a side one set from the match.
pub fn is_match_point(
    games: ScorePair,
    points: ScorePair,
    completed_sets: &[ScorePair],
    format: &MatchFormat,
    is_tiebreak: bool,
) -> Option<Side> {
    let won = rules::sets_won(completed_sets);
    let one_short = format.sets_needed().saturating_sub(1);
    if won.0 != one_short && won.1 != one_short {
        return None;
    }
    is_set_point(games, points, format, is_tiebreak, completed_sets)
        .filter(|side| won.get(*side) == one_short)
}

// ============================================================================
// Snapshot
// ============================================================================

/// Badge shown next to a point, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Badge {
    #[serde(rename = "MP")]
    MatchPoint,
    #[serde(rename = "SP")]
    SetPoint,
    #[serde(rename = "BP")]
    BreakPoint,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::MatchPoint => "MP",
            Badge::SetPoint => "SP",
            Badge::BreakPoint => "BP",
        }
    }
}

/// All pressure flags for one score situation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pressure {
    /// Returning side that can break serve
    pub break_point: Option<Side>,
    pub set_point: Option<Side>,
    pub match_point: Option<Side>,
}

impl Pressure {
    pub fn none() -> Self {
        Self::default()
    }

    /// Pressure on the next point of `state`.
    ///
    /// `server` overrides the rotation-derived server (e.g. the server
    /// recorded on the point). Break point needs a known server.
    pub fn of_state(state: &ScoreState, format: &MatchFormat, server: Option<Side>) -> Self {
        if state.is_complete() {
            return Self::none();
        }
        let points = state.active_points();
        let break_point = match server.or_else(|| state.next_server()) {
            Some(server) if !state.is_tiebreak => {
                let (server_points, returner_points) = points.oriented(server);
                is_break_point(server_points, returner_points, format.no_ad)
                    .then(|| server.opponent())
            }
            _ => None,
        };
        Self {
            break_point,
            set_point: is_set_point(
                state.current_games,
                points,
                format,
                state.is_tiebreak,
                &state.sets,
            ),
            match_point: is_match_point(
                state.current_games,
                points,
                &state.sets,
                format,
                state.is_tiebreak,
            ),
        }
    }

    /// Single badge to display: MP over SP over BP
    pub fn badge(&self) -> Option<Badge> {
        if self.match_point.is_some() {
            Some(Badge::MatchPoint)
        } else if self.set_point.is_some() {
            Some(Badge::SetPoint)
        } else if self.break_point.is_some() {
            Some(Badge::BreakPoint)
        } else {
            None
        }
    }

    pub fn is_none(&self) -> bool {
        self.badge().is_none()
    }
}
