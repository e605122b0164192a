//! Game / set / tiebreak rules
//!
//! Pure decision functions. Each one answers a single question about a
//! score and never looks at anything but its arguments.
//!
//! ## Deciding-set context
//!
//! Whether the set in play is the deciding set changes two answers: which
//! tiebreak flag applies (`tiebreak_enabled` vs `final_set_tiebreak`) and the
//! tiebreak target (7 vs the super target). Callers pass it explicitly as
//! `deciding`, computed from the completed sets with [`is_deciding_set`].

use crate::format::{FinalSetTiebreak, MatchFormat, STANDARD_TIEBREAK_TARGET};
use crate::types::{ScorePair, Side};

// ============================================================================
// Games
// ============================================================================

/// Winner of a regular game, if it is over.
///
/// No-ad: first to 4 points while ahead. Ad: at least 4 points and a 2-point lead.
pub fn is_game_won(points_a: u32, points_b: u32, no_ad: bool) -> Option<Side> {
    let margin = if no_ad { 1 } else { 2 };
    if points_a >= 4 && points_a >= points_b + margin {
        Some(Side::SideA)
    } else if points_b >= 4 && points_b >= points_a + margin {
        Some(Side::SideB)
    } else {
        None
    }
}

/// Winner of a tiebreak to `target`, win by 2.
pub fn is_tiebreak_won(points_a: u32, points_b: u32, target: u32) -> Option<Side> {
    if points_a >= target && points_a >= points_b + 2 {
        Some(Side::SideA)
    } else if points_b >= target && points_b >= points_a + 2 {
        Some(Side::SideB)
    } else {
        None
    }
}

// ============================================================================
// Sets
// ============================================================================

/// Whether the set in question is decided by a tiebreak at all
fn set_uses_tiebreak(format: &MatchFormat, deciding: bool) -> bool {
    if deciding {
        !matches!(format.final_set_tiebreak, FinalSetTiebreak::None)
    } else {
        format.tiebreak_enabled
    }
}

/// True at `target-target` games when the set in question plays a tiebreak.
pub fn should_enter_tiebreak(games_a: u32, games_b: u32, format: &MatchFormat, deciding: bool) -> bool {
    let target = format.games_per_set();
    games_a == target && games_b == target && set_uses_tiebreak(format, deciding)
}

/// Winner of a set decided in games, if it is over.
///
/// Either `target` games with a 2-game lead, or `target+1 : target` after a
/// tiebreak in a set that plays one.
pub fn is_set_won(games_a: u32, games_b: u32, format: &MatchFormat, deciding: bool) -> Option<Side> {
    let target = format.games_per_set();
    if games_a >= target && games_a >= games_b + 2 {
        return Some(Side::SideA);
    }
    if games_b >= target && games_b >= games_a + 2 {
        return Some(Side::SideB);
    }
    if set_uses_tiebreak(format, deciding) {
        if games_a == target + 1 && games_b == target {
            return Some(Side::SideA);
        }
        if games_b == target + 1 && games_a == target {
            return Some(Side::SideB);
        }
    }
    None
}

/// Sets won by each side in a list of completed set scores
pub fn sets_won(completed_sets: &[ScorePair]) -> ScorePair {
    completed_sets
        .iter()
        .filter_map(ScorePair::leader)
        .fold(ScorePair::ZERO, |mut won, side| {
            won.increment(side);
            won
        })
}

// ============================================================================
// Match
// ============================================================================

/// True when both sides are exactly one set short: the next set decides the match.
pub fn is_deciding_set(sets_won_a: u32, sets_won_b: u32, format: &MatchFormat) -> bool {
    let one_short = format.sets_needed().saturating_sub(1);
    sets_won_a == one_short && sets_won_b == one_short
}

/// Deciding-set check straight from completed set scores
pub fn is_deciding_set_after(completed_sets: &[ScorePair], format: &MatchFormat) -> bool {
    let won = sets_won(completed_sets);
    is_deciding_set(won.0, won.1, format)
}

/// Match winner, if a side has taken `ceil(sets_to_play / 2)` sets.
pub fn is_match_won(completed_sets: &[ScorePair], format: &MatchFormat) -> Option<Side> {
    let won = sets_won(completed_sets);
    let needed = format.sets_needed();
    if won.0 >= needed {
        Some(Side::SideA)
    } else if won.1 >= needed {
        Some(Side::SideB)
    } else {
        None
    }
}

// ============================================================================
// Tiebreak mode
// ============================================================================

/// Whether the set in question is played as one super tiebreak.
pub fn is_super_tiebreak_set(format: &MatchFormat, deciding: bool) -> bool {
    deciding && format.has_super_tiebreak()
}

/// Points target of a tiebreak in the set in question.
pub fn tiebreak_target(format: &MatchFormat, deciding: bool) -> u32 {
    if is_super_tiebreak_set(format, deciding) {
        format.super_tiebreak_target()
    } else {
        STANDARD_TIEBREAK_TARGET
    }
}
