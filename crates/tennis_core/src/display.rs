//! Text rendering of scores
//!
//! Strings for scoreboards and logs. Nothing here feeds back into scoring.

use crate::score::ScoreState;
use crate::types::{ScorePair, Side};

const AD_POINTS: [&str; 4] = ["0", "15", "30", "40"];
const NO_AD_POINTS: [&str; 4] = ["0", "1", "2", "3+"];

/// Regular-game score from side A's perspective: `"15-30"`, `"Deuce"`,
/// `"Ad-40"`, `"40-Ad"`; no-ad games count `0 1 2 3+`.
pub fn game_score_display(points_a: u32, points_b: u32, no_ad: bool) -> String {
    if no_ad {
        if points_a >= 4 && points_a > points_b {
            return game_for(Side::SideA);
        }
        if points_b >= 4 && points_b > points_a {
            return game_for(Side::SideB);
        }
        return format!(
            "{}-{}",
            NO_AD_POINTS[points_a.min(3) as usize],
            NO_AD_POINTS[points_b.min(3) as usize]
        );
    }

    if points_a >= 3 && points_b >= 3 {
        return match points_a.cmp(&points_b) {
            std::cmp::Ordering::Equal => "Deuce".to_string(),
            std::cmp::Ordering::Greater if points_a > points_b + 1 => game_for(Side::SideA),
            std::cmp::Ordering::Greater => "Ad-40".to_string(),
            std::cmp::Ordering::Less if points_b > points_a + 1 => game_for(Side::SideB),
            std::cmp::Ordering::Less => "40-Ad".to_string(),
        };
    }
    if points_a >= 4 {
        return game_for(Side::SideA);
    }
    if points_b >= 4 {
        return game_for(Side::SideB);
    }
    format!(
        "{}-{}",
        AD_POINTS[points_a as usize],
        AD_POINTS[points_b as usize]
    )
}

fn game_for(side: Side) -> String {
    format!("Game {}", side.label())
}

/// Tiebreak points are shown as plain numbers.
pub fn tiebreak_display(points_a: u32, points_b: u32) -> String {
    format!("{points_a}-{points_b}")
}

/// `"6-4, 3-6, 7-6"`
pub fn format_final_score(sets: &[ScorePair]) -> String {
    sets.iter()
        .map(|set| format!("{}-{}", set.0, set.1))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ScoreState {
    /// One-line scoreboard.
    ///
    /// Completed match: the final score. In progress: completed sets, the
    /// games of the current set, then the game score in parentheses or the
    /// tiebreak score in brackets. A super-tiebreak set shows only brackets.
    pub fn scoreline(&self, no_ad: bool) -> String {
        if self.is_complete() {
            return format_final_score(&self.sets);
        }
        let mut parts: Vec<String> = self
            .sets
            .iter()
            .map(|set| format!("{}-{}", set.0, set.1))
            .collect();

        let current = if self.is_super_tiebreak {
            format!(
                "[{}]",
                tiebreak_display(self.tiebreak_points.0, self.tiebreak_points.1)
            )
        } else if self.is_tiebreak {
            format!(
                "{}-{} [{}]",
                self.current_games.0,
                self.current_games.1,
                tiebreak_display(self.tiebreak_points.0, self.tiebreak_points.1)
            )
        } else {
            format!(
                "{}-{} ({})",
                self.current_games.0,
                self.current_games.1,
                game_score_display(self.current_points.0, self.current_points.1, no_ad)
            )
        };
        parts.push(current);
        parts.join(", ")
    }
}
