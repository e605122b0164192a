//! Property-based test generators for formats and point logs
//!
//! Point logs are produced through `MatchRecorder`, so every generated log
//! is well-formed (servers, set/game numbers and tiebreak flags agree with
//! the replay). Random winner sequences drive the variety.

use proptest::prelude::*;

use crate::format::{FinalSetTiebreak, MatchFormat};
use crate::point::PointRecord;
use crate::recorder::MatchRecorder;
use crate::types::Side;

pub fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::SideA), Just(Side::SideB)]
}

pub fn final_set_strategy() -> impl Strategy<Value = FinalSetTiebreak> {
    prop_oneof![
        Just(FinalSetTiebreak::None),
        Just(FinalSetTiebreak::Standard),
        Just(FinalSetTiebreak::Super),
    ]
}

pub fn match_format_strategy() -> impl Strategy<Value = MatchFormat> {
    (
        prop_oneof![Just(1u32), Just(3u32), Just(5u32)],
        any::<bool>(),                   // no_ad
        any::<bool>(),                   // tiebreak_enabled
        final_set_strategy(),
        proptest::option::of(7u32..=12), // super tiebreak target
        any::<bool>(),                   // short_sets
    )
        .prop_map(|(sets, no_ad, tiebreaks, final_set, target, short_sets)| {
            let format = MatchFormat::best_of(sets)
                .with_no_ad(no_ad)
                .with_tiebreaks(tiebreaks)
                .with_final_set(final_set)
                .with_short_sets(short_sets);
            match (final_set, target) {
                (FinalSetTiebreak::Super, Some(target)) => format.with_super_tiebreak_at(target),
                _ => format,
            }
        })
}

/// Winner sequence; long enough to finish most short-set and one-set matches.
pub fn winners_strategy(max_points: usize) -> impl Strategy<Value = Vec<Side>> {
    prop::collection::vec(side_strategy(), 0..max_points)
}

/// Record `winners` until the match is decided; extra winners are dropped.
pub fn record_points(format: &MatchFormat, starting_server: Side, winners: &[Side]) -> Vec<PointRecord> {
    let mut recorder = MatchRecorder::new(format.clone(), starting_server);
    for winner in winners {
        if recorder.record(*winner).is_err() {
            break;
        }
    }
    recorder.log().to_vec()
}

pub fn match_strategy() -> impl Strategy<Value = (MatchFormat, Vec<PointRecord>)> {
    (match_format_strategy(), side_strategy(), winners_strategy(400)).prop_map(
        |(format, starting_server, winners)| {
            let points = record_points(&format, starting_server, &winners);
            (format, points)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;
    use crate::score::{compute_score, ScoreState};
    use crate::timeline::annotate;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_generated_formats_validate(format in match_format_strategy()) {
            prop_assert!(format.validate().is_ok());
        }

        #[test]
        fn test_replay_is_deterministic((format, points) in match_strategy()) {
            let first = compute_score(&format, &points);
            let second = compute_score(&format, &points);
            prop_assert_eq!(first.digest(), second.digest());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_incremental_fold_matches_prefix_replay((format, points) in match_strategy()) {
            let mut state = ScoreState::start(&format);
            for (k, point) in points.iter().enumerate() {
                state.apply_point(&format, point);
                if k % 17 == 0 || k + 1 == points.len() {
                    prop_assert_eq!(&state, &compute_score(&format, &points[..=k]));
                }
            }
        }

        #[test]
        fn test_completed_sets_are_legal((format, points) in match_strategy()) {
            let state = compute_score(&format, &points);
            for (i, set) in state.sets.iter().enumerate() {
                let deciding = rules::is_deciding_set_after(&state.sets[..i], &format);
                let winner = if rules::is_super_tiebreak_set(&format, deciding) {
                    rules::is_tiebreak_won(set.0, set.1, format.super_tiebreak_target())
                } else {
                    rules::is_set_won(set.0, set.1, &format, deciding)
                };
                prop_assert!(winner.is_some(), "set {} {:?} is not a finished set", i + 1, set);
            }
            let won = state.sets_won();
            prop_assert!(won.0 <= format.sets_needed() && won.1 <= format.sets_needed());
            prop_assert_eq!(state.winner, rules::is_match_won(&state.sets, &format));
        }

        #[test]
        fn test_points_after_completion_change_nothing(
            (format, points) in match_strategy(),
            extra in winners_strategy(8),
        ) {
            let state = compute_score(&format, &points);
            prop_assume!(state.is_complete());
            let mut extended = points.clone();
            for winner in extra {
                let mut point = PointRecord::new(winner, winner, state.set_number(), 1);
                point.point_number = Some(extended.len() as u32 + 1);
                extended.push(point);
            }
            prop_assert_eq!(compute_score(&format, &extended), state);
        }

        #[test]
        fn test_pressure_flags_are_consistent((format, points) in match_strategy()) {
            for annotation in annotate(&format, &points) {
                let pressure = annotation.pressure_after;
                if let Some(side) = pressure.match_point {
                    prop_assert_eq!(pressure.set_point, Some(side));
                }
                if annotation.score_after.is_tiebreak {
                    prop_assert!(pressure.break_point.is_none());
                }
                if annotation.is_match_winning {
                    prop_assert!(pressure.is_none());
                }
                prop_assert!(annotation.server_matches);
            }
        }
    }
}
