//! Shared builders for point-log tests.

use crate::format::MatchFormat;
use crate::point::PointRecord;
use crate::recorder::MatchRecorder;
use crate::types::Side;

/// Four straight points: a love game for `side`
pub fn game(side: Side) -> Vec<Side> {
    vec![side; 4]
}

/// `count` love games for `side`
pub fn games(side: Side, count: usize) -> Vec<Side> {
    (0..count).flat_map(|_| game(side)).collect()
}

/// Tiebreak won `won-lost` by `side`, never decided before its last point.
pub fn tiebreak_points(side: Side, won: u32, lost: u32) -> Vec<Side> {
    assert!(won >= lost + 2, "tiebreak must be won by two");
    let mut winners = Vec::new();
    for _ in 0..lost {
        winners.push(side);
        winners.push(side.opponent());
    }
    winners.extend(std::iter::repeat(side).take((won - lost) as usize));
    winners
}

/// Record `winners` as a well-formed point log.
pub fn play(format: &MatchFormat, starting_server: Side, winners: &[Side]) -> Vec<PointRecord> {
    let mut recorder = MatchRecorder::new(format.clone(), starting_server);
    for winner in winners {
        recorder
            .record(*winner)
            .expect("fixture points must end at or before match completion");
    }
    recorder.log().to_vec()
}
