//! Live point recorder
//!
//! Helper for the collaborator that appends points to a match log. It
//! derives every scoring field of the next `PointRecord` (server, set and
//! game numbers, tiebreak flag) from the replayed state, so the log it
//! produces always satisfies the replay contract.
//!
//! ## Usage
//! ```rust
//! use tennis_core::format::MatchFormat;
//! use tennis_core::recorder::MatchRecorder;
//! use tennis_core::types::Side;
//!
//! let mut recorder = MatchRecorder::new(MatchFormat::best_of(3), Side::SideA);
//! for _ in 0..4 {
//!     recorder.record(Side::SideA).unwrap();
//! }
//! assert_eq!(recorder.state().current_games.0, 1);
//! assert_eq!(recorder.log().len(), 4);
//! ```

use tracing::info;

use crate::error::{Result, ScoreError};
use crate::format::MatchFormat;
use crate::point::{MatchRecord, PointMetadata, PointRecord};
use crate::score::{PointEffect, ScoreState};
use crate::types::Side;

#[derive(Debug, Clone)]
pub struct MatchRecorder {
    format: MatchFormat,
    starting_server: Side,
    state: ScoreState,
    log: Vec<PointRecord>,
}

impl MatchRecorder {
    pub fn new(format: MatchFormat, starting_server: Side) -> Self {
        let state = ScoreState::start(&format);
        Self {
            format,
            starting_server,
            state,
            log: Vec::new(),
        }
    }

    /// Resume from a stored record. The first logged server is the starting server.
    pub fn resume(record: MatchRecord, fallback_server: Side) -> Self {
        let starting_server = record
            .point_log
            .first()
            .map(|point| point.server)
            .unwrap_or(fallback_server);
        let state = crate::score::compute_score(&record.match_format, &record.point_log);
        Self {
            format: record.match_format,
            starting_server,
            state,
            log: record.point_log,
        }
    }

    pub fn format(&self) -> &MatchFormat {
        &self.format
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn log(&self) -> &[PointRecord] {
        &self.log
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Server of the next point
    pub fn next_server(&self) -> Side {
        self.state.next_server().unwrap_or(self.starting_server)
    }

    /// The record that `record(winner)` would append
    pub fn next_point(&self, winner: Side) -> PointRecord {
        let mut point = PointRecord::new(
            winner,
            self.next_server(),
            self.state.set_number(),
            self.state.game_in_set(),
        );
        point.is_tiebreak_point = self.state.is_tiebreak;
        point.point_number = Some(self.log.len() as u32 + 1);
        point
    }

    pub fn record(&mut self, winner: Side) -> Result<PointEffect> {
        self.record_with(winner, PointMetadata::default())
    }

    /// Append a point won by `winner`. Rejected once the match is decided.
    pub fn record_with(&mut self, winner: Side, metadata: PointMetadata) -> Result<PointEffect> {
        if let Some(match_winner) = self.state.winner {
            return Err(ScoreError::MatchComplete {
                winner: match_winner,
                point_number: self.log.len() as u32 + 1,
            });
        }
        let point = self.next_point(winner).with_metadata(metadata);
        let effect = self.state.apply_point(&self.format, &point);
        self.log.push(point);
        if let Some(match_winner) = effect.match_won {
            info!(winner = ?match_winner, points = self.log.len(), "match recorded to completion");
        }
        Ok(effect)
    }

    pub fn into_record(self) -> MatchRecord {
        MatchRecord::new(self.format, self.log)
    }
}
