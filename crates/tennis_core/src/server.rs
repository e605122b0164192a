//! Server rotation
//!
//! Serve alternates every game across the whole match, tiebreaks included
//! (a tiebreak counts as one game). Rotation never resets at a set boundary,
//! so the side that served second in a set serves first in the next one.
//!
//! Inside a tiebreak the first point is served by the side whose turn it is,
//! then serve changes after point 1 and every two points after that:
//!
//! ```text
//! point index : 0 | 1 2 | 3 4 | 5 6 | ...
//! server      : S | R R | S S | R R | ...
//! ```

use crate::types::Side;

/// Server of a regular game, by match-wide 1-indexed game number.
pub fn regular_game_server(game_number: u32, match_starting_server: Side) -> Side {
    debug_assert!(game_number >= 1, "game numbers are 1-indexed");
    if game_number.saturating_sub(1) % 2 == 0 {
        match_starting_server
    } else {
        match_starting_server.opponent()
    }
}

/// Server of the next tiebreak point, given how many tiebreak points were played.
pub fn tiebreak_server(points_played_in_tiebreak: u32, initial_server: Side) -> Side {
    if points_played_in_tiebreak == 0 {
        return initial_server;
    }
    let swaps = (points_played_in_tiebreak - 1) / 2;
    if swaps % 2 == 1 {
        initial_server
    } else {
        initial_server.opponent()
    }
}

/// First server of a set, given who served the last game of the previous set.
pub fn set_first_server(last_server_of_previous_set: Side) -> Side {
    last_server_of_previous_set.opponent()
}

/// Server of a game numbered within its set (1-indexed).
pub fn server_in_set(game_in_set: u32, set_first_server: Side) -> Side {
    regular_game_server(game_in_set, set_first_server)
}
