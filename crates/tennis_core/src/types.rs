//! Core value types shared by every scoring module.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One side of the net. In doubles a side is the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    SideA,
    SideB,
}

impl Side {
    /// Get the other side
    pub fn opponent(&self) -> Self {
        match self {
            Side::SideA => Side::SideB,
            Side::SideB => Side::SideA,
        }
    }

    pub fn is_side_a(&self) -> bool {
        matches!(self, Side::SideA)
    }

    /// Short label used in text output ("A" / "B")
    pub fn label(&self) -> &'static str {
        match self {
            Side::SideA => "A",
            Side::SideB => "B",
        }
    }
}

/// Two-sided counter: `(side A, side B)`.
///
/// Used for points, games, tiebreak points and completed set scores.
/// Serialized as a two-element JSON array, e.g. `[6, 4]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub struct ScorePair(pub u32, pub u32);

impl ScorePair {
    pub const ZERO: ScorePair = ScorePair(0, 0);

    pub fn new(a: u32, b: u32) -> Self {
        Self(a, b)
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::SideA => self.0,
            Side::SideB => self.1,
        }
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::SideA => self.0 += 1,
            Side::SideB => self.1 += 1,
        }
    }

    /// Copy with one more for `side`, used by the "what if this point is won" simulations.
    pub fn plus_one(&self, side: Side) -> Self {
        let mut next = *self;
        next.increment(side);
        next
    }

    /// Side with the strictly higher count
    pub fn leader(&self) -> Option<Side> {
        if self.0 > self.1 {
            Some(Side::SideA)
        } else if self.1 > self.0 {
            Some(Side::SideB)
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0 && self.1 == 0
    }

    pub fn total(&self) -> u32 {
        self.0 + self.1
    }

    /// Re-order as `(server, returner)`
    pub fn oriented(&self, first: Side) -> (u32, u32) {
        (self.get(first), self.get(first.opponent()))
    }
}

impl From<(u32, u32)> for ScorePair {
    fn from((a, b): (u32, u32)) -> Self {
        Self(a, b)
    }
}
