//! Match format (ruleset configuration)
//!
//! `MatchFormat` is immutable for the lifetime of a match. Every scoring
//! function takes it by reference; nothing in the engine stores a copy of
//! "the current format" globally.
//!
//! ## Usage
//! ```rust
//! use tennis_core::format::{FinalSetTiebreak, MatchFormat};
//!
//! let format = MatchFormat::best_of(3).with_final_set(FinalSetTiebreak::Super);
//! assert_eq!(format.sets_needed(), 2);
//! assert_eq!(format.super_tiebreak_target(), 10);
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

/// Games needed to take a regular set
pub const GAMES_PER_SET: u32 = 6;
/// Games needed to take a short set
pub const GAMES_PER_SHORT_SET: u32 = 4;
/// Points needed to take a standard tiebreak
pub const STANDARD_TIEBREAK_TARGET: u32 = 7;
/// Super tiebreak target used when the format does not name one
pub const DEFAULT_SUPER_TIEBREAK_TARGET: u32 = 10;

/// How the deciding set is resolved once it is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FinalSetTiebreak {
    /// Advantage set: play on until someone leads by two games
    None,
    /// Regular first-to-7 tiebreak at the games target
    #[default]
    Standard,
    /// The whole deciding set is one first-to-N tiebreak
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchFormat {
    /// Best of 1, 3 or 5 sets
    pub sets_to_play: u32,
    #[serde(default)]
    pub no_ad: bool,
    #[serde(default = "default_true")]
    pub tiebreak_enabled: bool,
    #[serde(default)]
    pub final_set_tiebreak: FinalSetTiebreak,
    /// Only meaningful with `FinalSetTiebreak::Super`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_set_tiebreak_at: Option<u32>,
    #[serde(default)]
    pub short_sets: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::best_of(3)
    }
}

impl MatchFormat {
    /// Standard ad scoring with tiebreaks in every set
    pub fn best_of(sets_to_play: u32) -> Self {
        Self {
            sets_to_play,
            no_ad: false,
            tiebreak_enabled: true,
            final_set_tiebreak: FinalSetTiebreak::Standard,
            final_set_tiebreak_at: None,
            short_sets: false,
        }
    }

    pub fn with_no_ad(mut self, no_ad: bool) -> Self {
        self.no_ad = no_ad;
        self
    }

    pub fn with_final_set(mut self, mode: FinalSetTiebreak) -> Self {
        self.final_set_tiebreak = mode;
        self
    }

    pub fn with_super_tiebreak_at(mut self, target: u32) -> Self {
        self.final_set_tiebreak = FinalSetTiebreak::Super;
        self.final_set_tiebreak_at = Some(target);
        self
    }

    pub fn with_tiebreaks(mut self, enabled: bool) -> Self {
        self.tiebreak_enabled = enabled;
        self
    }

    pub fn with_short_sets(mut self, short_sets: bool) -> Self {
        self.short_sets = short_sets;
        self
    }

    /// Games target of a set: 6, or 4 with short sets. Also the tiebreak trigger.
    pub fn games_per_set(&self) -> u32 {
        if self.short_sets {
            GAMES_PER_SHORT_SET
        } else {
            GAMES_PER_SET
        }
    }

    /// Sets a side must win to take the match: `ceil(sets_to_play / 2)`
    pub fn sets_needed(&self) -> u32 {
        self.sets_to_play.div_ceil(2)
    }

    pub fn super_tiebreak_target(&self) -> u32 {
        self.final_set_tiebreak_at
            .unwrap_or(DEFAULT_SUPER_TIEBREAK_TARGET)
    }

    pub fn has_super_tiebreak(&self) -> bool {
        matches!(self.final_set_tiebreak, FinalSetTiebreak::Super)
    }

    /// Reject formats the rules cannot score.
    ///
    /// A missing super tiebreak target is not an error; the default applies.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.sets_to_play, 1 | 3 | 5) {
            return Err(ScoreError::InvalidFormat(format!(
                "setsToPlay must be 1, 3 or 5, got {}",
                self.sets_to_play
            )));
        }
        if let Some(target) = self.final_set_tiebreak_at {
            if self.has_super_tiebreak() && target < 2 {
                return Err(ScoreError::InvalidFormat(format!(
                    "finalSetTiebreakAt must be at least 2, got {target}"
                )));
            }
        }
        Ok(())
    }

    /// Canonical form: super target filled in, stray target dropped.
    pub fn normalized(&self) -> Self {
        let mut format = self.clone();
        format.final_set_tiebreak_at = if format.has_super_tiebreak() {
            Some(format.super_tiebreak_target())
        } else {
            None
        };
        format
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let format: MatchFormat = serde_json::from_str(json)?;
        format.validate()?;
        Ok(format.normalized())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let format: MatchFormat = serde_yaml::from_str(yaml)?;
        format.validate()?;
        Ok(format.normalized())
    }

    /// Named preset from the embedded preset table
    pub fn preset(name: &str) -> Result<Self> {
        crate::presets::get_preset(name)
            .map(|preset| preset.format.normalized())
            .ok_or_else(|| ScoreError::UnknownPreset(name.to_string()))
    }
}
