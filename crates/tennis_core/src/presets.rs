//! Match format presets
//!
//! Loads the named formats from the embedded YAML table and caches them.
//!
//! ## Usage
//!
//! ```rust
//! use tennis_core::presets::{get_preset, preset_names};
//!
//! let preset = get_preset("match_tiebreak").unwrap();
//! assert_eq!(preset.format.super_tiebreak_target(), 10);
//! assert!(preset_names().contains(&"best_of_five"));
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::format::MatchFormat;

// =============================================================================
// Embedded YAML Data
// =============================================================================

/// Preset table (compile-time embedded)
pub const FORMATS_YAML: &str = include_str!("../data/formats.yaml");

static PRESETS: OnceLock<BTreeMap<String, FormatPreset>> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatPreset {
    pub description: String,
    pub format: MatchFormat,
}

// =============================================================================
// Public API
// =============================================================================

/// All presets, keyed by name (sorted).
///
/// # Panics
///
/// Panics if the embedded YAML fails to parse, which a normal build cannot
/// produce since the data is embedded at compile time.
pub fn presets() -> &'static BTreeMap<String, FormatPreset> {
    PRESETS.get_or_init(|| {
        serde_yaml::from_str(FORMATS_YAML).expect("Failed to parse data/formats.yaml")
    })
}

pub fn get_preset(name: &str) -> Option<&'static FormatPreset> {
    presets().get(name)
}

pub fn preset_names() -> Vec<&'static str> {
    presets().keys().map(String::as_str).collect()
}
