//! Match Replay Library
//!
//! Stored match document (JSON, any legacy shape) → tennis_adapter
//! normalization → tennis_core replay → summary / timeline text.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use tennis_adapter::{normalize_match_json, NormalizedMatch, ScoreMismatch};
use tennis_core::display::format_final_score;
use tennis_core::pressure::{Badge, Pressure};
use tennis_core::timeline::PointAnnotation;
use tennis_core::{compute_score, MatchFormat, MatchRecord, ScorePair, Side};

/// Result of replaying one stored match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub points: usize,
    pub sets: Vec<ScorePair>,
    pub scoreline: String,
    pub winner: Option<Side>,
    pub next_server: Option<Side>,
    pub badge: Option<Badge>,
    /// SHA-256 of the replayed score
    pub digest: String,
    /// Differences between the stored score and the replay
    pub mismatches: Vec<ScoreMismatch>,
}

/// Read and normalize a match document.
pub fn load_match(path: &Path) -> Result<NormalizedMatch> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read match file: {}", path.display()))?;
    let normalized = normalize_match_json(&json)
        .with_context(|| format!("Failed to normalize match file: {}", path.display()))?;
    info!(
        path = %path.display(),
        points = normalized.record.point_log.len(),
        "match loaded"
    );
    Ok(normalized)
}

/// Replace the record's format with a named preset, when one is given.
pub fn apply_preset(record: &mut MatchRecord, preset: Option<&str>) -> Result<()> {
    if let Some(name) = preset {
        record.match_format = MatchFormat::preset(name)
            .with_context(|| format!("Unknown format preset: {name}"))?;
        info!(preset = name, "format overridden by preset");
    }
    Ok(())
}

pub fn replay(normalized: &NormalizedMatch) -> ReplaySummary {
    let record = &normalized.record;
    let state = compute_score(&record.match_format, &record.point_log);
    let pressure = Pressure::of_state(&state, &record.match_format, None);
    let mismatches = normalized
        .reconcile()
        .map(|reconciliation| reconciliation.mismatches)
        .unwrap_or_default();

    ReplaySummary {
        points: record.point_log.len(),
        sets: state.sets.clone(),
        scoreline: state.scoreline(record.match_format.no_ad),
        winner: state.winner,
        next_server: state.next_server(),
        badge: pressure.badge(),
        digest: state.digest(),
        mismatches,
    }
}

fn side_name(side: Option<Side>) -> &'static str {
    side.map(|side| side.label()).unwrap_or("-")
}

pub fn render_summary(summary: &ReplaySummary, with_digest: bool) -> String {
    let mut lines = vec![
        format!("Points:      {}", summary.points),
        format!("Score:       {}", summary.scoreline),
    ];
    match summary.winner {
        Some(winner) => lines.push(format!(
            "Winner:      {} ({})",
            winner.label(),
            format_final_score(&summary.sets)
        )),
        None => {
            lines.push(format!("Next server: {}", side_name(summary.next_server)));
            if let Some(badge) = summary.badge {
                lines.push(format!("Pressure:    {}", badge.label()));
            }
        }
    }
    for mismatch in &summary.mismatches {
        lines.push(format!("Mismatch:    {}", render_mismatch(mismatch)));
    }
    if with_digest {
        lines.push(format!("Digest:      {}", summary.digest));
    }
    lines.join("\n")
}

fn render_mismatch(mismatch: &ScoreMismatch) -> String {
    match mismatch {
        ScoreMismatch::Sets { stored, replayed } => format!(
            "sets stored [{}] vs replay [{}]",
            format_final_score(stored),
            format_final_score(replayed)
        ),
        ScoreMismatch::Games { stored, replayed } => format!(
            "games stored {}-{} vs replay {}-{}",
            stored.0, stored.1, replayed.0, replayed.1
        ),
        ScoreMismatch::Points { stored, replayed } => format!(
            "points stored {}-{} vs replay {}-{}",
            stored.0, stored.1, replayed.0, replayed.1
        ),
        ScoreMismatch::Tiebreak { stored, replayed } => {
            format!("tiebreak stored {stored} vs replay {replayed}")
        }
    }
}

/// One line per point: number, server, winner, score after, badge.
pub fn render_timeline(annotations: &[PointAnnotation]) -> String {
    annotations
        .iter()
        .map(|a| {
            let mut line = format!(
                "{:>4}  srv {}  won {}  {}",
                a.index + 1,
                a.server.label(),
                a.winner.label(),
                a.score_after.scoreline
            );
            if let Some(badge) = a.badge {
                line.push_str(&format!("  {}", badge.label()));
            }
            if a.ignored {
                line.push_str("  (ignored)");
            } else if !a.server_matches {
                line.push_str("  (server out of rotation)");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_presets() -> String {
    tennis_core::presets::presets()
        .iter()
        .map(|(name, preset)| format!("{name:<30} {}", preset.description))
        .collect::<Vec<_>>()
        .join("\n")
}
