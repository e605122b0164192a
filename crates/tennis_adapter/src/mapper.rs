//! mapper.rs
//! Legacy field names and value shapes → tennis_core types.
//!
//! Unknown keys are ignored. Keys that are present but carry a value of
//! the wrong shape are errors.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use tennis_core::format::{FinalSetTiebreak, MatchFormat, GAMES_PER_SET, GAMES_PER_SHORT_SET};
use tennis_core::point::{PointMetadata, PointRecord};
use tennis_core::types::{ScorePair, Side};

use crate::{AdapterError, Result};

/// Side keys accepted for side A, then side B
pub const SIDE_A_KEYS: [&str; 3] = ["sideA", "p1", "player1"];
pub const SIDE_B_KEYS: [&str; 3] = ["sideB", "p2", "player2"];

// ============================================================================
// Sides and pairs
// ============================================================================

pub fn parse_side(raw: &str) -> Result<Side> {
    let trimmed = raw.trim();
    let matches = |keys: &[&str]| keys.iter().any(|key| key.eq_ignore_ascii_case(trimmed));
    if matches(&SIDE_A_KEYS) || trimmed.eq_ignore_ascii_case("a") {
        Ok(Side::SideA)
    } else if matches(&SIDE_B_KEYS) || trimmed.eq_ignore_ascii_case("b") {
        Ok(Side::SideB)
    } else {
        Err(AdapterError::UnknownSide(raw.to_string()))
    }
}

fn side_value(value: &Value, field: &'static str) -> Result<Side> {
    match value {
        Value::String(raw) => parse_side(raw),
        other => Err(AdapterError::InvalidField {
            field,
            reason: format!("expected a side name, got {other}"),
        }),
    }
}

fn count(value: &Value, field: &'static str) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| AdapterError::InvalidField {
            field,
            reason: format!("expected a non-negative integer, got {value}"),
        })
}

fn keyed_count(object: &Map<String, Value>, keys: &[&str], field: &'static str) -> Result<u32> {
    keys.iter()
        .find_map(|key| object.get(*key))
        .map(|value| count(value, field))
        .unwrap_or(Ok(0))
}

/// `[a, b]` or a side-keyed object such as `{ "p1": 6, "p2": 4 }`
pub fn parse_pair(value: &Value, field: &'static str) -> Result<ScorePair> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            Ok(ScorePair(count(&items[0], field)?, count(&items[1], field)?))
        }
        Value::Object(object) => Ok(ScorePair(
            keyed_count(object, &SIDE_A_KEYS, field)?,
            keyed_count(object, &SIDE_B_KEYS, field)?,
        )),
        other => Err(AdapterError::InvalidField {
            field,
            reason: format!("expected [a, b] or a side-keyed object, got {other}"),
        }),
    }
}

/// Whether `value` is a single pair rather than a list of pairs
pub fn is_single_pair(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.len() == 2 && items.iter().all(Value::is_number),
        Value::Object(_) => true,
        _ => false,
    }
}

pub fn parse_pairs(value: &Value, field: &'static str) -> Result<Vec<ScorePair>> {
    match value {
        Value::Array(items) => items.iter().map(|item| parse_pair(item, field)).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(AdapterError::InvalidField {
            field,
            reason: format!("expected a list of pairs, got {other}"),
        }),
    }
}

// ============================================================================
// Match format
// ============================================================================

fn first_key<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn flag(object: &Map<String, Value>, keys: &[&str], field: &'static str) -> Result<Option<bool>> {
    match first_key(object, keys) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(AdapterError::InvalidField {
            field,
            reason: format!("expected a boolean, got {other}"),
        }),
    }
}

/// Map a legacy or canonical format object.
///
/// Accepts `sets`/`setsToPlay`, `tiebreak`/`tiebreakEnabled`, `gamesPerSet`
/// (4 selects short sets) and `finalSetTiebreak` as a mode string or a
/// boolean. A boolean `true` with a `finalSetTiebreakAt` other than 7 means a
/// super tiebreak to that target.
pub fn map_format(value: &Value) -> Result<MatchFormat> {
    let object = value.as_object().ok_or_else(|| AdapterError::InvalidField {
        field: "matchFormat",
        reason: format!("expected an object, got {value}"),
    })?;

    let sets = first_key(object, &["setsToPlay", "sets"]).ok_or(AdapterError::MissingField {
        field: "setsToPlay",
        context: "matchFormat".to_string(),
    })?;
    let mut format = MatchFormat::best_of(count(sets, "setsToPlay")?);

    if let Some(no_ad) = flag(object, &["noAd", "no_ad"], "noAd")? {
        format.no_ad = no_ad;
    }
    if let Some(enabled) = flag(object, &["tiebreakEnabled", "tiebreak"], "tiebreakEnabled")? {
        format.tiebreak_enabled = enabled;
    }
    if let Some(short_sets) = flag(object, &["shortSets"], "shortSets")? {
        format.short_sets = short_sets;
    }
    if let Some(games) = object.get("gamesPerSet") {
        match count(games, "gamesPerSet")? {
            GAMES_PER_SHORT_SET => format.short_sets = true,
            GAMES_PER_SET => {}
            other => {
                return Err(AdapterError::InvalidField {
                    field: "gamesPerSet",
                    reason: format!("only {GAMES_PER_SET} or {GAMES_PER_SHORT_SET} supported, got {other}"),
                })
            }
        }
    }

    let target = match object.get("finalSetTiebreakAt") {
        None | Some(Value::Null) => None,
        Some(value) => Some(count(value, "finalSetTiebreakAt")?),
    };
    format.final_set_tiebreak = match object.get("finalSetTiebreak") {
        None | Some(Value::Null) => FinalSetTiebreak::Standard,
        Some(Value::Bool(false)) => FinalSetTiebreak::None,
        Some(Value::Bool(true)) => match target {
            Some(points) if points != tennis_core::format::STANDARD_TIEBREAK_TARGET => {
                FinalSetTiebreak::Super
            }
            _ => FinalSetTiebreak::Standard,
        },
        Some(Value::String(mode)) => parse_final_set_mode(mode)?,
        Some(other) => {
            return Err(AdapterError::InvalidField {
                field: "finalSetTiebreak",
                reason: format!("expected a mode or a boolean, got {other}"),
            })
        }
    };
    format.final_set_tiebreak_at = target;

    format.validate()?;
    Ok(format.normalized())
}

fn parse_final_set_mode(mode: &str) -> Result<FinalSetTiebreak> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "standard" | "tiebreak" => Ok(FinalSetTiebreak::Standard),
        "super" | "super_tiebreak" | "match_tiebreak" => Ok(FinalSetTiebreak::Super),
        "none" | "advantage" => Ok(FinalSetTiebreak::None),
        _ => Err(AdapterError::InvalidField {
            field: "finalSetTiebreak",
            reason: format!("unknown mode {mode:?}"),
        }),
    }
}

// ============================================================================
// Points
// ============================================================================

/// Optional enum-valued field; unrecognized values are dropped, not errors.
fn optional_enum<T: DeserializeOwned>(object: &Map<String, Value>, keys: &[&str]) -> Option<T> {
    let value = first_key(object, keys)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(keys = ?keys, %value, "unrecognized point detail dropped");
            None
        }
    }
}

fn timestamp(object: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let raw = object.get("timestamp")?.as_str()?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            warn!(timestamp = raw, error = %err, "unparseable point timestamp dropped");
            None
        }
    }
}

/// Map one point object, or a JSON-encoded string holding one.
///
/// `index` is the 0-based log position, used for error context.
pub fn map_point(value: &Value, index: usize) -> Result<PointRecord> {
    let decoded;
    let value = match value {
        Value::String(encoded) => {
            decoded = serde_json::from_str::<Value>(encoded)?;
            &decoded
        }
        other => other,
    };
    let object = value.as_object().ok_or_else(|| AdapterError::InvalidField {
        field: "pointLog",
        reason: format!("point {} is not an object", index + 1),
    })?;
    let required = |field: &'static str| {
        object.get(field).ok_or(AdapterError::MissingField {
            field,
            context: format!("point {}", index + 1),
        })
    };

    let winner = side_value(required("winner")?, "winner")?;
    let server = side_value(required("server")?, "server")?;
    let set_number = count(required("setNumber")?, "setNumber")?;
    let game_number = count(required("gameNumber")?, "gameNumber")?;

    let mut point = PointRecord::new(winner, server, set_number, game_number);
    point.is_tiebreak_point = flag(object, &["isTiebreakPoint", "isTiebreak"], "isTiebreak")?
        .unwrap_or(false);
    point.point_number = match object.get("pointNumber") {
        None | Some(Value::Null) => None,
        Some(value) => Some(count(value, "pointNumber")?),
    };
    point.metadata = PointMetadata {
        outcome: optional_enum(object, &["outcome", "pointOutcome", "type"]),
        serve_type: optional_enum(object, &["serveType"]),
        last_shot: optional_enum(object, &["lastShot", "lastShotType", "shot"]),
        rally_length: object
            .get("rallyLength")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok()),
        timestamp: timestamp(object),
        notes: object.get("notes").and_then(Value::as_str).map(str::to_string),
    };
    Ok(point)
}

/// Map a point log given as an array of objects/strings, or as one
/// JSON-encoded string holding that array.
pub fn map_point_log(value: &Value) -> Result<Vec<PointRecord>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| map_point(item, index))
            .collect(),
        Value::String(encoded) => map_point_log(&serde_json::from_str(encoded)?),
        other => Err(AdapterError::InvalidField {
            field: "pointLog",
            reason: format!("expected an array, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tennis_core::point::{PointOutcome, ShotType};

    #[test]
    fn test_side_aliases() {
        for raw in ["p1", "player1", "sideA", "A", "P1"] {
            assert_eq!(parse_side(raw).unwrap(), Side::SideA, "{raw}");
        }
        for raw in ["p2", "player2", "sideB", "b"] {
            assert_eq!(parse_side(raw).unwrap(), Side::SideB, "{raw}");
        }
        assert!(matches!(parse_side("p3"), Err(AdapterError::UnknownSide(_))));
    }

    #[test]
    fn test_pair_shapes() {
        assert_eq!(parse_pair(&json!([6, 4]), "sets").unwrap(), ScorePair(6, 4));
        assert_eq!(parse_pair(&json!({"p1": 6, "p2": 4}), "sets").unwrap(), ScorePair(6, 4));
        assert_eq!(
            parse_pair(&json!({"player1": 3, "player2": 5}), "sets").unwrap(),
            ScorePair(3, 5)
        );
        assert_eq!(parse_pair(&json!({"p2": 2}), "games").unwrap(), ScorePair(0, 2));
        assert!(parse_pair(&json!([6, 4, 1]), "sets").is_err());
        assert!(parse_pair(&json!([6, -1]), "sets").is_err());
        assert!(is_single_pair(&json!([6, 4])));
        assert!(!is_single_pair(&json!([[6, 4]])));
    }

    #[test]
    fn test_legacy_format_keys() {
        let format = map_format(&json!({ "sets": 5, "noAd": true, "tiebreak": false })).unwrap();
        assert_eq!(format.sets_to_play, 5);
        assert!(format.no_ad);
        assert!(!format.tiebreak_enabled);
        assert_eq!(format.final_set_tiebreak, FinalSetTiebreak::Standard);
    }

    #[test]
    fn test_boolean_final_set_tiebreak() {
        let advantage = map_format(&json!({ "sets": 3, "finalSetTiebreak": false })).unwrap();
        assert_eq!(advantage.final_set_tiebreak, FinalSetTiebreak::None);

        let standard = map_format(&json!({ "sets": 3, "finalSetTiebreak": true })).unwrap();
        assert_eq!(standard.final_set_tiebreak, FinalSetTiebreak::Standard);

        let super_tb = map_format(&json!({
            "sets": 3, "finalSetTiebreak": true, "finalSetTiebreakAt": 10
        }))
        .unwrap();
        assert_eq!(super_tb.final_set_tiebreak, FinalSetTiebreak::Super);
        assert_eq!(super_tb.super_tiebreak_target(), 10);
    }

    #[test]
    fn test_canonical_format_passes_through() {
        let format = map_format(&json!({
            "setsToPlay": 3,
            "tiebreakEnabled": true,
            "finalSetTiebreak": "super"
        }))
        .unwrap();
        assert_eq!(format, MatchFormat::best_of(3).with_super_tiebreak_at(10));
    }

    #[test]
    fn test_games_per_set() {
        let short = map_format(&json!({ "sets": 3, "gamesPerSet": 4 })).unwrap();
        assert!(short.short_sets);
        assert!(map_format(&json!({ "sets": 3, "gamesPerSet": 8 })).is_err());
    }

    #[test]
    fn test_format_errors() {
        assert!(matches!(
            map_format(&json!({ "noAd": true })),
            Err(AdapterError::MissingField { field: "setsToPlay", .. })
        ));
        assert!(matches!(
            map_format(&json!({ "sets": 2 })),
            Err(AdapterError::Core(_))
        ));
        assert!(map_format(&json!({ "sets": 3, "finalSetTiebreak": "sometimes" })).is_err());
    }

    #[test]
    fn test_point_with_details() {
        let point = map_point(
            &json!({
                "winner": "p2",
                "server": "p1",
                "setNumber": 1,
                "gameNumber": 3,
                "pointNumber": 9,
                "pointOutcome": "forced_error",
                "lastShotType": "drop_shot",
                "rallyLength": 7,
                "timestamp": "2024-05-01T10:15:00Z",
                "notes": "long rally"
            }),
            8,
        )
        .unwrap();
        assert_eq!(point.winner, Side::SideB);
        assert_eq!(point.server, Side::SideA);
        assert_eq!(point.game_number, 3);
        assert_eq!(point.point_number, Some(9));
        assert_eq!(point.metadata.outcome, Some(PointOutcome::ForcedError));
        assert_eq!(point.metadata.last_shot, Some(ShotType::DropShot));
        assert_eq!(point.metadata.rally_length, Some(7));
        assert!(point.metadata.timestamp.is_some());
    }

    #[test]
    fn test_unknown_details_dropped() {
        let point = map_point(
            &json!({
                "winner": "p1", "server": "p1", "setNumber": 1, "gameNumber": 1,
                "shot": "other", "timestamp": "yesterday"
            }),
            0,
        )
        .unwrap();
        assert_eq!(point.metadata.last_shot, None);
        assert_eq!(point.metadata.timestamp, None);
    }

    #[test]
    fn test_string_encoded_points() {
        let log = json!([
            "{\"winner\":\"p1\",\"server\":\"p1\",\"setNumber\":1,\"gameNumber\":1}",
            { "winner": "player2", "server": "player1", "setNumber": 1, "gameNumber": 1 }
        ]);
        let points = map_point_log(&log).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].winner, Side::SideA);
        assert_eq!(points[1].winner, Side::SideB);

        let whole = Value::String(log.to_string());
        assert_eq!(map_point_log(&whole).unwrap(), points);
    }

    #[test]
    fn test_point_missing_server() {
        let err = map_point(&json!({ "winner": "p1", "setNumber": 1, "gameNumber": 1 }), 4)
            .unwrap_err();
        match err {
            AdapterError::MissingField { field, context } => {
                assert_eq!(field, "server");
                assert_eq!(context, "point 5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
