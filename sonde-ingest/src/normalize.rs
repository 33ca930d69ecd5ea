//! Schema normalizer for the hourly position payloads
//!
//! The upstream format is undocumented and drifts between refreshes. Two
//! shapes are accepted:
//!
//! 1. Tuple schema: an array of `[lat, lon, third?]` arrays. Identity is
//!    positional (`balloon_<index>` within the hour's file) and therefore
//!    not guaranteed stable across hours if the upstream reorders rows.
//! 2. Object-graph fallback: any other JSON value. The whole document is
//!    scanned depth-first for objects carrying a latitude and a longitude
//!    under any of the accepted key synonyms.
//!
//! Records with non-numeric or out-of-range coordinates are dropped
//! silently; a corrupted row never poisons the rest of its payload.

use serde_json::{Map, Value};

use crate::types::{PositionRecord, UNKNOWN_ID};

/// Accepted latitude keys, highest priority first
const LAT_KEYS: &[&str] = &["lat", "latitude", "y"];
/// Accepted longitude keys, highest priority first
const LON_KEYS: &[&str] = &["lon", "lng", "longitude", "x"];
/// Accepted altitude keys, highest priority first
const ALT_KEYS: &[&str] = &["alt", "altitude", "z"];
/// Accepted timestamp keys, highest priority first
const TIME_KEYS: &[&str] = &["time", "timestamp", "ts", "t"];
/// Accepted identity keys, highest priority first
const ID_KEYS: &[&str] = &["id", "balloon_id", "device_id", "uuid", "name", "callsign"];

/// Extract every valid position from one hour's decoded payload
///
/// Shape detection: an array whose first element is itself an array is
/// treated as the tuple schema; anything else goes through the object-graph
/// scan.
pub fn normalize(data: &Value, hour_index: u8) -> Vec<PositionRecord> {
    if let Value::Array(rows) = data {
        if matches!(rows.first(), Some(Value::Array(_))) {
            return parse_tuple_positions(rows, hour_index);
        }
    }
    extract_position_candidates(data, hour_index)
}

/// Parse the tuple-style payload `[[lat, lon, third?], ...]`
fn parse_tuple_positions(rows: &[Value], hour_index: u8) -> Vec<PositionRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let tuple = row.as_array()?;

            let lat = coerce_finite(tuple.first()?)?;
            let lon = coerce_finite(tuple.get(1)?)?;
            if !coordinates_in_range(lat, lon) {
                return None;
            }

            let third_value = tuple.get(2).and_then(coerce_finite);

            Some(PositionRecord {
                id: format!("balloon_{index}"),
                lat,
                lon,
                altitude_meters: None,
                timestamp: None,
                third_value,
                hour_index,
            })
        })
        .collect()
}

/// Depth-first scan for objects carrying a latitude and a longitude
///
/// Explicit work-stack rather than recursion, so arbitrarily deep payloads
/// cannot overflow the call stack. Each stack frame carries the nearest
/// identity hint seen on the path from the root; the hint flows parent to
/// child only and is overridden, never mutated, when a child object carries
/// its own identity key.
fn extract_position_candidates(root: &Value, hour_index: u8) -> Vec<PositionRecord> {
    let mut results = Vec::new();
    let mut stack: Vec<(&Value, Option<String>)> = vec![(root, None)];

    while let Some((value, parent_id_hint)) = stack.pop() {
        match value {
            Value::Array(items) => {
                for item in items {
                    stack.push((item, parent_id_hint.clone()));
                }
            }
            Value::Object(fields) => {
                let lat = pick_first_number(fields, LAT_KEYS);
                let lon = pick_first_number(fields, LON_KEYS);
                let explicit_id = pick_id(fields);

                if let (Some(lat), Some(lon)) = (lat, lon) {
                    if coordinates_in_range(lat, lon) {
                        results.push(PositionRecord {
                            id: explicit_id
                                .clone()
                                .or_else(|| parent_id_hint.clone())
                                .unwrap_or_else(|| UNKNOWN_ID.to_string()),
                            lat,
                            lon,
                            altitude_meters: pick_first_number(fields, ALT_KEYS),
                            timestamp: pick_first_number(fields, TIME_KEYS),
                            third_value: None,
                            hour_index,
                        });
                    }
                }

                // Keep scanning below a match: one payload may carry records
                // at several nesting depths.
                let nested_hint = explicit_id.or(parent_id_hint);
                for child in fields.values() {
                    stack.push((child, nested_hint.clone()));
                }
            }
            _ => {}
        }
    }

    results
}

/// First key present whose value coerces to a finite number
fn pick_first_number(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(coerce_finite))
}

/// First identity key present with a non-null value, stringified
fn pick_id(fields: &Map<String, Value>) -> Option<String> {
    ID_KEYS.iter().find_map(|key| match fields.get(*key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

/// Coerce a JSON value to a finite f64; numeric strings are accepted
fn coerce_finite(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn coordinates_in_range(lat: f64, lon: f64) -> bool {
    lat.abs() <= 90.0 && lon.abs() <= 180.0
}
