//! Normalizer property tests
//!
//! Covers the tuple-vs-object shape detection, key priority resolution and
//! validation-drop behavior across the schema drift the upstream is known
//! to exhibit.

use serde_json::json;

use sonde_ingest::normalize::normalize;
use sonde_ingest::types::UNKNOWN_ID;

#[test]
fn valid_tuples_yield_exactly_one_record_each() {
    // Given: tuples at the extremes of the valid coordinate ranges
    let data = json!([[90.0, 180.0, 1.0], [-90.0, -180.0, 2.0], [0.0, 0.0, 3.0]]);

    // When: normalized
    let records = normalize(&data, 4);

    // Then: one record per tuple with matching coordinates
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].lat, 90.0);
    assert_eq!(records[0].lon, 180.0);
    assert_eq!(records[1].lat, -90.0);
    assert_eq!(records[2].id, "balloon_2");
    assert!(records.iter().all(|r| r.hour_index == 4));
}

#[test]
fn corrupted_tuple_rows_are_dropped_individually() {
    // Given: one valid row, one out-of-range row, one non-numeric row
    let data = json!([[10.0, 20.0, 1.5], [91.0, 20.0, 2.0], ["x", 20.0, 3.0]]);

    // When: normalized for hour H
    let records = normalize(&data, 9);

    // Then: exactly the valid row survives, with its source-row identity
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "balloon_0");
    assert_eq!(record.lat, 10.0);
    assert_eq!(record.lon, 20.0);
    assert_eq!(record.third_value, Some(1.5));
    assert_eq!(record.hour_index, 9);
}

#[test]
fn object_payload_without_positions_is_empty_not_an_error() {
    let data = json!({
        "meta": {"generated": "2026-08-29T00:00:00Z"},
        "readings": [{"temp": 21.5}, {"humidity": 0.4}]
    });
    assert!(normalize(&data, 0).is_empty());
}

#[test]
fn lat_key_beats_latitude_key() {
    // Given: both synonyms present with different values
    let data = json!({"lat": 10.0, "latitude": -35.0, "lon": 20.0});

    // Then: the higher-priority key wins
    let records = normalize(&data, 0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].lat, 10.0);
}

#[test]
fn object_with_no_identity_anywhere_is_unknown() {
    let data = json!({"latitude": 10.0, "longitude": 20.0});
    let records = normalize(&data, 0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, UNKNOWN_ID);
}

#[test]
fn identity_hint_survives_arbitrary_nesting() {
    let data = json!({
        "device_id": "sonde-9",
        "a": {"b": [{"c": {"lat": 1.0, "lon": 2.0}}]}
    });
    let records = normalize(&data, 0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "sonde-9");
}

#[test]
fn tuple_detection_requires_tuple_of_tuples() {
    // A flat numeric array is not the tuple schema; the object scan finds
    // nothing position-bearing in it
    let data = json!([10.0, 20.0, 1.5]);
    assert!(normalize(&data, 0).is_empty());
}

#[test]
fn out_of_range_object_coordinates_are_dropped_silently() {
    let data = json!({"lat": 95.0, "lon": 20.0, "id": "ghost"});
    assert!(normalize(&data, 0).is_empty());
}
