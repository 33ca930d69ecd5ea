//! Track assembler
//!
//! Groups the positions from all 24 hourly extractions into identity-keyed
//! tracks. Grouping is best-effort: a record with no identity signal landed
//! in the `"unknown"` group during normalization, and that group is a valid
//! track like any other. Hours with no data for an id simply leave a gap;
//! there is no interpolation.

use std::collections::HashMap;

use crate::types::{HourlyExtraction, PositionRecord, Track, UNKNOWN_ID};

/// Group all positions by id and order each group oldest to newest
///
/// Within a track, points sort descending by hour index (23 = oldest hour
/// first, 0 = newest hour last). Tracks appear in first-seen id order.
pub fn assemble(extractions: &[HourlyExtraction]) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for hour in extractions {
        for point in &hour.positions {
            let key = if point.id.is_empty() {
                UNKNOWN_ID.to_string()
            } else {
                point.id.clone()
            };

            let index = *index_by_id.entry(key.clone()).or_insert_with(|| {
                tracks.push(Track {
                    id: key,
                    points: Vec::new(),
                });
                tracks.len() - 1
            });
            tracks[index].points.push(point.clone());
        }
    }

    for track in &mut tracks {
        track.points.sort_by(|a, b| b.hour_index.cmp(&a.hour_index));
    }

    tracks
}

/// Newest point of a track (hour index closest to 0), if any
pub fn newest_point(track: &Track) -> Option<&PositionRecord> {
    track.points.last()
}
