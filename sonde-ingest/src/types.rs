//! Data model for the ingestion pipeline
//!
//! One refresh cycle produces exactly 24 [`HourlyExtraction`]s (one per
//! hour-file) and N [`Track`]s (one per distinct inferred identity). A
//! position record belongs to exactly one extraction (by hour index) and
//! exactly one track (by id). The whole snapshot is rebuilt from scratch
//! every cycle; nothing is merged across cycles.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of hourly position files per refresh cycle
pub const HOURS_PER_CYCLE: u8 = 24;

/// Identity assigned when no identity signal is found anywhere
pub const UNKNOWN_ID: &str = "unknown";

/// One validated position extracted from an hourly payload
///
/// Records with out-of-range or non-numeric coordinates are dropped before
/// this type is ever constructed; a `PositionRecord` always has in-range
/// lat/lon.
#[derive(Debug, Clone, Serialize)]
pub struct PositionRecord {
    /// Inferred identity; `"unknown"` when no signal was found, or
    /// `balloon_<index>` for positional tuple-schema identities
    pub id: String,
    /// Latitude in degrees, |lat| <= 90
    pub lat: f64,
    /// Longitude in degrees, |lon| <= 180
    pub lon: f64,
    /// Altitude in meters if the payload carried one
    pub altitude_meters: Option<f64>,
    /// Raw timestamp value if the payload carried one (units upstream-defined)
    pub timestamp: Option<f64>,
    /// Third tuple element for tuple-schema payloads
    pub third_value: Option<f64>,
    /// Hours before present of the source file (0 = newest, 23 = oldest)
    pub hour_index: u8,
}

/// Per-hour extraction result, the unit of diagnostic reporting
#[derive(Debug, Clone, Serialize)]
pub struct HourlyExtraction {
    /// Hours before present of the source file
    pub hour_index: u8,
    /// Whether the hour's fetch/parse succeeded
    pub ok: bool,
    /// Failure description when `ok` is false
    pub error: Option<String>,
    /// Extracted positions; always empty when `ok` is false
    pub positions: Vec<PositionRecord>,
}

impl HourlyExtraction {
    /// Successful extraction (possibly with zero positions)
    pub fn success(hour_index: u8, positions: Vec<PositionRecord>) -> Self {
        Self {
            hour_index,
            ok: true,
            error: None,
            positions,
        }
    }

    /// Failed extraction; carries no positions by construction
    pub fn failure(hour_index: u8, error: String) -> Self {
        Self {
            hour_index,
            ok: false,
            error: Some(error),
            positions: Vec::new(),
        }
    }

    /// Human-readable diagnostic line, e.g. `Hour 05: HTTP 500 from ...`
    pub fn diagnostic(&self) -> Option<String> {
        if self.ok {
            return None;
        }
        let error = self.error.as_deref().unwrap_or("unknown error");
        Some(format!("Hour {:02}: {error}", self.hour_index))
    }
}

/// Time-ordered sequence of positions sharing one inferred identity
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    /// Inferred identity shared by all points
    pub id: String,
    /// Points ordered oldest hour to newest hour (hour index 23 -> 0)
    pub points: Vec<PositionRecord>,
}

/// Complete result of one ingestion cycle
#[derive(Debug, Clone, Serialize)]
pub struct ConstellationSnapshot {
    /// One entry per hour index 0..=23, in hour-index order
    pub extracted_by_hour: Vec<HourlyExtraction>,
    /// Assembled tracks, in first-seen id order
    pub tracks: Vec<Track>,
    /// When this cycle finished
    pub refreshed_at: DateTime<Utc>,
}

impl ConstellationSnapshot {
    /// Empty snapshot used before the first cycle completes
    pub fn empty() -> Self {
        Self {
            extracted_by_hour: Vec::new(),
            tracks: Vec::new(),
            refreshed_at: Utc::now(),
        }
    }

    /// Total points across all tracks
    pub fn total_points(&self) -> usize {
        self.tracks.iter().map(|t| t.points.len()).sum()
    }
}
