//! Snapshot read endpoints: full snapshot, track list/detail, hour diagnostics

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::geo::{format_meters, haversine_distance_meters};
use crate::tracks::newest_point;
use crate::types::{ConstellationSnapshot, PositionRecord, Track};
use crate::AppState;

/// One row of the track list
#[derive(Debug, Serialize)]
pub struct TrackSummary {
    pub id: String,
    pub point_count: usize,
    /// Newest point (hour index closest to 0), if the track has any
    pub newest: Option<PositionRecord>,
}

/// Track detail for the details panel
#[derive(Debug, Serialize)]
pub struct TrackDetail {
    pub id: String,
    pub points: Vec<PositionRecord>,
    /// Great-circle path length over consecutive points, in meters
    pub path_meters: f64,
    /// Human-readable path length
    pub path_display: String,
}

/// Per-hour ingestion status
#[derive(Debug, Serialize)]
pub struct HourStatus {
    pub hour_index: u8,
    pub ok: bool,
    pub positions: usize,
    /// `Hour <NN>: <error>` when the hour failed
    pub diagnostic: Option<String>,
}

/// Hour diagnostics response
#[derive(Debug, Serialize)]
pub struct HoursResponse {
    pub refreshed_at: DateTime<Utc>,
    pub hours: Vec<HourStatus>,
    /// Failure lines only, ready for a warning strip
    pub errors: Vec<String>,
}

/// GET /api/snapshot
pub async fn get_snapshot(State(state): State<AppState>) -> Json<ConstellationSnapshot> {
    let snapshot = state.snapshot().await;
    Json((*snapshot).clone())
}

/// GET /api/tracks
pub async fn list_tracks(State(state): State<AppState>) -> Json<Vec<TrackSummary>> {
    let snapshot = state.snapshot().await;
    let summaries = snapshot
        .tracks
        .iter()
        .map(|track| TrackSummary {
            id: track.id.clone(),
            point_count: track.points.len(),
            newest: newest_point(track).cloned(),
        })
        .collect();
    Json(summaries)
}

/// GET /api/tracks/:id
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TrackDetail>> {
    let snapshot = state.snapshot().await;
    let track = snapshot
        .tracks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("No track with id {id}")))?;

    let path_meters = track_path_meters(track);
    Ok(Json(TrackDetail {
        id: track.id.clone(),
        points: track.points.clone(),
        path_meters,
        path_display: format_meters(path_meters),
    }))
}

/// GET /api/hours
pub async fn get_hours(State(state): State<AppState>) -> Json<HoursResponse> {
    let snapshot = state.snapshot().await;

    let hours = snapshot
        .extracted_by_hour
        .iter()
        .map(|hour| HourStatus {
            hour_index: hour.hour_index,
            ok: hour.ok,
            positions: hour.positions.len(),
            diagnostic: hour.diagnostic(),
        })
        .collect();

    let errors = snapshot
        .extracted_by_hour
        .iter()
        .filter_map(|hour| hour.diagnostic())
        .collect();

    Json(HoursResponse {
        refreshed_at: snapshot.refreshed_at,
        hours,
        errors,
    })
}

fn track_path_meters(track: &Track) -> f64 {
    track
        .points
        .windows(2)
        .map(|pair| haversine_distance_meters((pair[0].lat, pair[0].lon), (pair[1].lat, pair[1].lon)))
        .sum()
}

/// Build snapshot routes
pub fn snapshot_routes() -> Router<AppState> {
    Router::new()
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/tracks", get(list_tracks))
        .route("/api/tracks/:id", get(get_track))
        .route("/api/hours", get(get_hours))
}
