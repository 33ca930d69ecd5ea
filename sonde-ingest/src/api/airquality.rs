//! Proxied air-quality lookup endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for the lookup
#[derive(Debug, Deserialize)]
pub struct AirQualityParams {
    pub lat: f64,
    pub lon: f64,
}

/// GET /api/air-quality?lat=..&lon=..
///
/// Upstream failure becomes a 502 with the failure description; it never
/// takes the service down.
pub async fn get_air_quality(
    State(state): State<AppState>,
    Query(params): Query<AirQualityParams>,
) -> ApiResult<Json<Value>> {
    if params.lat.abs() > 90.0 || params.lon.abs() > 180.0 {
        return Err(ApiError::BadRequest(format!(
            "Coordinates out of range: lat={}, lon={}",
            params.lat, params.lon
        )));
    }

    match state.air_quality.lookup(params.lat, params.lon).await {
        Ok(data) => Ok(Json(data)),
        Err(failure) => {
            warn!(error = %failure, "Air quality lookup failed");
            Err(ApiError::Upstream(failure.to_string()))
        }
    }
}

/// Build air-quality routes
pub fn air_quality_routes() -> Router<AppState> {
    Router::new().route("/api/air-quality", get(get_air_quality))
}
