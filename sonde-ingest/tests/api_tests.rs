//! API surface tests
//!
//! Serves the real router on an ephemeral port and exercises it with a
//! plain HTTP client, the way the map and details panel consume it.

use std::time::Duration;

use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use sonde_common::SafeJsonClient;
use sonde_ingest::airquality::AirQualityClient;
use sonde_ingest::types::{ConstellationSnapshot, HourlyExtraction, PositionRecord};
use sonde_ingest::{build_router, AppState};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn record(id: &str, hour_index: u8, lat: f64, lon: f64) -> PositionRecord {
    PositionRecord {
        id: id.to_string(),
        lat,
        lon,
        altitude_meters: None,
        timestamp: None,
        third_value: None,
        hour_index,
    }
}

/// State seeded with a two-hour snapshot: track "A" plus one failed hour
async fn seeded_state() -> AppState {
    let client = SafeJsonClient::new(Duration::from_secs(2)).unwrap();
    let state = AppState::new(AirQualityClient::new(client));

    let mut extracted_by_hour = vec![
        HourlyExtraction::success(0, vec![record("A", 0, 10.0, 20.0)]),
        HourlyExtraction::success(1, vec![record("A", 1, 11.0, 20.0)]),
    ];
    extracted_by_hour.push(HourlyExtraction::failure(
        5,
        "HTTP 500 from http://upstream/05.json".to_string(),
    ));

    let tracks = sonde_ingest::tracks::assemble(&extracted_by_hour);
    state
        .replace_snapshot(ConstellationSnapshot {
            extracted_by_hour,
            tracks,
            refreshed_at: chrono::Utc::now(),
        })
        .await;
    state
}

#[tokio::test]
async fn health_reports_module_and_cycles() {
    let state = seeded_state().await;
    let base = serve(build_router(state)).await;

    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "sonde-ingest");
    assert_eq!(body["cycles_completed"], 1);
}

#[tokio::test]
async fn track_list_and_detail_reflect_the_snapshot() {
    let state = seeded_state().await;
    let base = serve(build_router(state)).await;

    let tracks: Value = reqwest::get(format!("{base}/api/tracks"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tracks.as_array().unwrap().len(), 1);
    assert_eq!(tracks[0]["id"], "A");
    assert_eq!(tracks[0]["point_count"], 2);
    // Newest point is the hour closest to present
    assert_eq!(tracks[0]["newest"]["hour_index"], 0);

    let detail: Value = reqwest::get(format!("{base}/api/tracks/A"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["points"].as_array().unwrap().len(), 2);
    // One degree of latitude between the two points
    let path = detail["path_meters"].as_f64().unwrap();
    assert!((path - 111_195.0).abs() < 500.0, "got {path}");
    assert!(detail["path_display"].as_str().unwrap().ends_with("km"));
}

#[tokio::test]
async fn missing_track_is_a_structured_404() {
    let state = seeded_state().await;
    let base = serve(build_router(state)).await;

    let response = reqwest::get(format!("{base}/api/tracks/nope")).await.unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn hour_diagnostics_surface_failures_as_warnings() {
    let state = seeded_state().await;
    let base = serve(build_router(state)).await;

    let body: Value = reqwest::get(format!("{base}/api/hours"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].as_str().unwrap(),
        "Hour 05: HTTP 500 from http://upstream/05.json"
    );
}

#[tokio::test]
async fn air_quality_lookup_is_proxied_opaquely() {
    // Stub Open-Meteo endpoint
    let stub = Router::new().route(
        "/v1/air-quality",
        get(|| async { axum::Json(json!({"current": {"us_aqi": 42}})) }),
    );
    let stub_base = serve(stub).await;

    let client = SafeJsonClient::new(Duration::from_secs(2)).unwrap();
    let state = AppState::new(AirQualityClient::with_endpoint(
        client,
        format!("{stub_base}/v1/air-quality"),
    ));
    let base = serve(build_router(state)).await;

    let body: Value = reqwest::get(format!("{base}/api/air-quality?lat=10&lon=20"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["current"]["us_aqi"], 42);
}

#[tokio::test]
async fn air_quality_rejects_out_of_range_coordinates() {
    let client = SafeJsonClient::new(Duration::from_secs(2)).unwrap();
    let state = AppState::new(AirQualityClient::new(client));
    let base = serve(build_router(state)).await;

    let response = reqwest::get(format!("{base}/api/air-quality?lat=95&lon=20"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
