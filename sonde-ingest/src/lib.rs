//! sonde-ingest library interface
//!
//! Ingests the 24 hourly balloon position files, normalizes their drifting
//! schemas into identity-stable tracks, and serves the latest snapshot over
//! HTTP. Exposed as a library for integration testing.

pub mod airquality;
pub mod api;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod normalize;
pub mod tracks;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::airquality::AirQualityClient;
use crate::types::ConstellationSnapshot;

/// Application state shared across handlers and the refresh task
///
/// The snapshot is replaced wholesale at the end of each cycle, never
/// mutated in place. Overlapping cycles are not serialized; the last one to
/// finish wins, which is acceptable for this read-mostly surface.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<RwLock<Arc<ConstellationSnapshot>>>,
    /// Air quality lookup collaborator
    pub air_quality: AirQualityClient,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    cycles: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(air_quality: AirQualityClient) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(ConstellationSnapshot::empty()))),
            air_quality,
            startup_time: Utc::now(),
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Latest completed snapshot
    pub async fn snapshot(&self) -> Arc<ConstellationSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Swap in a freshly built snapshot
    pub async fn replace_snapshot(&self, snapshot: ConstellationSnapshot) {
        *self.snapshot.write().await = Arc::new(snapshot);
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Completed ingestion cycles since startup
    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::snapshot_routes())
        .merge(api::air_quality_routes())
        .merge(api::health_routes())
        .with_state(state)
}
