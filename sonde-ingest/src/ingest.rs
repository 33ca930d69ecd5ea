//! Ingestion orchestrator
//!
//! Fans out the 24 hourly fetches concurrently and joins on all of them
//! before any aggregation happens. Per-hour error isolation: an hour that
//! fails to fetch or parse degrades to an empty `ok: false` extraction and
//! never aborts its siblings, so the worst case is a snapshot with zero
//! tracks and 24 hour diagnostics, never a failed run.

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};

use sonde_common::SafeJsonClient;

use crate::normalize::normalize;
use crate::tracks::assemble;
use crate::types::{ConstellationSnapshot, HourlyExtraction, HOURS_PER_CYCLE};

/// Coordinates one full ingestion cycle over the 24 hourly files
#[derive(Debug, Clone)]
pub struct Ingestor {
    client: SafeJsonClient,
    base_url: String,
}

impl Ingestor {
    /// Create an orchestrator for `<base_url>/<NN>.json`, NN = 00..23
    pub fn new(client: SafeJsonClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of one hour-file (zero-padded index)
    pub fn hour_url(&self, hour_index: u8) -> String {
        format!("{}/{:02}.json", self.base_url, hour_index)
    }

    /// Run one complete cycle: fetch, normalize and assemble
    ///
    /// Infallible by design; failures are captured in the per-hour
    /// extractions. Each invocation builds a fresh snapshot and shares no
    /// state with previous cycles.
    pub async fn run(&self) -> ConstellationSnapshot {
        let fetches = (0..HOURS_PER_CYCLE).map(|hour_index| {
            let url = self.hour_url(hour_index);
            async move {
                match self.client.fetch_json(&url).await {
                    Ok(data) => {
                        let positions = normalize(&data, hour_index);
                        debug!(
                            hour_index,
                            positions = positions.len(),
                            "Hour file extracted"
                        );
                        HourlyExtraction::success(hour_index, positions)
                    }
                    Err(failure) => {
                        warn!(
                            hour_index,
                            error = %failure,
                            "Hour file failed (isolated, siblings unaffected)"
                        );
                        HourlyExtraction::failure(hour_index, failure.to_string())
                    }
                }
            }
        });

        // join_all preserves input order: extracted_by_hour[i] is hour i
        let extracted_by_hour = join_all(fetches).await;
        let tracks = assemble(&extracted_by_hour);

        let failed_hours = extracted_by_hour.iter().filter(|h| !h.ok).count();
        let snapshot = ConstellationSnapshot {
            extracted_by_hour,
            tracks,
            refreshed_at: Utc::now(),
        };

        info!(
            tracks = snapshot.tracks.len(),
            points = snapshot.total_points(),
            failed_hours,
            "Ingestion cycle complete"
        );

        snapshot
    }
}
