//! Open-Meteo air quality lookup
//!
//! Environmental context for the selected track's newest point. The
//! response document is passed through opaquely; this service does not
//! interpret air-quality fields, it only guarantees the request/failure
//! envelope.

use serde_json::Value;

use sonde_common::{FetchFailure, SafeJsonClient};

const AIR_QUALITY_ENDPOINT: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
const CURRENT_FIELDS: &str = "us_aqi,pm10,pm2_5,carbon_monoxide";
const HOURLY_FIELDS: &str = "us_aqi,pm10,pm2_5";

/// Client for the Open-Meteo air quality API
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    client: SafeJsonClient,
    endpoint: String,
}

impl AirQualityClient {
    pub fn new(client: SafeJsonClient) -> Self {
        Self {
            client,
            endpoint: AIR_QUALITY_ENDPOINT.to_string(),
        }
    }

    /// Point the client at a different endpoint (used by tests)
    pub fn with_endpoint(client: SafeJsonClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch current + hourly air quality for a location
    pub async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Value, FetchFailure> {
        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}\
             &current={CURRENT_FIELDS}&hourly={HOURLY_FIELDS}&timezone=auto",
            self.endpoint
        );
        self.client.fetch_json(&url).await
    }
}
