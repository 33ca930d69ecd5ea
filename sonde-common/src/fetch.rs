//! Bounded JSON-over-HTTP fetch primitive
//!
//! One GET, one timeout, no retries. Every failure mode is folded into a
//! value the caller can inspect; nothing at this layer panics or propagates
//! a raw transport fault. Retry policy belongs to the caller's polling
//! cadence, not here.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{Error, Result};

/// Default per-request timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 12_000;

/// Outcome of a single bounded fetch, before any payload decoding
#[derive(Debug, Clone)]
pub enum RawFetchOutcome {
    /// 2xx response with its body text
    Success { body: String },
    /// Non-2xx response
    HttpError { code: u16, message: String },
    /// Connection fault or timeout
    NetworkError { message: String },
}

/// Fetch/parse failure taxonomy surfaced to per-item diagnostics
///
/// Display strings intentionally carry the source URL so a failed item can
/// be reported without further context.
#[derive(Debug, Clone, Error)]
pub enum FetchFailure {
    /// Non-2xx status from the upstream
    #[error("HTTP {code} from {url}")]
    Http { code: u16, url: String },

    /// Connection fault or timeout
    #[error("Fetch failed for {url}: {message}")]
    Network { url: String, message: String },

    /// Body text was not valid JSON
    #[error("Invalid JSON from {url}: {message}")]
    Parse { url: String, message: String },
}

/// HTTP client wrapper that never lets a transport fault escape as a panic
/// or an unhandled error
#[derive(Debug, Clone)]
pub struct SafeJsonClient {
    http_client: reqwest::Client,
}

impl SafeJsonClient {
    /// Create a client with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Create a client with the default 12 second timeout
    pub fn with_default_timeout() -> Result<Self> {
        Self::new(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    /// Perform one GET and classify the result
    ///
    /// Single attempt. The timeout is owned by the request and released on
    /// every exit path, success or failure.
    pub async fn fetch_text(&self, url: &str) -> RawFetchOutcome {
        debug!(url = %url, "Fetching");

        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return RawFetchOutcome::NetworkError {
                    message: describe_transport_error(&e),
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return RawFetchOutcome::HttpError {
                code: status.as_u16(),
                message: format!("HTTP {} from {}", status.as_u16(), url),
            };
        }

        match response.text().await {
            Ok(body) => RawFetchOutcome::Success { body },
            Err(e) => RawFetchOutcome::NetworkError {
                message: describe_transport_error(&e),
            },
        }
    }

    /// Fetch and decode a JSON document
    ///
    /// Combines [`Self::fetch_text`] with [`parse_body`]; every failure mode
    /// collapses into a [`FetchFailure`] carrying the source URL.
    pub async fn fetch_json(&self, url: &str) -> std::result::Result<Value, FetchFailure> {
        match self.fetch_text(url).await {
            RawFetchOutcome::Success { body } => parse_body(url, &body),
            RawFetchOutcome::HttpError { code, .. } => Err(FetchFailure::Http {
                code,
                url: url.to_string(),
            }),
            RawFetchOutcome::NetworkError { message } => Err(FetchFailure::Network {
                url: url.to_string(),
                message,
            }),
        }
    }
}

/// Decode a response body as JSON
///
/// Malformed payloads become [`FetchFailure::Parse`] with the decoder's own
/// message preserved for diagnostics.
pub fn parse_body(url: &str, body: &str) -> std::result::Result<Value, FetchFailure> {
    serde_json::from_str(body).map_err(|e| FetchFailure::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}
