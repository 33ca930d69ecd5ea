//! Configuration loading and resolution
//!
//! Settings resolve in priority order: command-line argument (highest),
//! environment variable, TOML config file, compiled default. The CLI and
//! env tiers are handled by clap in the service binary; this module owns the
//! TOML tier and the final merge.

use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Default upstream base URL (hour files live at `<base>/<NN>.json`)
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://a.windbornesystems.com/treasure";

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5731;

/// Default refresh period between ingestion cycles (seconds)
pub const DEFAULT_REFRESH_SECONDS: u64 = 60;

/// Default per-request fetch timeout (milliseconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = crate::fetch::DEFAULT_TIMEOUT_MS;

/// Optional TOML config file contents
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Upstream base URL for the hourly position files
    #[serde(default)]
    pub upstream_base_url: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Seconds between ingestion cycles
    #[serde(default)]
    pub refresh_seconds: Option<u64>,

    /// Per-request fetch timeout in milliseconds
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
}

impl TomlConfig {
    /// Load a config file, failing on unreadable or malformed TOML
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {e}", path.display())))?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Malformed TOML in {}: {e}", path.display())))
    }

    /// Load a config file if a path was given, otherwise empty defaults
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upstream base URL for the hourly position files
    pub upstream_base_url: String,
    /// HTTP server port
    pub port: u16,
    /// Seconds between ingestion cycles
    pub refresh_seconds: u64,
    /// Per-request fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,
}

/// Values already resolved by the CLI/env tiers (clap), still unset if the
/// operator left them to the config file or defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub upstream_base_url: Option<String>,
    pub port: Option<u16>,
    pub refresh_seconds: Option<u64>,
    pub fetch_timeout_ms: Option<u64>,
}

impl ServiceConfig {
    /// Merge the CLI/env tier with the TOML tier and compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: &TomlConfig) -> Self {
        Self {
            upstream_base_url: overrides
                .upstream_base_url
                .or_else(|| file.upstream_base_url.clone())
                .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            refresh_seconds: overrides
                .refresh_seconds
                .or(file.refresh_seconds)
                .unwrap_or(DEFAULT_REFRESH_SECONDS),
            fetch_timeout_ms: overrides
                .fetch_timeout_ms
                .or(file.fetch_timeout_ms)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}
