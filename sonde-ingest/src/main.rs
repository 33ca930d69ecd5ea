//! sonde-ingest - Balloon constellation ingestion service
//!
//! Polls the 24 hourly position files from the upstream constellation API,
//! tolerates per-file schema drift and corruption, reconstructs per-balloon
//! tracks, and serves the latest snapshot (plus an air-quality lookup for
//! the selected point) over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sonde_common::config::{ConfigOverrides, ServiceConfig, TomlConfig};
use sonde_common::SafeJsonClient;
use sonde_ingest::airquality::AirQualityClient;
use sonde_ingest::ingest::Ingestor;
use sonde_ingest::{build_router, AppState};

/// Command-line arguments for sonde-ingest
#[derive(Parser, Debug)]
#[command(name = "sonde-ingest")]
#[command(about = "Balloon constellation ingestion service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SONDE_PORT")]
    port: Option<u16>,

    /// Upstream base URL for the hourly position files
    #[arg(short, long, env = "SONDE_UPSTREAM_BASE_URL")]
    upstream_base_url: Option<String>,

    /// Seconds between ingestion cycles
    #[arg(short, long, env = "SONDE_REFRESH_SECONDS")]
    refresh_seconds: Option<u64>,

    /// Per-request fetch timeout in milliseconds
    #[arg(long, env = "SONDE_FETCH_TIMEOUT_MS")]
    fetch_timeout_ms: Option<u64>,

    /// Path to a TOML config file
    #[arg(short, long, env = "SONDE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sonde_ingest=info,sonde_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // CLI/env (clap) > TOML file > compiled defaults
    let file = TomlConfig::load_optional(args.config.as_deref())
        .context("Failed to load config file")?;
    let config = ServiceConfig::resolve(
        ConfigOverrides {
            upstream_base_url: args.upstream_base_url,
            port: args.port,
            refresh_seconds: args.refresh_seconds,
            fetch_timeout_ms: args.fetch_timeout_ms,
        },
        &file,
    );

    info!("Starting sonde-ingest v{}", env!("CARGO_PKG_VERSION"));
    info!("Upstream: {}", config.upstream_base_url);
    info!(
        "Refresh every {}s, fetch timeout {}ms",
        config.refresh_seconds, config.fetch_timeout_ms
    );

    let client = SafeJsonClient::new(Duration::from_millis(config.fetch_timeout_ms))
        .context("Failed to build HTTP client")?;
    let ingestor = Ingestor::new(client.clone(), config.upstream_base_url.clone());
    let state = AppState::new(AirQualityClient::new(client));

    // Background refresh: each cycle builds a private snapshot and swaps it
    // in wholesale. Cycles are deliberately not serialized against each
    // other; the last writer wins.
    let refresh_state = state.clone();
    let refresh_period = Duration::from_secs(config.refresh_seconds.max(1));
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(refresh_period);
        loop {
            tick.tick().await;
            let snapshot = ingestor.run().await;
            for line in snapshot.extracted_by_hour.iter().filter_map(|h| h.diagnostic()) {
                warn!("{line}");
            }
            refresh_state.replace_snapshot(snapshot).await;
        }
    });

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
