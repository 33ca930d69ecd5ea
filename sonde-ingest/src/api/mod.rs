//! HTTP API surface
//!
//! Read-only view over the latest ingestion snapshot plus the proxied
//! air-quality lookup. Consumers (map, details panel) read only these
//! endpoints; they never observe a partially-built cycle.

pub mod airquality;
pub mod health;
pub mod snapshot;

pub use airquality::air_quality_routes;
pub use health::health_routes;
pub use snapshot::snapshot_routes;
