//! # Sonde Common Library
//!
//! Shared code for the sonde services including:
//! - Error types
//! - Configuration loading
//! - Bounded JSON-over-HTTP fetch primitive

pub mod config;
pub mod error;
pub mod fetch;

pub use error::{Error, Result};
pub use fetch::{FetchFailure, RawFetchOutcome, SafeJsonClient};
