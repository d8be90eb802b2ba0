//! Environment-driven configuration, loaded once before any day is processed.

use crate::error::{CleanError, CleanResult};

/// Bucket used by the original deployment when `MINIO_BUCKET` is not set.
pub const DEFAULT_BUCKET: &str = "grupo5";

/// MinIO/S3 connection settings. Credentials come from the environment
/// (usually via `.env`); a missing value aborts the run before the first day.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

impl StorageConfig {
    pub fn from_env() -> CleanResult<Self> {
        Ok(Self {
            endpoint: require_env("MINIO_ENDPOINT")?,
            access_key: require_env("MINIO_ACCESS_KEY")?,
            secret_key: require_env("MINIO_SECRET_KEY")?,
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
        })
    }
}

fn require_env(name: &str) -> CleanResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CleanError::Config(format!("{name} is not set"))),
    }
}

/// Tunable cleaning thresholds. The defaults are the values the production
/// pipeline has always run with.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Rows with a non-null delay outside ±this band are dropped as noise.
    pub max_abs_delay_seconds: f64,
    /// Prior-row window of the rolling delay mean per route and direction.
    pub route_rolling_window: usize,
    /// Prior-row window of the rolling delay mean within a trip.
    pub trip_rolling_window: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            max_abs_delay_seconds: 9000.0,
            route_rolling_window: 5,
            trip_rolling_window: 3,
        }
    }
}
