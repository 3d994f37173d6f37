//! Configuration Module
//!
//! Handles loading the soak driver's configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Soak driver configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Interval between background sweeps in milliseconds
    pub sweep_interval_ms: u64,
    /// Number of worker threads hammering the cache
    pub workers: usize,
    /// Number of distinct keys the workers draw from
    pub key_space: u64,
    /// Interval between stats reports in seconds
    pub report_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `SWEEP_INTERVAL_MS` - Sweep period in milliseconds (default: 10000)
    /// - `WORKERS` - Worker thread count (default: 4)
    /// - `KEY_SPACE` - Distinct keys used by workers (default: 5000)
    /// - `REPORT_INTERVAL` - Stats report frequency in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            sweep_interval_ms: env_or("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            workers: env_or("WORKERS", defaults.workers),
            key_space: env_or("KEY_SPACE", defaults.key_space),
            report_interval: env_or("REPORT_INTERVAL", defaults.report_interval),
        }
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn report_period(&self) -> Duration {
        Duration::from_secs(self.report_interval.max(1))
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            sweep_interval_ms: 10_000,
            workers: 4,
            key_space: 5000,
            report_interval: 5,
        }
    }
}
