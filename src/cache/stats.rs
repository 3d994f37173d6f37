//! Cache Statistics Module
//!
//! Tracks cache metrics including hits, misses, evictions, and sweeps.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found their key
    pub hits: u64,
    /// Number of lookups that missed
    pub misses: u64,
    /// Number of entries removed by eviction passes
    pub evictions: u64,
    /// Number of sweeper ticks that have run
    pub sweeps: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// When the sweeper last ran
    pub last_sweep_at: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Adds `count` evicted entries.
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Record Sweep ==
    /// Counts a sweeper tick and stamps its time.
    pub fn record_sweep(&mut self) {
        self.sweeps += 1;
        self.last_sweep_at = Some(Utc::now());
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
