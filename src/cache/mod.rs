//! Cache Module
//!
//! Provides the in-memory LRU cache engine with threshold eviction.

mod engine;
mod lru;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use engine::ConcurrentLruCache;
pub use lru::{NodeId, RecencyList};
pub use stats::CacheStats;
pub use store::LruStore;

// == Public Constants ==
/// Percentage of capacity the cache is trimmed back to by an eviction pass
pub const EVICTION_FACTOR_PERCENT: usize = 80;

/// Default interval between background sweeps
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(10);

// == Threshold ==
/// Returns `floor(capacity * 0.8)`, computed without floating point.
pub fn threshold_for(capacity: usize) -> usize {
    capacity / 100 * EVICTION_FACTOR_PERCENT + capacity % 100 * EVICTION_FACTOR_PERCENT / 100
}
