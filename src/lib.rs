//! LRU Sweep - A fixed-capacity, thread-safe in-process LRU cache
//!
//! Evicts least recently used entries down to 80% of capacity, both inline
//! when a put would overflow and periodically from a background sweeper.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, ConcurrentLruCache, LruStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweeper;
