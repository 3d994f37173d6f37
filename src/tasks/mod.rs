//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Sweeper: trims the cache back to its threshold at a fixed period

mod sweeper;

pub use sweeper::{spawn_sweeper, MIN_SWEEP_PERIOD};
