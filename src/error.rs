//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
///
/// A lookup miss on `get` is not an error; it is reported as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Put was called for a key that is already cached
    #[error("Key already exists: {0}. Try update instead")]
    DuplicateKey(String),

    /// Update or delete was called for a key that is not cached
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The cache was built with a capacity of zero
    #[error("Invalid capacity: {0}, capacity must be at least 1")]
    InvalidCapacity(usize),

    /// The engine was built outside a tokio runtime, so no sweeper can run
    #[error("No tokio runtime available to run the sweeper")]
    NoRuntime,
}

impl CacheError {
    /// Builds a `DuplicateKey` error from any debug-printable key.
    pub(crate) fn duplicate_key<Q: std::fmt::Debug + ?Sized>(key: &Q) -> Self {
        CacheError::DuplicateKey(format!("{:?}", key))
    }

    /// Builds a `NotFound` error from any debug-printable key.
    pub(crate) fn not_found<Q: std::fmt::Debug + ?Sized>(key: &Q) -> Self {
        CacheError::NotFound(format!("{:?}", key))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
