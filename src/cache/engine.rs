//! Concurrent Cache Engine
//!
//! Thread-safe front for [`LruStore`] that owns the background sweeper.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStats, LruStore, DEFAULT_SWEEP_PERIOD};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper, MIN_SWEEP_PERIOD};

// == Concurrent LRU Cache ==
/// Fixed-capacity LRU cache safe to share between threads.
///
/// A single mutex guards the whole store. Every operation, and every
/// sweeper pass, holds it for its entire duration, so all operations are
/// linearizable with respect to each other.
///
/// The sweeper starts at construction and stops on [`shutdown`] or when
/// the cache is dropped.
///
/// [`shutdown`]: ConcurrentLruCache::shutdown
#[derive(Debug)]
pub struct ConcurrentLruCache<K, V> {
    store: Arc<Mutex<LruStore<K, V>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    sweep_period: Duration,
}

impl<K, V> ConcurrentLruCache<K, V>
where
    K: Hash + Eq + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructors ==
    /// Creates a cache that sweeps every [`DEFAULT_SWEEP_PERIOD`].
    ///
    /// # Errors
    /// `InvalidCapacity` if `capacity` is zero, `NoRuntime` if called
    /// outside a tokio runtime.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_sweep_period(capacity, DEFAULT_SWEEP_PERIOD)
    }

    /// Creates a cache with a custom sweep period.
    ///
    /// Periods shorter than [`MIN_SWEEP_PERIOD`] are raised to it.
    pub fn with_sweep_period(capacity: usize, sweep_period: Duration) -> Result<Self> {
        let sweep_period = sweep_period.max(MIN_SWEEP_PERIOD);
        let _runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let store = Arc::new(Mutex::new(LruStore::new(capacity)?));
        let sweeper = spawn_sweeper(store.clone(), sweep_period);

        info!("LRU cache created: capacity={}, sweep_period={:?}", capacity, sweep_period);

        Ok(Self {
            store,
            sweeper: Mutex::new(Some(sweeper)),
            sweep_period,
        })
    }

    // == Operations ==
    /// Inserts a new entry. See [`LruStore::put`].
    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.store.lock().put(key, value)
    }

    /// Looks up a value and marks it most recently used. See [`LruStore::get`].
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().get(key)
    }

    /// Returns a clone of the value without touching recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().peek(key).cloned()
    }

    /// Checks if a key is cached, without touching recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().contains(key)
    }

    /// Replaces an existing value in place. See [`LruStore::update`].
    pub fn update<Q>(&self, key: &Q, value: V) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.store.lock().update(key, value)
    }

    /// Removes an entry. See [`LruStore::delete`].
    pub fn delete<Q>(&self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.store.lock().delete(key)
    }

    /// Drops every entry. Calling it on an empty cache is a no-op.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    // == Queries ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Snapshot of keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.store.lock().keys()
    }

    // == Limits ==
    /// Fixed upper bound set at construction.
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    /// Size eviction passes trim the cache back to: `floor(capacity * 0.8)`.
    pub fn threshold(&self) -> usize {
        self.store.lock().threshold()
    }

    /// Interval the sweeper actually runs at.
    pub fn sweep_period(&self) -> Duration {
        self.sweep_period
    }

    // == Stats ==
    /// Returns a snapshot of cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    // == Teardown ==
    /// Returns true while the sweeper task is alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stops the sweeper and waits for the task to finish.
    ///
    /// Cached entries stay readable afterwards; they are just no longer
    /// swept in the background. Calling it twice is a no-op.
    pub async fn shutdown(&self) {
        let handle = self.sweeper.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            // Cancellation is the expected outcome here
            let _ = handle.await;
            info!("Eviction sweeper stopped");
        }
    }
}

impl<K, V> Drop for ConcurrentLruCache<K, V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}
