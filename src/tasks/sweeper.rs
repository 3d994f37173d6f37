//! Eviction Sweeper Task
//!
//! Background task that periodically trims the cache back to its threshold.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::LruStore;

/// Shortest period the sweeper accepts; smaller values are raised to it.
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// Spawns a background task that runs an eviction pass every `period`.
///
/// The first pass runs as soon as the task is first polled, then once per
/// period. Each pass holds the store lock for its whole duration, so it
/// never interleaves with a caller's operation.
///
/// # Arguments
/// * `store` - shared reference to the cache store
/// * `period` - interval between eviction passes
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it on teardown.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(LruStore::<String, u64>::new(1000)?));
/// let sweeper = spawn_sweeper(store.clone(), Duration::from_secs(10));
/// // Later, during teardown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<K, V>(store: Arc<Mutex<LruStore<K, V>>>, period: Duration) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    let period = period.max(MIN_SWEEP_PERIOD);

    tokio::spawn(async move {
        info!("Starting eviction sweeper with period of {:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let (evicted, remaining) = {
                let mut guard = store.lock();
                let evicted = guard.sweep();
                (evicted, guard.len())
            };

            if evicted > 0 {
                info!("Sweep: evicted {} entries, {} remaining", evicted, remaining);
            } else {
                debug!("Sweep: nothing to evict ({} entries)", remaining);
            }
        }
    })
}
