//! Cache Store Module
//!
//! Single-threaded cache engine combining the recency list, the position
//! index and the value store. [`crate::cache::ConcurrentLruCache`] wraps it
//! in a mutex; on its own it is not thread-safe.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use ahash::RandomState;
use tracing::debug;

use crate::cache::{threshold_for, CacheStats, NodeId, RecencyList};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Fixed-capacity LRU store that trims itself back to a threshold.
///
/// All four pieces of state (`order`, `index`, `values`, `size`) change
/// together inside each method, so they agree whenever a method returns.
#[derive(Debug)]
pub struct LruStore<K, V> {
    /// Keys by recency, head = most recent
    order: RecencyList<K>,
    /// Key -> node in `order`
    index: HashMap<K, NodeId, RandomState>,
    /// Key -> value
    values: HashMap<K, V, RandomState>,
    /// Live entry count
    size: usize,
    capacity: usize,
    threshold: usize,
    stats: CacheStats,
}

impl<K, V> LruStore<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Errors
    /// `InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            order: RecencyList::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            values: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            size: 0,
            capacity,
            threshold: threshold_for(capacity),
            stats: CacheStats::new(),
        })
    }

    // == Put ==
    /// Inserts a new entry at the head of the recency order.
    ///
    /// If the insert would push the size past capacity, an eviction pass
    /// runs first and trims the store down to the threshold.
    ///
    /// # Errors
    /// `DuplicateKey` if the key is already cached. Nothing changes.
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        if self.index.contains_key(&key) {
            return Err(CacheError::duplicate_key(&key));
        }

        if self.size + 1 > self.capacity {
            let evicted = self.evict();
            debug!(evicted, size = self.size, "Evicted entries to make room for put");
        }

        let id = self.order.push_front(key.clone());
        self.index.insert(key.clone(), id);
        self.values.insert(key, value);
        self.size += 1;
        self.stats.set_total_entries(self.size);

        Ok(())
    }

    // == Get ==
    /// Returns a clone of the value and marks the key most recently used.
    ///
    /// A miss returns `None`.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&id) => {
                self.order.move_to_front(id);
                self.stats.record_hit();
                self.values.get(key).cloned()
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the value without touching recency order or stats.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.get(key)
    }

    /// Checks if a key is cached, without touching recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Update ==
    /// Replaces the value of an existing key in place.
    ///
    /// Recency order is left alone.
    ///
    /// # Errors
    /// `NotFound` if the key is not cached. Nothing changes.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(CacheError::not_found(key)),
        }
    }

    // == Delete ==
    /// Removes an entry from every structure.
    ///
    /// # Errors
    /// `NotFound` if the key is not cached. Nothing changes.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let id = self
            .index
            .remove(key)
            .ok_or_else(|| CacheError::not_found(key))?;

        self.order.remove(id);
        self.values.remove(key);
        self.size -= 1;
        self.stats.set_total_entries(self.size);

        Ok(())
    }

    // == Clear ==
    /// Drops every entry. Counters other than `total_entries` are kept.
    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
        self.values.clear();
        self.size = 0;
        self.stats.set_total_entries(0);
    }

    // == Evict ==
    /// Removes least recently used entries until size <= threshold.
    ///
    /// Returns the number of entries removed.
    pub fn evict(&mut self) -> usize {
        let mut evicted = 0;

        while self.size > self.threshold {
            let Some(key) = self.order.pop_back() else {
                break;
            };
            self.index.remove(&key);
            self.values.remove(&key);
            self.size -= 1;
            evicted += 1;
        }

        self.stats.record_evictions(evicted);
        self.stats.set_total_entries(self.size);
        evicted
    }

    // == Sweep ==
    /// Eviction pass run by the background sweeper; also counts the sweep.
    pub fn sweep(&mut self) -> usize {
        let evicted = self.evict();
        self.stats.record_sweep();
        evicted
    }

    // == Keys ==
    /// Snapshot of keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.order.iter().cloned().collect()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size the store is trimmed back to once it runs over.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.size);
        stats
    }

    /// Panics unless the recency list, index, values and size agree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.size, self.order.len(), "size vs recency list");
        assert_eq!(self.size, self.index.len(), "size vs position index");
        assert_eq!(self.size, self.values.len(), "size vs value store");

        let mut walked = 0;
        for key in self.order.iter() {
            let id = self.index.get(key).expect("listed key missing from index");
            assert_eq!(self.order.key(*id), Some(key), "index points at wrong node");
            assert!(self.values.contains_key(key), "listed key missing from values");
            walked += 1;
        }
        assert_eq!(walked, self.size, "list walk length");
    }
}
