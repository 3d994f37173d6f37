//! Integration Tests for the Concurrent Cache Engine
//!
//! Exercises the public API end to end, including concurrent callers and
//! the background sweeper.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lru_sweep::{CacheError, ConcurrentLruCache};

// == Helper Functions ==

const SWEEP_PERIOD: Duration = Duration::from_millis(200);

fn create_test_cache() -> ConcurrentLruCache<String, i32> {
    ConcurrentLruCache::with_sweep_period(100, SWEEP_PERIOD).unwrap()
}

fn put_all(cache: &ConcurrentLruCache<String, i32>, range: std::ops::RangeInclusive<i32>) {
    for i in range {
        cache.put(i.to_string(), i).unwrap();
    }
}

// == Put ==

#[tokio::test]
async fn test_duplicate_put_is_rejected() {
    let cache = create_test_cache();

    cache.put("1".to_string(), 1).unwrap();
    let result = cache.put("1".to_string(), 1);

    assert!(matches!(result, Err(CacheError::DuplicateKey(_))));
    assert_eq!(cache.get("1"), Some(1));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_keys_in_recency_order() {
    let cache = create_test_cache();

    put_all(&cache, 1..=3);

    assert_eq!(cache.keys(), vec!["3", "2", "1"]);
}

#[tokio::test]
async fn test_put_then_get_roundtrip() {
    let cache = create_test_cache();

    put_all(&cache, 1..=5);
    cache.put("k".to_string(), 42).unwrap();
    cache.get("3");

    assert_eq!(cache.get("k"), Some(42));
    assert_eq!(cache.keys().first().map(String::as_str), Some("k"));
}

#[tokio::test]
async fn test_put_never_exceeds_capacity() {
    let cache = create_test_cache();

    put_all(&cache, 1..=100);
    assert_eq!(cache.len(), 100);

    // Overflowing put trims to 80 first, then inserts
    cache.put("101".to_string(), 101).unwrap();
    assert_eq!(cache.len(), 81);
    assert!(!cache.contains("1"));
    assert!(!cache.contains("20"));
    assert!(cache.contains("21"));
    assert_eq!(cache.keys().first().map(String::as_str), Some("101"));
}

// == Sweeper ==

#[tokio::test]
async fn test_sweeper_trims_to_threshold() {
    let cache = create_test_cache();

    put_all(&cache, 1..=83);
    assert_eq!(cache.len(), 83);

    tokio::time::sleep(SWEEP_PERIOD + Duration::from_millis(100)).await;

    assert_eq!(cache.len(), 80);
    for gone in ["1", "2", "3"] {
        assert!(!cache.contains(gone), "{} should have been evicted", gone);
    }
    for i in 4..=83 {
        assert!(cache.contains(i.to_string().as_str()));
    }

    cache.shutdown().await;
}

#[tokio::test]
async fn test_sweeper_respects_recent_reads() {
    let cache = create_test_cache();

    put_all(&cache, 1..=83);
    cache.get("1");

    tokio::time::sleep(SWEEP_PERIOD + Duration::from_millis(100)).await;

    assert_eq!(cache.len(), 80);
    assert!(cache.contains("1"));
    assert!(!cache.contains("2"));
    assert!(!cache.contains("3"));
    assert!(!cache.contains("4"));

    let stats = cache.stats();
    assert_eq!(stats.evictions, 3);
    assert!(stats.sweeps >= 1);

    cache.shutdown().await;
}

// == Concurrency ==

#[tokio::test]
async fn test_concurrent_deletes_exactly_one_wins() {
    let cache = create_test_cache();
    put_all(&cache, 1..=4);

    let successes = AtomicUsize::new(0);
    let not_found = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| match cache.delete("2") {
                Ok(()) => {
                    successes.fetch_add(1, Ordering::SeqCst);
                }
                Err(CacheError::NotFound(_)) => {
                    not_found.fetch_add(1, Ordering::SeqCst);
                }
                Err(other) => panic!("unexpected error: {}", other),
            });
        }
    });

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(not_found.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.keys().len(), 3);
    assert_eq!(cache.get("2"), None);
    assert_eq!(cache.get("3"), Some(3));
}

#[tokio::test]
async fn test_concurrent_updates_last_write_wins() {
    let cache = create_test_cache();
    put_all(&cache, 1..=4);

    let values = [1, 11, 111, 1111];
    thread::scope(|scope| {
        for value in values {
            let cache = &cache;
            scope.spawn(move || cache.update("1", value).unwrap());
        }
    });

    assert_eq!(cache.len(), 4);
    assert_eq!(cache.keys().len(), 4);
    let stored = cache.get("1").unwrap();
    assert!(values.contains(&stored));
    assert_eq!(cache.get("2"), Some(2));
}

#[tokio::test]
async fn test_concurrent_updates_distinct_keys() {
    let cache = create_test_cache();
    put_all(&cache, 1..=4);

    thread::scope(|scope| {
        for i in 1..=4 {
            let cache = &cache;
            scope.spawn(move || cache.update(i.to_string().as_str(), i * 11).unwrap());
        }
    });

    for i in 1..=4 {
        assert_eq!(cache.get(i.to_string().as_str()), Some(i * 11));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_mixed_load_with_sweeper() {
    let cache: ConcurrentLruCache<String, i32> =
        ConcurrentLruCache::with_sweep_period(100, Duration::from_millis(5)).unwrap();

    thread::scope(|scope| {
        for worker in 0..8 {
            let cache = &cache;
            scope.spawn(move || {
                for step in 0..2_000 {
                    let key = ((step * 31 + worker * 7) % 250).to_string();
                    match step % 4 {
                        0 | 1 => {
                            let _ = cache.put(key, step);
                        }
                        2 => {
                            cache.get(key.as_str());
                        }
                        _ => {
                            let _ = cache.delete(key.as_str());
                        }
                    }
                    assert!(cache.len() <= cache.capacity());
                }
            });
        }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(cache.len() <= cache.threshold());

    cache.shutdown().await;
}

// == Clear ==

#[tokio::test]
async fn test_clear_empty_cache() {
    let cache = create_test_cache();

    cache.clear();

    assert_eq!(cache.len(), 0);
    assert!(cache.keys().is_empty());
}

#[tokio::test]
async fn test_concurrent_clear() {
    let cache = create_test_cache();
    put_all(&cache, 1..=3);
    assert_eq!(cache.len(), 3);

    cache.clear();
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| cache.clear());
        }
    });

    assert_eq!(cache.len(), 0);
    assert!(cache.keys().is_empty());
}

// == Update / Delete misses ==

#[tokio::test]
async fn test_update_and_delete_missing_key() {
    let cache = create_test_cache();
    put_all(&cache, 1..=2);

    assert!(matches!(cache.update("9", 9), Err(CacheError::NotFound(_))));
    assert!(matches!(cache.delete("9"), Err(CacheError::NotFound(_))));
    assert_eq!(cache.keys(), vec!["2", "1"]);
    assert_eq!(cache.get("9"), None);
}

// == Teardown ==

#[tokio::test]
async fn test_shutdown_is_deterministic() {
    let cache = create_test_cache();
    assert!(cache.is_sweeper_running());

    cache.shutdown().await;
    assert!(!cache.is_sweeper_running());

    put_all(&cache, 1..=90);
    tokio::time::sleep(SWEEP_PERIOD * 2).await;
    assert_eq!(cache.len(), 90);
}
