//! LRU Sweep soak driver
//!
//! Runs worker threads against a shared cache and reports statistics
//! until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_sweep::{CacheError, Config, ConcurrentLruCache};

type SharedCache = Arc<ConcurrentLruCache<String, u64>>;

/// Main entry point for the soak driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache (this also starts the sweeper)
/// 4. Start worker threads and the stats reporter
/// 5. On SIGINT/SIGTERM, stop workers, tear down the sweeper, print final stats
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_sweep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LRU Sweep soak driver");

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, sweep_interval={}ms, workers={}, key_space={}, report_interval={}s",
        config.capacity,
        config.sweep_interval_ms,
        config.workers,
        config.key_space,
        config.report_interval
    );

    let cache: SharedCache = Arc::new(ConcurrentLruCache::with_sweep_period(
        config.capacity,
        config.sweep_period(),
    )?);

    let stop = Arc::new(AtomicBool::new(false));
    let workers: Vec<JoinHandle<u64>> = (0..config.workers)
        .map(|id| {
            let cache = cache.clone();
            let stop = stop.clone();
            let key_space = config.key_space.max(1);
            tokio::task::spawn_blocking(move || run_worker(id as u64, &cache, &stop, key_space))
        })
        .collect();
    info!("{} workers started", workers.len());

    let reporter = spawn_reporter(cache.clone(), config.report_period());

    shutdown_signal().await;

    stop.store(true, Ordering::Relaxed);
    reporter.abort();

    let mut total_ops = 0;
    for worker in workers {
        total_ops += worker.await?;
    }
    cache.shutdown().await;

    info!(
        "Soak finished after {} operations, final stats: {}",
        total_ops,
        serde_json::to_string(&cache.stats())?
    );
    Ok(())
}

/// Issues a fixed mix of operations until `stop` is set.
///
/// Returns the number of operations performed.
fn run_worker(
    id: u64,
    cache: &ConcurrentLruCache<String, u64>,
    stop: &AtomicBool,
    key_space: u64,
) -> u64 {
    let mut step: u64 = 0;

    while !stop.load(Ordering::Relaxed) {
        let slot = step.wrapping_mul(7919).wrapping_add(id * 104_729) % key_space;
        let key = format!("key:{}", slot);

        match step % 10 {
            0..=3 => {
                cache.get(key.as_str());
            }
            4..=6 => {
                if let Err(CacheError::DuplicateKey(_)) = cache.put(key.clone(), step) {
                    // Racing writers may also delete it in between
                    if let Err(err) = cache.update(key.as_str(), step) {
                        debug!(worker = id, "update after duplicate put skipped: {}", err);
                    }
                }
            }
            7..=8 => {
                if let Err(err) = cache.update(key.as_str(), step) {
                    debug!(worker = id, "update skipped: {}", err);
                }
            }
            _ => {
                if let Err(err) = cache.delete(key.as_str()) {
                    debug!(worker = id, "delete skipped: {}", err);
                }
            }
        }

        step += 1;
    }

    step
}

/// Logs a JSON stats snapshot every `period`.
fn spawn_reporter(cache: SharedCache, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately; skip the empty report
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match serde_json::to_string(&cache.stats()) {
                Ok(json) => info!("Stats: {}", json),
                Err(err) => warn!("Failed to serialize stats: {}", err),
            }
        }
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
