//! Subtitle/logo processing worker binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subfuse_worker::{
    run_self_checks, TranslationCache, TempManager, WorkerConfig, WorkerPool,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("subfuse=info".parse().expect("static directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting subfuse-worker");

    let config = match WorkerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_self_checks(&config) {
        error!("Startup self checks failed: {e}");
        std::process::exit(1);
    }

    if config.dry_run {
        info!("Dry run requested, exiting after self checks");
        return;
    }

    let temp = match TempManager::new(&config.work_dir) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("Cannot prepare work directory: {e}");
            std::process::exit(1);
        }
    };
    let swept = temp.sweep_orphans(config.orphan_max_age);
    info!(swept, "startup orphan sweep done");

    let cache = Arc::new(TranslationCache::new(&config.cache_file));
    cache.load();

    let pool = match config.max_jobs {
        Some(n) => Arc::new(WorkerPool::new(n.max(1))),
        None => Arc::new(WorkerPool::sized_from_host()),
    };
    info!(capacity = pool.capacity(), "worker pool ready");

    // The chat transport binds Handlers to its update stream here; it is
    // provided by the deployment, not this crate.
    info!("Worker ready, waiting for shutdown signal");
    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal");

    pool.shutdown();
    if !pool.drain_timeout(config.shutdown_timeout).await {
        error!("Shutdown timeout reached with jobs still running");
    }
    if let Err(e) = cache.save() {
        error!("Final cache save failed: {e}");
    }

    info!("Worker shutdown complete");
}
