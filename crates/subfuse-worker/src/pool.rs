//! Bounded worker pool for transcode jobs.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Semaphore};
use tracing::{debug, info, warn};

/// Fixed-capacity pool executing jobs as tokio tasks.
///
/// Submission never blocks the caller: the task is spawned immediately and
/// waits on the semaphore for a free worker slot. After shutdown, queued
/// tasks that have not yet taken a permit are dropped.
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    shutdown: watch::Sender<bool>,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            shutdown,
        }
    }

    /// Size the pool from the host: logical cores, clamped to at least 2 and
    /// at most the available memory in whole GiB (one heavy transcode per
    /// GiB), never below 2.
    pub fn sized_from_host() -> Self {
        let cores = num_cpus::get();
        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let avail_gib = (sys.available_memory() / (1024 * 1024 * 1024)) as usize;

        let upper = avail_gib.max(2);
        let capacity = cores.clamp(2, upper);
        info!(cores, avail_gib, capacity, "sized worker pool from host");
        Self::new(capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available_workers(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Submit a job. Returns false if the pool is shutting down.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if *self.shutdown.borrow() {
            warn!("pool is shutting down, job rejected");
            return false;
        }

        let semaphore = Arc::clone(&self.semaphore);
        let mut shutdown_rx = self.shutdown.subscribe();
        tokio::spawn(async move {
            // A receiver subscribed after the shutdown send gets no change
            // notification; the current value has to be checked first.
            if *shutdown_rx.borrow_and_update() {
                debug!("shutdown before job started, dropping queued job");
                return;
            }
            let permit = tokio::select! {
                permit = semaphore.acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => return,
                },
                _ = shutdown_rx.changed() => {
                    debug!("shutdown before job started, dropping queued job");
                    return;
                }
            };
            let _permit = permit;
            job.await;
        });
        true
    }

    /// Signal shutdown. Queued jobs that have not started are dropped.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Wait for all in-flight jobs to complete.
    pub async fn drain(&self) {
        loop {
            if self.semaphore.available_permits() == self.capacity {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Drain with a deadline; returns false if jobs were still running.
    pub async fn drain_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.drain()).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_submission_does_not_block() {
        let pool = WorkerPool::new(1);
        let started = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let started = Arc::clone(&started);
            assert!(pool.submit(async move {
                started.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
            }));
        }

        pool.drain_timeout(Duration::from_secs(2)).await;
        assert_eq!(started.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_concurrency_bounded_by_capacity() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.submit(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }

        assert!(pool.drain_timeout(Duration::from_secs(5)).await);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_jobs() {
        let pool = WorkerPool::new(2);
        pool.shutdown();
        assert!(!pool.submit(async {}));
    }

    #[tokio::test]
    async fn test_queued_job_dropped_by_shutdown() {
        let pool = WorkerPool::new(1);
        let first = Arc::new(AtomicUsize::new(0));
        {
            let first = Arc::clone(&first);
            pool.submit(async move {
                first.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
            });
        }
        while first.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        // Queued behind the running job; shutdown lands before it starts
        let late = Arc::new(AtomicUsize::new(0));
        {
            let late = Arc::clone(&late);
            pool.submit(async move {
                late.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.shutdown();

        assert!(pool.drain_timeout(Duration::from_secs(2)).await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(late.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_host_sizing_floor() {
        let pool = WorkerPool::sized_from_host();
        assert!(pool.capacity() >= 2);
    }
}
