//! Fixed-rate refresh of the product caches.
//!
//! Each job runs on its own interval. A tick spawns the job, and a tick that
//! fires while the previous run of the same job is still executing is
//! skipped. On shutdown a job waits for its in-flight run before returning.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use catalog_core::storage::Result;

use crate::cache::ProductCache;

/// Shortest period accepted by the scheduler.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A cache refresh job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshJob {
    /// Reload the full product listing.
    FindAll,
    /// Re-read the most recently updated product.
    Updated,
    /// Drop the most recently deleted product once it exists again.
    Deleted,
}

impl RefreshJob {
    pub const ALL: [RefreshJob; 3] = [RefreshJob::FindAll, RefreshJob::Updated, RefreshJob::Deleted];

    pub fn name(&self) -> &'static str {
        match self {
            RefreshJob::FindAll => "findAll",
            RefreshJob::Updated => "update",
            RefreshJob::Deleted => "delete",
        }
    }

    /// Runs the job once against `cache`.
    pub async fn run(&self, cache: &ProductCache) -> Result<()> {
        match self {
            RefreshJob::FindAll => cache.refresh_all().await.map(|_| ()),
            RefreshJob::Updated => cache.refresh_updated().await,
            RefreshJob::Deleted => cache.refresh_deleted().await,
        }
    }
}

impl fmt::Display for RefreshJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Period of each refresh job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPeriods {
    pub find_all: Duration,
    pub updated: Duration,
    pub deleted: Duration,
}

impl RefreshPeriods {
    pub fn period(&self, job: RefreshJob) -> Duration {
        match job {
            RefreshJob::FindAll => self.find_all,
            RefreshJob::Updated => self.updated,
            RefreshJob::Deleted => self.deleted,
        }
    }
}

impl Default for RefreshPeriods {
    fn default() -> Self {
        Self {
            find_all: Duration::from_millis(5000),
            updated: Duration::from_millis(3000),
            deleted: Duration::from_millis(1000),
        }
    }
}

/// Marks a job run as in flight until dropped.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    /// Returns `None` if a run already holds the flag.
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Schedules the refresh jobs against a shared `ProductCache`.
pub struct Refresher {
    cache: Arc<ProductCache>,
    periods: RefreshPeriods,
}

impl Refresher {
    pub fn new(cache: Arc<ProductCache>, periods: RefreshPeriods) -> Self {
        Self { cache, periods }
    }

    /// Spawns one scheduling task per job.
    ///
    /// Every task stops when `shutdown_tx` fires or is dropped, once the
    /// run it has in flight finishes.
    pub fn spawn(&self, shutdown_tx: &broadcast::Sender<()>) -> Vec<JoinHandle<()>> {
        RefreshJob::ALL
            .into_iter()
            .map(|job| {
                let period = self.periods.period(job).max(MIN_PERIOD);
                tokio::spawn(schedule(
                    self.cache.clone(),
                    job,
                    period,
                    shutdown_tx.subscribe(),
                ))
            })
            .collect()
    }
}

async fn schedule(
    cache: Arc<ProductCache>,
    job: RefreshJob,
    period: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; jobs start one period in.
    interval.tick().await;

    let in_flight = Arc::new(AtomicBool::new(false));
    let mut runs: JoinSet<()> = JoinSet::new();
    tracing::debug!(%job, period_ms = period.as_millis() as u64, "Refresh job scheduled");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let Some(guard) = InFlightGuard::acquire(&in_flight) else {
                    tracing::debug!(%job, "Previous run still in flight, skipping tick");
                    continue;
                };
                let cache = cache.clone();
                runs.spawn(async move {
                    let _guard = guard;
                    run_once(&cache, job).await;
                });
            }
            Some(finished) = runs.join_next(), if !runs.is_empty() => {
                log_abnormal_end(job, finished);
            }
            _ = shutdown_rx.recv() => {
                tracing::debug!(%job, in_flight = runs.len(), "Refresh job shutting down");
                break;
            }
        }
    }

    while let Some(finished) = runs.join_next().await {
        log_abnormal_end(job, finished);
    }
}

fn log_abnormal_end(job: RefreshJob, finished: std::result::Result<(), JoinError>) {
    if let Err(err) = finished {
        tracing::warn!(%job, error = %err, "Refresh run ended abnormally");
    }
}

async fn run_once(cache: &ProductCache, job: RefreshJob) {
    let started = Instant::now();
    match job.run(cache).await {
        Ok(()) => tracing::trace!(
            %job,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Refresh job finished"
        ),
        Err(err) => tracing::warn!(%job, error = %err, "Refresh job failed"),
    }
}
