//! Periodic rebuild of the user cache.

use crate::error::{JobError, JobResult};
use crate::job::Job;
use crate::metrics::CacheRefreshMetrics;
use crate::run_lock::RunLock;
use crate::scheduler::ScheduledJob;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use userdir_config::JobsConfig;
use userdir_service::{CacheRefresher, RefreshReport};

/// Name the cache refresh is registered under.
pub const CACHE_REFRESH_JOB: &str = "cache-refresh";

/// Result of one scheduled refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The refresh ran; per-user failures are in the report.
    Completed(RefreshReport),
    /// Another instance holds the run lock.
    Skipped,
}

/// Scheduled job that writes every user to the cache.
pub struct CacheRefreshJob {
    refresher: Arc<dyn CacheRefresher>,
    lock: Option<Arc<dyn RunLock>>,
}

impl CacheRefreshJob {
    #[must_use]
    pub fn new(refresher: Arc<dyn CacheRefresher>) -> Self {
        Self { refresher, lock: None }
    }

    /// Guard each run with `lock`.
    #[must_use]
    pub fn with_lock(mut self, lock: Arc<dyn RunLock>) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Runs one refresh, honouring the run lock.
    ///
    /// A lock backend failure does not block the refresh; overlapping
    /// refreshes only duplicate work.
    pub async fn run_once(&self) -> JobResult<RefreshOutcome> {
        if let Some(lock) = &self.lock {
            match lock.try_acquire(CACHE_REFRESH_JOB).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(job_name = CACHE_REFRESH_JOB, "Refresh already claimed by another instance, skipping");
                    CacheRefreshMetrics::run_skipped();
                    return Ok(RefreshOutcome::Skipped);
                }
                Err(e) => {
                    warn!(job_name = CACHE_REFRESH_JOB, error = %e, "Run lock unavailable, refreshing anyway");
                }
            }
        }

        let started = Instant::now();
        info!(job_name = CACHE_REFRESH_JOB, "Starting user cache refresh");

        match self.refresher.refresh_all().await {
            Ok(report) => {
                CacheRefreshMetrics::run_completed(&report, started.elapsed());
                Ok(RefreshOutcome::Completed(report))
            }
            Err(e) => {
                let err = JobError::from(e);
                CacheRefreshMetrics::run_failed(&err, started.elapsed());
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Job for CacheRefreshJob {
    fn name(&self) -> &str {
        CACHE_REFRESH_JOB
    }

    async fn run(&self) -> JobResult<()> {
        self.run_once().await.map(|_| ())
    }
}

impl std::fmt::Debug for CacheRefreshJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRefreshJob")
            .field("locked", &self.lock.is_some())
            .finish_non_exhaustive()
    }
}

/// Builds the scheduled cache refresh from configuration.
pub fn cache_refresh_schedule(config: &JobsConfig, job: CacheRefreshJob) -> JobResult<ScheduledJob> {
    Ok(ScheduledJob::new(CACHE_REFRESH_JOB, &config.cache_refresh_cron, Arc::new(job))?.enabled(config.enabled))
}
