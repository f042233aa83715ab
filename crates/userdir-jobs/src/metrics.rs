//! Prometheus metrics for scheduled jobs.

use crate::error::JobError;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;
use userdir_service::RefreshReport;

/// Metric names for the jobs subsystem.
pub mod names {
    /// Cache refresh runs, labelled by outcome.
    pub const CACHE_REFRESH_RUNS_TOTAL: &str = "userdir_cache_refresh_runs_total";
    /// Users processed by cache refreshes, labelled by result.
    pub const CACHE_REFRESH_USERS_TOTAL: &str = "userdir_cache_refresh_users_total";
    /// Cache refresh duration in seconds.
    pub const CACHE_REFRESH_DURATION_SECONDS: &str = "userdir_cache_refresh_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_REFRESH_RUNS_TOTAL,
        "Total number of cache refresh runs"
    );
    describe_counter!(
        names::CACHE_REFRESH_USERS_TOTAL,
        "Total number of users written by cache refreshes"
    );
    describe_histogram!(
        names::CACHE_REFRESH_DURATION_SECONDS,
        "Cache refresh duration in seconds"
    );
}

/// Cache refresh metrics recorder.
#[derive(Clone)]
pub struct CacheRefreshMetrics;

impl CacheRefreshMetrics {
    /// Record a finished run.
    pub fn run_completed(report: &RefreshReport, duration: Duration) {
        let outcome = if report.failed == 0 { "success" } else { "partial" };
        counter!(names::CACHE_REFRESH_RUNS_TOTAL, "outcome" => outcome).increment(1);

        counter!(names::CACHE_REFRESH_USERS_TOTAL, "result" => "succeeded").increment(report.succeeded as u64);
        counter!(names::CACHE_REFRESH_USERS_TOTAL, "result" => "failed").increment(report.failed as u64);

        histogram!(names::CACHE_REFRESH_DURATION_SECONDS, "outcome" => outcome).record(duration.as_secs_f64());
    }

    /// Record a run that aborted before touching the cache.
    pub fn run_failed(error: &JobError, duration: Duration) {
        counter!(
            names::CACHE_REFRESH_RUNS_TOTAL,
            "outcome" => "failure",
            "retryable" => error.is_retryable().to_string()
        )
        .increment(1);

        histogram!(names::CACHE_REFRESH_DURATION_SECONDS, "outcome" => "failure").record(duration.as_secs_f64());
    }

    /// Record a run skipped because another instance holds the lock.
    pub fn run_skipped() {
        counter!(names::CACHE_REFRESH_RUNS_TOTAL, "outcome" => "skipped").increment(1);
    }
}
