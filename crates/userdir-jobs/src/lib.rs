//! Userdir Jobs - scheduled background work
//!
//! An in-process cron scheduler plus the periodic user cache refresh:
//! - Cron schedules with a seconds field
//! - Overlapping runs of the same job are skipped
//! - Optional Redis run lock so one replica performs each firing
//! - Prometheus metrics per refresh run
//!
//! # Example
//!
//! ```rust,ignore
//! use userdir_jobs::{cache_refresh_schedule, CacheRefreshJob, RedisRunLock, Scheduler};
//!
//! let job = CacheRefreshJob::new(refresher)
//!     .with_lock(Arc::new(RedisRunLock::new(pool, config.jobs.run_lock_ttl())));
//!
//! let scheduler = Arc::new(Scheduler::new(Duration::from_secs(1)));
//! scheduler.register(cache_refresh_schedule(&config.jobs, job)?);
//! tokio::spawn(async move { scheduler.start().await });
//! ```

pub mod cache_refresh;
pub mod error;
pub mod job;
pub mod metrics;
pub mod run_lock;
pub mod scheduler;

pub use cache_refresh::{cache_refresh_schedule, CacheRefreshJob, RefreshOutcome, CACHE_REFRESH_JOB};
pub use error::{JobError, JobResult};
pub use job::Job;
pub use metrics::{register_metrics, CacheRefreshMetrics};
pub use run_lock::{NoRunLock, RedisRunLock, RunLock};
pub use scheduler::{cron_expressions, ScheduledJob, ScheduledJobInfo, Scheduler};
