//! In-process cron scheduler for recurring jobs.

use crate::error::{JobError, JobResult};
use crate::job::Job;
use chrono::{DateTime, Utc};
use cron::Schedule;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Scheduled job definition.
#[derive(Clone)]
pub struct ScheduledJob {
    /// Unique name for this scheduled job.
    pub name: String,

    /// Cron expression (with seconds field).
    pub cron: String,

    /// Parsed cron schedule.
    schedule: Schedule,

    job: Arc<dyn Job>,

    /// Next scheduled execution time; computed on the first tick.
    next_run: Option<DateTime<Utc>>,

    /// Set while a run is in flight; overlapping firings are skipped.
    in_flight: Arc<AtomicBool>,

    /// Is job enabled.
    pub enabled: bool,
}

impl std::fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("name", &self.name)
            .field("cron", &self.cron)
            .field("enabled", &self.enabled)
            .field("next_run", &self.next_run)
            .finish()
    }
}

impl ScheduledJob {
    /// Create a new scheduled job.
    pub fn new(name: impl Into<String>, cron_expr: &str, job: Arc<dyn Job>) -> JobResult<Self> {
        let schedule = Schedule::from_str(cron_expr)
            .map_err(|e| JobError::Configuration(format!("Invalid cron expression '{cron_expr}': {e}")))?;

        Ok(Self {
            name: name.into(),
            cron: cron_expr.to_string(),
            schedule,
            job,
            next_run: None,
            in_flight: Arc::new(AtomicBool::new(false)),
            enabled: true,
        })
    }

    /// Set whether the job is enabled.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Calculate the next run time strictly after `from`.
    #[must_use]
    pub fn next_run_from(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&from).next()
    }

    /// Advances the schedule and reports whether the job is due at `now`.
    fn poll_due(&mut self, now: DateTime<Utc>) -> bool {
        if !self.enabled {
            return false;
        }
        match self.next_run {
            None => {
                self.next_run = self.next_run_from(now);
                false
            }
            Some(next) if next <= now => {
                self.next_run = self.next_run_from(now);
                true
            }
            Some(_) => false,
        }
    }
}

/// Cron scheduler.
///
/// Jobs are polled on a fixed interval and each due job is spawned onto the
/// runtime, so a slow run never delays the schedule of others.
pub struct Scheduler {
    /// Unique scheduler ID.
    id: String,

    poll_interval: Duration,

    /// Registered scheduled jobs.
    jobs: Arc<RwLock<HashMap<String, ScheduledJob>>>,

    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,

    /// Running flag.
    running: Arc<AtomicBool>,
}

impl Scheduler {
    /// Create a new scheduler polling at `poll_interval`.
    #[must_use]
    pub fn new(poll_interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            id: format!("scheduler-{}", Uuid::new_v4()),
            poll_interval,
            jobs: Arc::new(RwLock::new(HashMap::new())),
            shutdown_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register a scheduled job, replacing any job with the same name.
    pub fn register(&self, job: ScheduledJob) {
        let name = job.name.clone();
        info!(job_name = %name, cron = %job.cron, enabled = job.enabled, "Registered scheduled job");
        self.jobs.write().insert(name, job);
    }

    /// Whether the poll loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the scheduler and poll until [`stop`](Self::stop) is called.
    pub async fn start(&self) -> JobResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(JobError::Scheduler("Scheduler already running".to_string()));
        }

        info!(
            scheduler_id = %self.id,
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Starting scheduler"
        );

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut poll_interval = interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(scheduler_id = %self.id, "Received shutdown signal");
                    break;
                }

                _ = poll_interval.tick() => {
                    self.fire_due_jobs(Utc::now());
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!(scheduler_id = %self.id, "Scheduler stopped");

        Ok(())
    }

    /// Stop the scheduler.
    pub fn stop(&self) {
        info!(scheduler_id = %self.id, "Stopping scheduler...");
        let _ = self.shutdown_tx.send(());
    }

    /// Spawns every job due at `now`. Returns the names of the jobs spawned.
    fn fire_due_jobs(&self, now: DateTime<Utc>) -> Vec<String> {
        let due: Vec<ScheduledJob> = self
            .jobs
            .write()
            .values_mut()
            .filter_map(|job| job.poll_due(now).then(|| job.clone()))
            .collect();

        let mut fired = Vec::with_capacity(due.len());
        for scheduled in due {
            if scheduled.in_flight.swap(true, Ordering::SeqCst) {
                debug!(job_name = %scheduled.name, "Previous run still in progress, skipping");
                continue;
            }

            fired.push(scheduled.name.clone());
            tokio::spawn(run_job(scheduled));
        }
        fired
    }

    /// List all registered scheduled jobs.
    #[must_use]
    pub fn list_jobs(&self) -> Vec<ScheduledJobInfo> {
        let now = Utc::now();
        let mut jobs: Vec<ScheduledJobInfo> = self
            .jobs
            .read()
            .values()
            .map(|job| ScheduledJobInfo {
                name: job.name.clone(),
                cron: job.cron.clone(),
                enabled: job.enabled,
                next_run: job.enabled.then(|| job.next_run_from(now)).flatten(),
            })
            .collect();
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        jobs
    }
}

/// Clears a job's in-flight flag when dropped, so a panicking run does not
/// block every later firing.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

async fn run_job(scheduled: ScheduledJob) {
    let _in_flight = InFlightGuard(scheduled.in_flight.clone());
    debug!(job_name = %scheduled.name, "Running scheduled job");
    if let Err(e) = scheduled.job.run().await {
        error!(job_name = %scheduled.name, error = %e, "Scheduled job failed");
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("id", &self.id)
            .field("poll_interval", &self.poll_interval)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Information about a scheduled job.
#[derive(Debug, Clone)]
pub struct ScheduledJobInfo {
    /// Job name.
    pub name: String,

    /// Cron expression.
    pub cron: String,

    /// Is enabled.
    pub enabled: bool,

    /// Next scheduled run time.
    pub next_run: Option<DateTime<Utc>>,
}

/// Common cron expressions.
pub mod cron_expressions {
    /// Every second.
    pub const EVERY_SECOND: &str = "* * * * * *";

    /// Every minute.
    pub const EVERY_MINUTE: &str = "0 * * * * *";

    /// Every 30 minutes.
    pub const EVERY_30_MINUTES: &str = "0 */30 * * * *";
}
