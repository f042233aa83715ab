//! Server lifecycle: wiring, background jobs, HTTP serving, shutdown.

use crate::{
    di::Infrastructure,
    startup::{print_startup_info, shutdown_signal},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};
use userdir_config::{AppConfig, JobsConfig, ObservabilityConfig};
use userdir_core::{DirectoryError, DirectoryResult, HasComponent};
use userdir_jobs::{cache_refresh_schedule, register_metrics, CacheRefreshJob, RunLock, Scheduler};
use userdir_repository::DatabasePoolInterface;
use userdir_rest::{create_router, AppState, HealthState};
use userdir_service::CacheRefresher;

/// How often the scheduler checks for due jobs.
const SCHEDULER_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the server until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> DirectoryResult<()> {
    let infra = Infrastructure::connect(&config).await?;

    if config.database.run_migrations {
        infra.database.run_migrations().await?;
    }

    let metrics = install_metrics(&config.observability)?;

    let refresher: Arc<dyn CacheRefresher> = infra.module.resolve();
    let scheduler = build_scheduler(&config.jobs, refresher, infra.run_lock(&config.jobs))?;
    let scheduler_task = spawn_scheduler(scheduler.clone());

    let state = AppState::from_module(infra.module.as_ref(), &config.server);
    let health = HealthState::new(infra.health_checks());
    let router = create_router(
        state,
        health,
        &config.server,
        metrics
            .as_ref()
            .map(|handle| (config.observability.metrics_path.as_str(), handle.clone())),
    );

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DirectoryError::Internal(format!("Failed to bind {addr}: {e}")))?;

    print_startup_info(&config);
    info!("Starting REST server on http://{}", addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DirectoryError::Internal(format!("REST server error: {e}")));

    scheduler.stop();
    if let Err(e) = scheduler_task.await {
        error!("Scheduler task ended abnormally: {}", e);
    }
    infra.database.close().await;

    served?;
    info!("Server shutdown complete");
    Ok(())
}

/// Installs the Prometheus recorder when metrics are enabled.
pub fn install_metrics(config: &ObservabilityConfig) -> DirectoryResult<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| DirectoryError::Configuration(format!("Failed to install metrics recorder: {e}")))?;
    register_metrics();

    info!(path = %config.metrics_path, "Prometheus metrics enabled");
    Ok(Some(handle))
}

/// Builds the scheduler with the cache refresh registered.
pub fn build_scheduler(
    config: &JobsConfig,
    refresher: Arc<dyn CacheRefresher>,
    lock: Option<Arc<dyn RunLock>>,
) -> DirectoryResult<Arc<Scheduler>> {
    let mut job = CacheRefreshJob::new(refresher);
    if let Some(lock) = lock {
        job = job.with_lock(lock);
    }

    let scheduled = cache_refresh_schedule(config, job)
        .map_err(|e| DirectoryError::Configuration(format!("Invalid cache refresh schedule: {e}")))?;

    let scheduler = Scheduler::new(SCHEDULER_POLL_INTERVAL);
    scheduler.register(scheduled);
    Ok(Arc::new(scheduler))
}

fn spawn_scheduler(scheduler: Arc<Scheduler>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = scheduler.start().await {
            error!("Scheduler failed: {}", e);
        }
    })
}
