//! One-shot cache refresh.
//!
//! Writes every stored user to the cache once and exits; exits non-zero
//! when the users cannot be read.

use std::sync::Arc;
use tracing::{error, info};
use userdir_config::{AppConfig, ConfigLoader};
use userdir_core::{DirectoryResult, HasComponent};
use userdir_repository::DatabasePoolInterface;
use userdir_server::{di::Infrastructure, startup};
use userdir_service::{CacheRefresher, RefreshReport};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get(),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    startup::init_logging(&config.observability);

    match refresh(&config).await {
        Ok(report) => {
            info!(
                total = report.total,
                succeeded = report.succeeded,
                failed = report.failed,
                "User cache refresh complete"
            );
        }
        Err(e) => {
            error!("Failed to refresh cache: {}", e);
            std::process::exit(1);
        }
    }
}

async fn refresh(config: &AppConfig) -> DirectoryResult<RefreshReport> {
    let infra = Infrastructure::connect(config).await?;
    let refresher: Arc<dyn CacheRefresher> = infra.module.resolve();

    let report = refresher.refresh_all().await;
    infra.database.close().await;
    report
}
