//! Server startup utilities.

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use userdir_config::{AppConfig, ObservabilityConfig};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
                          __ _
   __  __________  _____ / /(_)____
  / / / / ___/ _ \/ ___// __/ / ___/
 / /_/ (__  )  __/ /   / /_/ / /
 \__,_/____/\___/_/    \__,_/_/

              User Directory
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let port = config.server.port;
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", config.server.addr());
    info!("Health:    http://0.0.0.0:{}/health", port);
    info!("API Docs:  http://0.0.0.0:{}/swagger-ui", port);
    if config.observability.metrics_enabled {
        info!("Metrics:   http://0.0.0.0:{}{}", port, config.observability.metrics_path);
    }
    info!(
        "Cache refresh: {} ({})",
        config.jobs.cache_refresh_cron,
        if config.jobs.enabled { "enabled" } else { "disabled" }
    );
    info!("{}", separator);
}

/// Builds the default filter directive for a configured level.
///
/// `RUST_LOG` takes precedence when set.
#[must_use]
pub fn default_filter(level: &str) -> String {
    format!("{level},sqlx=warn,tower_http={level}")
}

/// Installs the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        print_startup_info(&config);

        config.observability.metrics_enabled = false;
        config.jobs.enabled = false;
        print_startup_info(&config);
    }

    #[test]
    fn test_default_filter_parses() {
        let directive = default_filter("debug");
        assert_eq!(directive, "debug,sqlx=warn,tower_http=debug");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
