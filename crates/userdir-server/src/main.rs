//! # User Directory Server
//!
//! Serves the REST API and runs the scheduled cache refresh in-process.

use tracing::{error, info};
use userdir_config::ConfigLoader;
use userdir_server::{app, startup};

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
    startup::print_banner();

    info!("Starting User Directory Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = app::run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
