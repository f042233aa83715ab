//! Application state for Axum handlers.

use shaku::{HasComponent, Module};
use std::sync::Arc;
use userdir_config::ServerConfig;
use userdir_core::HealthCheck;
use userdir_service::{CacheRefresher, UserDirectoryService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserDirectoryService>,
    pub cache_refresher: Arc<dyn CacheRefresher>,
    /// Largest decoded avatar accepted by the upload route.
    pub max_avatar_bytes: usize,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn UserDirectoryService>,
        cache_refresher: Arc<dyn CacheRefresher>,
        max_avatar_bytes: usize,
    ) -> Self {
        Self {
            user_service,
            cache_refresher,
            max_avatar_bytes,
        }
    }

    /// Resolves the services from a Shaku module.
    pub fn from_module<M>(module: &M, server_config: &ServerConfig) -> Self
    where
        M: Module + HasComponent<dyn UserDirectoryService> + HasComponent<dyn CacheRefresher>,
    {
        Self::new(
            module.resolve(),
            module.resolve(),
            server_config.max_avatar_bytes,
        )
    }
}

/// Dependencies reported by the readiness probe.
#[derive(Clone, Default)]
pub struct HealthState {
    pub checks: Vec<Arc<dyn HealthCheck>>,
}

impl HealthState {
    #[must_use]
    pub fn new(checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self { checks }
    }
}
