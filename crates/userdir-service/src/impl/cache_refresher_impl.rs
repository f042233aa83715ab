//! Bulk cache refresh implementation.

use crate::cache::{cache_keys, CacheInterface};
use crate::dto::RefreshReport;
use crate::refresh::CacheRefresher;
use crate::settings::ServiceSettings;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};
use userdir_core::{DirectoryResult, User};
use userdir_repository::UserRepository;

/// Cache refresher component for Shaku DI.
#[derive(Component)]
#[shaku(interface = CacheRefresher)]
pub struct CacheRefresherComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    settings: ServiceSettings,
}

impl CacheRefresherComponent {
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            user_repository,
            cache,
            settings,
        }
    }

    async fn write(&self, user: &User) -> DirectoryResult<()> {
        let json = serde_json::to_string(user)?;
        let key = cache_keys::user(user.id);
        self.settings
            .cache("cache.set", self.cache.set_raw(&key, &json, self.settings.user_ttl))
            .await
    }
}

#[async_trait]
impl CacheRefresher for CacheRefresherComponent {
    async fn refresh_all(&self) -> DirectoryResult<RefreshReport> {
        info!("Starting user cache refresh");

        let users = self
            .settings
            .store(
                "store.find_all_with_contacts",
                self.user_repository.find_all_with_contacts(),
            )
            .await?;
        debug!("Loaded {} users for cache refresh", users.len());

        let mut report = RefreshReport::default();
        for user in &users {
            match self.write(user).await {
                Ok(()) => report.record(true),
                Err(e) => {
                    warn!("Failed to refresh cache for user {}: {}", user.id, e);
                    report.record(false);
                }
            }
        }

        info!(
            "Cache refresh complete. Success: {}, Failures: {}",
            report.succeeded, report.failed
        );
        Ok(report)
    }
}

impl std::fmt::Debug for CacheRefresherComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRefresherComponent").finish_non_exhaustive()
    }
}
