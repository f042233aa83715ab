//! Deadlines and cache lifetime applied by the service layer.

use std::future::Future;
use std::time::Duration;
use userdir_config::AppConfig;
use userdir_core::DirectoryResult;
use userdir_resilience::with_deadline;

use crate::cache::cache_keys;

/// Per-dependency call deadlines plus the user snapshot TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub store_timeout: Duration,
    pub cache_timeout: Duration,
    pub storage_timeout: Duration,
    pub user_ttl: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(5000),
            cache_timeout: Duration::from_millis(500),
            storage_timeout: Duration::from_millis(10_000),
            user_ttl: cache_keys::USER_TTL,
        }
    }
}

impl ServiceSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            store_timeout: config.service.store_timeout(),
            cache_timeout: config.service.cache_timeout(),
            storage_timeout: config.service.storage_timeout(),
            user_ttl: config.cache.user_ttl(),
        }
    }

    /// Runs a record store call under the store deadline.
    pub async fn store<T>(&self, operation: &str, fut: impl Future<Output = DirectoryResult<T>>) -> DirectoryResult<T> {
        with_deadline(operation, self.store_timeout, fut).await
    }

    /// Runs a cache call under the cache deadline.
    pub async fn cache<T>(&self, operation: &str, fut: impl Future<Output = DirectoryResult<T>>) -> DirectoryResult<T> {
        with_deadline(operation, self.cache_timeout, fut).await
    }

    /// Runs a blob store call under the storage deadline.
    pub async fn storage<T>(&self, operation: &str, fut: impl Future<Output = DirectoryResult<T>>) -> DirectoryResult<T> {
        with_deadline(operation, self.storage_timeout, fut).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdir_core::DirectoryError;

    #[test]
    fn test_from_config_reads_service_and_cache_sections() {
        let mut config = AppConfig::default();
        config.service.cache_timeout_ms = 250;
        config.cache.user_ttl_secs = 60;

        let settings = ServiceSettings::from_config(&config);
        assert_eq!(settings.cache_timeout, Duration::from_millis(250));
        assert_eq!(settings.user_ttl, Duration::from_secs(60));
        assert_eq!(settings.store_timeout, Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_cache_deadline_names_operation() {
        let settings = ServiceSettings {
            cache_timeout: Duration::from_millis(10),
            ..ServiceSettings::default()
        };

        let err = settings
            .cache("cache.get", async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await
            .unwrap_err();

        let DirectoryError::Timeout(message) = err else {
            panic!("expected timeout");
        };
        assert!(message.starts_with("cache.get timed out"));
    }
}
