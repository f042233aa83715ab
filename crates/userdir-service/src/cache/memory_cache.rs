//! In-process cache backed by a map with per-entry expiry.

use super::CacheInterface;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use userdir_core::DirectoryResult;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-memory cache for tests and single-process runs.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|e| e.is_live(now)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining lifetime of a live entry.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.expires_at - now)
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> DirectoryResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> DirectoryResult<()> {
        self.entries.write().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> DirectoryResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .remove(key)
            .is_some_and(|e| e.is_live(now)))
    }

    async fn exists(&self, key: &str) -> DirectoryResult<bool> {
        Ok(self.ttl(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheExt;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = InMemoryCache::new();
        cache.set("user:a", &vec![1, 2, 3], Duration::from_secs(60)).await.unwrap();

        let value: Option<Vec<i32>> = cache.get("user:a").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
        assert!(cache.exists("user:a").await.unwrap());

        assert!(cache.delete("user:a").await.unwrap());
        assert!(!cache.delete("user:a").await.unwrap());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = InMemoryCache::new();
        cache.set_raw("user:b", "{}", Duration::ZERO).await.unwrap();

        assert_eq!(cache.get_raw("user:b").await.unwrap(), None);
        assert!(!cache.exists("user:b").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_resets_ttl() {
        let cache = InMemoryCache::new();
        cache.set_raw("k", "old", Duration::from_secs(5)).await.unwrap();
        cache.set_raw("k", "new", Duration::from_secs(1800)).await.unwrap();

        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("new"));
        assert!(cache.ttl("k").unwrap() > Duration::from_secs(1700));
    }

    #[tokio::test]
    async fn test_typed_get_reports_decode_error() {
        let cache = InMemoryCache::new();
        cache.set_raw("k", "not json", Duration::from_secs(60)).await.unwrap();

        let result: DirectoryResult<Option<Vec<i32>>> = cache.get("k").await;
        assert!(result.is_err());
    }
}
