//! Key-value cache contract used by the directory service and the refresher.

use async_trait::async_trait;
use shaku::Interface;
use std::time::Duration;
use userdir_core::DirectoryResult;

/// String-valued cache with per-entry TTL.
///
/// Never authoritative: callers treat every error as a miss and fall back
/// to the record store. Values are JSON text so the trait stays object safe.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Returns the stored text, or `None` for a missing or expired key.
    async fn get_raw(&self, key: &str) -> DirectoryResult<Option<String>>;

    /// Unconditionally overwrites `key` with `value` for `ttl` (`SETEX`).
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> DirectoryResult<()>;

    /// Removes `key`; `true` when something was removed.
    async fn delete(&self, key: &str) -> DirectoryResult<bool>;

    async fn exists(&self, key: &str) -> DirectoryResult<bool>;

    /// `false` for the disabled Redis backend, whose reads always miss.
    fn is_enabled(&self) -> bool;
}

/// JSON encode/decode on top of [`CacheInterface`].
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Decodes the entry at `key`.
    ///
    /// An entry that does not decode as `T` is an error, not a miss; the
    /// caller decides whether to evict it.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> DirectoryResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Encodes `value` and stores it for `ttl`.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> DirectoryResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
