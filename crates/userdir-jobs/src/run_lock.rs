//! Cross-replica run locks.
//!
//! Every replica runs the same schedule; a run lock lets only the first one
//! to reach a firing do the work. Locks are never released explicitly, they
//! expire after their TTL, which must be shorter than the schedule period.

use crate::error::JobResult;
use async_trait::async_trait;
use deadpool_redis::Pool;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Key prefix for run locks.
pub const LOCK_KEY_PREFIX: &str = "userdir:lock:";

/// Guard for a named run.
#[async_trait]
pub trait RunLock: Send + Sync {
    /// Tries to take the lock for `name`. `Ok(false)` means another holder has it.
    async fn try_acquire(&self, name: &str) -> JobResult<bool>;
}

/// Redis `SET NX EX` run lock.
pub struct RedisRunLock {
    pool: Pool,
    owner: String,
    ttl: Duration,
}

impl RedisRunLock {
    /// Create a lock backed by `pool` whose entries expire after `ttl`.
    #[must_use]
    pub fn new(pool: Pool, ttl: Duration) -> Self {
        Self {
            pool,
            owner: format!("userdir-{}", Uuid::new_v4()),
            ttl,
        }
    }

    /// Identifier written as the lock value.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Redis key for the lock on `name`.
    #[must_use]
    pub fn key(name: &str) -> String {
        format!("{LOCK_KEY_PREFIX}{name}")
    }
}

#[async_trait]
impl RunLock for RedisRunLock {
    async fn try_acquire(&self, name: &str) -> JobResult<bool> {
        let mut conn = self.pool.get().await?;
        let key = Self::key(name);

        let result: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&self.owner)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async(&mut *conn)
            .await?;

        let acquired = result.is_some();
        debug!(lock = %key, owner = %self.owner, acquired, "Run lock attempt");
        Ok(acquired)
    }
}

impl std::fmt::Debug for RedisRunLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRunLock")
            .field("owner", &self.owner)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Lock that always succeeds, for single-instance deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRunLock;

#[async_trait]
impl RunLock for NoRunLock {
    async fn try_acquire(&self, _name: &str) -> JobResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_format() {
        assert_eq!(RedisRunLock::key("cache-refresh"), "userdir:lock:cache-refresh");
    }

    #[tokio::test]
    async fn test_no_run_lock_always_acquires() {
        let lock = NoRunLock;
        assert!(lock.try_acquire("cache-refresh").await.unwrap());
        assert!(lock.try_acquire("cache-refresh").await.unwrap());
    }

    #[test]
    fn test_owner_is_unique_per_lock() {
        let pool = deadpool_redis::Config::from_url("redis://localhost:6379")
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .unwrap();
        let a = RedisRunLock::new(pool.clone(), Duration::from_secs(60));
        let b = RedisRunLock::new(pool, Duration::from_secs(60));
        assert_ne!(a.owner(), b.owner());
        assert!(a.owner().starts_with("userdir-"));
    }
}
