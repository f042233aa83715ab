//! Bulk cache refresh trait definition.

use crate::dto::RefreshReport;
use async_trait::async_trait;
use userdir_core::{DirectoryResult, Interface};

/// Rebuilds the user cache from the record store.
///
/// A refresh reads every user in one pass and overwrites each cache entry.
/// It can race with a concurrent update: a snapshot read before the update
/// commits may be written after the update's invalidation, and then lives
/// until its TTL expires.
#[async_trait]
pub trait CacheRefresher: Interface + Send + Sync {
    /// Writes every stored user to the cache.
    ///
    /// Fails only when the bulk read fails; per-user cache failures are
    /// counted in the report.
    async fn refresh_all(&self) -> DirectoryResult<RefreshReport>;
}
