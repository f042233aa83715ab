//! Blob store interface.

use async_trait::async_trait;
use shaku::Interface;
use userdir_core::DirectoryResult;

/// Content type of every avatar object.
pub const AVATAR_CONTENT_TYPE: &str = "image/png";

/// Object storage keyed by path within a single configured bucket.
#[async_trait]
pub trait BlobStore: Interface + Send + Sync {
    /// Writes `bytes` under `key`, replacing any existing object.
    ///
    /// Failures are reported as `DirectoryError::Storage`.
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> DirectoryResult<()>;

    /// Bucket the store writes into.
    fn bucket(&self) -> &str;
}
