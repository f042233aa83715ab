//! In-process blob store.

use super::BlobStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use userdir_core::DirectoryResult;

/// A stored object with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob store keeping objects in memory, used when remote storage is
/// disabled and in tests.
#[derive(Debug)]
pub struct InMemoryBlobStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryBlobStore {
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a copy of the object stored under `key`.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().get(key).cloned()
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new("userdir-avatars")
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> DirectoryResult<()> {
        self.objects.write().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
