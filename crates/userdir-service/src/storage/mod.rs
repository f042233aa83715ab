//! Blob storage for avatar images.

mod blob_store;
mod http_blob_store;
mod memory_blob_store;

pub use blob_store::{BlobStore, AVATAR_CONTENT_TYPE};
pub use http_blob_store::{HttpBlobStore, HttpBlobStoreParameters};
pub use memory_blob_store::{InMemoryBlobStore, StoredObject};
