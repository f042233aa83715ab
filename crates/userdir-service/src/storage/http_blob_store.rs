//! S3-compatible blob store over plain HTTP `PUT`.
//!
//! Objects are written path-style to `{endpoint}/{bucket}/{key}`.

use super::BlobStore;
use async_trait::async_trait;
use reqwest::{header, Client};
use shaku::Component;
use tracing::{debug, warn};
use userdir_config::StorageConfig;
use userdir_core::{DirectoryError, DirectoryResult};

/// HTTP blob store client.
#[derive(Component, Clone)]
#[shaku(interface = BlobStore)]
pub struct HttpBlobStore {
    client: Client,
    endpoint: String,
    bucket: String,
    access_token: Option<String>,
}

impl HttpBlobStore {
    /// Creates a store from configuration with a fresh HTTP client.
    pub fn new(config: &StorageConfig) -> DirectoryResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| DirectoryError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a store around an existing client.
    #[must_use]
    pub fn with_client(client: Client, config: &StorageConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key.trim_start_matches('/'))
    }
}

impl From<HttpBlobStore> for HttpBlobStoreParameters {
    fn from(store: HttpBlobStore) -> Self {
        Self {
            client: store.client,
            endpoint: store.endpoint,
            bucket: store.bucket,
            access_token: store.access_token,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> DirectoryResult<()> {
        let url = self.object_url(key);
        debug!("PUT {} ({} bytes)", url, bytes.len());

        let mut request = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DirectoryError::storage(format!("Upload of '{key}' failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Blob store rejected '{}': {} {}", key, status, body);
            return Err(DirectoryError::storage(format!(
                "Upload of '{key}' rejected with status {status}"
            )));
        }

        Ok(())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl std::fmt::Debug for HttpBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBlobStore")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("authenticated", &self.access_token.is_some())
            .finish()
    }
}
