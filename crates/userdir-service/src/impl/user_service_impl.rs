//! User directory service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{CreateUserRequest, UpdateUserRequest};
use crate::settings::ServiceSettings;
use crate::storage::{BlobStore, AVATAR_CONTENT_TYPE};
use crate::user_service::UserDirectoryService;
use async_trait::async_trait;
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use userdir_core::{
    DirectoryError, DirectoryResult, NewContact, NewUser, User, UserChanges, UserFilter, UserId, ValidateExt,
};
use userdir_repository::UserRepository;
use userdir_security::PasswordHasherInterface;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

const CACHE_LOOKUPS: &str = "userdir_user_cache_lookups_total";

/// Concrete user directory service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = UserDirectoryService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(inject)]
    blob_store: Arc<dyn BlobStore>,
    settings: ServiceSettings,
}

impl UserServiceComponent {
    /// Wires the service by hand, outside a Shaku module.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheInterface>,
        blob_store: Arc<dyn BlobStore>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            cache,
            blob_store,
            settings,
        }
    }

    /// Reads the cached snapshot. Backend errors, timeouts and undecodable
    /// entries all count as a miss.
    async fn cached_user(&self, id: UserId) -> Option<User> {
        let key = cache_keys::user(id);

        let raw = match self.settings.cache("cache.get", self.cache.get_raw(&key)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cache read for '{}' failed, reading store: {}", key, e);
                metrics::counter!(CACHE_LOOKUPS, "result" => "error").increment(1);
                return None;
            }
        };

        let Some(json) = raw else {
            debug!("Cache miss for user {}", id);
            metrics::counter!(CACHE_LOOKUPS, "result" => "miss").increment(1);
            return None;
        };

        match serde_json::from_str::<User>(&json) {
            Ok(user) => {
                debug!("Cache hit for user {}", id);
                metrics::counter!(CACHE_LOOKUPS, "result" => "hit").increment(1);
                Some(user)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry '{}': {}", key, e);
                metrics::counter!(CACHE_LOOKUPS, "result" => "corrupt").increment(1);
                self.invalidate(id).await;
                None
            }
        }
    }

    async fn populate(&self, user: &User) {
        let key = cache_keys::user(user.id);
        let write = self.cache.set(&key, user, self.settings.user_ttl);
        if let Err(e) = self.settings.cache("cache.set", write).await {
            warn!("Failed to cache user {}: {}", user.id, e);
        }
    }

    /// Runs a store write under the store deadline. A write that failed or
    /// timed out may still have committed, so the entry is dropped either way.
    async fn store_write<T>(
        &self,
        id: UserId,
        operation: &str,
        fut: impl Future<Output = DirectoryResult<T>>,
    ) -> DirectoryResult<T> {
        let result = self.settings.store(operation, fut).await;
        if let Err(e) = &result {
            warn!("{} for user {} failed, invalidating anyway: {}", operation, id, e);
            self.invalidate(id).await;
        }
        result
    }

    async fn invalidate(&self, id: UserId) {
        let key = cache_keys::user(id);
        match self.settings.cache("cache.delete", self.cache.delete(&key)).await {
            Ok(existed) => debug!("Invalidated '{}' (present: {})", key, existed),
            Err(e) => warn!("Failed to invalidate '{}': {}", key, e),
        }
    }
}

fn missing_required_fields(errors: &ValidationErrors) -> DirectoryError {
    let mut fields: Vec<String> = errors.errors().keys().map(ToString::to_string).collect();
    fields.sort();
    DirectoryError::validation(format!("Missing required fields: {}", fields.join(", ")))
}

fn avatar_key() -> String {
    format!("avatars/{}.png", Uuid::new_v4())
}

#[async_trait]
impl UserDirectoryService for UserServiceComponent {
    async fn create_user(&self, request: CreateUserRequest) -> DirectoryResult<User> {
        debug!("Creating user: {}", request.username);

        request.validate().map_err(|e| missing_required_fields(&e))?;
        let Some(status) = request.status else {
            return Err(DirectoryError::validation("Missing required fields: status"));
        };

        let password_hash = self.password_hasher.hash(&request.password)?;

        let new_user = NewUser {
            id: request.id,
            avatar: request.avatar,
            username: request.username,
            name: request.name,
            password_hash,
            status,
            contacts: request.contacts.into_iter().map(NewContact::from).collect(),
        };

        let created = self
            .settings
            .store("store.create", self.user_repository.create(new_user))
            .await?;

        info!("User created: {} ({})", created.id, created.username);
        Ok(created)
    }

    async fn get_user_by_id(&self, id: UserId) -> DirectoryResult<User> {
        debug!("Getting user: {}", id);

        if let Some(user) = self.cached_user(id).await {
            return Ok(user);
        }

        let user = self
            .settings
            .store("store.find_by_id", self.user_repository.find_by_id(id))
            .await?
            .ok_or_else(|| DirectoryError::not_found("User", id))?;

        self.populate(&user).await;
        Ok(user)
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> DirectoryResult<User> {
        debug!("Updating user: {}", id);

        request.validate_request()?;

        let password_hash = request
            .password
            .as_deref()
            .map(|password| self.password_hasher.hash(password))
            .transpose()?;

        let changes = UserChanges {
            avatar: request.avatar,
            username: request.username,
            name: request.name,
            password_hash,
            status: request.status,
            contacts: request.contacts.into_iter().map(NewContact::from).collect(),
        };

        let updated = self
            .store_write(id, "store.update", self.user_repository.update(id, changes))
            .await?
            .ok_or_else(|| DirectoryError::not_found("User", id))?;

        self.invalidate(id).await;

        info!("User updated: {}", id);
        Ok(updated)
    }

    async fn update_user_avatar(&self, id: UserId, avatar: &str) -> DirectoryResult<()> {
        debug!("Updating avatar of user {}: {}", id, avatar);

        let updated = self
            .store_write(id, "store.update_avatar", self.user_repository.update_avatar(id, avatar))
            .await?;
        if !updated {
            return Err(DirectoryError::not_found("User", id));
        }

        self.invalidate(id).await;

        info!("User avatar updated: {}", id);
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> DirectoryResult<()> {
        debug!("Deleting user: {}", id);

        let deleted = self
            .store_write(id, "store.delete", self.user_repository.delete(id))
            .await?;
        if !deleted {
            return Err(DirectoryError::not_found("User", id));
        }

        self.invalidate(id).await;

        info!("User deleted: {}", id);
        Ok(())
    }

    async fn list_users(&self, filter: UserFilter) -> DirectoryResult<Vec<User>> {
        debug!("Listing users: {:?}", filter);

        self.settings
            .store("store.list", self.user_repository.list(&filter))
            .await
    }

    async fn put_avatar_object(&self, key: &str, bytes: Vec<u8>) -> DirectoryResult<()> {
        debug!("Storing avatar object '{}' in bucket '{}'", key, self.blob_store.bucket());

        self.settings
            .storage(
                "storage.put_object",
                self.blob_store.put_object(key, bytes, AVATAR_CONTENT_TYPE),
            )
            .await
    }

    async fn upload_avatar(&self, id: UserId, bytes: Vec<u8>) -> DirectoryResult<String> {
        if bytes.is_empty() {
            return Err(DirectoryError::validation("image_data: must not be empty"));
        }

        let exists = self
            .settings
            .store("store.exists", self.user_repository.exists(id))
            .await?;
        if !exists {
            return Err(DirectoryError::not_found("User", id));
        }

        let key = avatar_key();
        self.put_avatar_object(&key, bytes).await?;
        self.update_user_avatar(id, &key).await?;

        info!("Avatar uploaded for user {}: {}", id, key);
        Ok(key)
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
