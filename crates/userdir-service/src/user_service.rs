//! User directory service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest};
use async_trait::async_trait;
use userdir_core::{DirectoryResult, Interface, User, UserFilter, UserId};

/// User directory service.
///
/// Owns the consistency protocol between the record store and the cache:
/// reads go through the cache, writes commit to the store and then
/// invalidate the cached snapshot.
#[async_trait]
pub trait UserDirectoryService: Interface + Send + Sync {
    /// Validates, hashes the password and persists a new user with its contacts.
    async fn create_user(&self, request: CreateUserRequest) -> DirectoryResult<User>;

    /// Gets a user by ID, served from the cache when possible.
    async fn get_user_by_id(&self, id: UserId) -> DirectoryResult<User>;

    /// Updates scalars and replaces the contact set in one transaction.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> DirectoryResult<User>;

    /// Sets the avatar storage key of a user.
    async fn update_user_avatar(&self, id: UserId, avatar: &str) -> DirectoryResult<()>;

    /// Deletes a user together with its contacts.
    async fn delete_user(&self, id: UserId) -> DirectoryResult<()>;

    /// Lists users matching the filter, ordered by username. Never cached.
    async fn list_users(&self, filter: UserFilter) -> DirectoryResult<Vec<User>>;

    /// Writes avatar bytes to the blob store as `image/png`.
    async fn put_avatar_object(&self, key: &str, bytes: Vec<u8>) -> DirectoryResult<()>;

    /// Stores a new avatar image for an existing user and records its key.
    ///
    /// Returns the storage key.
    async fn upload_avatar(&self, id: UserId, bytes: Vec<u8>) -> DirectoryResult<String>;
}
