//! Repository trait definitions.

use async_trait::async_trait;
use userdir_core::{DirectoryResult, Interface, NewUser, User, UserChanges, UserFilter, UserId};

/// User repository trait.
///
/// Every read returns users with their complete, ordered contact sets.
/// Multi-statement writes are atomic: on error nothing is committed.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>>;

    /// Checks whether a user exists.
    async fn exists(&self, id: UserId) -> DirectoryResult<bool>;

    /// Lists users matching the filter, ordered by username.
    async fn list(&self, filter: &UserFilter) -> DirectoryResult<Vec<User>>;

    /// Loads every user in one pass.
    async fn find_all_with_contacts(&self) -> DirectoryResult<Vec<User>>;

    /// Persists a new user and its contacts.
    async fn create(&self, user: NewUser) -> DirectoryResult<User>;

    /// Applies changes and replaces the contact set.
    ///
    /// Returns `None` when no user has this id; nothing is written then.
    async fn update(&self, id: UserId, changes: UserChanges) -> DirectoryResult<Option<User>>;

    /// Sets the avatar key. Returns `false` when no user has this id.
    async fn update_avatar(&self, id: UserId, avatar: &str) -> DirectoryResult<bool>;

    /// Deletes a user and, by cascade, its contacts.
    /// Returns `false` when no user has this id.
    async fn delete(&self, id: UserId) -> DirectoryResult<bool>;
}
