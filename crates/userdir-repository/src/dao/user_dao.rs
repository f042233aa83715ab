//! `UserDao` trait: low-level user data access abstraction.
//!
//! Implementations connect directly to a single data source.
//! [`UserRepository`] uses a `UserDao` to fulfil domain-level operations.
//!
//! [`UserRepository`]: crate::traits::UserRepository

use async_trait::async_trait;
use userdir_core::{DirectoryResult, Interface, NewUser, User, UserChanges, UserFilter, UserId};

/// Low-level user data access object.
#[async_trait]
pub trait UserDao: Interface + Send + Sync {
    /// Finds a user and its contacts by ID.
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>>;

    /// Checks whether a user row exists.
    async fn exists(&self, id: UserId) -> DirectoryResult<bool>;

    /// Lists users matching the filter, ordered by username.
    ///
    /// The search term arrives trimmed and non-empty, or absent.
    async fn list(&self, filter: &UserFilter) -> DirectoryResult<Vec<User>>;

    /// Loads every user with contacts.
    async fn find_all(&self) -> DirectoryResult<Vec<User>>;

    /// Inserts a user and its contacts in one transaction.
    async fn insert(&self, user: NewUser) -> DirectoryResult<User>;

    /// Updates scalars and replaces contacts in one transaction.
    async fn update(&self, id: UserId, changes: UserChanges) -> DirectoryResult<Option<User>>;

    /// Updates the avatar column only.
    async fn update_avatar(&self, id: UserId, avatar: &str) -> DirectoryResult<bool>;

    /// Deletes a user row. Returns `true` if deleted.
    async fn delete(&self, id: UserId) -> DirectoryResult<bool>;
}
