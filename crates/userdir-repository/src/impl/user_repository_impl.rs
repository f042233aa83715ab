//! `UserRepositoryImpl`: repository layer implementation.
//!
//! Implements the [`UserRepository`] domain interface on top of a
//! [`UserDao`].
//!
//! ```text
//! Service
//!   ↓ Arc<dyn UserRepository>
//! UserRepositoryImpl          ← normalizes input, logs, delegates
//!   ↓ Arc<dyn UserDao>
//! PgUserDaoImpl / InMemoryUserDao
//!   ↓
//! PostgreSQL / process memory
//! ```
//!
//! [`UserRepository`]: crate::traits::UserRepository
//! [`UserDao`]: crate::dao::UserDao

use crate::{dao::UserDao, traits::UserRepository};
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::debug;
use userdir_core::{DirectoryResult, NewUser, User, UserChanges, UserFilter, UserId};

/// Repository implementation that orchestrates [`UserDao`] access.
///
/// [`UserDao`]: crate::dao::UserDao
#[derive(Component)]
#[shaku(interface = UserRepository)]
pub struct UserRepositoryImpl {
    #[shaku(inject)]
    user_dao: Arc<dyn UserDao>,
}

impl UserRepositoryImpl {
    /// Creates a new `UserRepositoryImpl` with the given DAO.
    #[must_use]
    pub fn new(user_dao: Arc<dyn UserDao>) -> Self {
        Self { user_dao }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        debug!("Repository: find_by_id {}", id);
        self.user_dao.find_by_id(id).await
    }

    async fn exists(&self, id: UserId) -> DirectoryResult<bool> {
        self.user_dao.exists(id).await
    }

    async fn list(&self, filter: &UserFilter) -> DirectoryResult<Vec<User>> {
        let normalized = UserFilter {
            status: filter.status,
            search: filter.search_term().map(str::to_string),
        };
        debug!("Repository: list {:?}", normalized);
        self.user_dao.list(&normalized).await
    }

    async fn find_all_with_contacts(&self) -> DirectoryResult<Vec<User>> {
        debug!("Repository: find_all_with_contacts");
        self.user_dao.find_all().await
    }

    async fn create(&self, user: NewUser) -> DirectoryResult<User> {
        debug!("Repository: create user {}", user.username);
        self.user_dao.insert(user).await
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> DirectoryResult<Option<User>> {
        debug!("Repository: update user {} ({} contacts)", id, changes.contacts.len());
        self.user_dao.update(id, changes).await
    }

    async fn update_avatar(&self, id: UserId, avatar: &str) -> DirectoryResult<bool> {
        debug!("Repository: update avatar {} -> {}", id, avatar);
        self.user_dao.update_avatar(id, avatar).await
    }

    async fn delete(&self, id: UserId) -> DirectoryResult<bool> {
        debug!("Repository: delete user {}", id);
        self.user_dao.delete(id).await
    }
}

impl std::fmt::Debug for UserRepositoryImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRepositoryImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::InMemoryUserDao;
    use userdir_core::{ContactType, NewContact, UserStatus};

    fn repository() -> UserRepositoryImpl {
        UserRepositoryImpl::new(Arc::new(InMemoryUserDao::new()))
    }

    fn new_user(username: &str, name: Option<&str>, status: UserStatus) -> NewUser {
        let mut user = NewUser::new(username, "hash", status).with_contact(NewContact::new(ContactType::Phone, "555"));
        user.name = name.map(str::to_string);
        user
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let repo = repository();
        let created = repo
            .create(new_user("alice", Some("Alice"), UserStatus::Active))
            .await
            .unwrap();

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.exists(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = repository();
        assert!(repo.find_by_id(UserId::new()).await.unwrap().is_none());
        assert!(!repo.exists(UserId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_trims_search_and_ignores_blank() {
        let repo = repository();
        repo.create(new_user("annabel", None, UserStatus::Active)).await.unwrap();
        repo.create(new_user("bob", Some("Joanne"), UserStatus::Blocked)).await.unwrap();
        repo.create(new_user("carl", None, UserStatus::Active)).await.unwrap();

        let all = repo
            .list(&UserFilter {
                status: None,
                search: Some("  ".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let matched = repo
            .list(&UserFilter {
                status: None,
                search: Some(" ANN ".to_string()),
            })
            .await
            .unwrap();
        let names: Vec<&str> = matched.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["annabel", "bob"]);

        let active_only = repo
            .list(&UserFilter {
                status: Some(UserStatus::Active),
                search: Some("ann".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(active_only.len(), 1);
        assert_eq!(active_only[0].username, "annabel");
    }

    #[tokio::test]
    async fn test_update_replaces_contacts() {
        let repo = repository();
        let created = repo.create(new_user("alice", None, UserStatus::Active)).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UserChanges {
                    name: Some("Alice A.".to_string()),
                    contacts: vec![NewContact::new(ContactType::Whatsapp, "+44")],
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Alice A."));
        assert_eq!(updated.contacts.len(), 1);
        assert_eq!(updated.contacts[0].contact_type, ContactType::Whatsapp);
        assert_eq!(updated.username, "alice");
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let repo = repository();
        let created = repo.create(new_user("alice", None, UserStatus::Active)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.find_all_with_contacts().await.unwrap().is_empty());
    }

    #[test]
    fn test_user_repository_impl_debug() {
        let debug_str = format!("{:?}", repository());
        assert!(debug_str.contains("UserRepositoryImpl"));
    }
}
