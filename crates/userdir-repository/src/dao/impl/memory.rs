//! In-process DAO backed by a map.
//!
//! Mirrors the PostgreSQL DAO's observable behaviour (unique usernames,
//! ordered listing, cascading deletes) for tests and local runs.

use crate::dao::UserDao;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use userdir_core::{
    ContactId, DirectoryError, DirectoryResult, NewUser, User, UserChanges, UserFilter, UserId,
};

/// In-memory user DAO.
#[derive(Debug, Default)]
pub struct InMemoryUserDao {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDao {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing users.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let dao = Self::new();
        {
            let mut map = dao.users.write();
            for user in users {
                map.insert(user.id, user);
            }
        }
        dao
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn username_taken(map: &HashMap<UserId, User>, username: &str, except: Option<UserId>) -> bool {
        map.values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn sorted(mut users: Vec<User>) -> Vec<User> {
        users.sort_by(|a, b| a.username.cmp(&b.username).then(a.id.cmp(&b.id)));
        users
    }
}

#[async_trait]
impl UserDao for InMemoryUserDao {
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn exists(&self, id: UserId) -> DirectoryResult<bool> {
        Ok(self.users.read().contains_key(&id))
    }

    async fn list(&self, filter: &UserFilter) -> DirectoryResult<Vec<User>> {
        let users = self
            .users
            .read()
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        Ok(Self::sorted(users))
    }

    async fn find_all(&self) -> DirectoryResult<Vec<User>> {
        Ok(Self::sorted(self.users.read().values().cloned().collect()))
    }

    async fn insert(&self, user: NewUser) -> DirectoryResult<User> {
        let mut map = self.users.write();
        let id = user.id.unwrap_or_default();

        if map.contains_key(&id) {
            return Err(DirectoryError::unique_violation(Some("users_pkey")));
        }
        if Self::username_taken(&map, &user.username, None) {
            return Err(DirectoryError::unique_violation(Some("idx_users_username")));
        }

        let created = User {
            id,
            avatar: user.avatar,
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            status: user.status,
            contacts: user
                .contacts
                .into_iter()
                .map(|c| c.into_contact(ContactId::new(), id))
                .collect(),
        };
        map.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> DirectoryResult<Option<User>> {
        let mut map = self.users.write();

        if let Some(username) = &changes.username {
            if Self::username_taken(&map, username, Some(id)) {
                return Err(DirectoryError::unique_violation(Some("idx_users_username")));
            }
        }

        let Some(user) = map.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(user, ContactId::new);
        Ok(Some(user.clone()))
    }

    async fn update_avatar(&self, id: UserId, avatar: &str) -> DirectoryResult<bool> {
        Ok(self
            .users
            .write()
            .get_mut(&id)
            .map(|u| u.avatar = Some(avatar.to_string()))
            .is_some())
    }

    async fn delete(&self, id: UserId) -> DirectoryResult<bool> {
        Ok(self.users.write().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdir_core::{ContactType, NewContact, UserStatus};

    fn new_user(username: &str) -> NewUser {
        NewUser::new(username, "hash", UserStatus::Active).with_contact(NewContact::new(ContactType::Phone, "1"))
    }

    #[tokio::test]
    async fn test_insert_honours_supplied_id() {
        let dao = InMemoryUserDao::new();
        let id = UserId::new();
        let created = dao.insert(new_user("alice").with_id(id)).await.unwrap();
        assert_eq!(created.id, id);
        assert_eq!(created.contacts[0].user_id, id);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let dao = InMemoryUserDao::new();
        dao.insert(new_user("alice")).await.unwrap();
        let err = dao.insert(new_user("alice")).await.unwrap_err();
        assert_eq!(err.public_message(), "Conflict: Username already exists");
        assert_eq!(dao.len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let dao = InMemoryUserDao::new();
        let result = dao.update(UserId::new(), UserChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_username() {
        let dao = InMemoryUserDao::new();
        for name in ["carol", "alice", "bob"] {
            dao.insert(new_user(name)).await.unwrap();
        }
        let names: Vec<String> = dao
            .list(&UserFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_delete_and_avatar_report_absence() {
        let dao = InMemoryUserDao::new();
        assert!(!dao.delete(UserId::new()).await.unwrap());
        assert!(!dao.update_avatar(UserId::new(), "avatars/x.png").await.unwrap());
    }
}
