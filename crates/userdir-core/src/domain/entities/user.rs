//! User entity.

use super::contact::{Contact, NewContact};
use crate::{UserId, UserStatus};
use serde::{Deserialize, Serialize};

/// User entity: a directory entry with its full, ordered contact set.
///
/// This is also the cache snapshot format, so every field is serialized,
/// including the password hash. API responses go through a DTO that drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Storage key of the avatar image.
    pub avatar: Option<String>,

    /// Unique username.
    pub username: String,

    /// Display name.
    pub name: Option<String>,

    /// Argon2 PHC string.
    #[serde(rename = "password")]
    pub password_hash: String,

    /// Account status.
    pub status: UserStatus,

    /// Contacts in insertion order.
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl User {
    /// Checks if the user is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the display name (name or username).
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }

    /// Returns true when `needle` occurs case-insensitively in the username or name.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.username.to_lowercase().contains(&needle)
            || self
                .name
                .as_ref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Caller-supplied identity; the store generates one when absent.
    pub id: Option<UserId>,
    pub avatar: Option<String>,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub status: UserStatus,
    pub contacts: Vec<NewContact>,
}

impl NewUser {
    /// Creates a new user with no contacts.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, status: UserStatus) -> Self {
        Self {
            id: None,
            avatar: None,
            username: username.into(),
            name: None,
            password_hash: password_hash.into(),
            status,
            contacts: Vec::new(),
        }
    }

    /// Sets an explicit identity.
    #[must_use]
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the avatar key.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Appends a contact.
    #[must_use]
    pub fn with_contact(mut self, contact: NewContact) -> Self {
        self.contacts.push(contact);
        self
    }
}

/// Changes applied by a full user update.
///
/// `None` scalar fields keep their stored value. `contacts` always replaces
/// the whole stored contact set, and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub avatar: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub status: Option<UserStatus>,
    pub contacts: Vec<NewContact>,
}

impl UserChanges {
    /// Applies the scalar changes and contact replacement to `user` in memory.
    ///
    /// New contacts get identities from `next_id`.
    pub fn apply_to(&self, user: &mut User, mut next_id: impl FnMut() -> crate::ContactId) {
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash.clone_from(hash);
        }
        if let Some(status) = self.status {
            user.status = status;
        }
        user.contacts = self
            .contacts
            .iter()
            .cloned()
            .map(|c| c.into_contact(next_id(), user.id))
            .collect();
    }
}

/// Filter for listing users. Both criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    /// Exact status match.
    pub status: Option<UserStatus>,
    /// Case-insensitive substring of username or name.
    pub search: Option<String>,
}

impl UserFilter {
    /// Returns the trimmed search term, treating blank input as absent.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Returns true when `user` satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.status.map_or(true, |s| user.status == s)
            && self.search_term().map_or(true, |term| user.matches_search(term))
    }
}
