//! Contact entity.

use crate::{ContactId, ContactType, UserId};
use serde::{Deserialize, Serialize};

/// A contact channel owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-generated identifier.
    pub id: ContactId,
    /// Owning user.
    pub user_id: UserId,
    /// Channel kind.
    pub contact_type: ContactType,
    /// Free-form value (phone number, handle, ...).
    pub value: String,
}

/// A contact that has not been persisted yet.
///
/// The owning user is assigned by the store when the contact set is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub contact_type: ContactType,
    pub value: String,
}

impl NewContact {
    #[must_use]
    pub fn new(contact_type: ContactType, value: impl Into<String>) -> Self {
        Self {
            contact_type,
            value: value.into(),
        }
    }

    /// Materializes the contact for `user_id` with the given identity.
    #[must_use]
    pub fn into_contact(self, id: ContactId, user_id: UserId) -> Contact {
        Contact {
            id,
            user_id,
            contact_type: self.contact_type,
            value: self.value,
        }
    }
}

impl From<&Contact> for NewContact {
    fn from(contact: &Contact) -> Self {
        Self {
            contact_type: contact.contact_type,
            value: contact.value.clone(),
        }
    }
}
