//! User-related DTOs.

use serde::{Deserialize, Serialize};
use userdir_core::validation::rules;
use userdir_core::{
    Contact, ContactId, ContactType, DirectoryResult, NewContact, User, UserFilter, UserId, UserStatus,
};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A contact as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    pub contact_type: ContactType,

    #[validate(custom(function = "rules::not_blank", message = "is required"))]
    pub value: String,
}

impl From<ContactRequest> for NewContact {
    fn from(request: ContactRequest) -> Self {
        Self::new(request.contact_type, request.value)
    }
}

/// Request to create a new user.
///
/// Missing strings deserialize as empty so that absent and blank fields are
/// reported together by validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Honoured when present; generated by the store otherwise.
    #[serde(default)]
    pub id: Option<UserId>,

    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "rules::valid_username", message = "is required"))]
    pub username: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "rules::not_blank", message = "is required"))]
    pub password: String,

    #[serde(default)]
    #[validate(required(message = "is required"))]
    pub status: Option<UserStatus>,

    #[serde(default)]
    #[validate(length(min = 1, message = "at least one contact is required"), nested)]
    pub contacts: Vec<ContactRequest>,
}

/// Full update of a user.
///
/// Scalar fields left as `None` keep their stored value. `contacts` replaces
/// the stored contact set and may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "rules::valid_username", message = "must not be blank"))]
    pub username: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "rules::not_blank", message = "must not be blank"))]
    pub password: Option<String>,

    #[serde(default)]
    pub status: Option<UserStatus>,

    #[validate(nested)]
    pub contacts: Vec<ContactRequest>,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// `ACTIVE` or `BLOCKED`, case-insensitive.
    pub status: Option<String>,
    /// Case-insensitive substring of username or name.
    pub search: Option<String>,
}

impl UserListQuery {
    /// Converts the raw query into a filter, rejecting unknown statuses.
    pub fn into_filter(self) -> DirectoryResult<UserFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<UserStatus>()?),
        };
        Ok(UserFilter {
            status,
            search: self.search,
        })
    }
}

/// Contact response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub id: ContactId,
    pub user_id: UserId,
    pub contact_type: ContactType,
    pub value: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            user_id: contact.user_id,
            contact_type: contact.contact_type,
            value: contact.value,
        }
    }
}

/// User response DTO. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub avatar: Option<String>,
    pub username: String,
    pub name: Option<String>,
    pub status: UserStatus,
    pub contacts: Vec<ContactResponse>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            avatar: user.avatar,
            username: user.username,
            name: user.name,
            status: user.status,
            contacts: user.contacts.into_iter().map(ContactResponse::from).collect(),
        }
    }
}

/// Response body of a successful update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserResponse {
    pub message: String,
    pub user: UserResponse,
}

impl UpdateUserResponse {
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            message: "User updated successfully".to_string(),
            user: user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn create_request() -> CreateUserRequest {
        CreateUserRequest {
            id: None,
            avatar: None,
            username: "alice".to_string(),
            name: Some("Alice".to_string()),
            password: "pw".to_string(),
            status: Some(UserStatus::Active),
            contacts: vec![ContactRequest {
                contact_type: ContactType::Phone,
                value: "555".to_string(),
            }],
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_reports_each_missing_field() {
        let request: CreateUserRequest = serde_json::from_str(r#"{"name":"Nobody"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.errors();

        for field in ["username", "password", "status", "contacts"] {
            assert!(fields.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn test_create_request_rejects_blank_contact_value() {
        let mut request = create_request();
        request.contacts[0].value = "  ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_requires_contacts_key() {
        let missing = serde_json::from_str::<UpdateUserRequest>(r#"{"name":"x"}"#);
        assert!(missing.is_err());

        let empty: UpdateUserRequest = serde_json::from_str(r#"{"contacts":[]}"#).unwrap();
        assert!(empty.validate().is_ok());
        assert!(empty.username.is_none());
    }

    #[test]
    fn test_update_request_rejects_blank_username() {
        let request = UpdateUserRequest {
            username: Some(" ".to_string()),
            ..UpdateUserRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_query_into_filter() {
        let filter = UserListQuery {
            status: Some("blocked".to_string()),
            search: Some("ann".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.status, Some(UserStatus::Blocked));
        assert_eq!(filter.search.as_deref(), Some("ann"));

        assert!(UserListQuery::default().into_filter().unwrap().status.is_none());
        assert!(UserListQuery {
            status: Some("DELETED".to_string()),
            search: None,
        }
        .into_filter()
        .is_err());
    }

    #[test]
    fn test_user_response_omits_password() {
        let user = User {
            id: UserId::new(),
            avatar: None,
            username: "alice".to_string(),
            name: None,
            password_hash: "$argon2id$secret".to_string(),
            status: UserStatus::Active,
            contacts: vec![],
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["status"], "ACTIVE");
    }
}
