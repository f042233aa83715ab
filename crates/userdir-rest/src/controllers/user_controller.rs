//! User management controller.

use crate::{
    extractors::{ApiJson, ApiQuery},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;
use userdir_core::{DirectoryError, UserId};
use userdir_service::{
    CreateUserRequest, UpdateUserRequest, UpdateUserResponse, UserListQuery, UserResponse,
};

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List users, optionally filtered by status and a search term.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Matching users ordered by username", body = [UserResponse]),
        (status = 400, description = "Unknown status", body = userdir_core::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> ApiResult<Vec<UserResponse>> {
    debug!("List users request: {:?}", query);

    let filter = query.into_filter()?;
    let users = state.user_service.list_users(filter).await?;
    ok(users.into_iter().map(UserResponse::from).collect())
}

/// Create a user with its contacts.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing required fields", body = userdir_core::ErrorResponse),
        (status = 409, description = "Username taken", body = userdir_core::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    debug!("Create user request: {}", request.username);

    let user = state.user_service.create_user(request).await?;
    Ok(created(UserResponse::from(user)))
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = UserId, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed ID", body = userdir_core::ErrorResponse),
        (status = 404, description = "User not found", body = userdir_core::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.get_user_by_id(user_id).await?;
    ok(user.into())
}

/// Replace a user's fields and contact set.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = UserId, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UpdateUserResponse),
        (status = 400, description = "Invalid request", body = userdir_core::ErrorResponse),
        (status = 404, description = "User not found", body = userdir_core::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<UpdateUserResponse> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.update_user(user_id, request).await?;
    ok(UpdateUserResponse::new(user))
}

/// Delete a user and its contacts.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = UserId, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = userdir_core::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    state.user_service.delete_user(user_id).await?;

    Ok(no_content())
}

/// Helper to parse user ID from path parameter.
fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id).map_err(|_| AppError(DirectoryError::validation(format!("Invalid user ID: {id}"))))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, send_json, TestApp};
    use axum::http::StatusCode;
    use serde_json::json;

    fn alice() -> serde_json::Value {
        json!({
            "username": "alice",
            "name": "Alice",
            "password": "s3cret",
            "status": "ACTIVE",
            "contacts": [
                {"contact_type": "PHONE", "value": "555-0100"},
                {"contact_type": "WORK", "value": "ext 12"}
            ]
        })
    }

    #[tokio::test]
    async fn test_create_returns_201_without_password() {
        let app = TestApp::new();
        let (status, body) = send_json(app.router(), "POST", "/api/v1/users", alice()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["contacts"].as_array().unwrap().len(), 2);
        assert!(body["data"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_400() {
        let app = TestApp::new();
        let (status, body) = send_json(app.router(), "POST", "/api/v1/users", json!({"name": "nobody"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("Missing required fields"));
        assert!(message.contains("username"));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_409() {
        let app = TestApp::new();
        send_json(app.router(), "POST", "/api/v1/users", alice()).await;
        let (status, _) = send_json(app.router(), "POST", "/api/v1/users", alice()).await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_user_round_trip_and_404() {
        let app = TestApp::new();
        let (_, created) = send_json(app.router(), "POST", "/api/v1/users", alice()).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(app.router(), "GET", &format!("/api/v1/users/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], created["data"]);

        let (status, body) = send(
            app.router(),
            "GET",
            "/api/v1/users/0190a1d2-0000-7000-8000-000000000000",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_uuid_is_400() {
        let app = TestApp::new();
        for method in ["GET", "DELETE"] {
            let (status, body) = send(app.router(), method, "/api/v1/users/not-a-uuid").await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["message"], "Validation error: Invalid user ID: not-a-uuid");
        }
    }

    #[tokio::test]
    async fn test_update_replaces_contacts() {
        let app = TestApp::new();
        let (_, created) = send_json(app.router(), "POST", "/api/v1/users", alice()).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send_json(
            app.router(),
            "PUT",
            &format!("/api/v1/users/{id}"),
            json!({"status": "BLOCKED", "contacts": [{"contact_type": "WHATSAPP", "value": "+31"}]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "User updated successfully");
        assert_eq!(body["data"]["user"]["status"], "BLOCKED");
        assert_eq!(body["data"]["user"]["name"], "Alice");
        assert_eq!(body["data"]["user"]["contacts"][0]["contact_type"], "WHATSAPP");
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_404() {
        let app = TestApp::new();
        let (status, _) = send_json(
            app.router(),
            "PUT",
            "/api/v1/users/0190a1d2-0000-7000-8000-000000000000",
            json!({"contacts": []}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let app = TestApp::new();
        let (_, created) = send_json(app.router(), "POST", "/api/v1/users", alice()).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(app.router(), "DELETE", &format!("/api/v1/users/{id}")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(app.router(), "GET", &format!("/api/v1/users/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(app.router(), "DELETE", &format!("/api/v1/users/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_and_rejects_unknown_status() {
        let app = TestApp::new();
        send_json(app.router(), "POST", "/api/v1/users", alice()).await;
        let mut bob = alice();
        bob["username"] = json!("bob");
        bob["name"] = json!("Bob");
        bob["status"] = json!("BLOCKED");
        send_json(app.router(), "POST", "/api/v1/users", bob).await;

        let (status, body) = send(app.router(), "GET", "/api/v1/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(app.router(), "GET", "/api/v1/users?status=blocked").await;
        assert_eq!(body["data"][0]["username"], "bob");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = send(app.router(), "GET", "/api/v1/users?search=ALI").await;
        assert_eq!(body["data"][0]["username"], "alice");

        let (status, _) = send(app.router(), "GET", "/api/v1/users?status=sleeping").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
