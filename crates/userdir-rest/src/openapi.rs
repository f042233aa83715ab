//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{ComponentHealth, HealthResponse, ReadinessResponse};
use userdir_core::{ContactType, ErrorResponse, FieldError, UserId, UserStatus};
use userdir_service::{
    CacheRefreshResponse, ContactRequest, ContactResponse, CreateUserRequest, RefreshReport,
    UpdateUserRequest, UpdateUserResponse, UploadAvatarRequest, UploadAvatarResponse, UserResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the user directory API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory API",
        version = "1.0.0",
        description = "Users with contacts, avatar upload and cache maintenance"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // User endpoints
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::upload_controller::upload_avatar,
        // Job endpoints
        crate::controllers::jobs_controller::refresh_cache,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            // Core types
            UserId,
            UserStatus,
            ContactType,
            ErrorResponse,
            FieldError,
            // User DTOs
            ContactRequest,
            CreateUserRequest,
            UpdateUserRequest,
            ContactResponse,
            UserResponse,
            UpdateUserResponse,
            UploadAvatarRequest,
            UploadAvatarResponse,
            // Job DTOs
            RefreshReport,
            CacheRefreshResponse,
            // Health
            HealthResponse,
            ReadinessResponse,
            ComponentHealth,
        )
    ),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "jobs", description = "Background job triggers"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
