//! Avatar upload controller.

use crate::{
    extractors::{ApiJson, ApiQuery},
    responses::{ok, ApiResult, AppError},
    state::AppState,
};
use axum::{extract::State, routing::post, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info};
use userdir_core::DirectoryError;
use userdir_service::{UploadAvatarQuery, UploadAvatarRequest, UploadAvatarResponse};

/// Creates the upload router.
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_avatar))
}

/// Upload a base64-encoded PNG as the user's avatar.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "users",
    params(UploadAvatarQuery),
    request_body = UploadAvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = UploadAvatarResponse),
        (status = 400, description = "Invalid image data", body = userdir_core::ErrorResponse),
        (status = 404, description = "User not found", body = userdir_core::ErrorResponse),
        (status = 502, description = "Blob store failure", body = userdir_core::ErrorResponse)
    )
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UploadAvatarQuery>,
    ApiJson(request): ApiJson<UploadAvatarRequest>,
) -> ApiResult<UploadAvatarResponse> {
    debug!("Upload avatar request: {}", query.id);

    let bytes = decode_image(&request.image_data, state.max_avatar_bytes)?;
    let file_path = state.user_service.upload_avatar(query.id, bytes).await?;

    info!(user_id = %query.id, file_path = %file_path, "Avatar uploaded");
    ok(UploadAvatarResponse { file_path })
}

fn decode_image(image_data: &str, max_bytes: usize) -> Result<Vec<u8>, AppError> {
    let bytes = STANDARD
        .decode(image_data.trim())
        .map_err(|e| AppError(DirectoryError::validation(format!("Invalid image data: {e}"))))?;

    if bytes.len() > max_bytes {
        return Err(AppError(DirectoryError::validation(format!(
            "Image exceeds maximum size of {max_bytes} bytes"
        ))));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{send_json, TestApp};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_decode_image_limits() {
        assert_eq!(decode_image("aGVsbG8=", 5).unwrap(), b"hello");
        assert!(decode_image("aGVsbG8=", 4).is_err());
        assert!(decode_image("***", 100).is_err());
    }

    #[tokio::test]
    async fn test_upload_stores_object_and_sets_avatar() {
        let app = TestApp::new();
        let user = app.seed_user("alice").await;
        let encoded = STANDARD.encode(b"\x89PNG fake image");

        let (status, body) = send_json(
            app.router(),
            "POST",
            &format!("/api/v1/upload?id={}", user.id),
            json!({ "image_data": encoded }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let key = body["data"]["file_path"].as_str().unwrap().to_string();
        assert!(key.starts_with("avatars/") && key.ends_with(".png"));

        let stored = app.blob_store.object(&key).expect("object stored");
        assert_eq!(stored.bytes, b"\x89PNG fake image");

        let reloaded = app.stored_user(user.id).await;
        assert_eq!(reloaded.avatar.as_deref(), Some(key.as_str()));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_input() {
        let app = TestApp::new();
        let user = app.seed_user("alice").await;
        let uri = format!("/api/v1/upload?id={}", user.id);

        let (status, _) = send_json(app.router(), "POST", &uri, json!({"image_data": "not base64!"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let oversized = STANDARD.encode(vec![0u8; TestApp::MAX_AVATAR_BYTES + 1]);
        let (status, body) = send_json(app.router(), "POST", &uri, json!({ "image_data": oversized })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("maximum size"));

        let (status, _) = send_json(
            app.router(),
            "POST",
            "/api/v1/upload?id=nope",
            json!({"image_data": "aGVsbG8="}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.blob_store.is_empty());
    }

    #[tokio::test]
    async fn test_upload_for_unknown_user_is_404() {
        let app = TestApp::new();
        let (status, _) = send_json(
            app.router(),
            "POST",
            "/api/v1/upload?id=0190a1d2-0000-7000-8000-000000000000",
            json!({"image_data": "aGVsbG8="}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(app.blob_store.is_empty());
    }
}
