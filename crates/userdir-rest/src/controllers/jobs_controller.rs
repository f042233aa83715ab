//! Manual trigger for background jobs.

use crate::{responses::ApiResponse, state::AppState};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info};
use userdir_core::ErrorResponse;
use userdir_service::CacheRefreshResponse;

/// Create the jobs router.
pub fn router() -> Router<AppState> {
    Router::new().route("/cache-refresh", post(refresh_cache))
}

/// Rebuild the user cache from the record store.
#[utoipa::path(
    post,
    path = "/jobs/cache-refresh",
    tag = "jobs",
    responses(
        (status = 200, description = "Refresh finished; per-user failures are counted", body = CacheRefreshResponse),
        (status = 500, description = "Failed to refresh cache", body = ErrorResponse)
    )
)]
pub async fn refresh_cache(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CacheRefreshResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!("Manual cache refresh requested");

    match state.cache_refresher.refresh_all().await {
        Ok(report) => Ok(Json(ApiResponse::success(report.into()))),
        Err(e) => {
            error!(error = %e, "Manual cache refresh failed");
            let body = ErrorResponse {
                code: "CACHE_REFRESH_FAILED".to_string(),
                message: "Failed to refresh cache".to_string(),
                details: None,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(body))))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::router::api_router;
    use crate::state::AppState;
    use crate::test_support::{send, TestApp};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use userdir_core::{DirectoryError, DirectoryResult};
    use userdir_service::{CacheRefresher, RefreshReport};

    struct BrokenRefresher;

    #[async_trait]
    impl CacheRefresher for BrokenRefresher {
        async fn refresh_all(&self) -> DirectoryResult<RefreshReport> {
            Err(DirectoryError::Database("connection reset".into()))
        }
    }

    #[tokio::test]
    async fn test_refresh_reports_counts() {
        let app = TestApp::new();
        app.seed_user("alice").await;
        app.seed_user("bob").await;

        let (status, body) = send(app.router(), "POST", "/api/v1/jobs/cache-refresh").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "User cache refresh complete");
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["succeeded"], 2);
        assert_eq!(body["data"]["failed"], 0);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_500() {
        let app = TestApp::new();
        let state = AppState::new(app.state().user_service, Arc::new(BrokenRefresher), TestApp::MAX_AVATAR_BYTES);

        let (status, body) = send(api_router(state), "POST", "/api/v1/jobs/cache-refresh").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Failed to refresh cache");
        assert_eq!(body["success"], false);
    }
}
