//! Main application router.

use crate::{
    controllers::{health_controller, jobs_controller, metrics_controller, upload_controller, user_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::{AppState, HealthState},
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use userdir_config::ServerConfig;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Routes under `/api/v1`, without the outer middleware stack.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/users", user_controller::router())
        .merge(upload_controller::router())
        .nest("/jobs", jobs_controller::router())
        .with_state(state);

    Router::new().nest("/api/v1", api)
}

/// Creates the main application router.
///
/// `metrics` is the exposition path and recorder handle; pass `None` to
/// leave the metrics route off.
pub fn create_router(
    state: AppState,
    health: HealthState,
    server_config: &ServerConfig,
    metrics: Option<(&str, PrometheusHandle)>,
) -> Router {
    let cors = create_cors_layer(server_config);

    let mut router = Router::new()
        // Health endpoints
        .merge(health_controller::router(health))
        // API v1
        .merge(api_router(state))
        // Swagger UI and OpenAPI document
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Root endpoint
        .route("/", get(root));

    if let Some((path, handle)) = metrics {
        router = router.merge(metrics_controller::router(path, handle));
    }

    let router = router
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "User Directory API v1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{send, TestApp};
    use axum::http::StatusCode;

    fn full_router(app: &TestApp) -> Router {
        create_router(app.state(), HealthState::default(), &ServerConfig::default(), None)
    }

    #[tokio::test]
    async fn test_root_and_health_are_mounted() {
        let app = TestApp::new();

        let (status, _) = send(full_router(&app), "GET", "/").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(full_router(&app), "GET", "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = TestApp::new();
        let (status, body) = send(full_router(&app), "GET", "/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/users/{id}").is_some());
        assert!(body["paths"].get("/jobs/cache-refresh").is_some());
    }

    #[tokio::test]
    async fn test_metrics_route_is_optional() {
        let app = TestApp::new();
        let (status, _) = send(full_router(&app), "GET", "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_with_explicit_origins() {
        let config = ServerConfig {
            cors_origins: vec!["https://example.com".to_string(), "not a header\n".to_string()],
            ..ServerConfig::default()
        };
        let _ = create_cors_layer(&config);
    }
}
