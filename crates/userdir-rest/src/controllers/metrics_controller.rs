//! Prometheus exposition endpoint.

use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;

/// Creates the metrics router serving `path`.
pub fn router(path: &str, handle: PrometheusHandle) -> Router {
    Router::new()
        .route(path, get(render_metrics))
        .with_state(handle)
}

/// Renders every registered metric in the text exposition format.
pub async fn render_metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_renders_recorded_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("userdir_test_total").increment(3);
        });

        let response = router("/metrics", handle)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("userdir_test_total 3"));
    }
}
