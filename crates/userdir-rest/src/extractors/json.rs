//! JSON body and query extractors that reject with the API error envelope.
//!
//! Axum's stock `Json` and `Query` reject with a plain-text body. These
//! wrappers turn the rejection into a `400 VALIDATION_ERROR` wrapped in
//! [`ApiResponse`](crate::responses::ApiResponse), like every other error.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use userdir_core::DirectoryError;

/// JSON body extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError(DirectoryError::validation(format!("Invalid request body: {}", rejection.body_text()))))?;

        Ok(Self(value))
    }
}

/// Query string extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError(DirectoryError::validation(format!("Invalid query string: {}", rejection.body_text()))))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Params {
        limit: u32,
    }

    fn app() -> Router {
        Router::new().route(
            "/echo",
            post(|ApiQuery(params): ApiQuery<Params>, ApiJson(payload): ApiJson<Payload>| async move {
                format!("{}:{}", payload.name, params.limit).into_response()
            }),
        )
    }

    fn request(uri: &str, body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_and_query() {
        let response = app().oneshot(request("/echo?limit=3", r#"{"name":"a"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = app().oneshot(request("/echo?limit=3", "{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_query_is_bad_request() {
        let response = app().oneshot(request("/echo?limit=lots", r#"{"name":"a"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
