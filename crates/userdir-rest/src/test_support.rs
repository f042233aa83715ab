//! Fixtures for handler tests: in-memory components behind the real router.

use crate::{router::api_router, state::AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use userdir_core::{ContactType, User, UserId, UserStatus};
use userdir_repository::{InMemoryUserDao, UserDao, UserRepositoryImpl};
use userdir_security::PasswordHasher;
use userdir_service::{
    CacheRefresherComponent, ContactRequest, CreateUserRequest, InMemoryBlobStore, InMemoryCache,
    ServiceSettings, UserDirectoryService, UserServiceComponent,
};

pub(crate) struct TestApp {
    pub dao: Arc<InMemoryUserDao>,
    pub blob_store: Arc<InMemoryBlobStore>,
    service: Arc<UserServiceComponent>,
    refresher: Arc<CacheRefresherComponent>,
}

impl TestApp {
    pub const MAX_AVATAR_BYTES: usize = 1024;

    pub fn new() -> Self {
        let dao = Arc::new(InMemoryUserDao::new());
        let repository = Arc::new(UserRepositoryImpl::new(dao.clone()));
        let cache = Arc::new(InMemoryCache::new());
        let blob_store = Arc::new(InMemoryBlobStore::default());
        let settings = ServiceSettings::default();

        Self {
            service: Arc::new(UserServiceComponent::new(
                repository.clone(),
                Arc::new(PasswordHasher::with_cost(1)),
                cache.clone(),
                blob_store.clone(),
                settings,
            )),
            refresher: Arc::new(CacheRefresherComponent::new(repository, cache, settings)),
            dao,
            blob_store,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.service.clone(), self.refresher.clone(), Self::MAX_AVATAR_BYTES)
    }

    pub fn router(&self) -> Router {
        api_router(self.state())
    }

    pub async fn seed_user(&self, username: &str) -> User {
        self.service
            .create_user(CreateUserRequest {
                id: None,
                avatar: None,
                username: username.to_string(),
                name: None,
                password: "password".to_string(),
                status: Some(UserStatus::Active),
                contacts: vec![ContactRequest {
                    contact_type: ContactType::Phone,
                    value: "555".to_string(),
                }],
            })
            .await
            .unwrap()
    }

    pub async fn stored_user(&self, id: UserId) -> User {
        self.dao.find_by_id(id).await.unwrap().unwrap()
    }
}

pub(crate) async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    dispatch(router, request).await
}

pub(crate) async fn send_json(router: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(router, request).await
}

async fn dispatch(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
