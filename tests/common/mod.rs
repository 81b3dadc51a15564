#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use ayzek_backend::{
    AppConfig, AppState, InMemoryRepository, MockStorageService, auth, create_router,
    models::Admin,
    repository::{Repository, RepositoryState},
    storage::StorageState,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::util::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@ayzek.org";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Fresh state backed by the in-memory repository and a mock disk.
pub fn test_state() -> AppState {
    test_state_with_storage(MockStorageService::new())
}

pub fn test_state_with_storage(storage: MockStorageService) -> AppState {
    AppState {
        repo: Arc::new(InMemoryRepository::new()) as RepositoryState,
        storage: Arc::new(storage) as StorageState,
        config: AppConfig::default(),
    }
}

/// Creates the standard admin account and returns it.
pub async fn seed_admin(state: &AppState) -> Admin {
    let hash = auth::hash_password(ADMIN_PASSWORD).unwrap();
    state.repo.upsert_admin(ADMIN_EMAIL, &hash).await.unwrap()
}

/// Seeds the admin and signs a token for it directly.
pub async fn admin_token(state: &AppState) -> String {
    let admin = seed_admin(state).await;
    auth::issue_token(&state.config, &admin.email).unwrap().0
}

pub fn router(state: &AppState) -> Router {
    create_router(state.clone())
}

/// Sends one request through the full router (layers included).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Sends and asserts the status, returning the JSON body.
pub async fn expect(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    status: StatusCode,
) -> Value {
    let response = send(app, method, uri, token, body).await;
    let actual = response.status();
    let json = json_body(response).await;
    assert_eq!(actual, status, "{method} {uri} returned {json}");
    json
}

pub struct TestApp {
    pub address: String,
    pub state: AppState,
}

/// Serves the router on a random local port.
pub async fn spawn_app() -> TestApp {
    let state = test_state();
    let app = create_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address: format!("http://127.0.0.1:{port}"), state }
}
