//! Common test utilities for integration tests
//!
//! The application runs on the in-memory store, so these tests need no
//! external services.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cms_backend::{
    config::{AppConfig, StorageBackend},
    repositories::{NewUser, UserRecord, UserStore},
    routes,
    state::AppState,
};
use secrecy::SecretString;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const TEST_PASSWORD: &str = "SecurePassword123!";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application on a fresh in-memory store
    pub fn new() -> Self {
        let state = AppState::in_memory(test_config()).expect("Failed to build test state");
        let app = routes::create_router(state.clone());
        Self { app, state }
    }

    /// Insert a user directly into storage, bypassing the protected route
    pub async fn seed_user(&self, email: &str, password: &str) -> UserRecord {
        let password_hash = self.state.passwords.hash(password).unwrap();
        self.state
            .users
            .create(NewUser {
                name: "Seeded User".to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .unwrap()
    }

    /// Seed a user and sign in over HTTP, returning the access token
    pub async fn signed_in_user(&self) -> (UserRecord, String) {
        let email = format!("user_{}@example.com", uuid::Uuid::new_v4());
        let user = self.seed_user(&email, TEST_PASSWORD).await;
        let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
        let (status, response) = self.post("/auth/signin", &body.to_string(), None).await;
        assert_eq!(status, StatusCode::OK, "sign-in failed: {}", response);

        let response: serde_json::Value = serde_json::from_str(&response).unwrap();
        let token = response["access_token"].as_str().unwrap().to_string();
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, String) {
        let request = with_bearer(Request::builder().method("GET").uri(path), token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str, token: Option<&str>) -> (StatusCode, String) {
        let request = with_bearer(Request::builder().method("POST").uri(path), token)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, String) {
        let request = with_bearer(Request::builder().method("DELETE").uri(path), token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

fn with_bearer(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
        None => builder,
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.storage.backend = StorageBackend::Memory;
    config.jwt.secret = SecretString::new(TEST_SECRET.to_string());
    // Minimum bcrypt cost keeps the suite fast
    config.password.bcrypt_cost = 4;
    config
}
