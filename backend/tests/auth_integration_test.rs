//! Integration tests for sign-in and the auth gate

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use cms_backend::repositories::NewUser;
use serde_json::json;

#[tokio::test]
async fn test_signin_success() {
    let app = common::TestApp::new();
    let user = app.seed_user("login_test@example.com", common::TEST_PASSWORD).await;

    let body = json!({
        "email": "login_test@example.com",
        "password": common::TEST_PASSWORD
    });
    let (status, response) = app.post("/auth/signin", &body.to_string(), None).await;

    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let token = response["access_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(response["token_type"], "Bearer");
    assert_eq!(response["expires_in"], 7200);

    let ctx = app.state.verifier().verify(token).unwrap();
    assert_eq!(ctx.subject, user.id);
}

#[tokio::test]
async fn test_signin_failures_are_indistinguishable() {
    let app = common::TestApp::new();
    app.seed_user("wrong_pass@example.com", "CorrectPassword123!").await;

    let wrong_password = json!({
        "email": "wrong_pass@example.com",
        "password": "WrongPassword123!"
    });
    let unknown_email = json!({
        "email": "nonexistent@example.com",
        "password": "CorrectPassword123!"
    });

    let (status_a, body_a) = app.post("/auth/signin", &wrong_password.to_string(), None).await;
    let (status_b, body_b) = app.post("/auth/signin", &unknown_email.to_string(), None).await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_b, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a, body_b);

    let body: serde_json::Value = serde_json::from_str(&body_a).unwrap();
    assert_eq!(body, json!({ "error": "Invalid email or password" }));
}

#[tokio::test]
async fn test_signin_with_unreadable_stored_hash_matches_unknown_email() {
    let app = common::TestApp::new();
    app.state
        .users
        .create(NewUser {
            name: "Broken Hash".to_string(),
            email: "broken@example.com".to_string(),
            password_hash: "not-a-bcrypt-hash".to_string(),
        })
        .await
        .unwrap();

    let broken = json!({ "email": "broken@example.com", "password": "anything" });
    let unknown = json!({ "email": "nobody@example.com", "password": "anything" });

    let (status_a, body_a) = app.post("/auth/signin", &broken.to_string(), None).await;
    let (status_b, body_b) = app.post("/auth/signin", &unknown.to_string(), None).await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_b, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn test_signin_rejects_unparseable_bodies_with_error_shape() {
    let app = common::TestApp::new();

    for body in ["{not json", r#"{"email": "ada@example.com"}"#, r#"{"email": 5, "password": "x"}"#] {
        let (status, response) = app.post("/auth/signin", body, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);

        let response: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(response, json!({ "error": "Invalid request body" }));
    }
}

#[tokio::test]
async fn test_end_to_end_signin_then_protected_call() {
    let app = common::TestApp::new();
    let (user, token) = app.signed_in_user().await;

    let body = json!({ "title": "First post", "content": "Hello from the CMS" });
    let (status, response) = app.post("/posts", &body.to_string(), Some(&token)).await;

    assert_eq!(status, StatusCode::CREATED);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    // The handler saw the authenticated subject
    assert_eq!(response["author_id"], user.id.to_string());
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = common::TestApp::new();
    let (user, _) = app.signed_in_user().await;

    let expired = app
        .state
        .issuer()
        .issue_at(user.id, Utc::now() - Duration::hours(3))
        .unwrap();

    let (status, body) = app.get("/posts", Some(&expired)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "error": "Invalid or expired token" }));
}

#[tokio::test]
async fn test_gate_rejection_shapes() {
    let app = common::TestApp::new();

    let cases = [
        (None, "Missing or invalid Authorization header"),
        (Some("Token abc"), "Invalid token format"),
        (Some("Bearer"), "Invalid token format"),
        (Some("Bearer invalid.token.here"), "Invalid or expired token"),
    ];

    for (header, message) in cases {
        let mut builder = axum::http::Request::builder().method("GET").uri("/users");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        let request = builder.body(axum::body::Body::empty()).unwrap();

        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{:?}", header);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({ "error": message }), "{:?}", header);
    }
}

#[tokio::test]
async fn test_token_survives_only_its_own_secret() {
    let app = common::TestApp::new();
    let (_, token) = app.signed_in_user().await;

    // A second process configured with another secret rejects the token
    let mut config = common::test_config();
    config.jwt.secret = secrecy::SecretString::new("a-completely-different-secret".to_string());
    let other = cms_backend::state::AppState::in_memory(config).unwrap();

    assert!(other.verifier().verify(&token).is_err());
}
