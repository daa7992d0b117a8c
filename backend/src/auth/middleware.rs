//! Authentication middleware
//!
//! The gate in front of every protected route. It reads the bearer token,
//! verifies it, and either attaches an [`AuthContext`] to the request or
//! answers 401 without running the handler. Handlers read the identity
//! back through the `AuthContext` extractor.

use super::{AuthContext, AuthError, TokenVerifier};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

pub const MISSING_HEADER_MESSAGE: &str = "Missing or invalid Authorization header";
pub const BAD_FORMAT_MESSAGE: &str = "Invalid token format";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Why the gate refused a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    MissingHeader,
    BadFormat,
    InvalidToken(AuthError),
}

impl GateRejection {
    /// Client-facing reason. Token failures share one message.
    pub fn message(&self) -> &'static str {
        match self {
            GateRejection::MissingHeader => MISSING_HEADER_MESSAGE,
            GateRejection::BadFormat => BAD_FORMAT_MESSAGE,
            GateRejection::InvalidToken(_) => INVALID_TOKEN_MESSAGE,
        }
    }

    /// Log-only reason, distinct per failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            GateRejection::MissingHeader => "missing_header",
            GateRejection::BadFormat => "bad_format",
            GateRejection::InvalidToken(err) => err.kind(),
        }
    }
}

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        ApiError::Unauthorized(rejection.message().to_string())
    }
}

/// Split `Bearer <token>` into its token
///
/// Exactly two space-separated parts are accepted, the first literally `Bearer`.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Run the gate over a set of request headers
pub fn authorize(headers: &HeaderMap, verifier: &TokenVerifier) -> Result<AuthContext, GateRejection> {
    let value = headers
        .get(AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .ok_or(GateRejection::MissingHeader)?;

    let value = value.to_str().map_err(|_| GateRejection::BadFormat)?;
    let token = bearer_token(value).ok_or(GateRejection::BadFormat)?;

    verifier.verify(token).map_err(GateRejection::InvalidToken)
}

/// Middleware for a group of protected routes
///
/// Install with `axum::middleware::from_fn_with_state(verifier, auth_middleware)`.
pub async fn auth_middleware(
    State(verifier): State<TokenVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authorize(request.headers(), &verifier) {
        Ok(ctx) => {
            request.extensions_mut().insert(ctx);
            Ok(next.run(request).await)
        }
        Err(rejection) => {
            warn!(
                reason = rejection.kind(),
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            Err(rejection.into())
        }
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Present only when the route sits behind `auth_middleware`
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| GateRejection::MissingHeader.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use proptest::prelude::*;
    use rstest::rstest;
    use secrecy::SecretString;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    fn secret() -> SecretString {
        SecretString::new("gate-test-secret".to_string())
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(&secret()).unwrap()
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&secret(), 7200).unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    /// Protected router whose handler records that it ran
    fn gated_app(ran: Arc<AtomicBool>) -> Router {
        Router::new()
            .route(
                "/protected",
                get(move |ctx: AuthContext| {
                    let ran = ran.clone();
                    async move {
                        ran.store(true, Ordering::SeqCst);
                        ctx.subject.to_string()
                    }
                }),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                verifier(),
                auth_middleware,
            ))
    }

    async fn call(app: Router, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("Bearer ", Some(""))]
    #[case("Bearer", None)]
    #[case("bearer abc", None)]
    #[case("Token abc", None)]
    #[case("Bearer a b", None)]
    #[case("Bearer  abc", None)]
    fn test_bearer_token(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(value), expected);
    }

    #[test]
    fn test_missing_header() {
        let result = authorize(&HeaderMap::new(), &verifier());
        assert_eq!(result, Err(GateRejection::MissingHeader));
    }

    #[test]
    fn test_empty_header_counts_as_missing() {
        let result = authorize(&headers(""), &verifier());
        assert_eq!(result, Err(GateRejection::MissingHeader));
    }

    #[rstest]
    #[case("Token abc")]
    #[case("Bearer")]
    #[case("Basic dXNlcjpwYXNz")]
    fn test_bad_format(#[case] value: &str) {
        let result = authorize(&headers(value), &verifier());
        assert_eq!(result, Err(GateRejection::BadFormat));
    }

    #[test]
    fn test_invalid_token_keeps_kind_internally() {
        let result = authorize(&headers("Bearer invalid.token.here"), &verifier());
        let rejection = result.unwrap_err();
        assert_eq!(rejection.kind(), "malformed_token");
        assert_eq!(rejection.message(), INVALID_TOKEN_MESSAGE);
    }

    #[test]
    fn test_valid_token_yields_context() {
        let user_id = Uuid::new_v4();
        let token = issuer().issue(user_id).unwrap();
        let ctx = authorize(&headers(&format!("Bearer {}", token)), &verifier()).unwrap();
        assert_eq!(ctx.subject, user_id);
    }

    #[rstest]
    #[case(None, MISSING_HEADER_MESSAGE)]
    #[case(Some("Token abc"), BAD_FORMAT_MESSAGE)]
    #[case(Some("Bearer"), BAD_FORMAT_MESSAGE)]
    #[case(Some("Bearer not-a-jwt"), INVALID_TOKEN_MESSAGE)]
    #[tokio::test]
    async fn test_rejection_short_circuits(#[case] auth: Option<&str>, #[case] message: &str) {
        let ran = Arc::new(AtomicBool::new(false));
        let (status, body) = call(gated_app(ran.clone()), auth.map(str::to_string)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": message }));
        assert!(!ran.load(Ordering::SeqCst), "handler must not run");
    }

    #[tokio::test]
    async fn test_verified_request_reaches_handler_with_subject() {
        let ran = Arc::new(AtomicBool::new(false));
        let user_id = Uuid::new_v4();
        let token = issuer().issue(user_id).unwrap();

        let (status, body) = call(gated_app(ran.clone()), Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.to_string());
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_extractor_without_gate_is_unauthorized() {
        let app = Router::new().route("/open", get(|ctx: AuthContext| async move { ctx.subject.to_string() }));
        let request = axum::http::Request::builder()
            .uri("/open")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Anything that is not a token from our issuer is turned away
        #[test]
        fn prop_random_headers_never_authorize(value in "[ -~]{0,80}") {
            let mut map = HeaderMap::new();
            if let Ok(header_value) = value.parse() {
                map.insert(AUTHORIZATION, header_value);
            }
            prop_assert!(authorize(&map, &verifier()).is_err());
        }
    }
}
