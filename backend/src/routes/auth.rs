//! Authentication routes
//!
//! # Performance Optimizations
//!
//! - Uses the pre-computed token issuer from AppState
//! - Password verification runs on the blocking thread pool

use crate::error::ApiResult;
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use cms_shared::{SignInRequest, SignInResponse};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/signin", post(sign_in))
}

/// Sign in with email and password
///
/// POST /auth/signin
async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<Json<SignInResponse>> {
    let Json(req) = payload?;
    let response = AuthService::sign_in(
        state.users.as_ref(),
        &state.passwords,
        state.issuer(),
        &req.email,
        &req.password,
    )
    .await?;
    Ok(Json(response))
}
