//! User routes (protected)

use crate::error::{ApiError, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use cms_shared::{CreateUserRequest, DeletedResponse, UserResponse};
use uuid::Uuid;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", delete(delete_user))
}

/// GET /users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserService::list(state.users.as_ref()).await?;
    Ok(Json(users))
}

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(req) = payload?;
    let user = UserService::create(state.users.as_ref(), &state.passwords, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /users/:id
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))?;
    let deleted = UserService::delete(state.users.as_ref(), id).await?;
    Ok(Json(deleted))
}
