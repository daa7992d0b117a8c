//! Post routes (protected)
//!
//! New posts are stamped with the author from the verified token.

use crate::auth::AuthContext;
use crate::error::{ApiError, ApiResult};
use crate::services::PostService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use cms_shared::{CreatePostRequest, DeletedResponse, PostResponse};
use uuid::Uuid;

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", delete(delete_post))
}

/// GET /posts
async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<PostResponse>>> {
    let posts = PostService::list(state.posts.as_ref()).await?;
    Ok(Json(posts))
}

/// POST /posts
async fn create_post(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let Json(req) = payload?;
    let post = PostService::create(state.posts.as_ref(), &auth, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /posts/:id
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid post id".to_string()))?;
    let deleted = PostService::delete(state.posts.as_ref(), id).await?;
    Ok(Json(deleted))
}
