//! Post service

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::repositories::{NewPost, PostRecord, PostStore};
use cms_shared::validation::validate_title;
use cms_shared::{CreatePostRequest, DeletedResponse, PostResponse};
use tracing::info;
use uuid::Uuid;

impl From<PostRecord> for PostResponse {
    fn from(post: PostRecord) -> Self {
        PostResponse {
            id: post.id.to_string(),
            title: post.title,
            content: post.content,
            author_id: post.author_id.to_string(),
            image_url: post.image_url,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Post service for CRUD operations
pub struct PostService;

impl PostService {
    pub async fn list(posts: &dyn PostStore) -> Result<Vec<PostResponse>, ApiError> {
        let records = posts.list().await?;
        Ok(records.into_iter().map(PostResponse::from).collect())
    }

    /// Create a post authored by the authenticated caller
    pub async fn create(
        posts: &dyn PostStore,
        author: &AuthContext,
        req: CreatePostRequest,
    ) -> Result<PostResponse, ApiError> {
        validate_title(&req.title)?;

        let post = posts
            .create(NewPost {
                title: req.title.trim().to_string(),
                content: req.content,
                author_id: author.subject,
                image_url: req.image_url.filter(|url| !url.trim().is_empty()),
            })
            .await?;

        info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(post.into())
    }

    pub async fn delete(posts: &dyn PostStore, id: Uuid) -> Result<DeletedResponse, ApiError> {
        let deleted = posts.delete(id).await?;
        if deleted == 0 {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        info!(post_id = %id, "Post deleted");
        Ok(DeletedResponse { deleted })
    }
}
