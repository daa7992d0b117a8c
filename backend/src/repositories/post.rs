//! PostgreSQL post repository

use super::{NewPost, PostRecord, PostStore, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Post repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostRepository {
    async fn list(&self) -> RepositoryResult<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, title, content, author_id, image_url, created_at, updated_at
            FROM posts
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn create(&self, post: NewPost) -> RepositoryResult<PostRecord> {
        sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO posts (title, content, author_id, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, author_id, image_url, created_at, updated_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id)
        .bind(&post.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepositoryError::MissingReference("author")
            }
            other => other.into(),
        })
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
