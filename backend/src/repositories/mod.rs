//! Database repositories
//!
//! Provides the data access layer. Handlers talk to the [`UserStore`] and
//! [`PostStore`] traits; PostgreSQL and in-memory implementations live
//! side by side so the API can run (and be tested) without a database.

pub mod memory;
pub mod post;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use post::PgPostRepository;
pub use user::PgUserRepository;

/// User record from storage
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Post record from storage
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub image_url: Option<String>,
}

/// Storage failures
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A unique constraint was hit
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// A referenced record does not exist
    #[error("referenced {0} does not exist")]
    MissingReference(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<UserRecord>>;

    async fn email_exists(&self, email: &str) -> RepositoryResult<bool>;

    /// All users, oldest first
    async fn list(&self) -> RepositoryResult<Vec<UserRecord>>;

    async fn create(&self, user: NewUser) -> RepositoryResult<UserRecord>;

    /// Delete a user and their posts. Returns the number of users removed.
    async fn delete(&self, id: Uuid) -> RepositoryResult<u64>;

    /// Check that storage is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, oldest first
    async fn list(&self) -> RepositoryResult<Vec<PostRecord>>;

    async fn create(&self, post: NewPost) -> RepositoryResult<PostRecord>;

    /// Returns the number of posts removed
    async fn delete(&self, id: Uuid) -> RepositoryResult<u64>;
}
