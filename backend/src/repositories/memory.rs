//! In-memory record store
//!
//! Backs both traits with plain vectors behind one lock, so a user delete
//! can cascade to that user's posts atomically. Selected with
//! `storage.backend = "memory"`; data is lost on restart.

use super::{
    NewPost, NewUser, PostRecord, PostStore, RepositoryError, RepositoryResult, UserRecord,
    UserStore,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    posts: Vec<PostRecord>,
}

/// Shared in-memory store; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> RepositoryResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|u| u.email == email))
    }

    async fn list(&self) -> RepositoryResult<Vec<UserRecord>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<UserRecord> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email"));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        let removed = (before - tables.users.len()) as u64;
        if removed > 0 {
            tables.posts.retain(|p| p.author_id != id);
        }
        Ok(removed)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self) -> RepositoryResult<Vec<PostRecord>> {
        Ok(self.tables.read().await.posts.clone())
    }

    async fn create(&self, post: NewPost) -> RepositoryResult<PostRecord> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == post.author_id) {
            return Err(RepositoryError::MissingReference("author"));
        }

        let now = Utc::now();
        let record = PostRecord {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            image_url: post.image_url,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok((before - tables.posts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$placeholder".to_string(),
        }
    }

    fn new_post(author_id: Uuid) -> NewPost {
        NewPost {
            title: "Title".to_string(),
            content: "Body".to_string(),
            author_id,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let store = MemoryStore::new();
        let created = UserStore::create(&store, new_user("a@example.com")).await.unwrap();

        let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(store.email_exists("a@example.com").await.unwrap());
        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("dup@example.com")).await.unwrap();
        let result = UserStore::create(&store, new_user("dup@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict("email"))));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let store = MemoryStore::new();
        let result = PostStore::create(&store, new_post(Uuid::new_v4())).await;
        assert!(matches!(result, Err(RepositoryError::MissingReference("author"))));
    }

    #[tokio::test]
    async fn test_user_delete_cascades_to_posts() {
        let store = MemoryStore::new();
        let author = UserStore::create(&store, new_user("author@example.com")).await.unwrap();
        let other = UserStore::create(&store, new_user("other@example.com")).await.unwrap();
        PostStore::create(&store, new_post(author.id)).await.unwrap();
        PostStore::create(&store, new_post(other.id)).await.unwrap();

        assert_eq!(UserStore::delete(&store, author.id).await.unwrap(), 1);

        let posts = PostStore::list(&store).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author_id, other.id);
    }

    #[tokio::test]
    async fn test_delete_missing_rows_reports_zero() {
        let store = MemoryStore::new();
        assert_eq!(UserStore::delete(&store, Uuid::new_v4()).await.unwrap(), 0);
        assert_eq!(PostStore::delete(&store, Uuid::new_v4()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = MemoryStore::new();
        let clone = store.clone();
        UserStore::create(&store, new_user("shared@example.com")).await.unwrap();
        assert!(clone.email_exists("shared@example.com").await.unwrap());
    }
}
