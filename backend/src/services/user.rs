//! User service for user management
//!
//! Password hashing is offloaded to the blocking thread pool; the plaintext
//! never reaches storage.

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRecord, UserStore};
use cms_shared::validation::{validate_email, validate_name, validate_password};
use cms_shared::{CreateUserRequest, DeletedResponse, UserResponse};
use tracing::info;
use uuid::Uuid;

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User service for CRUD operations
pub struct UserService;

impl UserService {
    pub async fn list(users: &dyn UserStore) -> Result<Vec<UserResponse>, ApiError> {
        let records = users.list().await?;
        Ok(records.into_iter().map(UserResponse::from).collect())
    }

    /// Create a user, storing only the bcrypt hash of the password
    pub async fn create(
        users: &dyn UserStore,
        passwords: &PasswordService,
        req: CreateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        validate_name(&req.name)?;
        validate_email(&req.email)?;
        validate_password(&req.password)?;

        // Check if email already exists
        if users.email_exists(&req.email).await? {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = passwords.hash_async(req.password).await?;

        let user = users
            .create(NewUser {
                name: req.name.trim().to_string(),
                email: req.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User created");
        Ok(user.into())
    }

    pub async fn delete(users: &dyn UserStore, id: Uuid) -> Result<DeletedResponse, ApiError> {
        let deleted = users.delete(id).await?;
        if deleted == 0 {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(user_id = %id, "User deleted");
        Ok(DeletedResponse { deleted })
    }
}
