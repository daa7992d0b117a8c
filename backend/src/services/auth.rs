//! Sign-in service
//!
//! # Performance Optimizations
//!
//! - Password verification runs on the blocking thread pool
//! - The token issuer is passed by reference (pre-computed key)

use crate::auth::{AuthError, PasswordService, TokenIssuer};
use crate::error::ApiError;
use crate::repositories::UserStore;
use cms_shared::SignInResponse;
use tracing::{error, info, warn};

/// Body returned for every failed sign-in, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Exchange email and password for an access token
    ///
    /// Every credential failure produces the same 401 body, including an
    /// unreadable stored hash. A bcrypt verification runs even when the
    /// email is unknown.
    pub async fn sign_in(
        users: &dyn UserStore,
        passwords: &PasswordService,
        issuer: &TokenIssuer,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, ApiError> {
        let user = match users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                passwords.verify_dummy_async(password.to_string()).await;
                warn!(reason = "unknown_email", "Sign-in failed");
                return Err(invalid_credentials());
            }
        };

        let valid = match passwords
            .verify_async(password.to_string(), user.password_hash.clone())
            .await
        {
            Ok(valid) => valid,
            Err(AuthError::MalformedCredential(detail)) => {
                error!(user_id = %user.id, error = %detail, "Stored password hash is unreadable");
                return Err(invalid_credentials());
            }
            Err(e) => return Err(e.into()),
        };

        if !valid {
            warn!(reason = "wrong_password", user_id = %user.id, "Sign-in failed");
            return Err(invalid_credentials());
        }

        let access_token = issuer.issue(user.id)?;
        info!(user_id = %user.id, "User signed in");

        Ok(SignInResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: issuer.ttl_secs(),
        })
    }
}
