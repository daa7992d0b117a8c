//! Password hashing using bcrypt
//!
//! Provides salted, cost-factor password hashing and verification.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. In async contexts use the
//! `*_async` variants, which run on the blocking thread pool.

use super::AuthError;
use cms_shared::validation::MAX_PASSWORD_BYTES;
use std::sync::Arc;
use tracing::warn;

/// Plaintext used to precompute the hash burned on unknown-email sign-ins
const DUMMY_PASSWORD: &str = "cms-dummy-password-for-timing-parity";

/// Password hashing service
///
/// Hashes embed their own salt and cost, so a service configured with a new
/// cost still verifies hashes produced under the old one.
#[derive(Clone)]
pub struct PasswordService {
    cost: u32,
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl PasswordService {
    /// Create a password service with the given bcrypt cost
    ///
    /// Fails with `Hashing` if the cost is outside bcrypt's accepted range.
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = hash_with_cost(DUMMY_PASSWORD, cost)?;
        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password (blocking operation)
    ///
    /// Inputs longer than bcrypt's 72-byte limit are rejected rather than
    /// silently truncated.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash_with_cost(password, self.cost)
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A mismatch is `Ok(false)`; only an unparseable hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            // bcrypt would truncate; a longer candidate can never be the stored password
            bcrypt::verify(DUMMY_PASSWORD, &self.dummy_hash).ok();
            return Ok(false);
        }
        bcrypt::verify(password, hash).map_err(|e| AuthError::MalformedCredential(e.to_string()))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(&self, password: String) -> Result<String, AuthError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
    }

    /// Spend one verification's worth of work against the precomputed hash
    ///
    /// Sign-in calls this when the email is unknown so that response time
    /// does not reveal whether an account exists.
    pub async fn verify_dummy_async(&self, password: String) {
        let service = self.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let dummy = service.dummy_hash.clone();
            service.verify(&password, &dummy)
        })
        .await;
        if let Err(e) = outcome {
            warn!(error = %e, "Dummy password verification did not complete");
        }
    }
}

fn hash_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::Hashing(format!(
            "password exceeds {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}
