//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys, DB pools are created once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{AuthError, PasswordService, TokenIssuer, TokenVerifier};
use crate::config::AppConfig;
use crate::repositories::{MemoryStore, PgPostRepository, PgUserRepository, PostStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// # Performance
///
/// - `users` / `posts`: trait objects behind Arc, cloning is O(1)
/// - `config`: Wrapped in Arc, cloning is O(1)
/// - `issuer` / `verifier`: Pre-computed keys wrapped in Arc, cloning is O(1)
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub config: Arc<AppConfig>,
    pub passwords: PasswordService,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the token keys from the configured secret and fails with
    /// `AuthError::Configuration` when the secret is empty, so a
    /// misconfigured process never starts serving.
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        config: AppConfig,
    ) -> Result<Self, AuthError> {
        let issuer = TokenIssuer::new(&config.jwt.secret, config.jwt.token_ttl_secs)?;
        let verifier = TokenVerifier::new(&config.jwt.secret)?;
        let passwords = PasswordService::new(config.password.bcrypt_cost)?;

        Ok(Self {
            users,
            posts,
            config: Arc::new(config),
            passwords,
            issuer,
            verifier,
        })
    }

    /// State backed by PostgreSQL
    pub fn with_postgres(pool: PgPool, config: AppConfig) -> Result<Self, AuthError> {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgPostRepository::new(pool)),
            config,
        )
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(config: AppConfig) -> Result<Self, AuthError> {
        let store = MemoryStore::new();
        Self::new(Arc::new(store.clone()), Arc::new(store), config)
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    #[inline]
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }
}
