//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the auth primitives and the record stores.

pub mod auth;
pub mod post;
pub mod user;

pub use auth::{AuthService, INVALID_CREDENTIALS_MESSAGE};
pub use post::PostService;
pub use user::UserService;
