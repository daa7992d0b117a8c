//! Authentication module
//!
//! Provides bcrypt password hashing, HS256 bearer tokens, and the
//! middleware gate that protects routes.

mod error;
mod jwt;
mod middleware;
mod password;

pub use error::AuthError;
pub use jwt::{AuthContext, Claims, TokenIssuer, TokenVerifier, TOKEN_ALGORITHM};
pub use middleware::{
    auth_middleware, authorize, GateRejection, BAD_FORMAT_MESSAGE, INVALID_TOKEN_MESSAGE,
    MISSING_HEADER_MESSAGE,
};
pub use password::PasswordService;
