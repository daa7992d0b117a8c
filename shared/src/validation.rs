//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Email syntax checks are delegated to the `validator` crate.

use crate::errors::ValidationError;
use validator::ValidateEmail;

/// Longest password bcrypt can digest without truncation
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email cannot be empty"));
    }
    if email.len() > 255 {
        return Err(ValidationError::new("email", "Email too long"));
    }
    if !email.contains('.') || !email.validate_email() {
        return Err(ValidationError::new("email", "Invalid email format"));
    }
    Ok(())
}

/// Validate password strength
///
/// The upper bound is in bytes, not characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
        ));
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("name", "Name cannot be empty"));
    }
    if trimmed.chars().count() > 100 {
        return Err(ValidationError::new("name", "Name too long"));
    }
    Ok(())
}

/// Validate a post title
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("title", "Title cannot be empty"));
    }
    if trimmed.chars().count() > 200 {
        return Err(ValidationError::new("title", "Title too long"));
    }
    Ok(())
}
