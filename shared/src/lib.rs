//! CMS Shared Library
//!
//! This crate contains the wire types and input validation shared between
//! the backend and any client of the CMS API.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
