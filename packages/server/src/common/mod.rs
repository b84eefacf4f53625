// Common types and utilities shared across the application

pub mod errors;
pub mod id;

pub use errors::{ApprovalError, Result};
pub use id::DocumentId;
