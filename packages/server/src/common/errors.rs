use thiserror::Error;

use super::DocumentId;
use crate::domains::documents::models::DocumentStatus;

/// Result type alias for approval operations
pub type Result<T> = std::result::Result<T, ApprovalError>;

/// Errors raised by the document store and the approval workflow
#[derive(Error, Debug)]
pub enum ApprovalError {
    /// Malformed or out-of-range input, rejected before the store is touched
    #[error("{0}")]
    Validation(String),

    /// One or more ids do not resolve to a document
    #[error("{0}")]
    NotFound(String),

    /// A targeted document has already left Pending
    #[error("document already processed: {id} ({status})")]
    Conflict {
        id: DocumentId,
        status: DocumentStatus,
    },

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("request timed out")]
    Timeout,
}

impl ApprovalError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApprovalError::Validation(message.into())
    }

    /// NotFound naming every id that failed to resolve.
    pub fn missing(ids: &[DocumentId]) -> Self {
        let listed = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        ApprovalError::NotFound(format!("document not found: {}", listed))
    }

    /// Short machine-readable code, logged alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            ApprovalError::Validation(_) => "VALIDATION",
            ApprovalError::NotFound(_) => "NOT_FOUND",
            ApprovalError::Conflict { .. } => "CONFLICT",
            ApprovalError::Store(_) => "STORE",
            ApprovalError::Timeout => "TIMEOUT",
        }
    }
}
