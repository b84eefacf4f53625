//! Mapping from workflow errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::common::ApprovalError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Error returned by every HTTP handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Decide reports unknown ids as a bad request rather than a missing resource.
    pub fn from_decision(err: ApprovalError) -> Self {
        match err {
            ApprovalError::NotFound(message) => Self::bad_request(message),
            other => other.into(),
        }
    }
}

impl From<ApprovalError> for ApiError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::Validation(message) => Self::bad_request(message),
            ApprovalError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            err @ ApprovalError::Conflict { .. } => Self::bad_request(err.to_string()),
            ApprovalError::Timeout => Self::new(StatusCode::GATEWAY_TIMEOUT, "request timed out"),
            ApprovalError::Store(e) => {
                error!(error = %e, "Document store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
