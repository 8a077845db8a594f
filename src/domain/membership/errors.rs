//! Access validation error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MissingEmail | 400 |
//! | Infrastructure | 500 |

use axum::http::StatusCode;
use thiserror::Error;

use crate::ports::StoreError;

/// Errors returned by the access validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Request carried no email, or only whitespace.
    #[error("Email is required to validate access.")]
    MissingEmail,

    /// Membership store could not answer.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl AccessError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        AccessError::Infrastructure(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::MissingEmail => StatusCode::BAD_REQUEST,
            AccessError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients. Infrastructure details stay in logs.
    pub fn public_message(&self) -> String {
        match self {
            AccessError::MissingEmail => self.to_string(),
            AccessError::Infrastructure(_) => "Internal error while validating access.".to_string(),
        }
    }
}

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        AccessError::infrastructure(err.to_string())
    }
}
