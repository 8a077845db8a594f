//! Webhook error types.
//!
//! Every failure of the ingestor maps to one HTTP status. The processor owns
//! retries, so the status is all it needs to decide whether to redeliver.

use axum::http::StatusCode;
use thiserror::Error;

use crate::ports::StoreError;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header did not match the HMAC of the body.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body was not valid JSON or not a JSON object.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Membership store operation failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,
}

impl WebhookError {
    /// Returns true if the processor should redeliver this event.
    ///
    /// Storage failures and timeouts are transient; a bad signature or a
    /// malformed body will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::StorageError(_) | WebhookError::Timeout)
    }

    /// Maps the error to an HTTP status code.
    ///
    /// - 401: authentication failure
    /// - 500: parsing or internal failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::ParseError(_)
            | WebhookError::StorageError(_)
            | WebhookError::Timeout => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for response bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::ParseError(_)
            | WebhookError::StorageError(_)
            | WebhookError::Timeout => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for WebhookError {
    fn from(err: StoreError) -> Self {
        WebhookError::StorageError(err.to_string())
    }
}
