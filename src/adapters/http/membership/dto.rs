//! HTTP DTOs (Data Transfer Objects) for access gate endpoints.
//!
//! These types define the JSON request/response structure for the webhook and
//! access validation API. They serve as the boundary between HTTP and the
//! application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::membership::{
    HandlePurchaseWebhookResult, ValidateAccessResult,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to check whether an email has access.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateAccessRequest {
    /// Email to look up. Missing or blank is rejected with 400.
    #[serde(default)]
    pub email: Option<String>,
    /// Accepted for client compatibility. Access is not scoped per product.
    #[serde(default)]
    pub product_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Acknowledgment returned to the payment processor.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub success: bool,
    pub message: String,
    /// Order id as sent by the processor (null if absent).
    pub order_id: Option<String>,
    /// Normalized email the event applied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Present only when the event was acknowledged without a membership change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<HandlePurchaseWebhookResult> for WebhookAckResponse {
    fn from(result: HandlePurchaseWebhookResult) -> Self {
        let email = result.email().map(|e| e.as_str().to_string());
        match result {
            HandlePurchaseWebhookResult::AccessGranted { order_id, .. } => Self {
                success: true,
                message: "Purchase processed and access granted".to_string(),
                order_id,
                email,
                status: None,
            },
            HandlePurchaseWebhookResult::AccessRevoked { order_id, .. } => Self {
                success: true,
                message: "Access revoked".to_string(),
                order_id,
                email,
                status: None,
            },
            HandlePurchaseWebhookResult::Acknowledged {
                order_id, status, ..
            } => Self {
                success: true,
                message: "Webhook received".to_string(),
                order_id,
                email,
                status: Some(status),
            },
            HandlePurchaseWebhookResult::NoEmail { order_id, status } => Self {
                success: true,
                message: "Webhook received without customer email".to_string(),
                order_id,
                email: None,
                status: Some(status),
            },
        }
    }
}

/// Access validation result.
#[derive(Debug, Clone, Serialize)]
pub struct AccessValidationResponse {
    pub success: bool,
    #[serde(rename = "hasAccess")]
    pub has_access: bool,
    /// Same value as `hasAccess`, kept for older clients.
    pub allowed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AccessValidationResponse {
    /// Failure body: never grants access.
    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            success: false,
            has_access: false,
            allowed: false,
            message: message.into(),
            email: None,
        }
    }
}

impl From<ValidateAccessResult> for AccessValidationResponse {
    fn from(result: ValidateAccessResult) -> Self {
        let message = if result.has_access {
            "Access granted"
        } else {
            "No access for this email"
        };
        Self {
            success: true,
            has_access: result.has_access,
            allowed: result.has_access,
            message: message.to_string(),
            email: Some(result.email.into_inner()),
        }
    }
}

/// Error response for webhook failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
