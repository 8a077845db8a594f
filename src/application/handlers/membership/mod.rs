//! Membership handlers.
//!
//! ## Commands
//! - Processing payment processor order webhooks
//!
//! ## Queries
//! - Check whether an email has access

mod handle_purchase_webhook;
mod validate_access;

// Commands
pub use handle_purchase_webhook::{
    HandlePurchaseWebhookCommand, HandlePurchaseWebhookHandler, HandlePurchaseWebhookResult,
};

// Queries
pub use validate_access::{ValidateAccessHandler, ValidateAccessQuery, ValidateAccessResult};
