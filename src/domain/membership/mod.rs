//! Membership domain module.
//!
//! Purchase notifications grant and revoke access keyed by customer email.
//!
//! # Module Structure
//!
//! - `email` - NormalizedEmail, the membership key
//! - `status` - StatusVocabulary and PurchaseOutcome classification
//! - `order_event` - Webhook payload parsing and email extraction strategies
//! - `webhook_verifier` - HMAC-SHA256 signature verification
//! - `webhook_errors` / `errors` - Ingestor and validator error types

mod email;
mod errors;
mod order_event;
mod status;
mod webhook_errors;
mod webhook_verifier;

pub use email::{normalize, NormalizedEmail};
pub use errors::AccessError;
pub use order_event::{EmailField, OrderEvent};
pub use status::{normalize_status, PurchaseOutcome, StatusVocabulary};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::WebhookSignatureVerifier;
