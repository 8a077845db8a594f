//! HTTP adapter for access gate endpoints.
//!
//! Exposes the membership domain via REST API:
//! - `POST /webhook` - Handle payment processor order notifications
//! - `POST /access/validate` - Check if an email has access
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{
    AccessApiError, AccessGateAppState, WebhookApiError, LEGACY_SIGNATURE_HEADER,
    SIGNATURE_HEADER,
};
pub use routes::{access_gate_router, access_routes, webhook_routes};
