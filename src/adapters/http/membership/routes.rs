//! Axum router configuration for access gate endpoints.
//!
//! This module defines the route structure and wires each route to its handler.

use std::time::Duration;

use axum::{
    middleware::map_response,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use super::handlers::{
    access_timeout_as_json, handle_webhook, health, validate_access, webhook_timeout_as_json,
    AccessGateAppState,
};

/// Create the payment processor webhook router.
///
/// Webhooks carry no user authentication; they are verified via signature
/// when a secret is configured.
///
/// # Routes
/// - `POST /webhook` - Handle order notifications
pub fn webhook_routes() -> Router<AccessGateAppState> {
    Router::new().route("/webhook", post(handle_webhook))
}

/// Create the access validation router.
///
/// # Routes
/// - `POST /access/validate` - Check if an email has access
pub fn access_routes() -> Router<AccessGateAppState> {
    Router::new().route("/access/validate", post(validate_access))
}

/// Create the complete access gate router, including the liveness probe.
///
/// Each endpoint group gets its own request timeout, and a timed out
/// request answers with that endpoint's JSON error body.
///
/// # Example
///
/// ```ignore
/// let app = access_gate_router(Duration::from_secs(30)).with_state(state);
/// ```
pub fn access_gate_router(request_timeout: Duration) -> Router<AccessGateAppState> {
    let webhooks = webhook_routes()
        .layer(TimeoutLayer::new(request_timeout))
        .layer(map_response(webhook_timeout_as_json));
    let access = access_routes()
        .layer(TimeoutLayer::new(request_timeout))
        .layer(map_response(access_timeout_as_json));

    Router::new()
        .route("/health", get(health))
        .merge(webhooks)
        .merge(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::membership::InMemoryMembershipStore;
    use crate::domain::membership::StatusVocabulary;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_state() -> AccessGateAppState {
        AccessGateAppState::new(
            Arc::new(InMemoryMembershipStore::new()),
            None,
            StatusVocabulary::default(),
        )
    }

    fn test_app() -> Router {
        access_gate_router(Duration::from_secs(30)).with_state(test_state())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Router Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn webhook_routes_creates_router() {
        let _: Router<()> = webhook_routes().with_state(test_state());
    }

    #[test]
    fn access_routes_creates_router() {
        let _: Router<()> = access_routes().with_state(test_state());
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn webhook_rejects_get() {
        let response = test_app()
            .oneshot(Request::builder().uri("/webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn validate_accepts_post() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/access/validate")
                    .body(Body::from(r#"{"email":"nobody@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
