//! HTTP adapters - REST API implementations.
//!
//! [`build_app`] assembles the routes with the middleware stack shared by
//! every endpoint.

pub mod membership;

use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

// Re-export key types for convenience
pub use membership::access_gate_router;
pub use membership::AccessGateAppState;

/// Build the complete application router with middleware.
///
/// Layers, outermost first: request id assignment, tracing, request id
/// propagation to the response, CORS. Request timeouts are applied per
/// endpoint group by [`access_gate_router`].
pub fn build_app(state: AccessGateAppState, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(server));

    access_gate_router(server.request_timeout())
        .layer(middleware)
        .with_state(state)
}

/// CORS restricted to the configured origins. No origins means no cross-origin access.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static(membership::SIGNATURE_HEADER),
            axum::http::HeaderName::from_static(membership::LEGACY_SIGNATURE_HEADER),
        ])
}
