//! HTTP handlers for access gate endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::membership::{
    HandlePurchaseWebhookCommand, HandlePurchaseWebhookHandler, ValidateAccessHandler,
    ValidateAccessQuery,
};
use crate::domain::membership::{AccessError, StatusVocabulary, WebhookError, WebhookSignatureVerifier};
use crate::ports::MembershipStore;

use super::dto::{AccessValidationResponse, ErrorResponse, ValidateAccessRequest, WebhookAckResponse};

/// Primary signature header.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Header used by older processor integrations, read when the primary is absent.
pub const LEGACY_SIGNATURE_HEADER: &str = "x-kiwify-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request. The store is the single process-wide membership
/// set; both endpoints see the same instance.
#[derive(Clone)]
pub struct AccessGateAppState {
    pub store: Arc<dyn MembershipStore>,
    pub verifier: Option<Arc<WebhookSignatureVerifier>>,
    pub vocabulary: Arc<StatusVocabulary>,
}

impl AccessGateAppState {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        verifier: Option<WebhookSignatureVerifier>,
        vocabulary: StatusVocabulary,
    ) -> Self {
        Self {
            store,
            verifier: verifier.map(Arc::new),
            vocabulary: Arc::new(vocabulary),
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn webhook_handler(&self) -> HandlePurchaseWebhookHandler {
        HandlePurchaseWebhookHandler::new(
            self.store.clone(),
            self.verifier.clone(),
            self.vocabulary.clone(),
        )
    }

    pub fn validate_access_handler(&self) -> ValidateAccessHandler {
        ValidateAccessHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Handle payment processor order notifications
pub async fn handle_webhook(
    State(state): State<AccessGateAppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, WebhookApiError> {
    let body =
        body.map_err(|e| WebhookError::ParseError(format!("unreadable request body: {e}")))?;

    let handler = state.webhook_handler();
    let cmd = HandlePurchaseWebhookCommand {
        payload: body.to_vec(),
        signature: signature_header(&headers),
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(WebhookAckResponse::from(result)))
}

/// Any signature header that was sent is returned, even one that is not
/// valid text. Such a value can never equal a hex digest, so it fails
/// verification instead of being mistaken for an absent header.
fn signature_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SIGNATURE_HEADER)
        .or_else(|| headers.get(LEGACY_SIGNATURE_HEADER))
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /access/validate - Check if an email has access
///
/// The body is parsed here rather than by the `Json` extractor so that a
/// malformed body yields the same JSON failure shape as other internal errors.
pub async fn validate_access(
    State(state): State<AccessGateAppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AccessApiError> {
    let body =
        body.map_err(|e| AccessError::infrastructure(format!("unreadable request body: {e}")))?;
    let request: ValidateAccessRequest = serde_json::from_slice(&body)
        .map_err(|e| AccessError::infrastructure(format!("invalid request body: {e}")))?;

    let handler = state.validate_access_handler();
    let query = ValidateAccessQuery {
        email: request.email,
    };

    let result = handler.handle(query).await?;

    Ok(Json(AccessValidationResponse::from(result)))
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        let message = match &self.0 {
            WebhookError::InvalidSignature => "Invalid signature",
            WebhookError::ParseError(_)
            | WebhookError::StorageError(_)
            | WebhookError::Timeout => {
                tracing::error!(
                    error = %self.0,
                    retryable = self.0.is_retryable(),
                    "Error processing webhook"
                );
                "Error processing webhook"
            }
        };

        let body = ErrorResponse::new(self.0.error_code(), message);
        (status, Json(body)).into_response()
    }
}

/// API error type that converts access errors to HTTP responses.
#[derive(Debug)]
pub struct AccessApiError(AccessError);

impl From<AccessError> for AccessApiError {
    fn from(err: AccessError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AccessApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "Error validating access");
        }

        let body = AccessValidationResponse::denied(self.0.public_message());
        (status, Json(body)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Timeout Mapping
// ════════════════════════════════════════════════════════════════════════════════

/// Replaces the timeout layer's empty 408 on webhook routes with the webhook error body.
pub async fn webhook_timeout_as_json(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return WebhookApiError(WebhookError::Timeout).into_response();
    }
    response
}

/// Replaces the timeout layer's empty 408 on access routes with the access error body.
pub async fn access_timeout_as_json(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AccessApiError(AccessError::infrastructure("request timed out")).into_response();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::membership::InMemoryMembershipStore;
    use crate::domain::membership::NormalizedEmail;
    use axum::http::HeaderValue;
    use secrecy::SecretString;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_state(store: InMemoryMembershipStore) -> AccessGateAppState {
        AccessGateAppState::new(Arc::new(store), None, StatusVocabulary::default())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signature Header Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn signature_header_prefers_primary() {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static("primary"));
        headers.insert(LEGACY_SIGNATURE_HEADER, HeaderValue::from_static("legacy"));

        assert_eq!(signature_header(&headers).as_deref(), Some("primary"));
    }

    #[test]
    fn signature_header_falls_back_to_legacy() {
        let mut headers = HeaderMap::new();
        headers.insert(LEGACY_SIGNATURE_HEADER, HeaderValue::from_static("legacy"));

        assert_eq!(signature_header(&headers).as_deref(), Some("legacy"));
    }

    #[test]
    fn signature_header_keeps_non_text_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_bytes(b"forged\xff").unwrap(),
        );

        let signature = signature_header(&headers).unwrap();
        assert!(signature.starts_with("forged"));
    }

    #[test]
    fn signature_header_absent() {
        assert!(signature_header(&HeaderMap::new()).is_none());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // State Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn handlers_share_one_store() {
        let store = InMemoryMembershipStore::new();
        let state = AccessGateAppState::new(
            Arc::new(store.clone()),
            Some(WebhookSignatureVerifier::new(SecretString::new("s".to_string()))),
            StatusVocabulary::default(),
        );

        let cmd = HandlePurchaseWebhookCommand {
            payload: br#"{"order_status":"paid","email":"a@b.com"}"#.to_vec(),
            signature: None,
        };
        state.webhook_handler().handle(cmd).await.unwrap();

        let result = state
            .validate_access_handler()
            .handle(ValidateAccessQuery {
                email: Some("A@B.com".to_string()),
            })
            .await
            .unwrap();
        assert!(result.has_access);
        assert_eq!(store.size().await.unwrap(), 1);
        assert!(store
            .contains(&NormalizedEmail::parse("a@b.com").unwrap())
            .await
            .unwrap());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Handler Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn validate_access_malformed_body_is_internal_error() {
        let state = test_state(InMemoryMembershipStore::new());

        let response = validate_access(State(state), Ok(Bytes::from_static(b"{not json")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["hasAccess"], false);
    }

    #[tokio::test]
    async fn webhook_returns_ack_json() {
        let state = test_state(InMemoryMembershipStore::new());
        let body = Bytes::from_static(
            br#"{"order_id":"o1","order_status":"paid","customer_email":"x@y.com"}"#,
        );

        let response = handle_webhook(State(state), HeaderMap::new(), Ok(body))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["email"], "x@y.com");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn invalid_signature_maps_to_401() {
        let response = WebhookApiError(WebhookError::InvalidSignature).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error_code"], "INVALID_SIGNATURE");
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn storage_error_maps_to_500_without_details() {
        let response =
            WebhookApiError(WebhookError::StorageError("lock poisoned".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error_code"], "INTERNAL_ERROR");
        assert!(!json["message"].as_str().unwrap().contains("lock poisoned"));
    }

    #[tokio::test]
    async fn missing_email_maps_to_400() {
        let response = AccessApiError(AccessError::MissingEmail).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["allowed"], false);
        assert_eq!(json["message"], "Email is required to validate access.");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Timeout Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    fn timed_out() -> Response {
        StatusCode::REQUEST_TIMEOUT.into_response()
    }

    #[tokio::test]
    async fn webhook_timeout_becomes_json_error() {
        let response = webhook_timeout_as_json(timed_out()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn access_timeout_becomes_denied_body() {
        let response = access_timeout_as_json(timed_out()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["hasAccess"], false);
        assert_eq!(json["allowed"], false);
    }

    #[tokio::test]
    async fn other_responses_pass_through_timeout_mapping() {
        let response = webhook_timeout_as_json(StatusCode::OK.into_response()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
