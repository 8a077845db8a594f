//! HandlePurchaseWebhookHandler - Command handler for processor order notifications.

use std::sync::Arc;

use crate::domain::membership::{
    NormalizedEmail, OrderEvent, PurchaseOutcome, StatusVocabulary, WebhookError,
    WebhookSignatureVerifier,
};
use crate::ports::MembershipStore;

/// Command to handle an order webhook.
#[derive(Debug, Clone)]
pub struct HandlePurchaseWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header, if the processor sent one.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePurchaseWebhookResult {
    /// Approved purchase, email is now a member.
    AccessGranted {
        order_id: Option<String>,
        email: NormalizedEmail,
        /// False if the email already had access.
        newly_granted: bool,
        members: usize,
    },
    /// Refund or cancellation, email is no longer a member.
    AccessRevoked {
        order_id: Option<String>,
        email: NormalizedEmail,
        /// False if the email had no access to begin with.
        was_member: bool,
        members: usize,
    },
    /// Status outside both vocabularies. Nothing changed.
    Acknowledged {
        order_id: Option<String>,
        email: NormalizedEmail,
        status: String,
    },
    /// No usable email in the payload (processor test pings). Nothing changed.
    NoEmail {
        order_id: Option<String>,
        status: String,
    },
}

impl HandlePurchaseWebhookResult {
    pub fn email(&self) -> Option<&NormalizedEmail> {
        match self {
            Self::AccessGranted { email, .. }
            | Self::AccessRevoked { email, .. }
            | Self::Acknowledged { email, .. } => Some(email),
            Self::NoEmail { .. } => None,
        }
    }
}

/// Handler for processing payment processor webhooks.
///
/// Verifies the signature when both a secret and a header are present,
/// resolves and normalizes the customer email, classifies the order status
/// and applies the resulting grant or revoke to the shared store.
pub struct HandlePurchaseWebhookHandler {
    store: Arc<dyn MembershipStore>,
    verifier: Option<Arc<WebhookSignatureVerifier>>,
    vocabulary: Arc<StatusVocabulary>,
}

impl HandlePurchaseWebhookHandler {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        verifier: Option<Arc<WebhookSignatureVerifier>>,
        vocabulary: Arc<StatusVocabulary>,
    ) -> Self {
        Self {
            store,
            verifier,
            vocabulary,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePurchaseWebhookCommand,
    ) -> Result<HandlePurchaseWebhookResult, WebhookError> {
        // 1. Authenticate (only when both sides are present)
        self.authenticate(&cmd)?;

        // 2-3. Parse, resolve email, normalize
        let event = OrderEvent::parse(&cmd.payload)?;

        tracing::info!(
            order_id = event.order_id.as_deref().unwrap_or(""),
            status = %event.status,
            email = event.email.as_ref().map(NormalizedEmail::as_str).unwrap_or(""),
            email_field = ?event.email_field,
            customer_name = event.customer_name.as_deref().unwrap_or(""),
            product_id = event.product_id.as_deref().unwrap_or(""),
            approved_date = event.approved_date.as_deref().unwrap_or(""),
            "Order webhook received"
        );

        let Some(email) = event.email else {
            tracing::info!(
                order_id = event.order_id.as_deref().unwrap_or(""),
                status = %event.status,
                "Order webhook has no customer email, acknowledging without changes"
            );
            return Ok(HandlePurchaseWebhookResult::NoEmail {
                order_id: event.order_id,
                status: event.status,
            });
        };

        // 4-5. Classify and mutate
        match self.vocabulary.classify(&event.status) {
            PurchaseOutcome::Approved => {
                let update = self.store.add(&email).await?;
                tracing::info!(
                    event = "access_granted",
                    order_id = event.order_id.as_deref().unwrap_or(""),
                    email = %email,
                    newly_granted = update.changed,
                    members = update.members,
                    "Purchase approved, access granted"
                );
                Ok(HandlePurchaseWebhookResult::AccessGranted {
                    order_id: event.order_id,
                    email,
                    newly_granted: update.changed,
                    members: update.members,
                })
            }
            PurchaseOutcome::Revoked => {
                let update = self.store.remove(&email).await?;
                tracing::info!(
                    event = "access_revoked",
                    order_id = event.order_id.as_deref().unwrap_or(""),
                    email = %email,
                    was_member = update.changed,
                    members = update.members,
                    "Refund or cancellation, access revoked"
                );
                Ok(HandlePurchaseWebhookResult::AccessRevoked {
                    order_id: event.order_id,
                    email,
                    was_member: update.changed,
                    members: update.members,
                })
            }
            PurchaseOutcome::Other => {
                // Size is informational here; a failed read must not fail the ack
                let members = self.store.size().await.ok();
                tracing::info!(
                    event = "status_acknowledged",
                    order_id = event.order_id.as_deref().unwrap_or(""),
                    email = %email,
                    status = %event.status,
                    members = ?members,
                    "Status does not change access"
                );
                Ok(HandlePurchaseWebhookResult::Acknowledged {
                    order_id: event.order_id,
                    email,
                    status: event.status,
                })
            }
        }
    }

    fn authenticate(&self, cmd: &HandlePurchaseWebhookCommand) -> Result<(), WebhookError> {
        match (&self.verifier, &cmd.signature) {
            (Some(verifier), Some(signature)) => {
                let verified = verifier.verify(&cmd.payload, signature);
                if verified.is_err() {
                    tracing::warn!("Webhook signature mismatch, rejecting event");
                }
                verified
            }
            (None, _) => {
                tracing::debug!("No webhook secret configured, skipping signature check");
                Ok(())
            }
            (Some(_), None) => {
                tracing::debug!("Webhook carries no signature header, skipping signature check");
                Ok(())
            }
        }
    }
}
