//! ValidateAccessHandler - Query handler for checking whether an email has access.

use std::sync::Arc;

use crate::domain::membership::{AccessError, NormalizedEmail};
use crate::ports::MembershipStore;

/// Query to check if an email has access.
#[derive(Debug, Clone, Default)]
pub struct ValidateAccessQuery {
    /// Email as the client sent it. Normalized by the handler.
    pub email: Option<String>,
}

/// Result of access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateAccessResult {
    /// The normalized email that was looked up.
    pub email: NormalizedEmail,
    /// Whether the email has access.
    pub has_access: bool,
}

/// Handler for checking access.
///
/// This is the most frequently called query. It never mutates the store.
pub struct ValidateAccessHandler {
    store: Arc<dyn MembershipStore>,
}

impl ValidateAccessHandler {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ValidateAccessQuery,
    ) -> Result<ValidateAccessResult, AccessError> {
        let email = query
            .email
            .as_deref()
            .and_then(NormalizedEmail::parse)
            .ok_or(AccessError::MissingEmail)?;

        let has_access = self.store.contains(&email).await?;

        tracing::debug!(email = %email, has_access, "Access checked");

        Ok(ValidateAccessResult { email, has_access })
    }
}
