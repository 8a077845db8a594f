//! Order status classification.
//!
//! The payment processor reports a free-form `order_status`. Only two groups
//! of tokens change membership; everything else is acknowledged and ignored.

use std::collections::BTreeSet;

use serde::Serialize;

/// What a webhook event means for the customer's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOutcome {
    /// Purchase completed and paid. Grants access.
    Approved,

    /// Refund or cancellation. Revokes access.
    Revoked,

    /// Pending, waiting payment, test pings and anything unknown.
    Other,
}

/// Lower-cases and trims a processor status string.
pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The two token sets used to classify order statuses.
///
/// Tokens are stored normalized, so classification is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusVocabulary {
    approved: BTreeSet<String>,
    revoked: BTreeSet<String>,
}

impl StatusVocabulary {
    /// Builds a vocabulary from raw token lists. Blank tokens are dropped.
    pub fn new<A, R>(approved: A, revoked: R) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Self {
            approved: collect_tokens(approved),
            revoked: collect_tokens(revoked),
        }
    }

    /// Classifies an already-normalized status.
    ///
    /// Approved is checked first, so a token configured in both sets
    /// (rejected by config validation) would grant access.
    pub fn classify(&self, status: &str) -> PurchaseOutcome {
        if self.approved.contains(status) {
            PurchaseOutcome::Approved
        } else if self.revoked.contains(status) {
            PurchaseOutcome::Revoked
        } else {
            PurchaseOutcome::Other
        }
    }

    pub fn approved(&self) -> impl Iterator<Item = &str> {
        self.approved.iter().map(String::as_str)
    }

    pub fn revoked(&self) -> impl Iterator<Item = &str> {
        self.revoked.iter().map(String::as_str)
    }

    /// Tokens that appear in both sets.
    pub fn overlapping(&self) -> Vec<&str> {
        self.approved
            .intersection(&self.revoked)
            .map(String::as_str)
            .collect()
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self::new(["paid", "approved"], ["refunded", "cancelled"])
    }
}

fn collect_tokens<I>(tokens: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| normalize_status(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}
