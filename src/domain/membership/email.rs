//! Normalized customer email.
//!
//! Both the webhook ingestor and the access validator key membership on the
//! same normalized form, so normalization lives in exactly one place.

use std::fmt;

use serde::Serialize;

/// Lower-cases and trims an email string.
///
/// Idempotent: `normalize(&normalize(e)) == normalize(e)`.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// An email address in its membership-key form.
///
/// Never empty, never carries surrounding whitespace, always lower-case.
/// No further syntax validation is applied; the payment processor is the
/// source of truth for what an email looks like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedEmail(String);

impl NormalizedEmail {
    /// Normalizes `raw`, returning `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
