//! Webhook signature verification.
//!
//! The processor signs the raw request body with HMAC-SHA256 using the shared
//! secret and sends the lower-case hex digest in a header.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Verifier for processor webhook signatures.
pub struct WebhookSignatureVerifier {
    /// Shared signing secret.
    secret: SecretString,
}

impl WebhookSignatureVerifier {
    /// Creates a new verifier with the given secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Hex-encoded HMAC-SHA256 of `payload`.
    pub fn sign(&self, payload: &[u8]) -> String {
        hex::encode(self.compute_signature(payload))
    }

    /// Checks `signature` against the HMAC of the exact bytes received.
    ///
    /// The comparison is on the hex text itself, so an upper-case digest is
    /// a mismatch.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSignature` on any mismatch.
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<(), WebhookError> {
        let expected = self.sign(payload);

        if constant_time_compare(expected.as_bytes(), signature.as_bytes()) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }

    fn compute_signature(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for WebhookSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSignatureVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex signature a processor would send, for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
