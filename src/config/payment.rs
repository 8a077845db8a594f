//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::membership::{StatusVocabulary, WebhookSignatureVerifier};

/// Payment processor webhook configuration
#[derive(Debug, Deserialize)]
pub struct PaymentConfig {
    /// HMAC-SHA256 webhook signing secret. Absent or blank disables verification.
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,

    /// Order statuses that grant access (comma-separated)
    #[serde(default = "default_approved_statuses")]
    pub approved_statuses: String,

    /// Order statuses that revoke access (comma-separated)
    #[serde(default = "default_revoked_statuses")]
    pub revoked_statuses: String,
}

impl PaymentConfig {
    /// Check if webhook signatures will be verified
    pub fn has_webhook_secret(&self) -> bool {
        self.webhook_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().trim().is_empty())
    }

    /// Build the signature verifier, or `None` when no usable secret is configured
    pub fn signature_verifier(&self) -> Option<WebhookSignatureVerifier> {
        if !self.has_webhook_secret() {
            return None;
        }
        self.webhook_secret
            .as_ref()
            .map(|s| WebhookSignatureVerifier::new(SecretString::new(s.expose_secret().clone())))
    }

    /// Build the status vocabulary from the configured lists
    pub fn status_vocabulary(&self) -> StatusVocabulary {
        StatusVocabulary::new(
            split_list(&self.approved_statuses),
            split_list(&self.revoked_statuses),
        )
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let vocabulary = self.status_vocabulary();

        if vocabulary.approved().next().is_none() {
            return Err(ValidationError::EmptyStatusVocabulary("approved"));
        }
        if vocabulary.revoked().next().is_none() {
            return Err(ValidationError::EmptyStatusVocabulary("revoked"));
        }

        let overlap = vocabulary.overlapping();
        if !overlap.is_empty() {
            return Err(ValidationError::OverlappingStatusVocabulary(
                overlap.join(","),
            ));
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            approved_statuses: default_approved_statuses(),
            revoked_statuses: default_revoked_statuses(),
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
}

fn default_approved_statuses() -> String {
    "paid,approved".to_string()
}

fn default_revoked_statuses() -> String {
    "refunded,cancelled".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::PurchaseOutcome;

    fn with_secret(secret: &str) -> PaymentConfig {
        PaymentConfig {
            webhook_secret: Some(SecretString::new(secret.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_match_stock_vocabulary() {
        let config = PaymentConfig::default();
        assert_eq!(config.status_vocabulary(), StatusVocabulary::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_secret_disables_verification() {
        let config = PaymentConfig::default();
        assert!(!config.has_webhook_secret());
        assert!(config.signature_verifier().is_none());
    }

    #[test]
    fn test_blank_secret_disables_verification() {
        let config = with_secret("   ");
        assert!(!config.has_webhook_secret());
        assert!(config.signature_verifier().is_none());
    }

    #[test]
    fn test_secret_builds_verifier() {
        let config = with_secret("s3cret");
        let verifier = config.signature_verifier().unwrap();

        let signature = verifier.sign(b"{}");
        assert!(verifier.verify(b"{}", &signature).is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let config = with_secret("s3cret");
        assert!(!format!("{:?}", config).contains("s3cret"));
    }

    #[test]
    fn test_custom_vocabulary_is_normalized() {
        let config = PaymentConfig {
            approved_statuses: " Paid , COMPLETE ".to_string(),
            revoked_statuses: "chargeback".to_string(),
            ..Default::default()
        };
        let vocabulary = config.status_vocabulary();

        assert_eq!(vocabulary.classify("complete"), PurchaseOutcome::Approved);
        assert_eq!(vocabulary.classify("chargeback"), PurchaseOutcome::Revoked);
        assert_eq!(vocabulary.classify("approved"), PurchaseOutcome::Other);
    }

    #[test]
    fn test_validation_empty_approved_list() {
        let config = PaymentConfig {
            approved_statuses: " , ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyStatusVocabulary("approved"))
        );
    }

    #[test]
    fn test_validation_empty_revoked_list() {
        let config = PaymentConfig {
            revoked_statuses: String::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyStatusVocabulary("revoked"))
        );
    }

    #[test]
    fn test_validation_overlapping_lists() {
        let config = PaymentConfig {
            approved_statuses: "paid,approved".to_string(),
            revoked_statuses: "Paid,refunded".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::OverlappingStatusVocabulary("paid".to_string()))
        );
    }
}
