//! Order webhook payload parsing.
//!
//! The processor is not consistent about where it puts the buyer's email, so
//! the payload is read as loose JSON and the email is resolved through an
//! ordered list of [`EmailField`] strategies.

use serde::Serialize;
use serde_json::{Map, Value};

use super::email::NormalizedEmail;
use super::status::normalize_status;
use super::webhook_errors::WebhookError;

/// A place in the payload where the customer email may live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailField {
    /// Top-level `customer_email`, the documented field.
    CustomerEmail,
    /// Top-level `email`.
    Email,
    /// Top-level `buyer_email`.
    BuyerEmail,
    /// `customer.email` inside the nested customer object.
    NestedCustomerEmail,
}

impl EmailField {
    /// Resolution order. The first field holding a non-blank string wins.
    pub const PRIORITY: [EmailField; 4] = [
        EmailField::CustomerEmail,
        EmailField::Email,
        EmailField::BuyerEmail,
        EmailField::NestedCustomerEmail,
    ];

    /// JSON path of this field, outermost key first.
    pub fn path(&self) -> &'static [&'static str] {
        match self {
            EmailField::CustomerEmail => &["customer_email"],
            EmailField::Email => &["email"],
            EmailField::BuyerEmail => &["buyer_email"],
            EmailField::NestedCustomerEmail => &["customer", "email"],
        }
    }

    /// Reads this field from the payload, if it holds a string.
    pub fn extract<'a>(&self, payload: &'a Map<String, Value>) -> Option<&'a str> {
        let (first, rest) = self.path().split_first()?;
        let mut value = payload.get(*first)?;
        for key in rest {
            value = value.as_object()?.get(*key)?;
        }
        value.as_str()
    }

    /// Walks [`EmailField::PRIORITY`] and returns the first usable email.
    pub fn resolve(payload: &Map<String, Value>) -> Option<(EmailField, NormalizedEmail)> {
        Self::PRIORITY.iter().find_map(|field| {
            field
                .extract(payload)
                .and_then(NormalizedEmail::parse)
                .map(|email| (*field, email))
        })
    }
}

/// A purchase lifecycle notification, normalized.
///
/// Lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    /// Processor order identifier, echoed back for correlation.
    pub order_id: Option<String>,
    /// Lower-cased, trimmed status. Empty when absent.
    pub status: String,
    /// Resolved customer email.
    pub email: Option<NormalizedEmail>,
    /// Which field the email came from.
    pub email_field: Option<EmailField>,
    pub customer_name: Option<String>,
    pub product_id: Option<String>,
    pub approved_date: Option<String>,
}

impl OrderEvent {
    /// Parses the raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the body is not a JSON object.
    pub fn parse(payload: &[u8]) -> Result<Self, WebhookError> {
        let value: Value =
            serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(Self::from_map(&map)),
            other => Err(WebhookError::ParseError(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Builds the event from an already-decoded JSON object.
    pub fn from_map(payload: &Map<String, Value>) -> Self {
        let (email_field, email) = match EmailField::resolve(payload) {
            Some((field, email)) => (Some(field), Some(email)),
            None => (None, None),
        };

        let status = payload
            .get("order_status")
            .and_then(Value::as_str)
            .map(normalize_status)
            .unwrap_or_default();

        Self {
            order_id: opaque_string(payload.get("order_id")),
            status,
            email,
            email_field,
            customer_name: opaque_string(payload.get("customer_name")),
            product_id: opaque_string(payload.get("product_id")),
            approved_date: opaque_string(payload.get("approved_date")),
        }
    }
}

/// Identifiers arrive as strings or numbers depending on the processor.
fn opaque_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
