//! Contact channel value object
//!
//! A buyer proves control of exactly one contact channel per sale: an email
//! address or a phone number reachable by SMS. The raw user input is
//! normalized once here so every downstream lookup (upsert key, verify
//! match, notification destination) sees the same canonical value.

use serde::{Deserialize, Serialize};

use cy_shared::utils::contact::{
    is_valid_email, is_valid_phone, mask_email, mask_phone, normalize_email, normalize_phone,
};

use crate::errors::ValidationError;

/// Delivery channel for verification codes and notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Sms,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl std::fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, normalized contact value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    method: ContactMethod,
    value: String,
}

impl Contact {
    /// Validate and normalize a raw contact value for the given method
    pub fn new(method: ContactMethod, raw: &str) -> Result<Self, ValidationError> {
        let value = match method {
            ContactMethod::Email => {
                if !is_valid_email(raw) {
                    return Err(ValidationError::InvalidContact { method });
                }
                normalize_email(raw)
            }
            ContactMethod::Sms => {
                if !is_valid_phone(raw) {
                    return Err(ValidationError::InvalidContact { method });
                }
                normalize_phone(raw)
            }
        };

        Ok(Self { method, value })
    }

    /// Normalize a raw contact value without knowing the method upfront.
    ///
    /// Used when matching a verification attempt against stored identities:
    /// the buyer submits the same string they registered with, and email
    /// values are distinguishable from phone values by the `@`.
    pub fn normalize_value(raw: &str) -> String {
        if raw.contains('@') {
            normalize_email(raw)
        } else {
            normalize_phone(raw)
        }
    }

    pub fn method(&self) -> ContactMethod {
        self.method
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Masked form safe for logs
    pub fn masked(&self) -> String {
        match self.method {
            ContactMethod::Email => mask_email(&self.value),
            ContactMethod::Sms => mask_phone(&self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_contact_is_normalized() {
        let contact = Contact::new(ContactMethod::Email, " Buyer@Example.COM ").unwrap();
        assert_eq!(contact.value(), "buyer@example.com");
        assert_eq!(contact.method(), ContactMethod::Email);
    }

    #[test]
    fn test_sms_contact_is_normalized() {
        let contact = Contact::new(ContactMethod::Sms, "(509) 555-1234").unwrap();
        assert_eq!(contact.value(), "5095551234");
    }

    #[test]
    fn test_invalid_contacts_rejected() {
        assert!(Contact::new(ContactMethod::Email, "not-an-email").is_err());
        assert!(Contact::new(ContactMethod::Sms, "555-1234").is_err());
    }

    #[test]
    fn test_normalize_value_dispatches_on_shape() {
        assert_eq!(
            Contact::normalize_value(" Buyer@Example.COM "),
            "buyer@example.com"
        );
        assert_eq!(Contact::normalize_value("(509) 555-1234"), "5095551234");
    }

    #[test]
    fn test_masked_never_contains_full_value() {
        let email = Contact::new(ContactMethod::Email, "buyer@example.com").unwrap();
        assert!(!email.masked().contains("buyer@"));

        let phone = Contact::new(ContactMethod::Sms, "5095551234").unwrap();
        assert!(!phone.masked().contains("5095551234"));
    }
}
