//! Notification dispatch contract.
//!
//! The core only depends on this trait; concrete adapters (email provider,
//! SMS gateway, console mock) live in the infrastructure crate. Expected
//! delivery failures are values, not errors. Callers degrade gracefully
//! and must never let a failed send invalidate the code it carried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::value_objects::contact::Contact;

/// What a notification says
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationPayload {
    /// One-time verification code for a buyer
    VerificationCode {
        code: String,
        sale_title: String,
        expires_at: DateTime<Utc>,
    },
    /// Alert to a seller that an item received an inquiry or offer
    InquiryAlert {
        item_title: String,
        buyer_name: String,
        message: String,
        offer_amount: Option<f64>,
    },
}

impl NotificationPayload {
    /// Subject line for channels that have one
    pub fn subject(&self) -> String {
        match self {
            Self::VerificationCode { sale_title, .. } => {
                format!("Your verification code for {}", sale_title)
            }
            Self::InquiryAlert { item_title, .. } => {
                format!("New inquiry about {}", item_title)
            }
        }
    }

    /// Plain-text body
    pub fn body(&self) -> String {
        match self {
            Self::VerificationCode { code, expires_at, .. } => format!(
                "Your verification code is: {}\n\nThis code expires at {}.",
                code,
                expires_at.format("%H:%M UTC")
            ),
            Self::InquiryAlert {
                item_title,
                buyer_name,
                message,
                offer_amount,
            } => {
                let mut body = format!("{} asked about \"{}\":\n\n{}", buyer_name, item_title, message);
                if let Some(amount) = offer_amount {
                    body.push_str(&format!("\n\nOffer: ${:.2}", amount));
                }
                body
            }
        }
    }
}

/// Result of a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { message_id: String },
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Trait for outbound notification channels
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Attempt delivery to the contact's channel.
    ///
    /// Never panics or returns `Err` for expected failures (bad address,
    /// provider outage); those come back as `DeliveryOutcome::Failed`.
    async fn send(&self, contact: &Contact, payload: &NotificationPayload) -> DeliveryOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_payload_contains_code() {
        let payload = NotificationPayload::VerificationCode {
            code: "123456".to_string(),
            sale_title: "Maple St sale".to_string(),
            expires_at: Utc::now(),
        };
        assert!(payload.body().contains("123456"));
        assert!(payload.subject().contains("Maple St sale"));
    }

    #[test]
    fn test_inquiry_payload_includes_offer() {
        let payload = NotificationPayload::InquiryAlert {
            item_title: "Oak dresser".to_string(),
            buyer_name: "Pat".to_string(),
            message: "Would you take less?".to_string(),
            offer_amount: Some(85.0),
        };
        let body = payload.body();
        assert!(body.contains("Oak dresser"));
        assert!(body.contains("$85.00"));
    }
}
