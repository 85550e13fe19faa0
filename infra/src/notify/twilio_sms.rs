//! Twilio SMS adapter (feature `twilio-sms`).

use async_trait::async_trait;
use phonenumber::Mode;
use tracing::{debug, warn};
use twilio::{Client, OutboundMessage};

use cy_core::domain::value_objects::contact::{Contact, ContactMethod};
use cy_core::services::notify::{DeliveryOutcome, NotificationDispatcher, NotificationPayload};

/// SMS dispatcher backed by the Twilio API
pub struct TwilioSmsDispatcher {
    client: Client,
    from_number: String,
}

impl TwilioSmsDispatcher {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        let client = Client::new(&account_sid, &auth_token);
        Self {
            client,
            from_number,
        }
    }

    /// Buyer phone numbers are stored as bare 10-digit US numbers; Twilio
    /// wants E.164.
    fn to_e164(value: &str) -> Result<String, String> {
        let candidate = format!("+1{}", value);
        match candidate.parse::<phonenumber::PhoneNumber>() {
            Ok(parsed) => Ok(parsed.format().mode(Mode::E164).to_string()),
            Err(e) => Err(format!("invalid phone number: {}", e)),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for TwilioSmsDispatcher {
    async fn send(&self, contact: &Contact, payload: &NotificationPayload) -> DeliveryOutcome {
        if contact.method() != ContactMethod::Sms {
            return DeliveryOutcome::Failed {
                reason: "sms dispatcher received a non-sms contact".to_string(),
            };
        }

        let destination = match Self::to_e164(contact.value()) {
            Ok(number) => number,
            Err(reason) => {
                warn!(
                    to = %contact.masked(),
                    reason = %reason,
                    event = "sms_rejected",
                    "SMS destination rejected"
                );
                return DeliveryOutcome::Failed { reason };
            }
        };

        let body = payload.body();
        let message = OutboundMessage::new(&self.from_number, &destination, &body);

        match self.client.send_message(message).await {
            Ok(sent) => {
                debug!(
                    to = %contact.masked(),
                    event = "sms_sent",
                    "SMS accepted by provider"
                );
                DeliveryOutcome::Delivered {
                    message_id: sent.sid,
                }
            }
            Err(e) => {
                warn!(
                    to = %contact.masked(),
                    error = %e,
                    event = "sms_failed",
                    "SMS delivery failed"
                );
                DeliveryOutcome::Failed {
                    reason: format!("twilio error: {}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_e164() {
        assert_eq!(
            TwilioSmsDispatcher::to_e164("5095551234").unwrap(),
            "+15095551234"
        );
        assert!(TwilioSmsDispatcher::to_e164("123").is_err());
    }
}
