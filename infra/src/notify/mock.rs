//! Mock notification dispatcher for development and tests.
//!
//! Logs each message instead of delivering it and remembers what was
//! "sent". The verification code ends up in the structured log only;
//! it is never echoed back through the API response path.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use cy_core::domain::value_objects::contact::Contact;
use cy_core::services::notify::{DeliveryOutcome, NotificationDispatcher, NotificationPayload};

/// Dispatcher that records messages instead of sending them
pub struct MockDispatcher {
    sent: Mutex<Vec<(Contact, NotificationPayload)>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Number of messages "sent" so far
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// All messages delivered to a contact value
    pub fn sent_to(&self, contact_value: &str) -> Vec<NotificationPayload> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(contact, _)| contact.value() == contact_value)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationDispatcher for MockDispatcher {
    async fn send(&self, contact: &Contact, payload: &NotificationPayload) -> DeliveryOutcome {
        info!(
            to = %contact.masked(),
            method = %contact.method(),
            subject = %payload.subject(),
            event = "mock_delivery",
            "Mock dispatcher delivering message"
        );

        self.sent
            .lock()
            .unwrap()
            .push((contact.clone(), payload.clone()));

        DeliveryOutcome::Delivered {
            message_id: format!("mock-{}", uuid::Uuid::new_v4()),
        }
    }
}
