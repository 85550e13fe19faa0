//! Mock implementations for testing the claim service

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::value_objects::contact::Contact;
use crate::errors::{DomainError, DomainResult};
use crate::services::notify::{DeliveryOutcome, NotificationDispatcher, NotificationPayload};
use crate::services::rate_limit::{RateLimitDecision, RateLimitKey, RateLimiter};

/// Dispatcher that records every send and can simulate provider failure
pub struct MockDispatcher {
    pub sent: Arc<Mutex<Vec<(Contact, NotificationPayload)>>>,
    pub should_fail: bool,
}

impl MockDispatcher {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail,
        }
    }

    /// The last verification code delivered to `contact_value`, if any
    pub fn last_code_for(&self, contact_value: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|(contact, payload)| match payload {
                NotificationPayload::VerificationCode { code, .. }
                    if contact.value() == contact_value =>
                {
                    Some(code.clone())
                }
                _ => None,
            })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationDispatcher for MockDispatcher {
    async fn send(&self, contact: &Contact, payload: &NotificationPayload) -> DeliveryOutcome {
        self.sent
            .lock()
            .unwrap()
            .push((contact.clone(), payload.clone()));

        if self.should_fail {
            DeliveryOutcome::Failed {
                reason: "provider outage".to_string(),
            }
        } else {
            DeliveryOutcome::Delivered {
                message_id: format!("mock-msg-{}", uuid::Uuid::new_v4()),
            }
        }
    }
}

/// Rate limiter whose backend is down, for fail-closed tests
pub struct BrokenRateLimiter;

#[async_trait]
impl RateLimiter for BrokenRateLimiter {
    async fn check(
        &self,
        _key: &RateLimitKey,
        _window: Duration,
    ) -> DomainResult<RateLimitDecision> {
        Err(DomainError::Internal {
            message: "counter store unreachable".to_string(),
        })
    }
}
