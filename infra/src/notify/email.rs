//! HTTP email provider adapter.
//!
//! Sends transactional email through a JSON HTTP API (Postmark-style:
//! bearer key, one message per request). Transient failures are retried
//! with backoff; anything that still fails comes back as
//! `DeliveryOutcome::Failed`, never as an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cy_core::domain::value_objects::contact::{Contact, ContactMethod};
use cy_core::services::notify::{DeliveryOutcome, NotificationDispatcher, NotificationPayload};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Serialize)]
struct EmailMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text: String,
}

#[derive(Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Email dispatcher backed by an HTTP provider API
pub struct EmailDispatcher {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl EmailDispatcher {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }

    async fn attempt(&self, to: &str, payload: &NotificationPayload) -> Result<String, String> {
        let message = EmailMessage {
            from: &self.from,
            to,
            subject: payload.subject(),
            text: payload.body(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("provider returned {}", status));
        }

        let body: ProviderResponse = response
            .json()
            .await
            .unwrap_or(ProviderResponse { id: None });

        Ok(body
            .id
            .unwrap_or_else(|| format!("email-{}", uuid::Uuid::new_v4())))
    }
}

#[async_trait]
impl NotificationDispatcher for EmailDispatcher {
    async fn send(&self, contact: &Contact, payload: &NotificationPayload) -> DeliveryOutcome {
        if contact.method() != ContactMethod::Email {
            return DeliveryOutcome::Failed {
                reason: "email dispatcher received a non-email contact".to_string(),
            };
        }

        let mut last_error = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(contact.value(), payload).await {
                Ok(message_id) => {
                    debug!(
                        to = %contact.masked(),
                        message_id = %message_id,
                        event = "email_sent",
                        "Email accepted by provider"
                    );
                    return DeliveryOutcome::Delivered { message_id };
                }
                Err(reason) => {
                    warn!(
                        to = %contact.masked(),
                        attempt = attempt,
                        reason = %reason,
                        event = "email_attempt_failed",
                        "Email delivery attempt failed"
                    );
                    last_error = reason;
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(
                            RETRY_DELAY_MS * 2u64.pow(attempt - 1),
                        ))
                        .await;
                    }
                }
            }
        }

        DeliveryOutcome::Failed { reason: last_error }
    }
}
