//! Notification provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for outbound notification channels (email, SMS)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Notification provider ("mock", "http-email", "twilio")
    pub provider: String,

    /// Email provider API base URL
    pub email_api_url: String,

    /// Email provider API key
    pub email_api_key: String,

    /// From address for outbound email
    pub email_from: String,

    /// SMS provider account identifier
    pub sms_account_sid: String,

    /// SMS provider auth token
    pub sms_auth_token: String,

    /// From phone number for outbound SMS (E.164)
    pub sms_from_number: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            email_api_url: String::new(),
            email_api_key: String::new(),
            email_from: "noreply@claimyard.example".to_string(),
            sms_account_sid: String::new(),
            sms_auth_token: String::new(),
            sms_from_number: "+10000000000".to_string(),
        }
    }
}

impl NotifyConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("NOTIFY_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            email_api_url: std::env::var("EMAIL_API_URL").unwrap_or_default(),
            email_api_key: std::env::var("EMAIL_API_KEY").unwrap_or_default(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@claimyard.example".to_string()),
            sms_account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            sms_auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            sms_from_number: std::env::var("TWILIO_FROM_NUMBER")
                .unwrap_or_else(|_| "+10000000000".to_string()),
        }
    }
}
