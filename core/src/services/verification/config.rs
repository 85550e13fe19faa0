//! Configuration for the verification service

use crate::domain::entities::buyer::{CODE_EXPIRATION_MINUTES, SESSION_EXPIRATION_HOURS};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Minutes before a pending verification code expires
    pub code_expiration_minutes: i64,
    /// Hours a verified session stays valid
    pub session_expiration_hours: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: CODE_EXPIRATION_MINUTES,
            session_expiration_hours: SESSION_EXPIRATION_HOURS,
        }
    }
}

impl From<&cy_shared::ClaimConfig> for VerificationConfig {
    fn from(config: &cy_shared::ClaimConfig) -> Self {
        Self {
            code_expiration_minutes: config.code_expiration_minutes,
            session_expiration_hours: config.session_expiration_hours,
        }
    }
}
