//! Claim and verification timing configuration

use serde::{Deserialize, Serialize};

/// Configuration for verification codes, buyer sessions, and claim windows
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClaimConfig {
    /// Minutes before a pending verification code expires
    pub code_expiration_minutes: i64,

    /// Hours a verified buyer session stays valid
    pub session_expiration_hours: i64,

    /// Grace period in minutes before an expired unverified buyer is purged
    #[serde(default = "default_purge_grace_minutes")]
    pub purge_grace_minutes: i64,

    /// Whether new sales require buyer verification before claiming
    #[serde(default = "default_require_verification")]
    pub require_verification: bool,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: 15,
            session_expiration_hours: 24,
            purge_grace_minutes: default_purge_grace_minutes(),
            require_verification: default_require_verification(),
        }
    }
}

impl ClaimConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let code_expiration_minutes = std::env::var("CLAIM_CODE_EXPIRATION_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);
        let session_expiration_hours = std::env::var("CLAIM_SESSION_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24);

        Self {
            code_expiration_minutes,
            session_expiration_hours,
            ..Default::default()
        }
    }
}

fn default_purge_grace_minutes() -> i64 {
    60
}

fn default_require_verification() -> bool {
    true
}
