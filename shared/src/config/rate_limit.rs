//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Window in seconds during which one verification-code request per
    /// (contact, sale) pair is allowed
    pub code_request_window_seconds: u64,

    /// Window in seconds during which one inquiry per (origin, item) pair
    /// is allowed
    pub inquiry_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            code_request_window_seconds: 60,
            inquiry_window_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let code_request_window_seconds = std::env::var("RATE_LIMIT_CODE_WINDOW_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);
        let inquiry_window_seconds = std::env::var("RATE_LIMIT_INQUIRY_WINDOW_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        Self {
            enabled: default_enabled(),
            code_request_window_seconds,
            inquiry_window_seconds,
        }
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            enabled: true,
            code_request_window_seconds: 5,
            inquiry_window_seconds: 5,
        }
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self::default()
    }
}

fn default_enabled() -> bool {
    true
}
