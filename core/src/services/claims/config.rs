//! Configuration for the claim service

use std::time::Duration;

/// Configuration for the claim service
#[derive(Debug, Clone)]
pub struct ClaimServiceConfig {
    /// Whether rate limiting is enforced
    pub rate_limiting_enabled: bool,
    /// Window during which one code request per (contact, sale) is allowed
    pub code_request_window: Duration,
    /// Window during which one inquiry per (origin, item) is allowed
    pub inquiry_window: Duration,
}

impl Default for ClaimServiceConfig {
    fn default() -> Self {
        Self {
            rate_limiting_enabled: true,
            code_request_window: Duration::from_secs(60),
            inquiry_window: Duration::from_secs(60),
        }
    }
}

impl From<&cy_shared::RateLimitConfig> for ClaimServiceConfig {
    fn from(config: &cy_shared::RateLimitConfig) -> Self {
        Self {
            rate_limiting_enabled: config.enabled,
            code_request_window: Duration::from_secs(config.code_request_window_seconds),
            inquiry_window: Duration::from_secs(config.inquiry_window_seconds),
        }
    }
}
