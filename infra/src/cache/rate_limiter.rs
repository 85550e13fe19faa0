//! Redis-backed rate limiter.
//!
//! One `SET key 1 PX <window> NX` per check: the key is the slot, its TTL
//! is the window, and Redis's single-threaded command execution makes the
//! check-and-consume atomic across processes.
//!
//! Backend failures surface as errors so the caller fails CLOSED: an
//! unreachable counter store must never let traffic through unmetered.

use std::time::Duration;

use async_trait::async_trait;

use cy_core::errors::{DomainError, DomainResult};
use cy_core::services::rate_limit::{RateLimitDecision, RateLimitKey, RateLimiter};

use super::redis_client::RedisClient;

/// Distributed rate limiter for multi-process deployments
pub struct RedisRateLimiter {
    client: RedisClient,
}

impl RedisRateLimiter {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> DomainResult<RateLimitDecision> {
        let cache_key = key.as_cache_key();
        let window_ms = window.as_millis().max(1) as u64;

        let acquired = self
            .client
            .set_nx_px(&cache_key, window_ms)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Rate limiter store error: {}", e),
            })?;

        if acquired {
            return Ok(RateLimitDecision::Allowed);
        }

        let retry_after = self
            .client
            .pttl_ms(&cache_key)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Rate limiter store error: {}", e),
            })?
            .map(Duration::from_millis)
            .unwrap_or(window);

        Ok(RateLimitDecision::Limited { retry_after })
    }
}
