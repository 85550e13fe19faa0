//! Rate limiting for buyer-initiated actions.
//!
//! One action per key per window. A key combines the action scope, the
//! requester's origin (contact value or network origin), and the target
//! resource. The backing store holds a monotonic timestamp per key; a
//! request is allowed iff no timestamp exists or the stored one is older
//! than the window, and an allowed request refreshes the timestamp.
//!
//! Failure policy is FAIL CLOSED: when the backing store is unreachable
//! the caller must reject the request as rate-limited rather than let
//! abuse through (see `ClaimService::enforce_rate_limit`).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Composite key identifying a throttled action
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    scope: &'static str,
    origin: String,
    target: String,
}

impl RateLimitKey {
    /// Key for verification-code requests: one per (contact, sale)
    pub fn code_request(contact_value: &str, sale_id: uuid::Uuid) -> Self {
        Self {
            scope: "code_request",
            origin: contact_value.to_string(),
            target: sale_id.to_string(),
        }
    }

    /// Key for inquiries: one per (requester origin, item)
    pub fn inquiry(origin: &str, item_id: uuid::Uuid) -> Self {
        Self {
            scope: "inquiry",
            origin: origin.to_string(),
            target: item_id.to_string(),
        }
    }

    /// Flattened form used as a cache key by backing stores
    pub fn as_cache_key(&self) -> String {
        format!("rl:{}:{}:{}", self.scope, self.origin, self.target)
    }
}

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The action may proceed; the slot is now consumed
    Allowed,
    /// The action is throttled
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Rate limiter service trait
///
/// Implementations must make check-and-refresh atomic per key so
/// concurrent hits from the same key cannot both be allowed.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check (and on allow, consume) the slot for `key`
    async fn check(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> DomainResult<RateLimitDecision>;
}

/// In-process rate limiter for single-node deployments.
///
/// Uses monotonic timestamps under one lock; distributed deployments use
/// the Redis-backed implementation in the infrastructure crate instead.
pub struct MemoryRateLimiter {
    slots: Mutex<HashMap<String, Instant>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> DomainResult<RateLimitDecision> {
        let cache_key = key.as_cache_key();
        let now = Instant::now();

        let mut slots = self.slots.lock().expect("rate limiter lock poisoned");

        // Drop stale entries opportunistically so the map stays bounded
        slots.retain(|_, stamp| now.duration_since(*stamp) < window);

        match slots.get(&cache_key) {
            Some(stamp) => {
                let elapsed = now.duration_since(*stamp);
                Ok(RateLimitDecision::Limited {
                    retry_after: window - elapsed,
                })
            }
            None => {
                slots.insert(cache_key, now);
                Ok(RateLimitDecision::Allowed)
            }
        }
    }
}
