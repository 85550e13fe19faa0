//! Integration tests for the Redis-based rate limiter
//!
//! These tests require Redis to be running locally on port 6379.
//! Run with: cargo test --test rate_limiter_integration -- --ignored

use std::time::Duration;

use uuid::Uuid;

use cy_core::services::rate_limit::{RateLimitDecision, RateLimitKey, RateLimiter};
use cy_infra::cache::{RedisClient, RedisRateLimiter};
use cy_shared::config::CacheConfig;

async fn create_test_limiter() -> RedisRateLimiter {
    let config = CacheConfig::new("redis://localhost:6379");
    let client = RedisClient::new(config)
        .await
        .expect("Failed to create Redis client");
    RedisRateLimiter::new(client)
}

/// Random origin so repeated runs never collide with stale keys
fn random_origin() -> String {
    format!("test-{}", rand::random::<u64>())
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_window_is_enforced() {
    let limiter = create_test_limiter().await;
    let key = RateLimitKey::inquiry(&random_origin(), Uuid::new_v4());
    let window = Duration::from_secs(60);

    assert!(limiter.check(&key, window).await.unwrap().is_allowed());

    match limiter.check(&key, window).await.unwrap() {
        RateLimitDecision::Limited { retry_after } => {
            assert!(retry_after <= window);
            assert!(retry_after > Duration::from_secs(50));
        }
        RateLimitDecision::Allowed => panic!("second hit should be limited"),
    }
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_slot_frees_after_window() {
    let limiter = create_test_limiter().await;
    let key = RateLimitKey::inquiry(&random_origin(), Uuid::new_v4());
    let window = Duration::from_millis(200);

    assert!(limiter.check(&key, window).await.unwrap().is_allowed());
    assert!(!limiter.check(&key, window).await.unwrap().is_allowed());

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(limiter.check(&key, window).await.unwrap().is_allowed());
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_concurrent_hits_single_winner() {
    let limiter = std::sync::Arc::new(create_test_limiter().await);
    let key = RateLimitKey::code_request(&random_origin(), Uuid::new_v4());
    let window = Duration::from_secs(60);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let limiter = std::sync::Arc::clone(&limiter);
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            limiter.check(&key, window).await.unwrap().is_allowed()
        }));
    }

    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 1, "exactly one concurrent hit may pass");
}
