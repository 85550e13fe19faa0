//! # Infrastructure Layer
//!
//! Concrete implementations of the core's persistence, rate limiting, and
//! notification contracts:
//! - **Database**: MySQL repositories using SQLx
//! - **Cache**: Redis client and the Redis-backed rate limiter
//! - **Notify**: notification dispatcher adapters (email provider, Twilio
//!   SMS, console mock)
//!
//! ## Features
//!
//! - `mysql`: MySQL database support (default)
//! - `redis-cache`: Redis support (default)
//! - `twilio-sms`: Twilio SMS dispatcher

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and rate limiter
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Notification dispatcher adapters
pub mod notify;

use cy_shared::config::{CacheConfig, ClaimConfig, DatabaseConfig, NotifyConfig, RateLimitConfig};
use serde::{Deserialize, Serialize};

/// Infrastructure configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfrastructureConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Redis cache configuration
    pub cache: CacheConfig,
    /// Notification provider configuration
    pub notify: NotifyConfig,
    /// Claim/verification timing configuration
    pub claims: ClaimConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

impl InfrastructureConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            notify: NotifyConfig::from_env(),
            claims: ClaimConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            notify: NotifyConfig::default(),
            claims: ClaimConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification provider error
    #[error("Notification error: {0}")]
    Notify(String),
}
