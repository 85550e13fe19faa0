//! Redis cache: client wrapper and the distributed rate limiter.

pub mod rate_limiter;
pub mod redis_client;

pub use rate_limiter::RedisRateLimiter;
pub use redis_client::RedisClient;
