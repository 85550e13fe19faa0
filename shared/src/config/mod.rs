//! Configuration modules for ClaimYard services

pub mod cache;
pub mod claims;
pub mod database;
pub mod notify;
pub mod rate_limit;

pub use cache::CacheConfig;
pub use claims::ClaimConfig;
pub use database::DatabaseConfig;
pub use notify::NotifyConfig;
pub use rate_limit::RateLimitConfig;
