//! Shared utilities and common types for ClaimYard server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Contact validation and masking utilities
//! - Common type definitions

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    CacheConfig, ClaimConfig, DatabaseConfig, NotifyConfig, RateLimitConfig,
};
pub use types::ApiResponse;
pub use utils::contact;
