//! Buyer verification service.
//!
//! Implements the pending-code / verified-session workflow:
//! - code issuance with at-most-one-pending-code upsert semantics
//! - single-use code confirmation via conditional promotion
//! - opaque session resolution with read-time expiry

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use service::VerificationService;
pub use types::{PendingVerification, VerifiedSession};
