//! Claim service: the buyer-facing use cases.
//!
//! Composes the verification service, claim lifecycle, rate limiter, and
//! notification dispatcher into the operations the presentation layer
//! calls:
//! - request a verification code
//! - confirm a code and receive a session
//! - submit an inquiry or offer
//! - claim an item
//! - access a sale by code or QR token

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::ClaimServiceConfig;
pub use service::ClaimService;
pub use types::{
    ClaimConfirmation, InquiryReceipt, InquiryRequest, SaleAccess, SessionGrant,
    VerificationRequest, VerificationRequested,
};
