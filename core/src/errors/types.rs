//! Error type definitions for claim, verification, and validation failures
//!
//! Every failure a use case can produce is a typed value returned to the
//! orchestrator; the presentation layer owns the wording shown to users.

use thiserror::Error;

use crate::domain::entities::sale::SaleStatus;
use crate::domain::value_objects::contact::ContactMethod;

/// Why an item or sale cannot be claimed right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotClaimableReason {
    /// The sale has not been published, or is closed/cancelled
    SaleNotActive,
    /// The claim window has not opened yet
    WindowNotOpen,
    /// The claim window has already closed
    WindowClosed,
    /// Another buyer claimed the item first
    AlreadyClaimed,
    /// The seller removed the item from the sale
    ItemRemoved,
}

impl NotClaimableReason {
    /// Stable identifier for logs and API error details
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SaleNotActive => "sale_not_active",
            Self::WindowNotOpen => "window_not_open",
            Self::WindowClosed => "window_closed",
            Self::AlreadyClaimed => "already_claimed",
            Self::ItemRemoved => "item_removed",
        }
    }
}

impl std::fmt::Display for NotClaimableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim and sale lifecycle errors
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Sale not found")]
    SaleNotFound,

    #[error("Item not found")]
    ItemNotFound,

    #[error("Item cannot be claimed: {reason}")]
    NotClaimable { reason: NotClaimableReason },

    #[error("Invalid sale transition: {from} -> {to}")]
    InvalidTransition { from: SaleStatus, to: SaleStatus },

    #[error("Too many requests. Retry in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
}

/// Buyer verification and session errors
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Deliberately covers both wrong and expired codes so responses do
    /// not reveal whether a contact value is registered.
    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    #[error("Session expired. Please verify again")]
    SessionExpired,

    #[error("Not authenticated")]
    Unauthenticated,

    /// Logged for operators, never surfaced as a hard error to buyers.
    #[error("Notification delivery failed: {reason}")]
    DeliveryFailed { reason: String },
}

/// Input validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid {method} contact value")]
    InvalidContact { method: ContactMethod },

    #[error("Invalid time window: {message}")]
    InvalidWindow { message: String },
}
