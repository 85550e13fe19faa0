//! Types for verification service results

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::buyer::Buyer;

/// Result of issuing (or re-issuing) a verification code.
///
/// The code itself is only handed to the notification dispatcher; callers
/// surface the expiry, never the secret.
#[derive(Debug, Clone)]
pub struct PendingVerification {
    /// The buyer identity holding the pending code
    pub buyer_id: Uuid,
    /// The freshly issued code, for out-of-band delivery
    pub code: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Result of confirming a verification code
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    /// Opaque session credential
    pub token: String,
    /// When the session stops being accepted
    pub expires_at: DateTime<Utc>,
    /// The verified buyer identity
    pub buyer: Buyer,
}
