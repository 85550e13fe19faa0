//! Buyer identity entity for code-based verification.
//!
//! A buyer identity is scoped to one sale and keyed by its contact value.
//! It starts in a pending state holding a short-lived verification code;
//! once the code is confirmed the identity is promoted to verified and
//! carries an opaque session token instead. There is no transition back:
//! a verified identity never becomes pending again.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::contact::Contact;

/// Length of the verification code (digits)
pub const CODE_LENGTH: usize = 6;

/// Minutes before a pending verification code expires
pub const CODE_EXPIRATION_MINUTES: i64 = 15;

/// Hours a verified session stays valid
pub const SESSION_EXPIRATION_HOURS: i64 = 24;

/// Length of the opaque session token (lowercase hex characters, 256 bits)
pub const SESSION_TOKEN_LENGTH: usize = 64;

/// Buyer identity entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    /// Unique identifier for the buyer identity
    pub id: Uuid,

    /// The sale this identity is scoped to
    pub sale_id: Uuid,

    /// Display name given at registration
    pub name: String,

    /// The contact channel the buyer is proving control of
    pub contact: Contact,

    /// The single live verification code for this identity
    pub verification_code: String,

    /// When the pending code stops being accepted
    pub code_expires_at: DateTime<Utc>,

    /// Whether the contact channel has been verified
    pub auth_verified: bool,

    /// Opaque session credential, set once verified
    pub session_token: Option<String>,

    /// When the session stops being accepted
    pub session_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    /// Last time the session was resolved
    pub last_seen_at: DateTime<Utc>,
}

impl Buyer {
    /// Create a new pending identity holding a fresh code
    pub fn new_pending(
        sale_id: Uuid,
        name: String,
        contact: Contact,
        code: String,
        code_expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sale_id,
            name,
            contact,
            verification_code: code,
            code_expires_at,
            auth_verified: false,
            session_token: None,
            session_expires_at: None,
            created_at: now,
            last_seen_at: now,
        }
    }

    /// Whether the pending code can still be confirmed
    pub fn has_live_code(&self, now: DateTime<Utc>) -> bool {
        !self.auth_verified && now < self.code_expires_at
    }

    /// Replace the pending code and its expiry. Verified identities keep
    /// their session untouched; the refreshed code is inert for them.
    pub fn refresh_code(&mut self, code: String, expires_at: DateTime<Utc>) {
        self.verification_code = code;
        self.code_expires_at = expires_at;
    }

    /// Promote a pending identity to verified with a fresh session
    pub fn promote(&mut self, session_token: String, session_expires_at: DateTime<Utc>) {
        self.auth_verified = true;
        self.session_token = Some(session_token);
        self.session_expires_at = Some(session_expires_at);
        self.last_seen_at = Utc::now();
    }

    /// Whether the session token is present and unexpired
    pub fn has_live_session(&self, now: DateTime<Utc>) -> bool {
        self.auth_verified
            && self.session_token.is_some()
            && self
                .session_expires_at
                .map(|expires| now < expires)
                .unwrap_or(false)
    }

    /// Invalidate the session (buyer logout)
    pub fn clear_session(&mut self) {
        self.session_token = None;
        self.session_expires_at = None;
    }

    /// Time remaining on the pending code, zero if expired
    pub fn code_time_remaining(&self, now: DateTime<Utc>) -> Duration {
        if self.code_expires_at > now {
            self.code_expires_at - now
        } else {
            Duration::zero()
        }
    }
}
