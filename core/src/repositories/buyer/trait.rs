//! Buyer repository trait defining the interface for buyer-identity
//! persistence.
//!
//! The store guarantees at most one row per `(sale_id, contact_value)`
//! pair. All writes that decide a verification outcome are conditional
//! updates: the condition is evaluated against the stored row at commit
//! time, which is what linearizes concurrent requests landing on
//! different workers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::buyer::Buyer;
use crate::domain::value_objects::contact::Contact;
use crate::errors::DomainError;

/// Repository trait for Buyer entity persistence operations
#[async_trait]
pub trait BuyerRepository: Send + Sync {
    /// Insert a pending identity, or refresh the pending code of the
    /// existing row keyed by `(sale_id, contact.value)`.
    ///
    /// On conflict the stored `verification_code` and `code_expires_at`
    /// are overwritten, so the previous code dies with the upsert. The name
    /// is only set on insert, and a verified row keeps its session fields
    /// untouched (the refreshed code is inert for it).
    ///
    /// # Returns
    /// The stored row after the upsert.
    async fn upsert_pending_code(
        &self,
        sale_id: Uuid,
        name: &str,
        contact: &Contact,
        code: &str,
        code_expires_at: DateTime<Utc>,
    ) -> Result<Buyer, DomainError>;

    /// All unverified identities registered under a contact value, across
    /// sales. Callers match the submitted code against each candidate.
    async fn find_pending_by_contact(
        &self,
        contact_value: &str,
    ) -> Result<Vec<Buyer>, DomainError>;

    /// Promote a pending identity to verified, conditionally.
    ///
    /// The update only applies if, at commit time, the row still has
    /// `auth_verified = false`, the stored code equals `code`, and
    /// `code_expires_at > now`. On success the row gets the session token
    /// and expiry. A second promotion attempt with the same code loses the
    /// condition and returns `false`; codes are single-use.
    async fn promote_if_pending(
        &self,
        buyer_id: Uuid,
        code: &str,
        session_token: &str,
        session_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Find a verified identity by its session token
    async fn find_by_session_token(&self, token: &str) -> Result<Option<Buyer>, DomainError>;

    /// Record session activity (best-effort; callers ignore failures)
    async fn touch_last_seen(&self, buyer_id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError>;

    /// Invalidate a session token (buyer logout)
    ///
    /// # Returns
    /// * `Ok(true)` - A session was cleared
    /// * `Ok(false)` - No row held that token
    async fn clear_session(&self, token: &str) -> Result<bool, DomainError>;

    /// Whether a live (unexpired, unverified) pending code with this value
    /// already exists in the sale. This is the uniqueness domain for issuing
    /// verification codes.
    async fn code_in_use(
        &self,
        sale_id: Uuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Delete unverified identities whose code expired before `cutoff`
    ///
    /// # Returns
    /// Number of rows deleted.
    async fn purge_expired_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Null out session fields on rows whose session expired before `now`
    ///
    /// # Returns
    /// Number of rows updated.
    async fn clear_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
