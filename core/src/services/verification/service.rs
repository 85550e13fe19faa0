//! Main verification service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

use crate::domain::entities::buyer::{Buyer, CODE_LENGTH};
use crate::domain::value_objects::contact::Contact;
use crate::errors::{DomainResult, ValidationError, VerificationError};
use crate::repositories::BuyerRepository;
use crate::services::codegen::{CodeGenerator, CodeKind};

use super::config::VerificationConfig;
use super::types::{PendingVerification, VerifiedSession};

/// Verification service for buyer identities
///
/// All state lives in the buyer repository; issuance and confirmation for
/// one `(sale, contact)` key are linearized by the store's conditional
/// writes, not by in-process locks.
pub struct VerificationService<B: BuyerRepository> {
    buyer_repository: Arc<B>,
    code_generator: CodeGenerator,
    config: VerificationConfig,
}

impl<B: BuyerRepository> VerificationService<B> {
    /// Create a new verification service
    pub fn new(buyer_repository: Arc<B>, config: VerificationConfig) -> Self {
        Self {
            buyer_repository,
            code_generator: CodeGenerator::default(),
            config,
        }
    }

    /// Issue a verification code for `(sale_id, contact)`.
    ///
    /// Upserts the buyer identity: a first request creates a pending row,
    /// any later request overwrites the pending code and restarts its
    /// 15-minute clock. Retrying callers simply get a fresh code; the
    /// previous one is invalidated by the same write.
    pub async fn request_code(
        &self,
        sale_id: Uuid,
        name: &str,
        contact: &Contact,
    ) -> DomainResult<PendingVerification> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "name".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let repository = Arc::clone(&self.buyer_repository);
        let code = self
            .code_generator
            .generate(CodeKind::Verification, |candidate| {
                let repository = Arc::clone(&repository);
                async move { repository.code_in_use(sale_id, &candidate, now).await }
            })
            .await?;

        let expires_at = now + Duration::minutes(self.config.code_expiration_minutes);
        let buyer = self
            .buyer_repository
            .upsert_pending_code(sale_id, name, contact, &code, expires_at)
            .await?;

        tracing::info!(
            sale_id = %sale_id,
            buyer_id = %buyer.id,
            contact = %contact.masked(),
            event = "code_issued",
            "Issued verification code"
        );

        Ok(PendingVerification {
            buyer_id: buyer.id,
            code,
            expires_at,
        })
    }

    /// Confirm a verification code and issue a session.
    ///
    /// Matches pending identities by contact value, compares codes in
    /// constant time, then promotes through the store's conditional
    /// update. The promotion re-checks pending-ness and expiry at commit
    /// time, so a replay (or a concurrent duplicate confirm) loses and
    /// gets the same generic error as a wrong code.
    pub async fn verify_code(
        &self,
        contact_value: &str,
        code: &str,
    ) -> DomainResult<VerifiedSession> {
        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            tracing::debug!(
                event = "code_format_rejected",
                "Verification code had invalid format"
            );
            return Err(VerificationError::InvalidOrExpiredCode.into());
        }

        let normalized = Contact::normalize_value(contact_value);
        let now = Utc::now();

        let candidates = self
            .buyer_repository
            .find_pending_by_contact(&normalized)
            .await?;

        let matched = candidates
            .into_iter()
            .filter(|b| b.has_live_code(now))
            .find(|b| constant_time_eq(b.verification_code.as_bytes(), code.as_bytes()));

        let Some(buyer) = matched else {
            tracing::warn!(
                event = "code_rejected",
                "Verification failed: no live matching code"
            );
            return Err(VerificationError::InvalidOrExpiredCode.into());
        };

        let token = Self::generate_session_token();
        let expires_at = now + Duration::hours(self.config.session_expiration_hours);

        let promoted = self
            .buyer_repository
            .promote_if_pending(buyer.id, code, &token, expires_at, now)
            .await?;

        if !promoted {
            // Lost the race against a concurrent confirm or re-request
            tracing::warn!(
                buyer_id = %buyer.id,
                event = "promotion_lost_race",
                "Verification promotion condition no longer held"
            );
            return Err(VerificationError::InvalidOrExpiredCode.into());
        }

        let buyer = self
            .buyer_repository
            .find_by_session_token(&token)
            .await?
            .ok_or(VerificationError::InvalidOrExpiredCode)?;

        tracing::info!(
            buyer_id = %buyer.id,
            sale_id = %buyer.sale_id,
            event = "buyer_verified",
            "Buyer verified, session issued"
        );

        Ok(VerifiedSession {
            token,
            expires_at,
            buyer,
        })
    }

    /// Resolve a session token to its buyer identity.
    ///
    /// Expiry is checked at read time; no sweep is needed for correctness.
    pub async fn resolve_session(&self, token: &str) -> DomainResult<Buyer> {
        let Some(buyer) = self.buyer_repository.find_by_session_token(token).await? else {
            return Err(VerificationError::Unauthenticated.into());
        };

        let now = Utc::now();
        if !buyer.has_live_session(now) {
            return Err(VerificationError::SessionExpired.into());
        }

        // Activity tracking is best-effort
        let _ = self.buyer_repository.touch_last_seen(buyer.id, now).await;

        Ok(buyer)
    }

    /// Invalidate a session (buyer logout)
    pub async fn logout(&self, token: &str) -> DomainResult<()> {
        let cleared = self.buyer_repository.clear_session(token).await?;
        if cleared {
            tracing::info!(event = "buyer_logout", "Session invalidated");
        }
        Ok(())
    }

    /// Generate a 256-bit opaque session token, hex-encoded
    fn generate_session_token() -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
