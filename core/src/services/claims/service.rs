//! Main claim service implementation

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::inquiry::Inquiry;
use crate::domain::entities::sale::{Sale, SaleStatus};
use crate::domain::value_objects::contact::Contact;
use crate::errors::{ClaimError, DomainError, DomainResult, NotClaimableReason, ValidationError};
use crate::repositories::{BuyerRepository, InquiryRepository, ItemRepository, SaleRepository};
use crate::services::lifecycle::ClaimLifecycle;
use crate::services::notify::{NotificationDispatcher, NotificationPayload};
use crate::services::rate_limit::{RateLimitDecision, RateLimitKey, RateLimiter};
use crate::services::verification::VerificationService;

use super::config::ClaimServiceConfig;
use super::types::{
    ClaimConfirmation, InquiryReceipt, InquiryRequest, SaleAccess, SessionGrant,
    VerificationRequest, VerificationRequested,
};

/// Claim service orchestrating the buyer-facing use cases
pub struct ClaimService<S, I, B, Q, R, N>
where
    S: SaleRepository,
    I: ItemRepository,
    B: BuyerRepository,
    Q: InquiryRepository,
    R: RateLimiter,
    N: NotificationDispatcher,
{
    sale_repository: Arc<S>,
    item_repository: Arc<I>,
    inquiry_repository: Arc<Q>,
    verification: VerificationService<B>,
    lifecycle: ClaimLifecycle<I>,
    rate_limiter: Arc<R>,
    dispatcher: Arc<N>,
    config: ClaimServiceConfig,
}

impl<S, I, B, Q, R, N> ClaimService<S, I, B, Q, R, N>
where
    S: SaleRepository,
    I: ItemRepository,
    B: BuyerRepository,
    Q: InquiryRepository,
    R: RateLimiter,
    N: NotificationDispatcher,
{
    /// Create a new claim service
    pub fn new(
        sale_repository: Arc<S>,
        item_repository: Arc<I>,
        verification: VerificationService<B>,
        inquiry_repository: Arc<Q>,
        rate_limiter: Arc<R>,
        dispatcher: Arc<N>,
        config: ClaimServiceConfig,
    ) -> Self {
        let lifecycle = ClaimLifecycle::new(Arc::clone(&item_repository));
        Self {
            sale_repository,
            item_repository,
            inquiry_repository,
            verification,
            lifecycle,
            rate_limiter,
            dispatcher,
            config,
        }
    }

    /// Request a verification code for a sale.
    ///
    /// This method:
    /// 1. Validates the name and contact value
    /// 2. Requires the sale to be claimable right now
    /// 3. Applies the per-(contact, sale) rate limit
    /// 4. Issues (or re-issues) the pending code
    /// 5. Attempts delivery, best-effort
    ///
    /// The acknowledgement is identical whether delivery succeeded or not;
    /// a failed send is logged for operators, and the code stays valid.
    pub async fn request_verification(
        &self,
        request: VerificationRequest,
    ) -> DomainResult<VerificationRequested> {
        let contact = Contact::new(request.method, &request.contact_value)?;

        let sale = self
            .sale_repository
            .find_by_id(request.sale_id)
            .await
            .map_err(Self::storage_error)?
            .ok_or(ClaimError::SaleNotFound)?;

        let now = Utc::now();
        if !sale.is_claimable(now) {
            let reason = if sale.status != SaleStatus::Active {
                NotClaimableReason::SaleNotActive
            } else if now < sale.windows.claim_start {
                NotClaimableReason::WindowNotOpen
            } else {
                NotClaimableReason::WindowClosed
            };
            return Err(ClaimError::NotClaimable { reason }.into());
        }

        self.enforce_rate_limit(
            &RateLimitKey::code_request(contact.value(), sale.id),
            self.config.code_request_window,
        )
        .await?;

        let pending = self
            .verification
            .request_code(sale.id, &request.name, &contact)
            .await
            .map_err(Self::storage_error)?;

        let payload = NotificationPayload::VerificationCode {
            code: pending.code.clone(),
            sale_title: sale.title.clone(),
            expires_at: pending.expires_at,
        };
        let outcome = self.dispatcher.send(&contact, &payload).await;
        if !outcome.is_delivered() {
            // Non-fatal: the requester still gets the generic ack and can
            // retry; operators see the failure.
            tracing::warn!(
                sale_id = %sale.id,
                contact = %contact.masked(),
                event = "delivery_failed",
                "Verification code delivery failed"
            );
        }

        Ok(VerificationRequested {
            sale_id: sale.id,
            sent_to: contact.masked(),
            expires_at: pending.expires_at,
        })
    }

    /// Confirm a verification code and receive a session token
    pub async fn confirm_verification(
        &self,
        contact_value: &str,
        code: &str,
    ) -> DomainResult<SessionGrant> {
        let session = self.verification.verify_code(contact_value, code).await?;

        Ok(SessionGrant {
            session_token: session.token,
            expires_at: session.expires_at,
            sale_id: session.buyer.sale_id,
            buyer_name: session.buyer.name,
        })
    }

    /// Submit an inquiry (optionally with an offer amount) about an item.
    ///
    /// The seller is notified best-effort; a notification failure never
    /// fails the stored inquiry.
    pub async fn submit_inquiry(&self, request: InquiryRequest) -> DomainResult<InquiryReceipt> {
        if request.message.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "message".to_string(),
            }
            .into());
        }
        if request.name.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "name".to_string(),
            }
            .into());
        }
        let contact = Contact::new(request.method, &request.contact_value)?;

        let item = self
            .item_repository
            .find_by_id(request.item_id)
            .await
            .map_err(Self::storage_error)?
            .ok_or(ClaimError::ItemNotFound)?;

        let sale = self
            .sale_repository
            .find_by_id(item.sale_id)
            .await
            .map_err(Self::storage_error)?
            .ok_or(ClaimError::SaleNotFound)?;

        self.enforce_rate_limit(
            &RateLimitKey::inquiry(&request.origin, item.id),
            self.config.inquiry_window,
        )
        .await?;

        // A session token is optional; inquiries also accept freeform
        // contact details from unverified visitors.
        let buyer_id = match &request.session_token {
            Some(token) => self.verification.resolve_session(token).await.ok().map(|b| b.id),
            None => None,
        };

        let inquiry = Inquiry::new(
            sale.id,
            item.id,
            buyer_id,
            request.name.trim().to_string(),
            contact,
            request.message.trim().to_string(),
            request.offer_amount,
        );
        let inquiry = self
            .inquiry_repository
            .create(inquiry)
            .await
            .map_err(Self::storage_error)?;

        tracing::info!(
            inquiry_id = %inquiry.id,
            item_id = %item.id,
            sale_id = %sale.id,
            event = "inquiry_received",
            "Inquiry stored"
        );

        let payload = NotificationPayload::InquiryAlert {
            item_title: item.title.clone(),
            buyer_name: inquiry.name.clone(),
            message: inquiry.message.clone(),
            offer_amount: inquiry.offer_amount,
        };
        let outcome = self.dispatcher.send(&sale.seller_contact, &payload).await;
        if !outcome.is_delivered() {
            tracing::warn!(
                inquiry_id = %inquiry.id,
                event = "delivery_failed",
                "Seller inquiry alert delivery failed"
            );
        }

        Ok(InquiryReceipt {
            inquiry_id: inquiry.id,
            reference: inquiry.reference(),
        })
    }

    /// Claim an item with a verified session.
    ///
    /// The session must belong to the item's sale. Under concurrent claims
    /// the repository's conditional update picks exactly one winner; the
    /// loser receives `NotClaimable`.
    pub async fn claim_item(
        &self,
        session_token: &str,
        item_id: Uuid,
    ) -> DomainResult<ClaimConfirmation> {
        let buyer = self.verification.resolve_session(session_token).await?;

        let item = self
            .item_repository
            .find_by_id(item_id)
            .await
            .map_err(Self::storage_error)?
            .ok_or(ClaimError::ItemNotFound)?;

        let sale = self
            .sale_repository
            .find_by_id(item.sale_id)
            .await
            .map_err(Self::storage_error)?
            .ok_or(ClaimError::SaleNotFound)?;

        // Sessions are scoped to one sale
        if buyer.sale_id != sale.id {
            return Err(crate::errors::VerificationError::Unauthenticated.into());
        }

        let now = Utc::now();
        let claimed = self.lifecycle.claim(&sale, &item, buyer.id, now).await?;

        Ok(ClaimConfirmation {
            item_id: claimed.id,
            sale_id: sale.id,
            claimed_at: claimed.claimed_at.unwrap_or(now),
        })
    }

    /// Open a sale through its human-enterable access code
    pub async fn access_sale_by_code(&self, access_code: &str) -> DomainResult<SaleAccess> {
        let sale = self
            .sale_repository
            .find_by_access_code(access_code.trim())
            .await
            .map_err(Self::storage_error)?;
        self.open_sale(sale).await
    }

    /// Open a sale through its QR token
    pub async fn access_sale_by_qr(&self, qr_token: &str) -> DomainResult<SaleAccess> {
        let sale = self
            .sale_repository
            .find_by_qr_token(qr_token.trim())
            .await
            .map_err(Self::storage_error)?;
        self.open_sale(sale).await
    }

    /// Invalidate a buyer session
    pub async fn logout(&self, session_token: &str) -> DomainResult<()> {
        self.verification.logout(session_token).await
    }

    /// Unpublished and terminal sales are indistinguishable from missing
    /// ones to anonymous visitors.
    async fn open_sale(&self, sale: Option<Sale>) -> DomainResult<SaleAccess> {
        let sale = sale
            .filter(|s| s.status == SaleStatus::Active)
            .ok_or(ClaimError::SaleNotFound)?;

        let items = self
            .item_repository
            .list_by_sale(sale.id)
            .await
            .map_err(Self::storage_error)?;

        Ok(SaleAccess { sale, items })
    }

    /// Apply a rate limit, failing CLOSED.
    ///
    /// A limiter backend error counts as a denial: letting traffic through
    /// while the counter store is down would amplify exactly the abuse the
    /// limiter exists to stop.
    async fn enforce_rate_limit(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> DomainResult<()> {
        if !self.config.rate_limiting_enabled {
            return Ok(());
        }

        match self.rate_limiter.check(key, window).await {
            Ok(RateLimitDecision::Allowed) => Ok(()),
            Ok(RateLimitDecision::Limited { retry_after }) => {
                tracing::warn!(
                    key = %key.as_cache_key(),
                    event = "rate_limit_exceeded",
                    "Request rate limited"
                );
                Err(ClaimError::RateLimited {
                    retry_after_secs: retry_after.as_secs().max(1),
                }
                .into())
            }
            Err(e) => {
                tracing::error!(
                    key = %key.as_cache_key(),
                    error = %e,
                    event = "rate_limiter_unavailable",
                    "Rate limiter backend failed; rejecting request"
                );
                Err(ClaimError::RateLimited {
                    retry_after_secs: window.as_secs().max(1),
                }
                .into())
            }
        }
    }

    /// Internal store failures surface as a generic service error so
    /// storage details never leak to requesters.
    fn storage_error(err: DomainError) -> DomainError {
        match err {
            DomainError::Internal { message } => {
                tracing::error!(
                    error = %message,
                    event = "storage_error",
                    "Store operation failed"
                );
                ClaimError::ServiceUnavailable.into()
            }
            other => other,
        }
    }
}
