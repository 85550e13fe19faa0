//! Main sale service implementation

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::inquiry::Inquiry;
use crate::domain::entities::item::{Item, ItemStatus};
use crate::domain::entities::sale::{Sale, SaleStatus, SaleWindows};
use crate::domain::value_objects::contact::Contact;
use crate::errors::{ClaimError, DomainError, DomainResult, NotClaimableReason};
use crate::repositories::{InquiryRepository, ItemRepository, SaleRepository};
use crate::services::codegen::{CodeGenerator, CodeKind};
use crate::services::lifecycle::ClaimLifecycle;

use super::types::{NewItem, NewSale};

/// Sale service for seller-side operations
pub struct SaleService<S, I, Q>
where
    S: SaleRepository,
    I: ItemRepository,
    Q: InquiryRepository,
{
    sale_repository: Arc<S>,
    item_repository: Arc<I>,
    inquiry_repository: Arc<Q>,
    code_generator: CodeGenerator,
}

impl<S, I, Q> SaleService<S, I, Q>
where
    S: SaleRepository,
    I: ItemRepository,
    Q: InquiryRepository,
{
    /// Create a new sale service
    pub fn new(
        sale_repository: Arc<S>,
        item_repository: Arc<I>,
        inquiry_repository: Arc<Q>,
    ) -> Self {
        Self {
            sale_repository,
            item_repository,
            inquiry_repository,
            code_generator: CodeGenerator::default(),
        }
    }

    /// Create a draft sale with freshly generated unique codes.
    ///
    /// Both codes are drawn against the whole sale collection; the create
    /// persists them atomically with the row, and a duplicate slipping in
    /// between the check and the insert fails the store's unique
    /// constraint rather than silently colliding.
    pub async fn create_sale(&self, seller_id: Uuid, input: NewSale) -> DomainResult<Sale> {
        let seller_contact =
            Contact::new(input.seller_contact_method, &input.seller_contact_value)?;

        let sale_repository = Arc::clone(&self.sale_repository);
        let access_code = self
            .code_generator
            .generate(CodeKind::AccessCode, |candidate| {
                let repository = Arc::clone(&sale_repository);
                async move { repository.access_code_exists(&candidate).await }
            })
            .await?;

        let sale_repository = Arc::clone(&self.sale_repository);
        let qr_token = self
            .code_generator
            .generate(CodeKind::QrToken, |candidate| {
                let repository = Arc::clone(&sale_repository);
                async move { repository.qr_token_exists(&candidate).await }
            })
            .await?;

        let sale = Sale::new(
            seller_id,
            seller_contact,
            input.title.trim().to_string(),
            input.description,
            input.address,
            input.city,
            input.state,
            input.zip,
            SaleWindows {
                claim_start: input.claim_start,
                claim_end: input.claim_end,
                pickup_start: input.pickup_start,
                pickup_end: input.pickup_end,
            },
            access_code,
            qr_token,
        )?;

        let sale = self.sale_repository.create(sale).await?;

        tracing::info!(
            sale_id = %sale.id,
            seller_id = %seller_id,
            event = "sale_created",
            "Sale created as draft"
        );

        Ok(sale)
    }

    /// Publish a draft sale, opening it to buyers
    pub async fn publish_sale(&self, sale_id: Uuid, seller_id: Uuid) -> DomainResult<Sale> {
        self.transition_sale(sale_id, seller_id, SaleStatus::Active).await
    }

    /// Close an active sale (normal end of life)
    pub async fn close_sale(&self, sale_id: Uuid, seller_id: Uuid) -> DomainResult<Sale> {
        self.transition_sale(sale_id, seller_id, SaleStatus::Closed).await
    }

    /// Cancel a draft or active sale
    pub async fn cancel_sale(&self, sale_id: Uuid, seller_id: Uuid) -> DomainResult<Sale> {
        self.transition_sale(sale_id, seller_id, SaleStatus::Cancelled).await
    }

    /// Apply a lifecycle transition through the store's conditional update
    async fn transition_sale(
        &self,
        sale_id: Uuid,
        seller_id: Uuid,
        to: SaleStatus,
    ) -> DomainResult<Sale> {
        let sale = self.owned_sale(sale_id, seller_id).await?;

        ClaimLifecycle::<I>::validate_transition(sale.status, to)?;

        let applied = self
            .sale_repository
            .update_status(sale.id, sale.status, to, Utc::now())
            .await?;
        if !applied {
            // The status moved underneath us; report against the current row
            let current = self
                .sale_repository
                .find_by_id(sale.id)
                .await?
                .ok_or(ClaimError::SaleNotFound)?;
            return Err(ClaimError::InvalidTransition {
                from: current.status,
                to,
            }
            .into());
        }

        tracing::info!(
            sale_id = %sale.id,
            from = %sale.status,
            to = %to,
            event = "sale_transitioned",
            "Sale status changed"
        );

        self.sale_repository
            .find_by_id(sale.id)
            .await?
            .ok_or_else(|| ClaimError::SaleNotFound.into())
    }

    /// Add an item to a sale that is still draft or active
    pub async fn add_item(
        &self,
        sale_id: Uuid,
        seller_id: Uuid,
        input: NewItem,
    ) -> DomainResult<Item> {
        let sale = self.owned_sale(sale_id, seller_id).await?;

        if sale.status.is_terminal() {
            return Err(DomainError::BusinessRule {
                message: "Cannot add items to a closed or cancelled sale".to_string(),
            });
        }

        let item = Item::new(
            sale.id,
            input.title.trim().to_string(),
            input.description,
            input.price,
            input.sort_order,
        );
        self.item_repository.create(item).await
    }

    /// Remove an available item from a sale.
    ///
    /// Claimed items cannot be removed: the claim is final and the buyer
    /// is entitled to pick the item up.
    pub async fn remove_item(&self, item_id: Uuid, seller_id: Uuid) -> DomainResult<()> {
        let item = self
            .item_repository
            .find_by_id(item_id)
            .await?
            .ok_or(ClaimError::ItemNotFound)?;
        self.owned_sale(item.sale_id, seller_id).await?;

        let removed = self
            .item_repository
            .update_status(item.id, ItemStatus::Available, ItemStatus::Removed, Utc::now())
            .await?;
        if !removed {
            return Err(ClaimError::NotClaimable {
                reason: NotClaimableReason::AlreadyClaimed,
            }
            .into());
        }
        Ok(())
    }

    /// List a seller's sales, newest first
    pub async fn seller_sales(&self, seller_id: Uuid) -> DomainResult<Vec<Sale>> {
        self.sale_repository.list_by_seller(seller_id).await
    }

    /// List all inquiries across a seller's sales, newest first
    pub async fn seller_inquiries(&self, seller_id: Uuid) -> DomainResult<Vec<Inquiry>> {
        let sales = self.sale_repository.list_by_seller(seller_id).await?;

        let mut inquiries = Vec::new();
        for sale in &sales {
            inquiries.extend(self.inquiry_repository.list_by_sale(sale.id).await?);
        }
        inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inquiries)
    }

    /// Mark one of the seller's inquiries as read
    pub async fn mark_inquiry_read(
        &self,
        inquiry_id: Uuid,
        seller_id: Uuid,
    ) -> DomainResult<bool> {
        let inquiry = self
            .inquiry_repository
            .find_by_id(inquiry_id)
            .await?
            .ok_or(DomainError::NotFound {
                resource: "Inquiry".to_string(),
            })?;
        self.owned_sale(inquiry.sale_id, seller_id).await?;

        self.inquiry_repository.mark_read(inquiry.id).await
    }

    /// Count unread inquiries across a seller's sales
    pub async fn unread_inquiry_count(&self, seller_id: Uuid) -> DomainResult<u64> {
        let sales = self.sale_repository.list_by_seller(seller_id).await?;

        let mut count = 0;
        for sale in &sales {
            count += self.inquiry_repository.unread_count_by_sale(sale.id).await?;
        }
        Ok(count)
    }

    /// Fetch a sale and require the caller to own it
    async fn owned_sale(&self, sale_id: Uuid, seller_id: Uuid) -> DomainResult<Sale> {
        let sale = self
            .sale_repository
            .find_by_id(sale_id)
            .await?
            .ok_or(ClaimError::SaleNotFound)?;

        if sale.seller_id != seller_id {
            return Err(DomainError::Unauthorized);
        }
        Ok(sale)
    }
}
