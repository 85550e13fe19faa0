//! Item repository trait defining the interface for item persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::item::{Item, ItemStatus};
use crate::errors::DomainError;

/// Repository trait for Item entity persistence operations
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a new item
    async fn create(&self, item: Item) -> Result<Item, DomainError>;

    /// Find an item by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError>;

    /// List a sale's items ordered by display order
    async fn list_by_sale(&self, sale_id: Uuid) -> Result<Vec<Item>, DomainError>;

    /// Atomically claim an item for a buyer.
    ///
    /// The item's status moves `Available -> Claimed` only if it is still
    /// `Available` at commit time (compare-and-swap). Under concurrent
    /// claims on the same item, exactly one caller sees `true`.
    ///
    /// # Returns
    /// * `Ok(true)` - This caller won the claim
    /// * `Ok(false)` - The item was missing, removed, or already claimed
    async fn claim_if_available(
        &self,
        item_id: Uuid,
        buyer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Conditionally move an item between non-claim statuses (e.g.
    /// `Available -> Removed`). The update only applies if the stored
    /// status still equals `from`.
    async fn update_status(
        &self,
        item_id: Uuid,
        from: ItemStatus,
        to: ItemStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;
}
