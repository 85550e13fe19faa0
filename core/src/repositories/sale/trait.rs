//! Sale repository trait defining the interface for sale persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::sale::{Sale, SaleStatus};
use crate::errors::DomainError;

/// Repository trait for Sale entity persistence operations
///
/// Status changes go through `update_status`, a conditional write keyed on
/// the expected current status, so concurrent transitions on the same sale
/// resolve deterministically.
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Persist a new sale
    ///
    /// # Returns
    /// * `Ok(Sale)` - The created sale
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate access code)
    async fn create(&self, sale: Sale) -> Result<Sale, DomainError>;

    /// Find a sale by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, DomainError>;

    /// Find a sale by its human-enterable access code
    async fn find_by_access_code(&self, access_code: &str) -> Result<Option<Sale>, DomainError>;

    /// Find a sale by its QR token
    async fn find_by_qr_token(&self, qr_token: &str) -> Result<Option<Sale>, DomainError>;

    /// List sales owned by a seller, newest first
    async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<Sale>, DomainError>;

    /// Conditionally transition a sale's status.
    ///
    /// The update only applies if the stored status still equals `from` at
    /// commit time.
    ///
    /// # Returns
    /// * `Ok(true)` - The transition was applied
    /// * `Ok(false)` - The sale was missing or its status had already moved
    async fn update_status(
        &self,
        sale_id: Uuid,
        from: SaleStatus,
        to: SaleStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Check whether an access code is already taken by any sale
    async fn access_code_exists(&self, access_code: &str) -> Result<bool, DomainError>;

    /// Check whether a QR token is already taken by any sale
    async fn qr_token_exists(&self, qr_token: &str) -> Result<bool, DomainError>;
}
