//! Inquiry repository trait defining the interface for inquiry persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::inquiry::Inquiry;
use crate::errors::DomainError;

/// Repository trait for Inquiry entity persistence operations
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Persist a new inquiry
    async fn create(&self, inquiry: Inquiry) -> Result<Inquiry, DomainError>;

    /// Find an inquiry by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Inquiry>, DomainError>;

    /// List a sale's inquiries, newest first
    async fn list_by_sale(&self, sale_id: Uuid) -> Result<Vec<Inquiry>, DomainError>;

    /// Mark an inquiry as read if it is still new
    ///
    /// # Returns
    /// * `Ok(true)` - The inquiry moved `New -> Read`
    /// * `Ok(false)` - Missing, or already past `New`
    async fn mark_read(&self, inquiry_id: Uuid) -> Result<bool, DomainError>;

    /// Count unread inquiries for a sale
    async fn unread_count_by_sale(&self, sale_id: Uuid) -> Result<u64, DomainError>;
}
