//! Mock implementation of InquiryRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::inquiry::{Inquiry, InquiryStatus};
use crate::errors::DomainError;

use super::trait_::InquiryRepository;

/// Mock inquiry repository for testing
pub struct MockInquiryRepository {
    inquiries: Arc<RwLock<HashMap<Uuid, Inquiry>>>,
}

impl MockInquiryRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            inquiries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockInquiryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InquiryRepository for MockInquiryRepository {
    async fn create(&self, inquiry: Inquiry) -> Result<Inquiry, DomainError> {
        let mut inquiries = self.inquiries.write().await;
        inquiries.insert(inquiry.id, inquiry.clone());
        Ok(inquiry)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Inquiry>, DomainError> {
        let inquiries = self.inquiries.read().await;
        Ok(inquiries.get(&id).cloned())
    }

    async fn list_by_sale(&self, sale_id: Uuid) -> Result<Vec<Inquiry>, DomainError> {
        let inquiries = self.inquiries.read().await;
        let mut result: Vec<Inquiry> = inquiries
            .values()
            .filter(|i| i.sale_id == sale_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn mark_read(&self, inquiry_id: Uuid) -> Result<bool, DomainError> {
        let mut inquiries = self.inquiries.write().await;
        match inquiries.get_mut(&inquiry_id) {
            Some(inquiry) if inquiry.status == InquiryStatus::New => {
                inquiry.mark_read();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn unread_count_by_sale(&self, sale_id: Uuid) -> Result<u64, DomainError> {
        let inquiries = self.inquiries.read().await;
        Ok(inquiries
            .values()
            .filter(|i| i.sale_id == sale_id && i.status == InquiryStatus::New)
            .count() as u64)
    }
}
