//! Mock implementation of SaleRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::sale::{Sale, SaleStatus};
use crate::errors::DomainError;

use super::trait_::SaleRepository;

/// Mock sale repository for testing
pub struct MockSaleRepository {
    sales: Arc<RwLock<HashMap<Uuid, Sale>>>,
}

impl MockSaleRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            sales: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockSaleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SaleRepository for MockSaleRepository {
    async fn create(&self, sale: Sale) -> Result<Sale, DomainError> {
        let mut sales = self.sales.write().await;

        if sales.values().any(|s| s.access_code == sale.access_code) {
            return Err(DomainError::Validation {
                message: "Access code already in use".to_string(),
            });
        }
        if sales.values().any(|s| s.qr_token == sale.qr_token) {
            return Err(DomainError::Validation {
                message: "QR token already in use".to_string(),
            });
        }

        sales.insert(sale.id, sale.clone());
        Ok(sale)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, DomainError> {
        let sales = self.sales.read().await;
        Ok(sales.get(&id).cloned())
    }

    async fn find_by_access_code(&self, access_code: &str) -> Result<Option<Sale>, DomainError> {
        let sales = self.sales.read().await;
        Ok(sales.values().find(|s| s.access_code == access_code).cloned())
    }

    async fn find_by_qr_token(&self, qr_token: &str) -> Result<Option<Sale>, DomainError> {
        let sales = self.sales.read().await;
        Ok(sales.values().find(|s| s.qr_token == qr_token).cloned())
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<Sale>, DomainError> {
        let sales = self.sales.read().await;
        let mut result: Vec<Sale> = sales
            .values()
            .filter(|s| s.seller_id == seller_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update_status(
        &self,
        sale_id: Uuid,
        from: SaleStatus,
        to: SaleStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut sales = self.sales.write().await;
        match sales.get_mut(&sale_id) {
            Some(sale) if sale.status == from => {
                sale.status = to;
                sale.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn access_code_exists(&self, access_code: &str) -> Result<bool, DomainError> {
        let sales = self.sales.read().await;
        Ok(sales.values().any(|s| s.access_code == access_code))
    }

    async fn qr_token_exists(&self, qr_token: &str) -> Result<bool, DomainError> {
        let sales = self.sales.read().await;
        Ok(sales.values().any(|s| s.qr_token == qr_token))
    }
}
