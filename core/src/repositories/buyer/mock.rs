//! Mock implementation of BuyerRepository for testing
//!
//! Every conditional write holds the write lock across its check and its
//! mutation, reproducing the atomicity of the real store's conditional
//! UPDATE / ON DUPLICATE KEY UPDATE statements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::buyer::Buyer;
use crate::domain::value_objects::contact::Contact;
use crate::errors::DomainError;

use super::trait_::BuyerRepository;

/// Mock buyer repository for testing
pub struct MockBuyerRepository {
    buyers: Arc<RwLock<HashMap<Uuid, Buyer>>>,
}

impl MockBuyerRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            buyers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockBuyerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BuyerRepository for MockBuyerRepository {
    async fn upsert_pending_code(
        &self,
        sale_id: Uuid,
        name: &str,
        contact: &Contact,
        code: &str,
        code_expires_at: DateTime<Utc>,
    ) -> Result<Buyer, DomainError> {
        let mut buyers = self.buyers.write().await;

        let existing = buyers
            .values_mut()
            .find(|b| b.sale_id == sale_id && b.contact.value() == contact.value());

        match existing {
            Some(buyer) => {
                buyer.refresh_code(code.to_string(), code_expires_at);
                Ok(buyer.clone())
            }
            None => {
                let buyer = Buyer::new_pending(
                    sale_id,
                    name.to_string(),
                    contact.clone(),
                    code.to_string(),
                    code_expires_at,
                );
                buyers.insert(buyer.id, buyer.clone());
                Ok(buyer)
            }
        }
    }

    async fn find_pending_by_contact(
        &self,
        contact_value: &str,
    ) -> Result<Vec<Buyer>, DomainError> {
        let buyers = self.buyers.read().await;
        Ok(buyers
            .values()
            .filter(|b| !b.auth_verified && b.contact.value() == contact_value)
            .cloned()
            .collect())
    }

    async fn promote_if_pending(
        &self,
        buyer_id: Uuid,
        code: &str,
        session_token: &str,
        session_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut buyers = self.buyers.write().await;
        match buyers.get_mut(&buyer_id) {
            Some(buyer)
                if !buyer.auth_verified
                    && buyer.verification_code == code
                    && buyer.code_expires_at > now =>
            {
                buyer.promote(session_token.to_string(), session_expires_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_session_token(&self, token: &str) -> Result<Option<Buyer>, DomainError> {
        let buyers = self.buyers.read().await;
        Ok(buyers
            .values()
            .find(|b| b.auth_verified && b.session_token.as_deref() == Some(token))
            .cloned())
    }

    async fn touch_last_seen(
        &self,
        buyer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut buyers = self.buyers.write().await;
        if let Some(buyer) = buyers.get_mut(&buyer_id) {
            buyer.last_seen_at = now;
        }
        Ok(())
    }

    async fn clear_session(&self, token: &str) -> Result<bool, DomainError> {
        let mut buyers = self.buyers.write().await;
        match buyers
            .values_mut()
            .find(|b| b.session_token.as_deref() == Some(token))
        {
            Some(buyer) => {
                buyer.clear_session();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn code_in_use(
        &self,
        sale_id: Uuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let buyers = self.buyers.read().await;
        Ok(buyers.values().any(|b| {
            b.sale_id == sale_id && b.verification_code == code && b.has_live_code(now)
        }))
    }

    async fn purge_expired_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut buyers = self.buyers.write().await;
        let before = buyers.len();
        buyers.retain(|_, b| b.auth_verified || b.code_expires_at >= cutoff);
        Ok((before - buyers.len()) as u64)
    }

    async fn clear_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut buyers = self.buyers.write().await;
        let mut cleared = 0;
        for buyer in buyers.values_mut() {
            if let Some(expires) = buyer.session_expires_at {
                if expires < now {
                    buyer.clear_session();
                    cleared += 1;
                }
            }
        }
        Ok(cleared)
    }
}
