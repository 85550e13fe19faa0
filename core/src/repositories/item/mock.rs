//! Mock implementation of ItemRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::item::{Item, ItemStatus};
use crate::errors::DomainError;

use super::trait_::ItemRepository;

/// Mock item repository for testing
///
/// `claim_if_available` takes the write lock for the whole check-and-set,
/// matching the row-level atomicity the real store provides.
pub struct MockItemRepository {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
}

impl MockItemRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRepository for MockItemRepository {
    async fn create(&self, item: Item) -> Result<Item, DomainError> {
        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn list_by_sale(&self, sale_id: Uuid) -> Result<Vec<Item>, DomainError> {
        let items = self.items.read().await;
        let mut result: Vec<Item> = items
            .values()
            .filter(|i| i.sale_id == sale_id)
            .cloned()
            .collect();
        result.sort_by_key(|i| i.sort_order);
        Ok(result)
    }

    async fn claim_if_available(
        &self,
        item_id: Uuid,
        buyer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut items = self.items.write().await;
        match items.get_mut(&item_id) {
            Some(item) if item.status == ItemStatus::Available => {
                item.status = ItemStatus::Claimed;
                item.claimed_by = Some(buyer_id);
                item.claimed_at = Some(now);
                item.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_status(
        &self,
        item_id: Uuid,
        from: ItemStatus,
        to: ItemStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut items = self.items.write().await;
        match items.get_mut(&item_id) {
            Some(item) if item.status == from => {
                item.status = to;
                item.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_is_single_winner() {
        let repo = Arc::new(MockItemRepository::new());
        let item = Item::new(Uuid::new_v4(), "Lamp".to_string(), None, None, 1);
        let item_id = item.id;
        repo.create(item).await.unwrap();

        let now = Utc::now();
        let (a, b) = tokio::join!(
            repo.claim_if_available(item_id, Uuid::new_v4(), now),
            repo.claim_if_available(item_id, Uuid::new_v4(), now),
        );

        let wins = [a.unwrap(), b.unwrap()].iter().filter(|w| **w).count();
        assert_eq!(wins, 1);

        let item = repo.find_by_id(item_id).await.unwrap().unwrap();
        assert_eq!(item.status, ItemStatus::Claimed);
        assert!(item.claimed_by.is_some());
    }

    #[tokio::test]
    async fn test_claim_removed_item_fails() {
        let repo = MockItemRepository::new();
        let item = Item::new(Uuid::new_v4(), "Lamp".to_string(), None, None, 1);
        let item_id = item.id;
        repo.create(item).await.unwrap();

        let now = Utc::now();
        assert!(repo
            .update_status(item_id, ItemStatus::Available, ItemStatus::Removed, now)
            .await
            .unwrap());
        assert!(!repo
            .claim_if_available(item_id, Uuid::new_v4(), now)
            .await
            .unwrap());
    }
}
