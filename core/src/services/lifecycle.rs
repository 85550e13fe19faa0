//! Claim lifecycle guards.
//!
//! Decides whether a claim may proceed and applies it through the item
//! repository's compare-and-swap, so two concurrent claims on the same
//! item resolve to exactly one winner. The loser gets `NotClaimable`, not
//! a generic error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::item::{Item, ItemStatus};
use crate::domain::entities::sale::{Sale, SaleStatus};
use crate::errors::{ClaimError, DomainError, DomainResult, NotClaimableReason};
use crate::repositories::ItemRepository;

/// Guard service for item claims and sale transitions
pub struct ClaimLifecycle<I: ItemRepository> {
    item_repository: Arc<I>,
}

impl<I: ItemRepository> ClaimLifecycle<I> {
    pub fn new(item_repository: Arc<I>) -> Self {
        Self { item_repository }
    }

    /// Why the pair (sale, item) is not claimable at `now`, if it isn't
    pub fn claim_blocker(sale: &Sale, item: &Item, now: DateTime<Utc>) -> Option<NotClaimableReason> {
        if sale.status != SaleStatus::Active {
            return Some(NotClaimableReason::SaleNotActive);
        }
        if now < sale.windows.claim_start {
            return Some(NotClaimableReason::WindowNotOpen);
        }
        if now > sale.windows.claim_end {
            return Some(NotClaimableReason::WindowClosed);
        }
        match item.status {
            ItemStatus::Available => None,
            ItemStatus::Claimed => Some(NotClaimableReason::AlreadyClaimed),
            ItemStatus::Removed => Some(NotClaimableReason::ItemRemoved),
        }
    }

    /// True iff the sale is claimable and the item is still available
    pub fn can_claim(sale: &Sale, item: &Item, now: DateTime<Utc>) -> bool {
        Self::claim_blocker(sale, item, now).is_none()
    }

    /// Claim an item for a verified buyer.
    ///
    /// The guard check is advisory; the repository's conditional update is
    /// what actually decides the winner under contention.
    pub async fn claim(
        &self,
        sale: &Sale,
        item: &Item,
        buyer_id: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<Item> {
        if let Some(reason) = Self::claim_blocker(sale, item, now) {
            return Err(ClaimError::NotClaimable { reason }.into());
        }

        let won = self
            .item_repository
            .claim_if_available(item.id, buyer_id, now)
            .await?;

        if !won {
            tracing::info!(
                item_id = %item.id,
                buyer_id = %buyer_id,
                event = "claim_lost_race",
                "Item was claimed by another buyer first"
            );
            return Err(ClaimError::NotClaimable {
                reason: NotClaimableReason::AlreadyClaimed,
            }
            .into());
        }

        tracing::info!(
            item_id = %item.id,
            sale_id = %sale.id,
            buyer_id = %buyer_id,
            event = "item_claimed",
            "Item claimed"
        );

        self.item_repository
            .find_by_id(item.id)
            .await?
            .ok_or(DomainError::NotFound {
                resource: "Item".to_string(),
            })
    }

    /// Validate a sale status transition against the allowed table
    pub fn validate_transition(from: SaleStatus, to: SaleStatus) -> Result<(), ClaimError> {
        if from.can_transition_to(to) {
            Ok(())
        } else {
            Err(ClaimError::InvalidTransition { from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::sale::SaleWindows;
    use crate::domain::value_objects::contact::{Contact, ContactMethod};
    use crate::repositories::MockItemRepository;
    use chrono::Duration;

    fn active_sale(claim_start: DateTime<Utc>, claim_end: DateTime<Utc>) -> Sale {
        let mut sale = Sale::new(
            Uuid::new_v4(),
            Contact::new(ContactMethod::Email, "seller@example.com").unwrap(),
            "Estate sale".to_string(),
            None,
            "123 Maple St".to_string(),
            "Yakima".to_string(),
            "WA".to_string(),
            "98901".to_string(),
            SaleWindows {
                claim_start,
                claim_end,
                pickup_start: claim_end,
                pickup_end: claim_end + Duration::hours(4),
            },
            "123456".to_string(),
            "a".repeat(32),
        )
        .unwrap();
        sale.transition(SaleStatus::Active).unwrap();
        sale
    }

    fn available_item(sale: &Sale) -> Item {
        Item::new(sale.id, "Lamp".to_string(), None, Some(20.0), 1)
    }

    #[test]
    fn test_claim_blocker_reasons() {
        let now = Utc::now();
        let sale = active_sale(now - Duration::minutes(10), now + Duration::minutes(50));
        let item = available_item(&sale);

        assert!(ClaimLifecycle::<MockItemRepository>::can_claim(&sale, &item, now));

        // Outside the window
        assert_eq!(
            ClaimLifecycle::<MockItemRepository>::claim_blocker(
                &sale,
                &item,
                now - Duration::minutes(11)
            ),
            Some(NotClaimableReason::WindowNotOpen)
        );
        assert_eq!(
            ClaimLifecycle::<MockItemRepository>::claim_blocker(
                &sale,
                &item,
                now + Duration::minutes(51)
            ),
            Some(NotClaimableReason::WindowClosed)
        );

        // Wrong sale status dominates window checks
        let mut closed = sale.clone();
        closed.transition(SaleStatus::Closed).unwrap();
        assert_eq!(
            ClaimLifecycle::<MockItemRepository>::claim_blocker(&closed, &item, now),
            Some(NotClaimableReason::SaleNotActive)
        );

        // Item status
        let mut claimed = item.clone();
        claimed.status = ItemStatus::Claimed;
        assert_eq!(
            ClaimLifecycle::<MockItemRepository>::claim_blocker(&sale, &claimed, now),
            Some(NotClaimableReason::AlreadyClaimed)
        );
    }

    #[tokio::test]
    async fn test_concurrent_claims_have_one_winner() {
        let now = Utc::now();
        let sale = active_sale(now - Duration::minutes(10), now + Duration::minutes(50));
        let item = available_item(&sale);

        let repo = Arc::new(MockItemRepository::new());
        repo.create(item.clone()).await.unwrap();
        let lifecycle = ClaimLifecycle::new(repo.clone());

        let (a, b) = tokio::join!(
            lifecycle.claim(&sale, &item, Uuid::new_v4(), now),
            lifecycle.claim(&sale, &item, Uuid::new_v4(), now),
        );

        let outcomes = [a, b];
        let winners = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);

        let loser = outcomes.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            loser.as_ref().unwrap_err(),
            DomainError::Claim(ClaimError::NotClaimable {
                reason: NotClaimableReason::AlreadyClaimed
            })
        ));

        let stored = repo.find_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ItemStatus::Claimed);
    }

    #[test]
    fn test_validate_transition() {
        assert!(ClaimLifecycle::<MockItemRepository>::validate_transition(
            SaleStatus::Draft,
            SaleStatus::Active
        )
        .is_ok());
        assert!(matches!(
            ClaimLifecycle::<MockItemRepository>::validate_transition(
                SaleStatus::Closed,
                SaleStatus::Active
            ),
            Err(ClaimError::InvalidTransition { .. })
        ));
    }
}
