//! Integration tests for the MySQL repositories
//!
//! These tests require a MySQL instance with the schema from
//! `migrations/` applied, reachable through `DATABASE_URL`.
//! Run with: cargo test --test database_integration -- --ignored

use chrono::{Duration, Utc};
use uuid::Uuid;

use cy_core::domain::entities::item::{Item, ItemStatus};
use cy_core::domain::entities::sale::{Sale, SaleStatus, SaleWindows};
use cy_core::domain::value_objects::contact::{Contact, ContactMethod};
use cy_core::repositories::{BuyerRepository, ItemRepository, SaleRepository};
use cy_infra::database::{
    DatabasePool, MySqlBuyerRepository, MySqlItemRepository, MySqlSaleRepository,
};
use cy_shared::config::DatabaseConfig;

async fn pool() -> DatabasePool {
    DatabasePool::new(DatabaseConfig::from_env())
        .await
        .expect("Failed to connect to test database")
}

fn test_sale(access_code: &str, qr_token: &str) -> Sale {
    let now = Utc::now();
    let mut sale = Sale::new(
        Uuid::new_v4(),
        Contact::new(ContactMethod::Email, "seller@example.com").unwrap(),
        "Integration test sale".to_string(),
        None,
        "123 Maple St".to_string(),
        "Yakima".to_string(),
        "WA".to_string(),
        "98901".to_string(),
        SaleWindows {
            claim_start: now - Duration::minutes(5),
            claim_end: now + Duration::hours(1),
            pickup_start: now + Duration::hours(1),
            pickup_end: now + Duration::hours(5),
        },
        access_code.to_string(),
        qr_token.to_string(),
    )
    .unwrap();
    sale.transition(SaleStatus::Active).unwrap();
    sale
}

fn random_code() -> String {
    format!("{:06}", rand::random::<u32>() % 1_000_000)
}

fn random_token() -> String {
    (0..32)
        .map(|_| format!("{:x}", rand::random::<u8>() % 16))
        .collect()
}

#[tokio::test]
#[ignore] // Requires MySQL to be running
async fn test_buyer_upsert_and_promotion_roundtrip() {
    let pool = pool().await;
    let sales = MySqlSaleRepository::new(pool.pool().clone());
    let buyers = MySqlBuyerRepository::new(pool.pool().clone());

    let sale = sales
        .create(test_sale(&random_code(), &random_token()))
        .await
        .unwrap();

    let contact = Contact::new(ContactMethod::Email, "it-buyer@example.com").unwrap();
    let now = Utc::now();

    let first = buyers
        .upsert_pending_code(sale.id, "Pat", &contact, "111111", now + Duration::minutes(15))
        .await
        .unwrap();
    let second = buyers
        .upsert_pending_code(sale.id, "Pat", &contact, "222222", now + Duration::minutes(15))
        .await
        .unwrap();

    // Same row, refreshed code
    assert_eq!(first.id, second.id);
    assert_eq!(second.verification_code, "222222");

    // The stale code cannot promote, the live one can, exactly once
    assert!(!buyers
        .promote_if_pending(first.id, "111111", "it-tok", now + Duration::hours(24), now)
        .await
        .unwrap());
    assert!(buyers
        .promote_if_pending(first.id, "222222", "it-tok", now + Duration::hours(24), now)
        .await
        .unwrap());
    assert!(!buyers
        .promote_if_pending(first.id, "222222", "other", now + Duration::hours(24), now)
        .await
        .unwrap());

    let resolved = buyers.find_by_session_token("it-tok").await.unwrap().unwrap();
    assert!(resolved.auth_verified);
    assert_eq!(resolved.id, first.id);
}

#[tokio::test]
#[ignore] // Requires MySQL to be running
async fn test_item_claim_is_single_winner() {
    let pool = pool().await;
    let sales = MySqlSaleRepository::new(pool.pool().clone());
    let items = MySqlItemRepository::new(pool.pool().clone());

    let sale = sales
        .create(test_sale(&random_code(), &random_token()))
        .await
        .unwrap();
    let item = items
        .create(Item::new(sale.id, "Lamp".to_string(), None, None, 1))
        .await
        .unwrap();

    let now = Utc::now();
    let (a, b) = tokio::join!(
        items.claim_if_available(item.id, Uuid::new_v4(), now),
        items.claim_if_available(item.id, Uuid::new_v4(), now),
    );

    let wins = [a.unwrap(), b.unwrap()].iter().filter(|w| **w).count();
    assert_eq!(wins, 1);

    let stored = items.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ItemStatus::Claimed);
}
