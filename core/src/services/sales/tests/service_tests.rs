//! Unit tests for the sale service

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::item::ItemStatus;
use crate::domain::entities::sale::{SaleStatus, ACCESS_CODE_LENGTH, QR_TOKEN_LENGTH};
use crate::domain::value_objects::contact::ContactMethod;
use crate::errors::{ClaimError, DomainError, ValidationError};
use crate::repositories::{
    InquiryRepository, ItemRepository, MockInquiryRepository, MockItemRepository,
    MockSaleRepository,
};
use crate::services::sales::{NewItem, NewSale, SaleService};

type Service = SaleService<MockSaleRepository, MockItemRepository, MockInquiryRepository>;

struct Harness {
    items: Arc<MockItemRepository>,
    inquiries: Arc<MockInquiryRepository>,
    service: Service,
}

fn harness() -> Harness {
    let sales = Arc::new(MockSaleRepository::new());
    let items = Arc::new(MockItemRepository::new());
    let inquiries = Arc::new(MockInquiryRepository::new());
    let service = SaleService::new(sales, Arc::clone(&items), Arc::clone(&inquiries));
    Harness {
        items,
        inquiries,
        service,
    }
}

fn new_sale() -> NewSale {
    let now = Utc::now();
    NewSale {
        title: "Estate Sale on Maple St".to_string(),
        description: Some("Everything must go".to_string()),
        address: "123 Maple St".to_string(),
        city: "Yakima".to_string(),
        state: "WA".to_string(),
        zip: "98901".to_string(),
        seller_contact_method: ContactMethod::Email,
        seller_contact_value: "seller@example.com".to_string(),
        claim_start: now,
        claim_end: now + Duration::hours(24),
        pickup_start: now + Duration::hours(24),
        pickup_end: now + Duration::hours(30),
    }
}

#[tokio::test]
async fn test_create_sale_generates_codes() {
    let h = harness();
    let sale = h.service.create_sale(Uuid::new_v4(), new_sale()).await.unwrap();

    assert_eq!(sale.status, SaleStatus::Draft);
    assert_eq!(sale.access_code.len(), ACCESS_CODE_LENGTH);
    assert!(sale.access_code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(sale.qr_token.len(), QR_TOKEN_LENGTH);
}

#[tokio::test]
async fn test_create_sale_rejects_bad_windows() {
    let h = harness();
    let mut input = new_sale();
    input.claim_end = input.claim_start;

    let err = h.service.create_sale(Uuid::new_v4(), input).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::InvalidWindow { .. })
    ));
}

#[tokio::test]
async fn test_publish_close_flow() {
    let h = harness();
    let seller = Uuid::new_v4();
    let sale = h.service.create_sale(seller, new_sale()).await.unwrap();

    let sale = h.service.publish_sale(sale.id, seller).await.unwrap();
    assert_eq!(sale.status, SaleStatus::Active);

    let sale = h.service.close_sale(sale.id, seller).await.unwrap();
    assert_eq!(sale.status, SaleStatus::Closed);

    // Closed is terminal
    let err = h.service.publish_sale(sale.id, seller).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Claim(ClaimError::InvalidTransition {
            from: SaleStatus::Closed,
            to: SaleStatus::Active,
        })
    ));
}

#[tokio::test]
async fn test_cancel_from_draft() {
    let h = harness();
    let seller = Uuid::new_v4();
    let sale = h.service.create_sale(seller, new_sale()).await.unwrap();

    let sale = h.service.cancel_sale(sale.id, seller).await.unwrap();
    assert_eq!(sale.status, SaleStatus::Cancelled);
}

#[tokio::test]
async fn test_transitions_require_ownership() {
    let h = harness();
    let sale = h.service.create_sale(Uuid::new_v4(), new_sale()).await.unwrap();

    let err = h.service.publish_sale(sale.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn test_add_and_remove_items() {
    let h = harness();
    let seller = Uuid::new_v4();
    let sale = h.service.create_sale(seller, new_sale()).await.unwrap();

    let item = h
        .service
        .add_item(
            sale.id,
            seller,
            NewItem {
                title: "Oak dresser".to_string(),
                description: None,
                price: Some(120.0),
                sort_order: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(item.status, ItemStatus::Available);

    h.service.remove_item(item.id, seller).await.unwrap();
    let stored = h.items.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ItemStatus::Removed);
}

#[tokio::test]
async fn test_cannot_remove_claimed_item() {
    let h = harness();
    let seller = Uuid::new_v4();
    let sale = h.service.create_sale(seller, new_sale()).await.unwrap();
    let item = h
        .service
        .add_item(
            sale.id,
            seller,
            NewItem {
                title: "Lamp".to_string(),
                description: None,
                price: None,
                sort_order: 1,
            },
        )
        .await
        .unwrap();

    h.items
        .claim_if_available(item.id, Uuid::new_v4(), Utc::now())
        .await
        .unwrap();

    let err = h.service.remove_item(item.id, seller).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Claim(ClaimError::NotClaimable { .. })
    ));
}

#[tokio::test]
async fn test_cannot_add_items_to_terminal_sale() {
    let h = harness();
    let seller = Uuid::new_v4();
    let sale = h.service.create_sale(seller, new_sale()).await.unwrap();
    h.service.cancel_sale(sale.id, seller).await.unwrap();

    let err = h
        .service
        .add_item(
            sale.id,
            seller,
            NewItem {
                title: "Lamp".to_string(),
                description: None,
                price: None,
                sort_order: 1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BusinessRule { .. }));
}

#[tokio::test]
async fn test_inquiry_triage() {
    use crate::domain::entities::inquiry::Inquiry;
    use crate::domain::value_objects::contact::Contact;

    let h = harness();
    let seller = Uuid::new_v4();
    let sale = h.service.create_sale(seller, new_sale()).await.unwrap();

    let inquiry = h
        .inquiries
        .create(Inquiry::new(
            sale.id,
            Uuid::new_v4(),
            None,
            "Pat".to_string(),
            Contact::new(ContactMethod::Email, "pat@example.com").unwrap(),
            "Still available?".to_string(),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(h.service.unread_inquiry_count(seller).await.unwrap(), 1);
    assert_eq!(h.service.seller_inquiries(seller).await.unwrap().len(), 1);

    // Another seller cannot touch it
    let err = h
        .service
        .mark_inquiry_read(inquiry.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));

    assert!(h.service.mark_inquiry_read(inquiry.id, seller).await.unwrap());
    assert_eq!(h.service.unread_inquiry_count(seller).await.unwrap(), 0);
}
