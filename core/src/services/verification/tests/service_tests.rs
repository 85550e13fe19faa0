//! Unit tests for the verification service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::buyer::{CODE_LENGTH, SESSION_TOKEN_LENGTH};
use crate::domain::value_objects::contact::{Contact, ContactMethod};
use crate::errors::{DomainError, ValidationError, VerificationError};
use crate::repositories::{BuyerRepository, MockBuyerRepository};
use crate::services::verification::{VerificationConfig, VerificationService};

fn service() -> VerificationService<MockBuyerRepository> {
    VerificationService::new(
        Arc::new(MockBuyerRepository::new()),
        VerificationConfig::default(),
    )
}

fn service_with(config: VerificationConfig) -> VerificationService<MockBuyerRepository> {
    VerificationService::new(Arc::new(MockBuyerRepository::new()), config)
}

fn email() -> Contact {
    Contact::new(ContactMethod::Email, "buyer@example.com").unwrap()
}

#[tokio::test]
async fn test_request_code_issues_six_digits() {
    let service = service();
    let pending = service
        .request_code(Uuid::new_v4(), "Pat", &email())
        .await
        .unwrap();

    assert_eq!(pending.code.len(), CODE_LENGTH);
    assert!(pending.code.chars().all(|c| c.is_ascii_digit()));
    assert!(pending.expires_at > Utc::now());
}

#[tokio::test]
async fn test_request_code_requires_name() {
    let service = service();
    let err = service
        .request_code(Uuid::new_v4(), "   ", &email())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::RequiredField { .. })
    ));
}

#[tokio::test]
async fn test_verify_issues_session() {
    let service = service();
    let sale_id = Uuid::new_v4();
    let pending = service.request_code(sale_id, "Pat", &email()).await.unwrap();

    let session = service
        .verify_code("buyer@example.com", &pending.code)
        .await
        .unwrap();

    assert_eq!(session.token.len(), SESSION_TOKEN_LENGTH);
    assert!(session.buyer.auth_verified);
    assert_eq!(session.buyer.sale_id, sale_id);

    let resolved = service.resolve_session(&session.token).await.unwrap();
    assert_eq!(resolved.id, session.buyer.id);
}

#[tokio::test]
async fn test_verify_normalizes_contact_value() {
    let service = service();
    let pending = service
        .request_code(Uuid::new_v4(), "Pat", &email())
        .await
        .unwrap();

    // The buyer registered lowercase; the confirm arrives mixed-case
    let session = service
        .verify_code(" Buyer@Example.COM ", &pending.code)
        .await;
    assert!(session.is_ok());
}

#[tokio::test]
async fn test_second_request_invalidates_first_code() {
    let service = service();
    let sale_id = Uuid::new_v4();

    let first = service.request_code(sale_id, "Pat", &email()).await.unwrap();
    let second = service.request_code(sale_id, "Pat", &email()).await.unwrap();

    // Verifying the first code after a second request fails
    let err = service
        .verify_code("buyer@example.com", &first.code)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::InvalidOrExpiredCode)
    ));

    // The replacement code still works
    assert!(service
        .verify_code("buyer@example.com", &second.code)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_code_is_single_use() {
    let service = service();
    let pending = service
        .request_code(Uuid::new_v4(), "Pat", &email())
        .await
        .unwrap();

    assert!(service
        .verify_code("buyer@example.com", &pending.code)
        .await
        .is_ok());

    let err = service
        .verify_code("buyer@example.com", &pending.code)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::InvalidOrExpiredCode)
    ));
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let service = service_with(VerificationConfig {
        code_expiration_minutes: 0,
        ..Default::default()
    });
    let pending = service
        .request_code(Uuid::new_v4(), "Pat", &email())
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let err = service
        .verify_code("buyer@example.com", &pending.code)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::InvalidOrExpiredCode)
    ));
}

#[tokio::test]
async fn test_wrong_code_and_unknown_contact_look_identical() {
    let service = service();
    service
        .request_code(Uuid::new_v4(), "Pat", &email())
        .await
        .unwrap();

    let wrong_code = service
        .verify_code("buyer@example.com", "000000")
        .await
        .unwrap_err();
    let unknown_contact = service
        .verify_code("nobody@example.com", "000000")
        .await
        .unwrap_err();

    // Same generic error either way: no contact-existence oracle
    assert_eq!(wrong_code.to_string(), unknown_contact.to_string());
}

#[tokio::test]
async fn test_malformed_codes_rejected_without_lookup() {
    let service = service();
    for bad in ["12345", "1234567", "12345a", ""] {
        let err = service
            .verify_code("buyer@example.com", bad)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Verification(VerificationError::InvalidOrExpiredCode)
        ));
    }
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let service = service_with(VerificationConfig {
        session_expiration_hours: 0,
        ..Default::default()
    });
    let pending = service
        .request_code(Uuid::new_v4(), "Pat", &email())
        .await
        .unwrap();
    let session = service
        .verify_code("buyer@example.com", &pending.code)
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let err = service.resolve_session(&session.token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::SessionExpired)
    ));
}

#[tokio::test]
async fn test_unknown_token_is_unauthenticated() {
    let service = service();
    let err = service.resolve_session("deadbeef").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let service = service();
    let pending = service
        .request_code(Uuid::new_v4(), "Pat", &email())
        .await
        .unwrap();
    let session = service
        .verify_code("buyer@example.com", &pending.code)
        .await
        .unwrap();

    service.logout(&session.token).await.unwrap();

    let err = service.resolve_session(&session.token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_same_contact_across_two_sales() {
    let repo = Arc::new(MockBuyerRepository::new());
    let service = VerificationService::new(Arc::clone(&repo), VerificationConfig::default());

    let sale_a = Uuid::new_v4();
    let sale_b = Uuid::new_v4();
    let pending_a = service.request_code(sale_a, "Pat", &email()).await.unwrap();
    let pending_b = service.request_code(sale_b, "Pat", &email()).await.unwrap();
    assert_ne!(pending_a.buyer_id, pending_b.buyer_id);

    // Both codes are live; each confirms its own sale's identity
    let session_a = service
        .verify_code("buyer@example.com", &pending_a.code)
        .await
        .unwrap();
    assert_eq!(session_a.buyer.sale_id, sale_a);

    let session_b = service
        .verify_code("buyer@example.com", &pending_b.code)
        .await
        .unwrap();
    assert_eq!(session_b.buyer.sale_id, sale_b);

    // Both rows ended up verified independently
    assert!(repo
        .find_pending_by_contact("buyer@example.com")
        .await
        .unwrap()
        .is_empty());
}
