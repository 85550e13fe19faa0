//! MySQL implementation of the InquiryRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cy_core::domain::entities::inquiry::{Inquiry, InquiryStatus};
use cy_core::domain::value_objects::contact::Contact;
use cy_core::errors::DomainError;
use cy_core::repositories::InquiryRepository;

use super::db_error;
use super::sale_repository_impl::{parse_method, parse_uuid};

/// MySQL implementation of InquiryRepository
pub struct MySqlInquiryRepository {
    pool: MySqlPool,
}

impl MySqlInquiryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_inquiry(row: &sqlx::mysql::MySqlRow) -> Result<Inquiry, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get inquiry id", e))?;
        let sale_id: String = row
            .try_get("sale_id")
            .map_err(|e| db_error("Failed to get sale_id", e))?;
        let item_id: String = row
            .try_get("item_id")
            .map_err(|e| db_error("Failed to get item_id", e))?;
        let buyer_id: Option<String> = row
            .try_get("buyer_id")
            .map_err(|e| db_error("Failed to get buyer_id", e))?;
        let contact_method: String = row
            .try_get("contact_method")
            .map_err(|e| db_error("Failed to get contact_method", e))?;
        let contact_value: String = row
            .try_get("contact_value")
            .map_err(|e| db_error("Failed to get contact_value", e))?;
        let status: String = row
            .try_get("status")
            .map_err(|e| db_error("Failed to get status", e))?;

        let contact = Contact::new(parse_method(&contact_method)?, &contact_value)
            .map_err(|e| DomainError::Internal {
                message: format!("Stored inquiry contact is invalid: {}", e),
            })?;

        Ok(Inquiry {
            id: parse_uuid(&id)?,
            sale_id: parse_uuid(&sale_id)?,
            item_id: parse_uuid(&item_id)?,
            buyer_id: buyer_id.as_deref().map(parse_uuid).transpose()?,
            name: row
                .try_get("name")
                .map_err(|e| db_error("Failed to get name", e))?,
            contact,
            message: row
                .try_get("message")
                .map_err(|e| db_error("Failed to get message", e))?,
            offer_amount: row
                .try_get("offer_amount")
                .map_err(|e| db_error("Failed to get offer_amount", e))?,
            status: parse_inquiry_status(&status)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("Failed to get created_at", e))?,
        })
    }
}

const SELECT_INQUIRY: &str = r#"
    SELECT id, sale_id, item_id, buyer_id, name, contact_method,
           contact_value, message, offer_amount, status, created_at
    FROM inquiries
"#;

#[async_trait]
impl InquiryRepository for MySqlInquiryRepository {
    async fn create(&self, inquiry: Inquiry) -> Result<Inquiry, DomainError> {
        let query = r#"
            INSERT INTO inquiries (
                id, sale_id, item_id, buyer_id, name, contact_method,
                contact_value, message, offer_amount, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(inquiry.id.to_string())
            .bind(inquiry.sale_id.to_string())
            .bind(inquiry.item_id.to_string())
            .bind(inquiry.buyer_id.map(|id| id.to_string()))
            .bind(&inquiry.name)
            .bind(inquiry.contact.method().as_str())
            .bind(inquiry.contact.value())
            .bind(&inquiry.message)
            .bind(inquiry.offer_amount)
            .bind(inquiry.status.as_str())
            .bind(inquiry.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create inquiry", e))?;

        Ok(inquiry)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Inquiry>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_INQUIRY))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to query inquiry", e))?;

        row.as_ref().map(Self::row_to_inquiry).transpose()
    }

    async fn list_by_sale(&self, sale_id: Uuid) -> Result<Vec<Inquiry>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE sale_id = ? ORDER BY created_at DESC",
            SELECT_INQUIRY
        ))
        .bind(sale_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list inquiries", e))?;

        rows.iter().map(Self::row_to_inquiry).collect()
    }

    async fn mark_read(&self, inquiry_id: Uuid) -> Result<bool, DomainError> {
        let result =
            sqlx::query("UPDATE inquiries SET status = 'read' WHERE id = ? AND status = 'new'")
                .bind(inquiry_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to mark inquiry read", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn unread_count_by_sale(&self, sale_id: Uuid) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS unread FROM inquiries WHERE sale_id = ? AND status = 'new'",
        )
        .bind(sale_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count unread inquiries", e))?;

        let unread: i64 = row
            .try_get("unread")
            .map_err(|e| db_error("Failed to get unread count", e))?;
        Ok(unread as u64)
    }
}

fn parse_inquiry_status(value: &str) -> Result<InquiryStatus, DomainError> {
    match value {
        "new" => Ok(InquiryStatus::New),
        "read" => Ok(InquiryStatus::Read),
        "responded" => Ok(InquiryStatus::Responded),
        "closed" => Ok(InquiryStatus::Closed),
        other => Err(DomainError::Internal {
            message: format!("Unknown inquiry status in database: {}", other),
        }),
    }
}
