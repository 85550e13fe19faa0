//! MySQL implementation of the SaleRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cy_core::domain::entities::sale::{Sale, SaleStatus, SaleWindows};
use cy_core::domain::value_objects::contact::{Contact, ContactMethod};
use cy_core::errors::DomainError;
use cy_core::repositories::SaleRepository;

use super::db_error;

/// MySQL implementation of SaleRepository
///
/// `sales.access_code` and `sales.qr_token` carry UNIQUE indexes, so a
/// duplicate generated code fails the INSERT instead of silently
/// colliding; status changes are conditional UPDATEs keyed on the
/// expected current status.
pub struct MySqlSaleRepository {
    pool: MySqlPool,
}

impl MySqlSaleRepository {
    /// Create a new MySQL sale repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a Sale entity
    fn row_to_sale(row: &sqlx::mysql::MySqlRow) -> Result<Sale, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get sale id", e))?;
        let seller_id: String = row
            .try_get("seller_id")
            .map_err(|e| db_error("Failed to get seller_id", e))?;
        let contact_method: String = row
            .try_get("seller_contact_method")
            .map_err(|e| db_error("Failed to get seller_contact_method", e))?;
        let contact_value: String = row
            .try_get("seller_contact_value")
            .map_err(|e| db_error("Failed to get seller_contact_value", e))?;
        let status: String = row
            .try_get("status")
            .map_err(|e| db_error("Failed to get status", e))?;

        let seller_contact = Contact::new(parse_method(&contact_method)?, &contact_value)
            .map_err(|e| DomainError::Internal {
                message: format!("Stored seller contact is invalid: {}", e),
            })?;

        Ok(Sale {
            id: parse_uuid(&id)?,
            seller_id: parse_uuid(&seller_id)?,
            seller_contact,
            title: row
                .try_get("title")
                .map_err(|e| db_error("Failed to get title", e))?,
            description: row
                .try_get("description")
                .map_err(|e| db_error("Failed to get description", e))?,
            address: row
                .try_get("address")
                .map_err(|e| db_error("Failed to get address", e))?,
            city: row
                .try_get("city")
                .map_err(|e| db_error("Failed to get city", e))?,
            state: row
                .try_get("state")
                .map_err(|e| db_error("Failed to get state", e))?,
            zip: row
                .try_get("zip")
                .map_err(|e| db_error("Failed to get zip", e))?,
            status: parse_sale_status(&status)?,
            windows: SaleWindows {
                claim_start: row
                    .try_get::<DateTime<Utc>, _>("claim_start")
                    .map_err(|e| db_error("Failed to get claim_start", e))?,
                claim_end: row
                    .try_get::<DateTime<Utc>, _>("claim_end")
                    .map_err(|e| db_error("Failed to get claim_end", e))?,
                pickup_start: row
                    .try_get::<DateTime<Utc>, _>("pickup_start")
                    .map_err(|e| db_error("Failed to get pickup_start", e))?,
                pickup_end: row
                    .try_get::<DateTime<Utc>, _>("pickup_end")
                    .map_err(|e| db_error("Failed to get pickup_end", e))?,
            },
            access_code: row
                .try_get("access_code")
                .map_err(|e| db_error("Failed to get access_code", e))?,
            qr_token: row
                .try_get("qr_token")
                .map_err(|e| db_error("Failed to get qr_token", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| db_error("Failed to get updated_at", e))?,
        })
    }

    async fn find_by_column(&self, query: &str, value: &str) -> Result<Option<Sale>, DomainError> {
        let row = sqlx::query(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to query sale", e))?;

        row.as_ref().map(Self::row_to_sale).transpose()
    }
}

const SELECT_SALE: &str = r#"
    SELECT id, seller_id, seller_contact_method, seller_contact_value,
           title, description, address, city, state, zip, status,
           claim_start, claim_end, pickup_start, pickup_end,
           access_code, qr_token, created_at, updated_at
    FROM sales
"#;

#[async_trait]
impl SaleRepository for MySqlSaleRepository {
    async fn create(&self, sale: Sale) -> Result<Sale, DomainError> {
        let query = r#"
            INSERT INTO sales (
                id, seller_id, seller_contact_method, seller_contact_value,
                title, description, address, city, state, zip, status,
                claim_start, claim_end, pickup_start, pickup_end,
                access_code, qr_token, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(sale.id.to_string())
            .bind(sale.seller_id.to_string())
            .bind(sale.seller_contact.method().as_str())
            .bind(sale.seller_contact.value())
            .bind(&sale.title)
            .bind(&sale.description)
            .bind(&sale.address)
            .bind(&sale.city)
            .bind(&sale.state)
            .bind(&sale.zip)
            .bind(sale.status.as_str())
            .bind(sale.windows.claim_start)
            .bind(sale.windows.claim_end)
            .bind(sale.windows.pickup_start)
            .bind(sale.windows.pickup_end)
            .bind(&sale.access_code)
            .bind(&sale.qr_token)
            .bind(sale.created_at)
            .bind(sale.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create sale", e))?;

        Ok(sale)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, DomainError> {
        self.find_by_column(&format!("{} WHERE id = ?", SELECT_SALE), &id.to_string())
            .await
    }

    async fn find_by_access_code(&self, access_code: &str) -> Result<Option<Sale>, DomainError> {
        self.find_by_column(&format!("{} WHERE access_code = ?", SELECT_SALE), access_code)
            .await
    }

    async fn find_by_qr_token(&self, qr_token: &str) -> Result<Option<Sale>, DomainError> {
        self.find_by_column(&format!("{} WHERE qr_token = ?", SELECT_SALE), qr_token)
            .await
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<Sale>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE seller_id = ? ORDER BY created_at DESC",
            SELECT_SALE
        ))
        .bind(seller_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list sales", e))?;

        rows.iter().map(Self::row_to_sale).collect()
    }

    async fn update_status(
        &self,
        sale_id: Uuid,
        from: SaleStatus,
        to: SaleStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE sales SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(now)
        .bind(sale_id.to_string())
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update sale status", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn access_code_exists(&self, access_code: &str) -> Result<bool, DomainError> {
        exists(&self.pool, "SELECT EXISTS(SELECT 1 FROM sales WHERE access_code = ?) AS present", access_code).await
    }

    async fn qr_token_exists(&self, qr_token: &str) -> Result<bool, DomainError> {
        exists(&self.pool, "SELECT EXISTS(SELECT 1 FROM sales WHERE qr_token = ?) AS present", qr_token).await
    }
}

async fn exists(pool: &MySqlPool, query: &str, value: &str) -> Result<bool, DomainError> {
    let row = sqlx::query(query)
        .bind(value)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to check existence", e))?;

    let present: i8 = row
        .try_get("present")
        .map_err(|e| db_error("Failed to get existence result", e))?;
    Ok(present == 1)
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in database: {}", e),
    })
}

pub(crate) fn parse_method(value: &str) -> Result<ContactMethod, DomainError> {
    match value {
        "email" => Ok(ContactMethod::Email),
        "sms" => Ok(ContactMethod::Sms),
        other => Err(DomainError::Internal {
            message: format!("Unknown contact method in database: {}", other),
        }),
    }
}

fn parse_sale_status(value: &str) -> Result<SaleStatus, DomainError> {
    match value {
        "draft" => Ok(SaleStatus::Draft),
        "active" => Ok(SaleStatus::Active),
        "closed" => Ok(SaleStatus::Closed),
        "cancelled" => Ok(SaleStatus::Cancelled),
        other => Err(DomainError::Internal {
            message: format!("Unknown sale status in database: {}", other),
        }),
    }
}
