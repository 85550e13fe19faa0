//! MySQL implementation of the ItemRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cy_core::domain::entities::item::{Item, ItemStatus};
use cy_core::errors::DomainError;
use cy_core::repositories::ItemRepository;

use super::db_error;
use super::sale_repository_impl::parse_uuid;

/// MySQL implementation of ItemRepository
///
/// The claim path is a single conditional UPDATE: the row moves to
/// `claimed` only if it is still `available` when the statement commits,
/// and the affected-row count tells the caller whether it won.
pub struct MySqlItemRepository {
    pool: MySqlPool,
}

impl MySqlItemRepository {
    /// Create a new MySQL item repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_item(row: &sqlx::mysql::MySqlRow) -> Result<Item, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get item id", e))?;
        let sale_id: String = row
            .try_get("sale_id")
            .map_err(|e| db_error("Failed to get sale_id", e))?;
        let status: String = row
            .try_get("status")
            .map_err(|e| db_error("Failed to get status", e))?;
        let claimed_by: Option<String> = row
            .try_get("claimed_by")
            .map_err(|e| db_error("Failed to get claimed_by", e))?;

        Ok(Item {
            id: parse_uuid(&id)?,
            sale_id: parse_uuid(&sale_id)?,
            title: row
                .try_get("title")
                .map_err(|e| db_error("Failed to get title", e))?,
            description: row
                .try_get("description")
                .map_err(|e| db_error("Failed to get description", e))?,
            price: row
                .try_get("price")
                .map_err(|e| db_error("Failed to get price", e))?,
            sort_order: row
                .try_get("sort_order")
                .map_err(|e| db_error("Failed to get sort_order", e))?,
            status: parse_item_status(&status)?,
            claimed_by: claimed_by.as_deref().map(parse_uuid).transpose()?,
            claimed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("claimed_at")
                .map_err(|e| db_error("Failed to get claimed_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| db_error("Failed to get updated_at", e))?,
        })
    }
}

const SELECT_ITEM: &str = r#"
    SELECT id, sale_id, title, description, price, sort_order, status,
           claimed_by, claimed_at, created_at, updated_at
    FROM items
"#;

#[async_trait]
impl ItemRepository for MySqlItemRepository {
    async fn create(&self, item: Item) -> Result<Item, DomainError> {
        let query = r#"
            INSERT INTO items (
                id, sale_id, title, description, price, sort_order, status,
                claimed_by, claimed_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(item.id.to_string())
            .bind(item.sale_id.to_string())
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.sort_order)
            .bind(item.status.as_str())
            .bind(item.claimed_by.map(|id| id.to_string()))
            .bind(item.claimed_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create item", e))?;

        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ITEM))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to query item", e))?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn list_by_sale(&self, sale_id: Uuid) -> Result<Vec<Item>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE sale_id = ? ORDER BY sort_order ASC, created_at ASC",
            SELECT_ITEM
        ))
        .bind(sale_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list items", e))?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn claim_if_available(
        &self,
        item_id: Uuid,
        buyer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET status = 'claimed', claimed_by = ?, claimed_at = ?, updated_at = ?
            WHERE id = ? AND status = 'available'
            "#,
        )
        .bind(buyer_id.to_string())
        .bind(now)
        .bind(now)
        .bind(item_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to claim item", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_status(
        &self,
        item_id: Uuid,
        from: ItemStatus,
        to: ItemStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE items SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(now)
        .bind(item_id.to_string())
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update item status", e))?;

        Ok(result.rows_affected() == 1)
    }
}

fn parse_item_status(value: &str) -> Result<ItemStatus, DomainError> {
    match value {
        "available" => Ok(ItemStatus::Available),
        "claimed" => Ok(ItemStatus::Claimed),
        "removed" => Ok(ItemStatus::Removed),
        other => Err(DomainError::Internal {
            message: format!("Unknown item status in database: {}", other),
        }),
    }
}
