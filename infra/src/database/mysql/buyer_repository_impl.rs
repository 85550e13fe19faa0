//! MySQL implementation of the BuyerRepository trait.
//!
//! The buyers table carries `UNIQUE KEY (sale_id, contact_value)`; the
//! pending-code upsert rides that key with `INSERT ... ON DUPLICATE KEY
//! UPDATE`, which is what makes "at most one pending code per (sale,
//! contact)" hold under concurrent requests without reading first.
//!
//! Session tokens are stored as SHA-256 hashes; the raw token only ever
//! exists in the response that issued it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cy_core::domain::entities::buyer::Buyer;
use cy_core::domain::value_objects::contact::Contact;
use cy_core::errors::DomainError;
use cy_core::repositories::BuyerRepository;

use super::db_error;
use super::sale_repository_impl::{parse_method, parse_uuid};

/// MySQL implementation of BuyerRepository
pub struct MySqlBuyerRepository {
    pool: MySqlPool,
}

impl MySqlBuyerRepository {
    /// Create a new MySQL buyer repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Hash a session token for storage
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn row_to_buyer(row: &sqlx::mysql::MySqlRow) -> Result<Buyer, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get buyer id", e))?;
        let sale_id: String = row
            .try_get("sale_id")
            .map_err(|e| db_error("Failed to get sale_id", e))?;
        let contact_method: String = row
            .try_get("contact_method")
            .map_err(|e| db_error("Failed to get contact_method", e))?;
        let contact_value: String = row
            .try_get("contact_value")
            .map_err(|e| db_error("Failed to get contact_value", e))?;

        let contact = Contact::new(parse_method(&contact_method)?, &contact_value)
            .map_err(|e| DomainError::Internal {
                message: format!("Stored buyer contact is invalid: {}", e),
            })?;

        Ok(Buyer {
            id: parse_uuid(&id)?,
            sale_id: parse_uuid(&sale_id)?,
            name: row
                .try_get("name")
                .map_err(|e| db_error("Failed to get name", e))?,
            contact,
            verification_code: row
                .try_get("verification_code")
                .map_err(|e| db_error("Failed to get verification_code", e))?,
            code_expires_at: row
                .try_get::<DateTime<Utc>, _>("code_expires_at")
                .map_err(|e| db_error("Failed to get code_expires_at", e))?,
            auth_verified: row
                .try_get("auth_verified")
                .map_err(|e| db_error("Failed to get auth_verified", e))?,
            // Only the hash is ever persisted
            session_token: row
                .try_get("session_token_hash")
                .map_err(|e| db_error("Failed to get session_token_hash", e))?,
            session_expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("session_expires_at")
                .map_err(|e| db_error("Failed to get session_expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("Failed to get created_at", e))?,
            last_seen_at: row
                .try_get::<DateTime<Utc>, _>("last_seen_at")
                .map_err(|e| db_error("Failed to get last_seen_at", e))?,
        })
    }
}

const SELECT_BUYER: &str = r#"
    SELECT id, sale_id, name, contact_method, contact_value,
           verification_code, code_expires_at, auth_verified,
           session_token_hash, session_expires_at, created_at, last_seen_at
    FROM buyers
"#;

#[async_trait]
impl BuyerRepository for MySqlBuyerRepository {
    async fn upsert_pending_code(
        &self,
        sale_id: Uuid,
        name: &str,
        contact: &Contact,
        code: &str,
        code_expires_at: DateTime<Utc>,
    ) -> Result<Buyer, DomainError> {
        let now = Utc::now();
        let query = r#"
            INSERT INTO buyers (
                id, sale_id, name, contact_method, contact_value,
                verification_code, code_expires_at, auth_verified,
                created_at, last_seen_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, FALSE, ?, ?)
            ON DUPLICATE KEY UPDATE
                verification_code = VALUES(verification_code),
                code_expires_at = VALUES(code_expires_at)
        "#;

        sqlx::query(query)
            .bind(Uuid::new_v4().to_string())
            .bind(sale_id.to_string())
            .bind(name)
            .bind(contact.method().as_str())
            .bind(contact.value())
            .bind(code)
            .bind(code_expires_at)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to upsert buyer", e))?;

        let row = sqlx::query(&format!(
            "{} WHERE sale_id = ? AND contact_value = ?",
            SELECT_BUYER
        ))
        .bind(sale_id.to_string())
        .bind(contact.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to reload buyer after upsert", e))?;

        Self::row_to_buyer(&row)
    }

    async fn find_pending_by_contact(
        &self,
        contact_value: &str,
    ) -> Result<Vec<Buyer>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE contact_value = ? AND auth_verified = FALSE",
            SELECT_BUYER
        ))
        .bind(contact_value)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to query pending buyers", e))?;

        rows.iter().map(Self::row_to_buyer).collect()
    }

    async fn promote_if_pending(
        &self,
        buyer_id: Uuid,
        code: &str,
        session_token: &str,
        session_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE buyers
            SET auth_verified = TRUE,
                session_token_hash = ?,
                session_expires_at = ?,
                last_seen_at = ?
            WHERE id = ?
              AND auth_verified = FALSE
              AND verification_code = ?
              AND code_expires_at > ?
            "#,
        )
        .bind(Self::hash_token(session_token))
        .bind(session_expires_at)
        .bind(now)
        .bind(buyer_id.to_string())
        .bind(code)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to promote buyer", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_session_token(&self, token: &str) -> Result<Option<Buyer>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE session_token_hash = ? AND auth_verified = TRUE",
            SELECT_BUYER
        ))
        .bind(Self::hash_token(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to query session", e))?;

        row.as_ref().map(Self::row_to_buyer).transpose()
    }

    async fn touch_last_seen(
        &self,
        buyer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE buyers SET last_seen_at = ? WHERE id = ?")
            .bind(now)
            .bind(buyer_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to touch last_seen_at", e))?;
        Ok(())
    }

    async fn clear_session(&self, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE buyers
            SET session_token_hash = NULL, session_expires_at = NULL
            WHERE session_token_hash = ?
            "#,
        )
        .bind(Self::hash_token(token))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to clear session", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn code_in_use(
        &self,
        sale_id: Uuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM buyers
                WHERE sale_id = ?
                  AND verification_code = ?
                  AND auth_verified = FALSE
                  AND code_expires_at > ?
            ) AS present
            "#,
        )
        .bind(sale_id.to_string())
        .bind(code)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to check code usage", e))?;

        let present: i8 = row
            .try_get("present")
            .map_err(|e| db_error("Failed to get existence result", e))?;
        Ok(present == 1)
    }

    async fn purge_expired_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM buyers WHERE auth_verified = FALSE AND code_expires_at < ?",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to purge expired buyers", e))?;

        Ok(result.rows_affected())
    }

    async fn clear_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE buyers
            SET session_token_hash = NULL, session_expires_at = NULL
            WHERE session_token_hash IS NOT NULL AND session_expires_at < ?
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to clear expired sessions", e))?;

        Ok(result.rows_affected())
    }
}
