//! MySQL repository implementations.
//!
//! Each repository maps one core trait onto SQLx queries. The concurrency
//! contract lives in the SQL: upserts are `INSERT ... ON DUPLICATE KEY
//! UPDATE` against a unique key, and every state-deciding write is a
//! conditional `UPDATE` whose affected-row count picks the winner.

pub mod buyer_repository_impl;
pub mod inquiry_repository_impl;
pub mod item_repository_impl;
pub mod sale_repository_impl;

pub use buyer_repository_impl::MySqlBuyerRepository;
pub use inquiry_repository_impl::MySqlInquiryRepository;
pub use item_repository_impl::MySqlItemRepository;
pub use sale_repository_impl::MySqlSaleRepository;

use cy_core::errors::DomainError;

/// Wrap a SQLx error as an internal domain error without leaking SQL
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, err),
    }
}
