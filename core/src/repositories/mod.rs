//! Repository interfaces and in-memory mock implementations.
//!
//! The traits define the persistence contract the services depend on; the
//! mocks reproduce the backing store's atomic-conditional-update semantics
//! under a single lock so concurrency properties are testable in-process.

pub mod buyer;
pub mod inquiry;
pub mod item;
pub mod sale;

pub use buyer::{BuyerRepository, MockBuyerRepository};
pub use inquiry::{InquiryRepository, MockInquiryRepository};
pub use item::{ItemRepository, MockItemRepository};
pub use sale::{MockSaleRepository, SaleRepository};
