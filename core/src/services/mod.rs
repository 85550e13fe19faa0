//! Business services containing domain logic and use cases.

pub mod claims;
pub mod codegen;
pub mod janitor;
pub mod lifecycle;
pub mod notify;
pub mod rate_limit;
pub mod sales;
pub mod verification;

// Re-export commonly used types
pub use claims::{ClaimService, ClaimServiceConfig};
pub use codegen::{CodeGenerator, CodeKind};
pub use janitor::{CleanupResult, Janitor, JanitorConfig};
pub use lifecycle::ClaimLifecycle;
pub use notify::{DeliveryOutcome, NotificationDispatcher, NotificationPayload};
pub use rate_limit::{MemoryRateLimiter, RateLimitDecision, RateLimitKey, RateLimiter};
pub use sales::SaleService;
pub use verification::{VerificationConfig, VerificationService};
