//! Janitor for expired verification records.
//!
//! Validity is checked at read time everywhere, so this sweep is storage
//! hygiene, not a correctness requirement: it deletes unverified buyer
//! rows whose code expired past a grace period and nulls out expired
//! session tokens.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::errors::DomainResult;
use crate::repositories::BuyerRepository;

/// Configuration for the janitor
#[derive(Debug, Clone)]
pub struct JanitorConfig {
    /// How often to run the sweep (in seconds)
    pub interval_seconds: u64,
    /// Grace period after code expiry before an unverified row is deleted
    /// (in minutes)
    pub purge_grace_minutes: i64,
    /// Whether the sweep runs at all
    pub enabled: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            purge_grace_minutes: 60,
            enabled: true,
        }
    }
}

impl From<&cy_shared::ClaimConfig> for JanitorConfig {
    fn from(config: &cy_shared::ClaimConfig) -> Self {
        Self {
            purge_grace_minutes: config.purge_grace_minutes,
            ..Default::default()
        }
    }
}

/// Summary of one cleanup cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    /// Unverified rows deleted
    pub pending_purged: u64,
    /// Expired sessions nulled out
    pub sessions_cleared: u64,
}

/// Periodic cleanup of expired buyer records
pub struct Janitor<B: BuyerRepository + 'static> {
    buyer_repository: Arc<B>,
    config: JanitorConfig,
}

impl<B: BuyerRepository> Janitor<B> {
    /// Create a new janitor
    pub fn new(buyer_repository: Arc<B>, config: JanitorConfig) -> Self {
        Self {
            buyer_repository,
            config,
        }
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> DomainResult<CleanupResult> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let now = Utc::now();
        let cutoff = now - Duration::minutes(self.config.purge_grace_minutes);

        let pending_purged = self.buyer_repository.purge_expired_pending(cutoff).await?;
        let sessions_cleared = self.buyer_repository.clear_expired_sessions(now).await?;

        if pending_purged > 0 || sessions_cleared > 0 {
            info!(
                pending_purged = pending_purged,
                sessions_cleared = sessions_cleared,
                event = "janitor_cycle",
                "Purged expired verification records"
            );
        }

        Ok(CleanupResult {
            pending_purged,
            sessions_cleared,
        })
    }

    /// Spawn the recurring sweep on the current runtime
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(self.config.interval_seconds));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if let Err(e) = self.run_cleanup().await {
                    error!(
                        error = %e,
                        event = "janitor_failed",
                        "Cleanup cycle failed"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::contact::{Contact, ContactMethod};
    use crate::repositories::MockBuyerRepository;
    use uuid::Uuid;

    fn contact(value: &str) -> Contact {
        Contact::new(ContactMethod::Email, value).unwrap()
    }

    #[tokio::test]
    async fn test_cleanup_purges_only_stale_rows() {
        let repo = Arc::new(MockBuyerRepository::new());
        let now = Utc::now();

        // Stale: code expired two hours ago, never verified
        repo.upsert_pending_code(
            Uuid::new_v4(),
            "Stale",
            &contact("stale@example.com"),
            "111111",
            now - Duration::hours(2),
        )
        .await
        .unwrap();

        // Fresh: pending but inside the grace period
        repo.upsert_pending_code(
            Uuid::new_v4(),
            "Fresh",
            &contact("fresh@example.com"),
            "222222",
            now + Duration::minutes(10),
        )
        .await
        .unwrap();

        // Verified with an expired session
        let verified = repo
            .upsert_pending_code(
                Uuid::new_v4(),
                "Verified",
                &contact("verified@example.com"),
                "333333",
                now + Duration::minutes(10),
            )
            .await
            .unwrap();
        repo.promote_if_pending(verified.id, "333333", "tok", now - Duration::seconds(1), now)
            .await
            .unwrap();

        let janitor = Janitor::new(Arc::clone(&repo), JanitorConfig::default());
        let result = janitor.run_cleanup().await.unwrap();

        assert_eq!(
            result,
            CleanupResult {
                pending_purged: 1,
                sessions_cleared: 1,
            }
        );

        // The fresh pending row survived
        assert_eq!(
            repo.find_pending_by_contact("fresh@example.com")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_disabled_janitor_is_a_noop() {
        let repo = Arc::new(MockBuyerRepository::new());
        repo.upsert_pending_code(
            Uuid::new_v4(),
            "Stale",
            &contact("stale@example.com"),
            "111111",
            Utc::now() - Duration::hours(2),
        )
        .await
        .unwrap();

        let janitor = Janitor::new(
            Arc::clone(&repo),
            JanitorConfig {
                enabled: false,
                ..Default::default()
            },
        );

        assert_eq!(janitor.run_cleanup().await.unwrap(), CleanupResult::default());
        assert_eq!(
            repo.find_pending_by_contact("stale@example.com")
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
