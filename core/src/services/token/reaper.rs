//! Scheduled sweep removing expired refresh-token rows
//!
//! Rows are deleted only after their expiry has passed, so the sweep is
//! disjoint from the active-row predicate used by login and refresh and
//! runs safely under concurrent live traffic.

use std::sync::Arc;
use tracing::{error, info, warn};

use iw_shared::config::ReaperConfig;

use crate::errors::DomainResult;
use crate::repositories::TokenRepository;

/// Background service deleting expired refresh-token rows
pub struct ExpiredTokenReaper<R: TokenRepository + 'static> {
    repository: Arc<R>,
    config: ReaperConfig,
}

impl<R: TokenRepository> ExpiredTokenReaper<R> {
    /// Create a new reaper
    pub fn new(repository: Arc<R>, config: ReaperConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single sweep
    ///
    /// Idempotent: a second run immediately after the first deletes
    /// nothing.
    pub async fn run_once(&self) -> DomainResult<usize> {
        let deleted = self.repository.delete_expired().await?;
        if deleted > 0 {
            info!(deleted, "removed expired refresh tokens");
        }
        Ok(deleted)
    }

    /// Start the reaper as a background task
    ///
    /// A failed sweep is logged and the schedule continues at the next
    /// tick; it is never fatal to the process.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("expired-token reaper is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "expired-token reaper started"
            );

            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup is
            // not serialized behind a sweep.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                if let Err(e) = self.run_once().await {
                    error!("expired-token sweep failed: {e}");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::token::RefreshTokenRecord;
    use crate::repositories::MockTokenRepository;
    use uuid::Uuid;

    fn record(lookup_hash: &str) -> RefreshTokenRecord {
        RefreshTokenRecord::new(
            Uuid::new_v4(),
            lookup_hash.to_string(),
            "verifier".to_string(),
            "salt".to_string(),
            3600,
            "10.0.0.1",
            None,
        )
    }

    #[tokio::test]
    async fn sweep_deletes_only_expired_rows_and_is_idempotent() {
        let repo = Arc::new(MockTokenRepository::new());
        repo.insert(record("live")).await.unwrap();
        repo.insert(record("stale-1")).await.unwrap();
        repo.insert(record("stale-2")).await.unwrap();
        repo.force_expire("stale-1").await;
        repo.force_expire("stale-2").await;

        let reaper = ExpiredTokenReaper::new(repo.clone(), ReaperConfig::default());

        assert_eq!(reaper.run_once().await.unwrap(), 2);
        assert!(repo.find_by_lookup_hash("live").await.unwrap().is_some());
        assert_eq!(reaper.run_once().await.unwrap(), 0);
    }
}
