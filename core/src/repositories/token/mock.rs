//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::{DomainResult, TokenError};

use super::r#trait::TokenRepository;

/// In-memory token repository for tests, keyed by lookup hash
#[derive(Default)]
pub struct MockTokenRepository {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, in any state
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no rows
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Force a stored record past its expiry (test helper)
    pub async fn force_expire(&self, lookup_hash: &str) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(lookup_hash) {
            record.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> DomainResult<RefreshTokenRecord> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.lookup_hash) {
            return Err(TokenError::DuplicateLookupHash.into());
        }

        records.insert(record.lookup_hash.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_lookup_hash(
        &self,
        lookup_hash: &str,
    ) -> DomainResult<Option<RefreshTokenRecord>> {
        let records = self.records.read().await;
        Ok(records.get(lookup_hash).cloned())
    }

    async fn revoke(
        &self,
        id: Uuid,
        revoked_by_ip: &str,
        replaced_by_lookup_hash: Option<&str>,
    ) -> DomainResult<bool> {
        let mut records = self.records.write().await;

        match records.values_mut().find(|r| r.id == id) {
            Some(record) => Ok(record.mark_revoked(
                revoked_by_ip,
                replaced_by_lookup_hash.map(str::to_string),
            )),
            None => Ok(false),
        }
    }

    async fn revoke_all_active(
        &self,
        user_id: Uuid,
        revoked_by_ip: &str,
    ) -> DomainResult<usize> {
        let mut records = self.records.write().await;
        let mut count = 0;

        for record in records.values_mut() {
            if record.user_id == user_id && record.is_active() {
                record.mark_revoked(revoked_by_ip, None);
                count += 1;
            }
        }

        Ok(count)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> DomainResult<Vec<RefreshTokenRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id && r.is_active())
            .cloned()
            .collect())
    }

    async fn delete_expired(&self) -> DomainResult<usize> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, record| !record.is_expired());

        Ok(initial_count - records.len())
    }
}
