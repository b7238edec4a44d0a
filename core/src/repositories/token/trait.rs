//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainResult;

/// Repository trait for refresh-token persistence operations
///
/// Implementations must enforce uniqueness of `lookup_hash` and make
/// `revoke` a single conditional write so that two concurrent rotations
/// of the same secret have exactly one winner.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new refresh token record
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The persisted record
    /// * `Err(TokenError::DuplicateLookupHash)` - Lookup hash collision;
    ///   the caller regenerates the secret and retries once
    async fn insert(&self, record: RefreshTokenRecord) -> DomainResult<RefreshTokenRecord>;

    /// Find a record by its lookup hash, regardless of state
    ///
    /// Revoked and expired rows are returned too; the coordinator needs
    /// them to distinguish replay from absence.
    async fn find_by_lookup_hash(
        &self,
        lookup_hash: &str,
    ) -> DomainResult<Option<RefreshTokenRecord>>;

    /// Find an active record by its lookup hash
    ///
    /// A record is active iff it is neither revoked nor expired.
    async fn get_active(&self, lookup_hash: &str) -> DomainResult<Option<RefreshTokenRecord>> {
        Ok(self
            .find_by_lookup_hash(lookup_hash)
            .await?
            .filter(RefreshTokenRecord::is_active))
    }

    /// Revoke a record, writing the revocation fields exactly once
    ///
    /// # Returns
    /// * `Ok(true)` - The record was revoked by this call
    /// * `Ok(false)` - The record was already revoked or does not exist
    async fn revoke(
        &self,
        id: Uuid,
        revoked_by_ip: &str,
        replaced_by_lookup_hash: Option<&str>,
    ) -> DomainResult<bool>;

    /// Revoke every active record belonging to a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records revoked (zero is not an error)
    async fn revoke_all_active(&self, user_id: Uuid, revoked_by_ip: &str)
        -> DomainResult<usize>;

    /// Find all active records belonging to a user
    async fn find_active_by_user(&self, user_id: Uuid) -> DomainResult<Vec<RefreshTokenRecord>>;

    /// Delete rows whose expiry has passed
    ///
    /// Never touches active rows; its predicate is disjoint from the
    /// active-row predicate used by login and refresh.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of expired rows deleted
    async fn delete_expired(&self) -> DomainResult<usize>;
}
