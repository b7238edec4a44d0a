//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh token rows live in the `refresh_tokens` table with a unique
//! index on `lookup_hash`. Revocation is a single conditional UPDATE
//! guarded on `revoked_at IS NULL`, so two concurrent rotations of the
//! same secret have exactly one winner at the database level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use iw_core::domain::entities::token::RefreshTokenRecord;
use iw_core::errors::{DomainError, DomainResult, TokenError};
use iw_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> DomainResult<RefreshTokenRecord> {
        let id: String = row
            .try_get("id")
            .map_err(|e| internal(format!("failed to get id: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| internal(format!("failed to get user_id: {e}")))?;

        Ok(RefreshTokenRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| internal(format!("invalid token UUID: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| internal(format!("invalid user UUID: {e}")))?,
            lookup_hash: row
                .try_get("lookup_hash")
                .map_err(|e| internal(format!("failed to get lookup_hash: {e}")))?,
            verifier_hash: row
                .try_get("verifier_hash")
                .map_err(|e| internal(format!("failed to get verifier_hash: {e}")))?,
            verifier_salt: row
                .try_get("verifier_salt")
                .map_err(|e| internal(format!("failed to get verifier_salt: {e}")))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| internal(format!("failed to get created_at: {e}")))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| internal(format!("failed to get expires_at: {e}")))?,
            created_by_ip: row
                .try_get("created_by_ip")
                .map_err(|e| internal(format!("failed to get created_by_ip: {e}")))?,
            device_id: row
                .try_get("device_id")
                .map_err(|e| internal(format!("failed to get device_id: {e}")))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| internal(format!("failed to get revoked_at: {e}")))?,
            revoked_by_ip: row
                .try_get("revoked_by_ip")
                .map_err(|e| internal(format!("failed to get revoked_by_ip: {e}")))?,
            replaced_by_lookup_hash: row
                .try_get("replaced_by_lookup_hash")
                .map_err(|e| internal(format!("failed to get replaced_by_lookup_hash: {e}")))?,
        })
    }
}

const RECORD_COLUMNS: &str = "id, user_id, lookup_hash, verifier_hash, verifier_salt, \
     created_at, expires_at, created_by_ip, device_id, \
     revoked_at, revoked_by_ip, replaced_by_lookup_hash";

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> DomainResult<RefreshTokenRecord> {
        let query = format!(
            "INSERT INTO refresh_tokens ({RECORD_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );

        let result = sqlx::query(&query)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.lookup_hash)
            .bind(&record.verifier_hash)
            .bind(&record.verifier_salt)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(&record.created_by_ip)
            .bind(&record.device_id)
            .bind(record.revoked_at)
            .bind(&record.revoked_by_ip)
            .bind(&record.replaced_by_lookup_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(TokenError::DuplicateLookupHash.into())
            }
            Err(e) => Err(internal(format!("failed to insert refresh token: {e}"))),
        }
    }

    async fn find_by_lookup_hash(
        &self,
        lookup_hash: &str,
    ) -> DomainResult<Option<RefreshTokenRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM refresh_tokens WHERE lookup_hash = ? LIMIT 1"
        );

        let row = sqlx::query(&query)
            .bind(lookup_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to find refresh token: {e}")))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke(
        &self,
        id: Uuid,
        revoked_by_ip: &str,
        replaced_by_lookup_hash: Option<&str>,
    ) -> DomainResult<bool> {
        // Guarded on `revoked_at IS NULL`: the revocation fields are
        // written at most once and the rotation race has one winner.
        let query = "UPDATE refresh_tokens \
             SET revoked_at = ?, revoked_by_ip = ?, replaced_by_lookup_hash = ? \
             WHERE id = ? AND revoked_at IS NULL";

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(revoked_by_ip)
            .bind(replaced_by_lookup_hash)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to revoke refresh token: {e}")))?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke_all_active(
        &self,
        user_id: Uuid,
        revoked_by_ip: &str,
    ) -> DomainResult<usize> {
        let query = "UPDATE refresh_tokens \
             SET revoked_at = ?, revoked_by_ip = ? \
             WHERE user_id = ? AND revoked_at IS NULL AND expires_at > ?";

        let now = Utc::now();
        let result = sqlx::query(query)
            .bind(now)
            .bind(revoked_by_ip)
            .bind(user_id.to_string())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to revoke user tokens: {e}")))?;

        Ok(result.rows_affected() as usize)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> DomainResult<Vec<RefreshTokenRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM refresh_tokens \
             WHERE user_id = ? AND revoked_at IS NULL AND expires_at > ? \
             ORDER BY created_at DESC"
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to find user tokens: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn delete_expired(&self) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to delete expired tokens: {e}")))?;

        Ok(result.rows_affected() as usize)
    }
}

fn internal(message: String) -> DomainError {
    DomainError::Internal { message }
}
