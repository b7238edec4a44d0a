//! MySQL implementation of the UserDirectory trait.
//!
//! The user store belongs to the wider platform; this subsystem reads
//! it through the three narrow operations the session lifecycle needs.
//! Passwords are verified with bcrypt against the stored hash.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use tracing::warn;
use uuid::Uuid;

use iw_core::domain::entities::user::UserAccount;
use iw_core::errors::{DomainError, DomainResult};
use iw_core::repositories::UserDirectory;

/// MySQL implementation of UserDirectory
pub struct MySqlUserDirectory {
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    /// Create a new MySQL user directory
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<Uuid>> {
        let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to look up user: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row
            .try_get("id")
            .map_err(|e| internal(format!("failed to get id: {e}")))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| internal(format!("failed to get password_hash: {e}")))?;

        match bcrypt::verify(password, &password_hash) {
            Ok(true) => {
                let user_id = Uuid::parse_str(&id)
                    .map_err(|e| internal(format!("invalid user UUID: {e}")))?;
                Ok(Some(user_id))
            }
            Ok(false) => Ok(None),
            Err(e) => {
                // A malformed stored hash is a data problem; fail the
                // login rather than the request.
                warn!(email, "stored password hash could not be verified: {e}");
                Ok(None)
            }
        }
    }

    async fn load_user(&self, id: Uuid) -> DomainResult<Option<UserAccount>> {
        let row = sqlx::query("SELECT id, email, email_confirmed FROM users WHERE id = ? LIMIT 1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to load user: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let email: String = row
            .try_get("email")
            .map_err(|e| internal(format!("failed to get email: {e}")))?;
        let email_confirmed: bool = row
            .try_get("email_confirmed")
            .map_err(|e| internal(format!("failed to get email_confirmed: {e}")))?;

        Ok(Some(UserAccount::new(id, email, email_confirmed)))
    }

    async fn load_roles(&self, id: Uuid) -> DomainResult<Vec<String>> {
        let rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = ? ORDER BY role")
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(format!("failed to load roles: {e}")))?;

        rows.iter()
            .map(|row| {
                row.try_get("role")
                    .map_err(|e| internal(format!("failed to get role: {e}")))
            })
            .collect()
    }
}

fn internal(message: String) -> DomainError {
    DomainError::Internal { message }
}
