//! User directory trait: the narrow seam to the external user store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::UserAccount;
use crate::errors::DomainResult;

/// Narrow interface to the external user store
///
/// Credential storage, password verification, and role management are
/// external collaborators; the session subsystem consumes only these
/// three operations.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Verify a credential pair
    ///
    /// # Returns
    /// * `Ok(Some(user_id))` - Credentials are valid
    /// * `Ok(None)` - Unknown email or wrong password
    async fn verify_credentials(&self, email: &str, password: &str)
        -> DomainResult<Option<Uuid>>;

    /// Load a user account projection by ID
    async fn load_user(&self, id: Uuid) -> DomainResult<Option<UserAccount>>;

    /// Load the current role names for a user
    ///
    /// Always consulted fresh at token issuance; roles cached in an old
    /// token are never reused.
    async fn load_roles(&self, id: Uuid) -> DomainResult<Vec<String>>;
}
