//! Mock implementation of UserDirectory for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::UserAccount;
use crate::errors::DomainResult;

use super::r#trait::UserDirectory;

struct MockUserEntry {
    account: UserAccount,
    password: String,
    roles: Vec<String>,
}

/// In-memory user directory for tests
#[derive(Default)]
pub struct MockUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, MockUserEntry>>>,
}

impl MockUserDirectory {
    /// Create a new mock directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return the generated ID
    pub async fn add_user(
        &self,
        email: &str,
        password: &str,
        email_confirmed: bool,
        roles: Vec<String>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let entry = MockUserEntry {
            account: UserAccount::new(id, email, email_confirmed),
            password: password.to_string(),
            roles,
        };
        self.users.write().await.insert(id, entry);
        id
    }

    /// Replace a user's roles (simulates a permission change between
    /// token issuance and refresh)
    pub async fn set_roles(&self, id: Uuid, roles: Vec<String>) {
        if let Some(entry) = self.users.write().await.get_mut(&id) {
            entry.roles = roles;
        }
    }

    /// Remove a user entirely
    pub async fn remove_user(&self, id: Uuid) {
        self.users.write().await.remove(&id);
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<Uuid>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|e| e.account.email == email && e.password == password)
            .map(|e| e.account.id))
    }

    async fn load_user(&self, id: Uuid) -> DomainResult<Option<UserAccount>> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|e| e.account.clone()))
    }

    async fn load_roles(&self, id: Uuid) -> DomainResult<Vec<String>> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|e| e.roles.clone()).unwrap_or_default())
    }
}
