//! User account view consumed from the external user store
//!
//! Credential storage and role management live outside this subsystem;
//! the coordinator only ever sees this narrow projection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Projection of a user account as exposed by the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique user identifier
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Whether the email address has been confirmed
    pub email_confirmed: bool,
}

impl UserAccount {
    /// Creates a new user account projection
    pub fn new(id: Uuid, email: impl Into<String>, email_confirmed: bool) -> Self {
        Self {
            id,
            email: email.into(),
            email_confirmed,
        }
    }
}
