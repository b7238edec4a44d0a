//! Token entities for the session and refresh-token lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for the access-token JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Email address of the subject
    pub email: String,

    /// Role names granted to the subject at issuance time
    pub roles: Vec<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token
    pub fn new_access_token(
        user_id: Uuid,
        email: impl Into<String>,
        roles: Vec<String>,
        expiry_seconds: i64,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(expiry_seconds);

        Self {
            sub: user_id.to_string(),
            email: email.into(),
            roles,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Request metadata captured at the API boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    /// Client IP address the request originated from
    pub ip: String,

    /// Optional client-supplied device identifier
    pub device_id: Option<String>,
}

impl ClientMeta {
    /// Creates metadata with just an IP address
    pub fn from_ip(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            device_id: None,
        }
    }
}

/// Refresh token record persisted in the database
///
/// One row exists per issued refresh secret. The secret itself is never
/// stored: `lookup_hash` is a fast deterministic hash used purely as an
/// index, and `verifier_hash`/`verifier_salt` hold the slow salted
/// proof-of-possession hash. Once persisted, a record is immutable
/// except for the revocation fields, which are written exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the refresh token row
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// Fast deterministic hash of the secret (unique, indexed)
    pub lookup_hash: String,

    /// Slow salted hash proving possession of the secret
    pub verifier_hash: String,

    /// Salt used for the verifier hash
    pub verifier_salt: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// IP address the issuing request came from
    pub created_by_ip: String,

    /// Device identifier, carried across rotations
    pub device_id: Option<String>,

    /// Timestamp of revocation, if revoked
    pub revoked_at: Option<DateTime<Utc>>,

    /// IP address of the revoking request, if revoked
    pub revoked_by_ip: Option<String>,

    /// Lookup hash of the record created in the same rotation, if any
    pub replaced_by_lookup_hash: Option<String>,
}

impl RefreshTokenRecord {
    /// Creates a new refresh token record
    pub fn new(
        user_id: Uuid,
        lookup_hash: String,
        verifier_hash: String,
        verifier_salt: String,
        ttl_seconds: i64,
        created_by_ip: impl Into<String>,
        device_id: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            lookup_hash,
            verifier_hash,
            verifier_salt,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            created_by_ip: created_by_ip.into(),
            device_id,
            revoked_at: None,
            revoked_by_ip: None,
            replaced_by_lookup_hash: None,
        }
    }

    /// Checks if the record has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the record has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// A record is active iff it is neither revoked nor expired
    pub fn is_active(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }

    /// Writes the revocation fields
    ///
    /// Returns `false` without touching the record when it is already
    /// revoked; the fields are written at most once.
    pub fn mark_revoked(
        &mut self,
        revoked_by_ip: impl Into<String>,
        replaced_by_lookup_hash: Option<String>,
    ) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        self.revoked_at = Some(Utc::now());
        self.revoked_by_ip = Some(revoked_by_ip.into());
        self.replaced_by_lookup_hash = replaced_by_lookup_hash;
        true
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh secret
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ttl_seconds: i64) -> RefreshTokenRecord {
        RefreshTokenRecord::new(
            Uuid::new_v4(),
            "lookup".to_string(),
            "verifier".to_string(),
            "salt".to_string(),
            ttl_seconds,
            "10.0.0.1",
            None,
        )
    }

    #[test]
    fn test_access_token_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new_access_token(
            user_id,
            "reader@example.com",
            vec!["author".to_string()],
            900,
            "inkwell",
            "inkwell-api",
        );

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "reader@example.com");
        assert_eq!(claims.roles, vec!["author".to_string()]);
        assert_eq!(claims.iss, "inkwell");
        assert_eq!(claims.aud, "inkwell-api");
        assert!(!claims.is_expired());
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new_access_token(
            Uuid::new_v4(),
            "a@b.com",
            vec![],
            900,
            "inkwell",
            "inkwell-api",
        );
        claims.exp = Utc::now().timestamp() - 1;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_new_record_is_active() {
        let token = record(3600);
        assert!(!token.is_revoked());
        assert!(!token.is_expired());
        assert!(token.is_active());
        assert!(token.replaced_by_lookup_hash.is_none());
    }

    #[test]
    fn test_expired_record_is_not_active() {
        let mut token = record(3600);
        token.expires_at = Utc::now() - Duration::days(1);
        assert!(token.is_expired());
        assert!(!token.is_active());
    }

    #[test]
    fn test_revocation_fields_written_once() {
        let mut token = record(3600);

        assert!(token.mark_revoked("10.0.0.2", Some("next-hash".to_string())));
        assert!(token.is_revoked());
        assert!(!token.is_active());
        assert_eq!(token.revoked_by_ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(token.replaced_by_lookup_hash.as_deref(), Some("next-hash"));

        let first_revocation = token.revoked_at;
        assert!(!token.mark_revoked("10.0.0.3", None));
        assert_eq!(token.revoked_at, first_revocation);
        assert_eq!(token.revoked_by_ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(token.replaced_by_lookup_hash.as_deref(), Some("next-hash"));
    }

    #[test]
    fn test_revoked_but_unexpired_record_state() {
        let mut token = record(3600);
        token.mark_revoked("10.0.0.2", None);
        // The state replay detection keys on: revoked yet not expired.
        assert!(token.is_revoked());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 900, 604800);
        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: TokenPair = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, deserialized);
    }
}
