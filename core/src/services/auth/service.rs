//! Main authentication service implementation

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use iw_shared::utils::is_valid_email;

use crate::domain::entities::token::{ClientMeta, RefreshTokenRecord, TokenPair};
use crate::domain::entities::user::UserAccount;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserDirectory};
use crate::services::token::{hashing, TokenIssuer};

/// Upper bound when walking a rotation chain during replay handling.
/// Chains grow by one per rotation; anything longer than this is a
/// corrupted store, not a legitimate lineage.
const MAX_CHAIN_WALK: usize = 64;

/// Coordinates Login / Refresh / Logout against the token store, the
/// token issuer, and the external user directory
pub struct AuthService<U, T>
where
    U: UserDirectory,
    T: TokenRepository,
{
    /// External user store, consumed through its narrow seam
    users: Arc<U>,
    /// Refresh token persistence
    tokens: Arc<T>,
    /// Access-token signing and refresh-secret generation
    issuer: Arc<TokenIssuer>,
}

impl<U, T> AuthService<U, T>
where
    U: UserDirectory,
    T: TokenRepository,
{
    /// Create a new authentication service
    pub fn new(users: Arc<U>, tokens: Arc<T>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            users,
            tokens,
            issuer,
        }
    }

    /// Authenticate a credential pair and issue a token pair
    ///
    /// Issuance is all-or-nothing: when the refresh record cannot be
    /// persisted, the freshly signed access token is discarded with the
    /// error so no session ever exists that the server cannot revoke.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        meta: &ClientMeta,
    ) -> DomainResult<TokenPair> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidCredentials.into());
        }

        let user_id = self
            .users
            .verify_credentials(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let user = self
            .users
            .load_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.email_confirmed {
            return Err(AuthError::EmailNotConfirmed.into());
        }

        let roles = self.users.load_roles(user.id).await?;
        let access_token = self
            .issuer
            .issue_access_token(user.id, &user.email, &roles)?;

        let (secret, _record) = self
            .persist_new_secret(user.id, None, meta)
            .await
            .map_err(|e| {
                warn!(user_id = %user.id, "login aborted, refresh token persistence failed: {e}");
                DomainError::Auth(AuthError::AuthenticationFailed)
            })?;

        info!(user_id = %user.id, "user logged in");
        Ok(self.token_pair(access_token, secret))
    }

    /// Exchange a refresh secret for a new token pair, rotating the
    /// secret
    ///
    /// Never-issued, expired, revoked-and-expired, and
    /// verifier-mismatch secrets all yield the same
    /// `InvalidRefreshToken`; a revoked-but-unexpired secret is treated
    /// as a replay and revokes the whole descendant chain.
    pub async fn refresh(
        &self,
        presented_secret: &str,
        meta: &ClientMeta,
    ) -> DomainResult<TokenPair> {
        let lookup = hashing::lookup_hash(presented_secret);

        let record = self
            .tokens
            .find_by_lookup_hash(&lookup)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        if record.is_revoked() {
            if !record.is_expired() {
                // The secret was already rotated once and is being
                // presented again: assume the lineage is compromised.
                let revoked = self.revoke_descendants(&record, meta).await?;
                warn!(
                    user_id = %record.user_id,
                    descendants_revoked = revoked,
                    "refresh token replay detected"
                );
                return Err(TokenError::ReplayDetected.into());
            }
            return Err(TokenError::InvalidRefreshToken.into());
        }

        if record.is_expired() {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        if !hashing::verify_secret(presented_secret, &record.verifier_salt, &record.verifier_hash)
        {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        // Reload identity and roles; permissions may have changed since
        // the old token was issued.
        let user = self
            .load_confirmed_user(record.user_id)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;
        let roles = self.users.load_roles(user.id).await?;

        let access_token = self
            .issuer
            .issue_access_token(user.id, &user.email, &roles)?;

        // Insert the replacement before revoking the consumed record:
        // a crash between the two writes leaves the old token usable
        // instead of locking the user out.
        let (secret, new_record) = self
            .persist_new_secret(user.id, record.device_id.clone(), meta)
            .await?;

        let rotated = self
            .tokens
            .revoke(record.id, &meta.ip, Some(&new_record.lookup_hash))
            .await?;

        if !rotated {
            // A concurrent refresh of the same secret won the rotation;
            // withdraw the record this call inserted.
            let _ = self.tokens.revoke(new_record.id, &meta.ip, None).await;
            return Err(TokenError::InvalidRefreshToken.into());
        }

        Ok(self.token_pair(access_token, secret))
    }

    /// Revoke every active refresh token belonging to a user
    ///
    /// Always succeeds, including when nothing was active.
    pub async fn logout(&self, user_id: Uuid, meta: &ClientMeta) -> DomainResult<()> {
        let revoked = self.tokens.revoke_all_active(user_id, &meta.ip).await?;
        info!(%user_id, revoked, "user logged out");
        Ok(())
    }

    /// Generate a secret, hash it both ways, and persist the record
    ///
    /// Retries exactly once on a lookup-hash collision (an
    /// astronomically rare CSPRNG event). The client-supplied device ID
    /// wins; the rotated record's value is inherited only when the
    /// client omits one.
    async fn persist_new_secret(
        &self,
        user_id: Uuid,
        inherited_device_id: Option<String>,
        meta: &ClientMeta,
    ) -> DomainResult<(String, RefreshTokenRecord)> {
        let device_id = meta.device_id.clone().or(inherited_device_id);

        let mut attempts = 0;
        loop {
            let secret = TokenIssuer::generate_refresh_secret();
            let salt = hashing::generate_salt();
            let verifier = hashing::derive_verifier(&secret, &salt)?;

            let record = RefreshTokenRecord::new(
                user_id,
                hashing::lookup_hash(&secret),
                verifier,
                salt,
                self.issuer.refresh_token_expiry(),
                meta.ip.clone(),
                device_id.clone(),
            );

            match self.tokens.insert(record).await {
                Ok(stored) => return Ok((secret, stored)),
                Err(DomainError::Token(TokenError::DuplicateLookupHash)) if attempts == 0 => {
                    warn!(%user_id, "refresh secret lookup-hash collision, regenerating");
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Walk the rotation chain forward and revoke every descendant
    async fn revoke_descendants(
        &self,
        record: &RefreshTokenRecord,
        meta: &ClientMeta,
    ) -> DomainResult<usize> {
        let mut revoked = 0;
        let mut next = record.replaced_by_lookup_hash.clone();
        let mut hops = 0;

        while let Some(hash) = next {
            if hops >= MAX_CHAIN_WALK {
                warn!(user_id = %record.user_id, "rotation chain walk aborted at bound");
                break;
            }
            hops += 1;

            match self.tokens.find_by_lookup_hash(&hash).await? {
                Some(descendant) => {
                    next = descendant.replaced_by_lookup_hash.clone();
                    if self.tokens.revoke(descendant.id, &meta.ip, None).await? {
                        revoked += 1;
                    }
                }
                None => break,
            }
        }

        Ok(revoked)
    }

    async fn load_confirmed_user(&self, user_id: Uuid) -> DomainResult<Option<UserAccount>> {
        Ok(self
            .users
            .load_user(user_id)
            .await?
            .filter(|u| u.email_confirmed))
    }

    fn token_pair(&self, access_token: String, refresh_secret: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_secret,
            self.issuer.access_token_expiry(),
            self.issuer.refresh_token_expiry(),
        )
    }
}
