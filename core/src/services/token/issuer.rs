//! Access-token issuance and refresh-secret generation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use uuid::Uuid;

use iw_shared::config::JwtConfig;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, DomainResult, TokenError};

/// Byte length of a generated refresh secret (256 bits of entropy)
const REFRESH_SECRET_BYTES: usize = 32;

/// Issues signed access tokens and random opaque refresh secrets
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Creates a new token issuer
    ///
    /// Fails only when the signing key is unusable; this is a
    /// startup-level error, not a per-request condition.
    pub fn new(config: JwtConfig) -> DomainResult<Self> {
        if config.secret.is_empty() {
            return Err(DomainError::Internal {
                message: "JWT signing secret is not configured".to_string(),
            });
        }
        if config.is_using_default_secret() {
            tracing::warn!("JWT signing secret is the build-time default; change it in production");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Issues a signed access token carrying identity and roles
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        roles: &[String],
    ) -> DomainResult<String> {
        let claims = Claims::new_access_token(
            user_id,
            email,
            roles.to_vec(),
            self.config.access_token_expiry,
            &self.config.issuer,
            &self.config.audience,
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed.into())
    }

    /// Decodes and validates an access token
    pub fn decode_access_token(&self, token: &str) -> DomainResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                    DomainError::Token(TokenError::TokenExpired)
                } else {
                    DomainError::Token(TokenError::InvalidTokenFormat)
                }
            })?;

        Ok(token_data.claims)
    }

    /// Generates an opaque refresh secret from a CSPRNG
    ///
    /// 32 random bytes, hex encoded. The secret is returned to the
    /// client verbatim and never stored; only its hashes are persisted.
    pub fn generate_refresh_secret() -> String {
        let mut bytes = [0u8; REFRESH_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry(&self) -> i64 {
        self.config.access_token_expiry
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry(&self) -> i64 {
        self.config.refresh_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(JwtConfig::new("test-secret")).unwrap()
    }

    #[test]
    fn rejects_empty_secret() {
        let config = JwtConfig::new("");
        assert!(TokenIssuer::new(config).is_err());
    }

    #[test]
    fn issued_token_round_trips() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let roles = vec!["author".to_string(), "moderator".to_string()];

        let token = issuer
            .issue_access_token(user_id, "a@b.com", &roles)
            .unwrap();
        assert!(!token.is_empty());

        let claims = issuer.decode_access_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_access_token(Uuid::new_v4(), "a@b.com", &[])
            .unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(issuer.decode_access_token(&tampered).is_err());

        let other = TokenIssuer::new(JwtConfig::new("different-secret")).unwrap();
        assert!(other.decode_access_token(&token).is_err());
    }

    #[test]
    fn refresh_secret_is_long_and_unique() {
        let a = TokenIssuer::generate_refresh_secret();
        let b = TokenIssuer::generate_refresh_secret();

        // 32 bytes hex encoded
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
