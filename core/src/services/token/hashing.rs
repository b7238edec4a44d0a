//! Two-phase hashing of refresh secrets
//!
//! A fast deterministic hash (`lookup_hash`) serves purely as the
//! storage index; the slow salted verifier hash proves possession of
//! the actual secret. Lookup-hash equality is never treated as
//! authentication on its own.

use argon2::Argon2;
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::{DomainError, DomainResult};

/// Byte length of a verifier salt
const SALT_BYTES: usize = 16;

/// Byte length of the derived verifier hash
const VERIFIER_BYTES: usize = 32;

/// Fast deterministic hash of a refresh secret, used as the row index
pub fn lookup_hash(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generates a random verifier salt, hex encoded
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Derives the slow verifier hash for a secret and salt (Argon2id)
pub fn derive_verifier(secret: &str, salt: &str) -> DomainResult<String> {
    let salt_bytes = hex::decode(salt).map_err(|_| DomainError::Internal {
        message: "verifier salt is not valid hex".to_string(),
    })?;

    let mut output = [0u8; VERIFIER_BYTES];
    Argon2::default()
        .hash_password_into(secret.as_bytes(), &salt_bytes, &mut output)
        .map_err(|e| DomainError::Internal {
            message: format!("verifier derivation failed: {e}"),
        })?;

    Ok(hex::encode(output))
}

/// Verifies a presented secret against a stored salt and verifier hash
///
/// Comparison is constant time; any decoding or derivation failure
/// counts as a mismatch.
pub fn verify_secret(secret: &str, salt: &str, verifier_hash: &str) -> bool {
    let Ok(expected) = hex::decode(verifier_hash) else {
        return false;
    };
    let Ok(derived_hex) = derive_verifier(secret, salt) else {
        return false;
    };
    let Ok(derived) = hex::decode(derived_hex) else {
        return false;
    };

    constant_time_eq(&derived, &expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hash_is_deterministic() {
        assert_eq!(lookup_hash("secret"), lookup_hash("secret"));
        assert_ne!(lookup_hash("secret"), lookup_hash("secret2"));
        assert_eq!(lookup_hash("secret").len(), 64);
    }

    #[test]
    fn verifier_accepts_the_right_secret_only() {
        let salt = generate_salt();
        let verifier = derive_verifier("the-secret", &salt).unwrap();

        assert!(verify_secret("the-secret", &salt, &verifier));
        assert!(!verify_secret("other-secret", &salt, &verifier));
    }

    #[test]
    fn verifier_depends_on_salt() {
        let salt_a = generate_salt();
        let salt_b = generate_salt();
        assert_ne!(salt_a, salt_b);

        let verifier = derive_verifier("the-secret", &salt_a).unwrap();
        assert!(!verify_secret("the-secret", &salt_b, &verifier));
    }

    #[test]
    fn malformed_stored_values_never_verify() {
        let salt = generate_salt();
        assert!(!verify_secret("s", &salt, "not-hex"));
        assert!(!verify_secret("s", "not-hex", "abcdef"));
    }
}
