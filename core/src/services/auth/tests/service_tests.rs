//! Behavioral tests for login, refresh rotation, replay handling, and
//! logout, running against the in-memory repositories.

use std::sync::Arc;

use iw_shared::config::JwtConfig;
use uuid::Uuid;

use crate::domain::entities::token::ClientMeta;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{MockTokenRepository, MockUserDirectory, TokenRepository};
use crate::services::auth::AuthService;
use crate::services::token::{hashing, TokenIssuer};

struct Harness {
    service: AuthService<MockUserDirectory, MockTokenRepository>,
    users: Arc<MockUserDirectory>,
    tokens: Arc<MockTokenRepository>,
    user_id: Uuid,
}

async fn harness() -> Harness {
    let users = Arc::new(MockUserDirectory::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let issuer = Arc::new(TokenIssuer::new(JwtConfig::new("test-secret")).unwrap());

    let user_id = users
        .add_user("a@b.com", "secret", true, vec!["author".to_string()])
        .await;

    Harness {
        service: AuthService::new(users.clone(), tokens.clone(), issuer),
        users,
        tokens,
        user_id,
    }
}

fn meta() -> ClientMeta {
    ClientMeta::from_ip("10.0.0.1")
}

#[tokio::test]
async fn login_returns_tokens_and_one_active_record() {
    let h = harness().await;

    let pair = h.service.login("a@b.com", "secret", &meta()).await.unwrap();

    assert!(!pair.access_token.is_empty());
    assert!(pair.refresh_token.len() >= 64);

    let active = h.tokens.find_active_by_user(h.user_id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].lookup_hash, hashing::lookup_hash(&pair.refresh_token));
    assert_eq!(active[0].created_by_ip, "10.0.0.1");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let h = harness().await;

    for (email, password) in [
        ("a@b.com", "wrong"),
        ("unknown@b.com", "secret"),
        ("not-an-email", "secret"),
    ] {
        let err = h.service.login(email, password, &meta()).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidCredentials)
        ));
    }

    assert!(h.tokens.is_empty().await);
}

#[tokio::test]
async fn login_requires_confirmed_email() {
    let h = harness().await;
    h.users
        .add_user("new@b.com", "secret", false, vec![])
        .await;

    let err = h
        .service
        .login("new@b.com", "secret", &meta())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::EmailNotConfirmed)
    ));
}

#[tokio::test]
async fn refresh_rotates_and_links_records() {
    let h = harness().await;

    let first = h.service.login("a@b.com", "secret", &meta()).await.unwrap();
    let second = h
        .service
        .refresh(&first.refresh_token, &meta())
        .await
        .unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);

    let old = h
        .tokens
        .find_by_lookup_hash(&hashing::lookup_hash(&first.refresh_token))
        .await
        .unwrap()
        .unwrap();
    let new_hash = hashing::lookup_hash(&second.refresh_token);

    assert!(old.is_revoked());
    assert_eq!(old.replaced_by_lookup_hash.as_deref(), Some(new_hash.as_str()));

    let active = h.tokens.find_active_by_user(h.user_id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].lookup_hash, new_hash);
}

#[tokio::test]
async fn refresh_reloads_roles_from_the_directory() {
    let h = harness().await;
    let issuer = TokenIssuer::new(JwtConfig::new("test-secret")).unwrap();

    let first = h.service.login("a@b.com", "secret", &meta()).await.unwrap();
    // Simulate a ban between issuance and refresh.
    h.users.set_roles(h.user_id, vec![]).await;

    let second = h
        .service
        .refresh(&first.refresh_token, &meta())
        .await
        .unwrap();
    let claims = issuer.decode_access_token(&second.access_token).unwrap();
    assert!(claims.roles.is_empty());
}

#[tokio::test]
async fn invalid_secrets_are_indistinguishable() {
    let h = harness().await;
    let pair = h.service.login("a@b.com", "secret", &meta()).await.unwrap();

    // Never issued.
    let never_issued = TokenIssuer::generate_refresh_secret();
    let err = h.service.refresh(&never_issued, &meta()).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidRefreshToken)
    ));

    // Expired.
    h.tokens
        .force_expire(&hashing::lookup_hash(&pair.refresh_token))
        .await;
    let err = h
        .service
        .refresh(&pair.refresh_token, &meta())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn replaying_a_rotated_secret_revokes_the_chain() {
    let h = harness().await;

    let first = h.service.login("a@b.com", "secret", &meta()).await.unwrap();
    let second = h
        .service
        .refresh(&first.refresh_token, &meta())
        .await
        .unwrap();

    // Present the consumed secret again: the whole lineage dies.
    let err = h
        .service
        .refresh(&first.refresh_token, &meta())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::ReplayDetected)));

    let descendant = h
        .tokens
        .find_by_lookup_hash(&hashing::lookup_hash(&second.refresh_token))
        .await
        .unwrap()
        .unwrap();
    assert!(descendant.is_revoked());
    assert!(h
        .tokens
        .find_active_by_user(h.user_id)
        .await
        .unwrap()
        .is_empty());

    // And the replayed secret stays dead.
    let err = h
        .service
        .refresh(&second.refresh_token, &meta())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::ReplayDetected)));
}

#[tokio::test]
async fn refresh_for_a_deleted_user_fails_closed() {
    let h = harness().await;
    let pair = h.service.login("a@b.com", "secret", &meta()).await.unwrap();

    h.users.remove_user(h.user_id).await;

    let err = h
        .service
        .refresh(&pair.refresh_token, &meta())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn device_id_precedence_prefers_client_metadata() {
    let h = harness().await;

    let login_meta = ClientMeta {
        ip: "10.0.0.1".to_string(),
        device_id: Some("laptop".to_string()),
    };
    let pair = h
        .service
        .login("a@b.com", "secret", &login_meta)
        .await
        .unwrap();

    // Rotation without a client-supplied device ID inherits the old one.
    let rotated = h.service.refresh(&pair.refresh_token, &meta()).await.unwrap();
    let active = h.tokens.find_active_by_user(h.user_id).await.unwrap();
    assert_eq!(active[0].device_id.as_deref(), Some("laptop"));

    // A client-supplied device ID wins over the inherited value.
    let phone_meta = ClientMeta {
        ip: "10.0.0.1".to_string(),
        device_id: Some("phone".to_string()),
    };
    h.service
        .refresh(&rotated.refresh_token, &phone_meta)
        .await
        .unwrap();
    let active = h.tokens.find_active_by_user(h.user_id).await.unwrap();
    assert_eq!(active[0].device_id.as_deref(), Some("phone"));
}

#[tokio::test]
async fn logout_revokes_everything_and_is_idempotent() {
    let h = harness().await;

    h.service.login("a@b.com", "secret", &meta()).await.unwrap();
    h.service.login("a@b.com", "secret", &meta()).await.unwrap();
    assert_eq!(h.tokens.find_active_by_user(h.user_id).await.unwrap().len(), 2);

    h.service.logout(h.user_id, &meta()).await.unwrap();
    assert!(h
        .tokens
        .find_active_by_user(h.user_id)
        .await
        .unwrap()
        .is_empty());

    // Nothing left to revoke; still reports success.
    h.service.logout(h.user_id, &meta()).await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_rotation_of_one_secret_has_one_winner() {
    let h = harness().await;
    let pair = h.service.login("a@b.com", "secret", &meta()).await.unwrap();

    let meta_a = meta();
    let meta_b = meta();
    let (a, b) = tokio::join!(
        h.service.refresh(&pair.refresh_token, &meta_a),
        h.service.refresh(&pair.refresh_token, &meta_b),
    );

    // The same secret never rotates twice.
    assert!(a.is_ok() != b.is_ok(), "exactly one rotation must win");
}
