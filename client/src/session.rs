//! Session guard with single-flight token renewal
//!
//! The guard owns the current token pair. When a request is rejected
//! with 401, the caller asks the guard for a fresh access token and
//! passes along the version stamp of the token that just failed. The
//! guard serializes renewal behind a FIFO mutex: the first caller in
//! performs the refresh, and everyone queued behind it observes the
//! bumped version and reuses the new token instead of spending their
//! own (by then already-consumed) refresh secret.

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::transport::{RefreshTransport, SessionTokens};

#[derive(Debug, Default)]
struct TokenCell {
    tokens: Option<SessionTokens>,
    /// Bumped on every change to `tokens`, including clearing
    version: u64,
}

/// Guards the client's token pair and coordinates renewal
pub struct SessionGuard<T: RefreshTransport> {
    transport: T,
    cell: RwLock<TokenCell>,
    /// Renewal gate; tokio's Mutex wakes waiters in FIFO order
    refresh_gate: Mutex<()>,
}

impl<T: RefreshTransport> SessionGuard<T> {
    /// Create a guard with no session
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cell: RwLock::new(TokenCell::default()),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Install a token pair obtained from login
    pub async fn install(&self, tokens: SessionTokens) {
        let mut cell = self.cell.write().await;
        cell.tokens = Some(tokens);
        cell.version += 1;
    }

    /// Drop the session entirely
    pub async fn clear(&self) {
        let mut cell = self.cell.write().await;
        cell.tokens = None;
        cell.version += 1;
    }

    /// Current access token together with its version stamp
    ///
    /// The stamp must be handed back to [`fresh_access_token`] when the
    /// token is rejected, so the guard can tell a stale failure from a
    /// fresh one.
    ///
    /// [`fresh_access_token`]: SessionGuard::fresh_access_token
    pub async fn access_token(&self) -> Option<(String, u64)> {
        let cell = self.cell.read().await;
        cell.tokens
            .as_ref()
            .map(|t| (t.access_token.clone(), cell.version))
    }

    /// Whether a session is currently held
    pub async fn is_authenticated(&self) -> bool {
        self.cell.read().await.tokens.is_some()
    }

    /// Obtain an access token newer than `stale_version`
    ///
    /// Exactly one caller performs the network refresh; concurrent
    /// callers queue on the gate and reuse its result. Any refresh
    /// failure other than a network failure ends the session: the
    /// cell is cleared and every queued caller gets `SessionExpired`.
    /// Network failures propagate unchanged and leave the stored
    /// tokens intact.
    pub async fn fresh_access_token(&self, stale_version: u64) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;

        // A refresh that completed while this caller was queued already
        // produced a newer token (or tore the session down).
        {
            let cell = self.cell.read().await;
            if cell.version != stale_version {
                return match &cell.tokens {
                    Some(tokens) => Ok(tokens.access_token.clone()),
                    None => Err(ClientError::SessionExpired),
                };
            }
        }

        let refresh_secret = {
            let cell = self.cell.read().await;
            match &cell.tokens {
                Some(tokens) => tokens.refresh_token.clone(),
                None => return Err(ClientError::SessionExpired),
            }
        };

        debug!("renewing session tokens");
        match self.transport.refresh(&refresh_secret).await {
            Ok(new_tokens) => {
                let access = new_tokens.access_token.clone();
                let mut cell = self.cell.write().await;
                cell.tokens = Some(new_tokens);
                cell.version += 1;
                Ok(access)
            }
            Err(ClientError::Network(reason)) => Err(ClientError::Network(reason)),
            Err(other) => {
                // The refresh call reached the server and did not
                // produce a usable pair; the presented secret may have
                // been consumed, so holding on to the stored tokens
                // would send every future request into the same
                // failure. The session ends here.
                warn!("refresh failed ({other}), clearing session");
                let mut cell = self.cell.write().await;
                cell.tokens = None;
                cell.version += 1;
                Err(other)
            }
        }
    }
}
