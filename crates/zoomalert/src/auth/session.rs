//! OAuth session manager
//!
//! Owns the token lifecycle and the CSRF state table for one
//! application/account pair:
//! - Cached access-token fast path, lazy refresh on expiry
//! - Single-use state issuance and validation
//! - Durable persistence after every successful exchange or refresh
//!
//! Safe for concurrent use; see the lock notes on the individual methods.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::OAuthClient;
use super::state::StateStore;
use super::traits::{OAuthClientTrait, TokenStoreTrait};
use super::types::{AuthError, OAuthConfig, TokenSet};

/// Manages OAuth tokens and CSRF state for exactly one application/account
/// pair.
///
/// Construct one instance per account and share it by `Arc`; there is no
/// ambient singleton. The token record is guarded by an async lock that is
/// never held across network I/O: the refresh token is copied out before the
/// renewal call. Concurrent callers may therefore both observe an expired
/// token and both refresh; each result is independently valid.
pub struct SessionManager {
    client: Arc<dyn OAuthClientTrait>,
    store: Arc<dyn TokenStoreTrait>,
    tokens: RwLock<Option<TokenSet>>,
    states: StateStore,
}

impl SessionManager {
    /// Create a session manager talking to the real authorization server.
    #[must_use]
    pub fn new(config: OAuthConfig, store: Arc<dyn TokenStoreTrait>) -> Self {
        Self::with_client(Arc::new(OAuthClient::new(config)), store)
    }

    /// Create a session manager with an injected grant-flow client.
    ///
    /// Tests use this to script grant results without a network.
    #[must_use]
    pub fn with_client(client: Arc<dyn OAuthClientTrait>, store: Arc<dyn TokenStoreTrait>) -> Self {
        Self { client, store, tokens: RwLock::new(None), states: StateStore::new() }
    }

    /// Load the persisted token record, if one exists.
    ///
    /// Should be called once at startup. A missing record is a normal first
    /// run; an unreadable record is logged and treated the same way, so
    /// construction never fails because of persistence and a fresh OAuth flow
    /// can always begin.
    ///
    /// # Returns
    /// `true` if a persisted record was loaded.
    pub async fn initialize(&self) -> bool {
        match self.store.load().await {
            Ok(Some(tokens)) => {
                *self.tokens.write().await = Some(tokens);
                info!("session initialized with persisted tokens");
                true
            }
            Ok(None) => {
                debug!("no persisted tokens found");
                false
            }
            Err(err) => {
                warn!(error = %err, "failed to load persisted tokens, starting unauthorized");
                false
            }
        }
    }

    /// Build the authorization endpoint URL embedding the supplied state.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        self.client.authorization_url(state)
    }

    /// Issue a new single-use CSRF state token.
    ///
    /// # Errors
    /// Returns `AuthError::Randomness` if the secure random source fails.
    pub fn issue_state(&self) -> Result<String, AuthError> {
        self.states.issue()
    }

    /// Validate and consume a CSRF state token from a callback.
    ///
    /// Each issued token authorizes exactly one callback; success and failure
    /// both remove a matching entry.
    ///
    /// # Errors
    /// Returns `AuthError::StateMissingOrExpired` if the token is empty,
    /// unknown, or expired.
    pub fn validate_state(&self, state: &str) -> Result<(), AuthError> {
        self.states.validate_and_consume(state)
    }

    /// Exchange an authorization code for tokens and cache them.
    ///
    /// On success the in-memory record is overwritten and persisted; a
    /// persistence failure is logged but does not fail the exchange.
    ///
    /// # Errors
    /// Returns `MissingAuthorizationCode` for an empty code,
    /// `ExchangeRejected` if the server refuses, or
    /// `MalformedTokenResponse` if the payload is unusable.
    pub async fn exchange_code(&self, code: &str) -> Result<(), AuthError> {
        if code.is_empty() {
            return Err(AuthError::MissingAuthorizationCode);
        }

        let tokens = self.client.exchange_code(code).await?;
        info!("authorization code exchanged for tokens");
        self.install(tokens).await;

        Ok(())
    }

    /// Return a currently valid user access token.
    ///
    /// The cached token is returned without network I/O while unexpired (the
    /// common path). An expired token with a refresh token triggers a
    /// transparent renewal that updates and persists the record exactly as an
    /// exchange does, preserving the prior refresh token if the server omits
    /// a new one.
    ///
    /// # Errors
    /// Returns `AuthorizationRequired` when no usable token and no refresh
    /// path exist, or the refresh errors.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let refresh_token = {
            let tokens = self.tokens.read().await;
            match tokens.as_ref() {
                Some(current) if !current.is_expired() => {
                    return Ok(current.access_token.clone());
                }
                Some(current) => match current.refresh_token.clone() {
                    Some(refresh_token) => refresh_token,
                    None => return Err(AuthError::AuthorizationRequired),
                },
                None => return Err(AuthError::AuthorizationRequired),
            }
        };

        // Lock released; the renewal call runs without it.
        let mut renewed = self.client.refresh(&refresh_token).await?;
        if renewed.refresh_token.is_none() {
            renewed.refresh_token = Some(refresh_token);
        }

        let access_token = renewed.access_token.clone();
        info!("access token refreshed");
        self.install(renewed).await;

        Ok(access_token)
    }

    /// Obtain an application (client-credentials) token.
    ///
    /// Independent of the user-token lifecycle and uncached: every call is a
    /// live round trip to the authorization server.
    ///
    /// # Errors
    /// Returns `AppTokenRejected` if the server refuses or `Config` if the
    /// client credentials are absent.
    pub async fn app_access_token(&self) -> Result<String, AuthError> {
        let tokens = self.client.client_credentials().await?;
        Ok(tokens.access_token)
    }

    /// Whether a user access token is currently obtainable.
    ///
    /// Implemented by attempting the retrieval and discarding the result, so
    /// checking authorization may refresh and persist tokens as a side
    /// effect.
    pub async fn is_authorized(&self) -> bool {
        self.access_token().await.is_ok()
    }

    /// Snapshot of the current token record, if any.
    pub async fn current_tokens(&self) -> Option<TokenSet> {
        self.tokens.read().await.clone()
    }

    /// Persist and cache a fresh token record.
    ///
    /// Persistence is best-effort: the in-memory record stays authoritative
    /// when the save fails.
    async fn install(&self, tokens: TokenSet) {
        if let Err(err) = self.store.save(&tokens).await {
            warn!(error = %err, "failed to persist tokens; keeping in-memory record");
        }

        *self.tokens.write().await = Some(tokens);
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").field("states", &self.states).finish_non_exhaustive()
    }
}
