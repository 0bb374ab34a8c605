//! Traits for OAuth grant flows and token persistence
//!
//! These traits enable dependency injection and testing by abstracting the
//! external collaborators of the session manager (the authorization server
//! and the durable token store).

use async_trait::async_trait;

use super::store::StoreError;
use super::types::{AuthError, TokenSet};

/// Trait for OAuth grant-flow operations.
///
/// Abstracts the credentialed HTTP calls against the authorization server so
/// the session manager can be exercised with scripted implementations.
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Build the authorization endpoint URL embedding the supplied state.
    ///
    /// Pure function; no side effects, no error conditions.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for tokens (`authorization_code` grant).
    ///
    /// # Errors
    /// Returns error if the server rejects the exchange or the response is
    /// malformed.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError>;

    /// Renew an access token (`refresh_token` grant).
    ///
    /// # Errors
    /// Returns error if the server rejects the refresh or the response is
    /// malformed.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError>;

    /// Obtain an application token (`client_credentials` grant).
    ///
    /// # Errors
    /// Returns error if the server rejects the request or the response is
    /// malformed.
    async fn client_credentials(&self) -> Result<TokenSet, AuthError>;
}

/// Trait for durable token-record storage.
///
/// One logical slot, overwritten in place; no history. Implementations must
/// tolerate concurrent saves (last write wins).
#[async_trait]
pub trait TokenStoreTrait: Send + Sync {
    /// Persist the token record.
    ///
    /// # Errors
    /// Returns error if the write fails; callers treat this as a durability
    /// degradation, not an operation failure.
    async fn save(&self, tokens: &TokenSet) -> Result<(), StoreError>;

    /// Load the persisted token record, if any.
    ///
    /// A missing record is `Ok(None)` (first run); an unreadable record is an
    /// error.
    ///
    /// # Errors
    /// Returns error if the record exists but cannot be read or decoded.
    async fn load(&self) -> Result<Option<TokenSet>, StoreError>;
}
