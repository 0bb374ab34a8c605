//! OAuth types and structures
//!
//! Defines the credential configuration, the cached token record, and the
//! token-endpoint response payload shared by the session manager and the
//! grant flows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Safety margin subtracted from the server-reported token lifetime.
///
/// Covers clock skew and in-flight request latency so a token that looks
/// valid locally is still accepted upstream.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth application credentials and endpoints.
///
/// Immutable after construction; shared read-only by every token operation.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID issued by the Zoom marketplace app
    pub client_id: String,

    /// OAuth client secret paired with the client ID
    pub client_secret: String,

    /// Redirect URI registered for the authorization-code flow
    pub redirect_uri: String,

    /// Authorization server base URL (overridable for tests)
    pub base_url: String,
}

impl OAuthConfig {
    /// Create a configuration pointing at the production authorization server.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self { client_id, client_secret, redirect_uri, base_url: "https://zoom.us".to_string() }
    }

    /// Override the authorization server base URL.
    ///
    /// Used by tests to point the grant flows at a local stub server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The authorize endpoint users are redirected to.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!("{}/oauth/authorize", self.base_url)
    }

    /// The token endpoint all grant types POST to.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    /// Whether both halves of the client credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Cached OAuth token record.
///
/// One record per session manager, superseded in place on every successful
/// exchange or refresh. Also the serialized projection written to the token
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token for API authentication
    pub access_token: String,

    /// Refresh token for renewing the access token without user interaction.
    /// Optional because not all flows issue one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiration instant (UTC), margin already applied
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// Create a record from a server-reported lifetime in seconds.
    ///
    /// The expiry instant is `now + expires_in - EXPIRY_MARGIN_SECS`.
    #[must_use]
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        let expires_at = Utc::now() + Duration::seconds(expires_in - EXPIRY_MARGIN_SECS);
        Self { access_token, refresh_token, expires_at }
    }

    /// Whether the access token has passed its (margin-adjusted) expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Seconds until the access token expires (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

/// Token response from the authorization server (RFC 6749 §5.1).
///
/// Deserialized from the `/oauth/token` endpoint for all three grant types.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.refresh_token, response.expires_in)
    }
}

/// Errors surfaced by the OAuth session core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Secure random generation failed; fatal to the issuance call only
    #[error("secure random source failed: {0}")]
    Randomness(String),

    /// CSRF state was empty, unknown, or past its validity window
    #[error("invalid or expired state parameter")]
    StateMissingOrExpired,

    /// Caller supplied an empty authorization code
    #[error("authorization code is required")]
    MissingAuthorizationCode,

    /// Authorization server rejected the code exchange
    #[error("code exchange failed with status {status}: {body}")]
    ExchangeRejected { status: u16, body: String },

    /// Authorization server rejected the refresh grant
    #[error("token refresh failed with status {status}: {body}")]
    RefreshRejected { status: u16, body: String },

    /// Authorization server rejected the client-credentials grant
    #[error("app token request failed with status {status}: {body}")]
    AppTokenRejected { status: u16, body: String },

    /// Response parsed but lacked an access token, or did not parse at all
    #[error("malformed token response: {0}")]
    MalformedTokenResponse(String),

    /// No usable token and no refresh path; restart the interactive flow
    #[error("no valid access token available, authorization required")]
    AuthorizationRequired,

    /// Client credentials absent or otherwise unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to the authorization server
    #[error("token endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),
}
