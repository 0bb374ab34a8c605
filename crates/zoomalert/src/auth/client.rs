//! OAuth grant-flow client
//!
//! Executes the credentialed HTTP calls against the authorization server:
//! - Authorization code exchange
//! - Refresh-token renewal
//! - Client-credentials (app token) requests
//!
//! All grants POST to the token endpoint with HTTP basic auth and a
//! form-encoded body, per the Zoom OAuth contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::traits::OAuthClientTrait;
use super::types::{AuthError, OAuthConfig, TokenResponse, TokenSet};

/// Bounded timeout for every token-endpoint request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which grant a token-endpoint call is performing; selects the rejection
/// error variant so callers can tell exchange failures from refresh failures.
#[derive(Debug, Clone, Copy)]
enum Grant {
    Exchange,
    Refresh,
    AppToken,
}

impl Grant {
    fn rejected(self, status: u16, body: String) -> AuthError {
        match self {
            Self::Exchange => AuthError::ExchangeRejected { status, body },
            Self::Refresh => AuthError::RefreshRejected { status, body },
            Self::AppToken => AuthError::AppTokenRejected { status, body },
        }
    }
}

/// HTTP client for the three OAuth grant flows.
///
/// Holds the immutable credentials and a pooled `reqwest` client; safe to
/// share across tasks.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Client,
}

impl OAuthClient {
    /// Create a new grant-flow client for the given credentials.
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, http }
    }

    /// Get a reference to the OAuth configuration.
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    fn ensure_credentials(&self) -> Result<(), AuthError> {
        if self.config.has_credentials() {
            Ok(())
        } else {
            Err(AuthError::Config("client credentials not configured".to_string()))
        }
    }

    /// POST a grant request and decode the token payload.
    ///
    /// Credentials are checked before any network I/O so a misconfigured
    /// client fails fast.
    async fn post_grant(&self, grant: Grant, form: &[(&str, &str)]) -> Result<TokenSet, AuthError> {
        self.ensure_credentials()?;

        let response = self
            .http
            .post(self.config.token_url())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(grant.rejected(status.as_u16(), body));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|err| AuthError::MalformedTokenResponse(err.to_string()))?;

        if parsed.access_token.is_empty() {
            return Err(AuthError::MalformedTokenResponse(
                "no access token received in response".to_string(),
            ));
        }

        Ok(parsed.into())
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("state", state),
        ];

        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.authorize_url(), query)
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        self.post_grant(Grant::Exchange, &form).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError> {
        let form = [("grant_type", "refresh_token"), ("refresh_token", refresh_token)];

        self.post_grant(Grant::Refresh, &form).await
    }

    async fn client_credentials(&self) -> Result<TokenSet, AuthError> {
        let form = [("grant_type", "client_credentials")];

        self.post_grant(Grant::AppToken, &form).await
    }
}
