//! Zoom API client
//!
//! Outbound calls against the Zoom REST API:
//! - User lookup by email (user access token)
//! - Chat message posting via the chatbot endpoint (app token)
//!
//! The session manager supplies a valid bearer token for each call; this
//! client never inspects or mutates token state itself.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use super::message::{AlertLevel, ChatMessage, MessageContent};
use crate::auth::{AuthError, SessionManager};

/// Bounded timeout for every API request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_API_BASE_URL: &str = "https://api.zoom.us/v2";

/// Errors from the Zoom API client.
#[derive(Debug, Error)]
pub enum ZoomError {
    /// No Zoom user exists for the given email
    #[error("user with email {0} not found")]
    UserNotFound(String),

    /// Zoom API returned a non-success status
    #[error("Zoom API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// Token acquisition failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Transport-level failure
    #[error("Zoom API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected schema
    #[error("failed to decode Zoom API response: {0}")]
    Decode(String),
}

/// A Zoom user as returned by the user lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub jid: String,
}

/// Client for the Zoom REST API.
pub struct ZoomClient {
    http: Client,
    base_url: String,
    robot_jid: String,
    account_id: String,
    session: Arc<SessionManager>,
}

impl ZoomClient {
    /// Create a client posting as the given chatbot on the given account.
    #[must_use]
    pub fn new(session: Arc<SessionManager>, robot_jid: String, account_id: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { http, base_url: DEFAULT_API_BASE_URL.to_string(), robot_jid, account_id, session }
    }

    /// Override the API base URL.
    ///
    /// Used by tests to point the client at a local stub server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The session manager backing this client.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Whether user authorization is currently available.
    ///
    /// May refresh tokens as a side effect; see
    /// [`SessionManager::is_authorized`].
    pub async fn is_authorized(&self) -> bool {
        self.session.is_authorized().await
    }

    /// Look up a Zoom user by email.
    ///
    /// Requires user authorization; the lookup endpoint is not available to
    /// the client-credentials token.
    ///
    /// # Errors
    /// Returns `UserNotFound` for a 404, `Auth` if no user token is
    /// obtainable, or `Api` for other non-success statuses.
    pub async fn user_by_email(&self, email: &str) -> Result<ZoomUser, ZoomError> {
        let token = self.session.access_token().await?;
        let url = format!("{}/users/{}", self.base_url, email);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ZoomError::UserNotFound(email.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ZoomError::Api { status: status.as_u16(), body });
        }

        response.json::<ZoomUser>().await.map_err(|err| ZoomError::Decode(err.to_string()))
    }

    /// Send a plain text alert to a user identified by email.
    ///
    /// # Errors
    /// Returns error if the user lookup or the message post fails.
    pub async fn send_text(&self, email: &str, message: &str) -> Result<(), ZoomError> {
        self.send_content(email, MessageContent::text(message)).await
    }

    /// Send rich message content to a user identified by email.
    ///
    /// # Errors
    /// Returns error if the user lookup or the message post fails.
    pub async fn send_content(&self, email: &str, content: MessageContent) -> Result<(), ZoomError> {
        let user = self.user_by_email(email).await.map_err(|err| {
            error!(email = %email, error = %err, "user lookup failed");
            err
        })?;

        self.post_message(&ChatMessage {
            robot_jid: self.robot_jid.clone(),
            to_jid: user.jid,
            account_id: self.account_id.clone(),
            content,
        })
        .await
    }

    /// Send a severity-templated alert to a user identified by email.
    ///
    /// # Errors
    /// Returns error if the user lookup or the message post fails.
    pub async fn send_templated(
        &self,
        email: &str,
        heading: &str,
        body: &str,
        level: AlertLevel,
        closeable: bool,
    ) -> Result<(), ZoomError> {
        self.send_content(email, MessageContent::alert(heading, body, level, closeable)).await
    }

    /// POST a chat message through the chatbot endpoint using an app token.
    async fn post_message(&self, message: &ChatMessage) -> Result<(), ZoomError> {
        let token = self.session.app_access_token().await?;
        let url = format!("{}/im/chat/messages", self.base_url);

        let response = self.http.post(&url).bearer_auth(token).json(message).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        debug!(status = status.as_u16(), body = %body, "chat message response");

        if status == StatusCode::OK || status == StatusCode::CREATED {
            Ok(())
        } else {
            Err(ZoomError::Api { status: status.as_u16(), body })
        }
    }
}

impl std::fmt::Debug for ZoomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomClient")
            .field("base_url", &self.base_url)
            .field("robot_jid", &self.robot_jid)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for zoom::client.
    use super::*;

    /// Validates `ZoomUser` deserialization with partial payloads.
    ///
    /// Assertions:
    /// - Ensures absent fields default to empty strings instead of failing.
    #[test]
    fn test_zoom_user_partial_payload() {
        let user: ZoomUser =
            serde_json::from_str(r#"{"email":"ops@example.com","jid":"ops@xmpp.zoom.us"}"#)
                .expect("deserialize user");

        assert_eq!(user.email, "ops@example.com");
        assert_eq!(user.jid, "ops@xmpp.zoom.us");
        assert!(user.first_name.is_empty());
    }
}
