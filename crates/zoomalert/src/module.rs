//! Service facade
//!
//! `ZoomAlertModule` wires configuration, the OAuth session manager, and the
//! Zoom client into one handle that host applications embed: send alerts,
//! drive the authorization flow, mount the HTTP routes, or run the built-in
//! server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::{AuthError, FileTokenStore, OAuthConfig, SessionManager};
use crate::config::{Config, ConfigError};
use crate::http;
use crate::zoom::{AlertLevel, MessageContent, ZoomClient, ZoomError};

/// Errors surfaced by the module facade.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required call argument was empty
    #[error("{0} is required")]
    MissingArgument(&'static str),

    /// No user authorization is available; complete the OAuth flow first
    #[error("user authorization required")]
    Unauthorized,

    /// OAuth session operation failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Zoom API operation failed
    #[error(transparent)]
    Zoom(#[from] ZoomError),

    /// Server socket operation failed
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// One embeddable alert-service instance.
///
/// Owns a session manager (one application/account pair) and a Zoom client
/// sharing it. Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct ZoomAlertModule {
    config: Config,
    session: Arc<SessionManager>,
    zoom: ZoomClient,
}

impl ZoomAlertModule {
    /// Build a module from validated configuration.
    ///
    /// Loads any persisted token record; an unreadable record is logged and
    /// ignored so construction only fails on invalid configuration.
    ///
    /// # Errors
    /// Returns `ModuleError::Config` if required fields are missing.
    pub async fn new(config: Config) -> Result<Self, ModuleError> {
        config.validate()?;

        let oauth = OAuthConfig::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri.clone(),
        )
        .with_base_url(config.oauth_base_url.clone());

        let store = Arc::new(FileTokenStore::new(&config.token_file_path));
        let session = Arc::new(SessionManager::new(oauth, store));
        session.initialize().await;

        let zoom =
            ZoomClient::new(session.clone(), config.robot_jid.clone(), config.account_id.clone())
                .with_base_url(config.api_base_url.clone());

        Ok(Self { config, session, zoom })
    }

    /// Send a plain text alert to a user identified by email.
    ///
    /// # Errors
    /// Returns `MissingArgument` for empty inputs, `Unauthorized` when no
    /// user token is available, or the underlying Zoom/auth error.
    pub async fn send_alert(&self, email: &str, message: &str) -> Result<(), ModuleError> {
        if email.is_empty() {
            return Err(ModuleError::MissingArgument("email"));
        }
        if message.is_empty() {
            return Err(ModuleError::MissingArgument("message"));
        }

        info!(email = %email, "sending alert");

        if !self.zoom.is_authorized().await {
            return Err(ModuleError::Unauthorized);
        }

        self.zoom.send_text(email, message).await.map_err(Into::into)
    }

    /// Send rich message content to a user identified by email.
    ///
    /// # Errors
    /// Same failure modes as [`Self::send_alert`].
    pub async fn send_rich_alert(
        &self,
        email: &str,
        content: MessageContent,
    ) -> Result<(), ModuleError> {
        if email.is_empty() {
            return Err(ModuleError::MissingArgument("email"));
        }

        if !self.zoom.is_authorized().await {
            return Err(ModuleError::Unauthorized);
        }

        self.zoom.send_content(email, content).await.map_err(Into::into)
    }

    /// Send a severity-templated alert to a user identified by email.
    ///
    /// # Errors
    /// Same failure modes as [`Self::send_alert`].
    pub async fn send_templated_alert(
        &self,
        email: &str,
        heading: &str,
        body: &str,
        level: AlertLevel,
        closeable: bool,
    ) -> Result<(), ModuleError> {
        self.send_rich_alert(email, MessageContent::alert(heading, body, level, closeable)).await
    }

    /// Begin an authorization round trip.
    ///
    /// Issues a fresh CSRF state and returns the authorization URL embedding
    /// it, along with the state itself for callers that surface both.
    ///
    /// # Errors
    /// Returns error if the secure random source fails.
    pub fn authorization_url(&self) -> Result<(String, String), AuthError> {
        let state = self.session.issue_state()?;
        let url = self.session.authorization_url(&state);
        Ok((url, state))
    }

    /// Complete an authorization round trip from callback parameters.
    ///
    /// Validates-and-consumes the state, then exchanges the code.
    ///
    /// # Errors
    /// Returns error if the state is invalid or the exchange fails.
    pub async fn handle_oauth_callback(&self, code: &str, state: &str) -> Result<(), AuthError> {
        self.session.validate_state(state)?;
        self.session.exchange_code(code).await
    }

    /// Whether user authorization is currently available.
    pub async fn is_authorized(&self) -> bool {
        self.session.is_authorized().await
    }

    /// The session manager, for advanced callers.
    #[must_use]
    pub fn session(&self) -> Arc<SessionManager> {
        self.session.clone()
    }

    /// The Zoom client, for advanced callers.
    #[must_use]
    pub fn zoom(&self) -> &ZoomClient {
        &self.zoom
    }

    /// The configuration this module was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The HTTP routes for this module.
    #[must_use]
    pub fn router(self: &Arc<Self>) -> Router {
        http::router(self.clone())
    }

    /// Bind the configured address and serve the HTTP surface until the task
    /// is cancelled.
    ///
    /// # Errors
    /// Returns error if binding or serving fails.
    pub async fn serve(self: Arc<Self>, addr: SocketAddr) -> Result<(), ModuleError> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %addr, "alert service listening");

        let router = self.router();
        axum::serve(listener, router).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the module facade.
    use tempfile::tempdir;

    use super::*;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            account_id: "acct_1".to_string(),
            client_id: "client_1".to_string(),
            client_secret: "secret_1".to_string(),
            redirect_uri: "http://localhost:8080/api/v1/oauth/callback".to_string(),
            robot_jid: "robot@xmpp.zoom.us".to_string(),
            token_file_path: dir.join("tokens.json"),
            ..Config::default()
        }
    }

    /// Validates `ZoomAlertModule::new` behavior for the invalid-config
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures a config without credentials is rejected.
    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let result = ZoomAlertModule::new(Config::default()).await;
        assert!(matches!(result, Err(ModuleError::Config(_))));
    }

    /// Validates `ZoomAlertModule::send_alert` argument checks.
    ///
    /// Assertions:
    /// - Ensures empty email and empty message are rejected by name.
    #[tokio::test]
    async fn test_send_alert_argument_checks() {
        let dir = tempdir().expect("create temp dir");
        let module = ZoomAlertModule::new(test_config(dir.path())).await.expect("build module");

        let result = module.send_alert("", "message").await;
        assert!(matches!(result, Err(ModuleError::MissingArgument("email"))));

        let result = module.send_alert("ops@example.com", "").await;
        assert!(matches!(result, Err(ModuleError::MissingArgument("message"))));
    }

    /// Validates `ZoomAlertModule::send_alert` behavior without
    /// authorization.
    ///
    /// Assertions:
    /// - Ensures the send is refused with `Unauthorized` before any API call.
    #[tokio::test]
    async fn test_send_alert_requires_authorization() {
        let dir = tempdir().expect("create temp dir");
        let module = ZoomAlertModule::new(test_config(dir.path())).await.expect("build module");

        let result = module.send_alert("ops@example.com", "hello").await;
        assert!(matches!(result, Err(ModuleError::Unauthorized)));
    }

    /// Validates `ZoomAlertModule::authorization_url` output.
    ///
    /// Assertions:
    /// - Ensures the URL embeds the issued state and the client ID.
    /// - Ensures the returned state validates exactly once.
    #[tokio::test]
    async fn test_authorization_url_embeds_state() {
        let dir = tempdir().expect("create temp dir");
        let module = ZoomAlertModule::new(test_config(dir.path())).await.expect("build module");

        let (url, state) = module.authorization_url().expect("authorization url");
        assert!(url.contains("client_id=client_1"));
        assert!(url.contains(&format!("state={state}")));

        assert!(module.session().validate_state(&state).is_ok());
        assert!(module.session().validate_state(&state).is_err());
    }
}
