//! Service configuration
//!
//! Loads configuration from environment variables (with `.env` support) and
//! validates the fields the OAuth flows cannot run without.
//!
//! ## Environment Variables
//! - `ZOOM_ACCOUNT_ID`: Zoom account identifier (required)
//! - `ZOOM_CLIENT_ID`: OAuth client ID (required)
//! - `ZOOM_CLIENT_SECRET`: OAuth client secret (required)
//! - `ZOOM_REDIRECT_URI`: OAuth redirect target
//! - `ZOOM_ROBOT_JID`: chatbot JID used as the message sender
//! - `PORT`: HTTP listen port (default 8080)
//! - `LOG_LEVEL`: default tracing level (default "info")
//! - `TOKEN_FILE_PATH`: persisted token slot (default "./tokens.json")

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was absent or empty
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Configuration for the alert service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Zoom account identifier
    pub account_id: String,

    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Redirect URI registered for the authorization-code flow
    pub redirect_uri: String,

    /// Chatbot JID messages are sent from
    pub robot_jid: String,

    /// HTTP listen port
    pub port: u16,

    /// Default tracing level when `RUST_LOG` is unset
    pub log_level: String,

    /// Path of the persisted token slot
    pub token_file_path: PathBuf,

    /// Authorization server base URL (overridable for tests)
    pub oauth_base_url: String,

    /// Zoom REST API base URL (overridable for tests)
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            robot_jid: String::new(),
            port: 8080,
            log_level: "info".to_string(),
            token_file_path: PathBuf::from("./tokens.json"),
            oauth_base_url: "https://zoom.us".to_string(),
            api_base_url: "https://api.zoom.us/v2".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// real environment variables take precedence. Unset variables keep their
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            debug!("no .env file found, using process environment");
        }

        let mut config = Self::default();

        if let Some(value) = env_var("ZOOM_ACCOUNT_ID") {
            config.account_id = value;
        }
        if let Some(value) = env_var("ZOOM_CLIENT_ID") {
            config.client_id = value;
        }
        if let Some(value) = env_var("ZOOM_CLIENT_SECRET") {
            config.client_secret = value;
        }
        if let Some(value) = env_var("ZOOM_REDIRECT_URI") {
            config.redirect_uri = value;
        }
        if let Some(value) = env_var("ZOOM_ROBOT_JID") {
            config.robot_jid = value;
        }
        if let Some(value) = env_var("PORT") {
            match value.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(value = %value, "invalid PORT value, keeping default"),
            }
        }
        if let Some(value) = env_var("LOG_LEVEL") {
            config.log_level = value;
        }
        if let Some(value) = env_var("TOKEN_FILE_PATH") {
            config.token_file_path = PathBuf::from(value);
        }

        config
    }

    /// Check that the fields the OAuth flows cannot run without are present.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` naming the first absent variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account_id.is_empty() {
            return Err(ConfigError::Missing("ZOOM_ACCOUNT_ID"));
        }
        if self.client_id.is_empty() {
            return Err(ConfigError::Missing("ZOOM_CLIENT_ID"));
        }
        if self.client_secret.is_empty() {
            return Err(ConfigError::Missing("ZOOM_CLIENT_SECRET"));
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    //! Unit tests for config.
    use super::*;

    fn populated_config() -> Config {
        Config {
            account_id: "acct".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            ..Config::default()
        }
    }

    /// Validates `Config::default` values.
    ///
    /// Assertions:
    /// - Confirms port 8080, log level "info", and the `./tokens.json` slot.
    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.token_file_path, PathBuf::from("./tokens.json"));
        assert_eq!(config.oauth_base_url, "https://zoom.us");
    }

    /// Validates `Config::validate` behavior for missing required fields.
    ///
    /// Assertions:
    /// - Ensures each required field is reported by name when absent.
    /// - Ensures a fully populated config validates.
    #[test]
    fn test_validate_required_fields() {
        let mut config = populated_config();
        assert!(config.validate().is_ok());

        config.account_id.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("ZOOM_ACCOUNT_ID"))));

        let mut config = populated_config();
        config.client_id.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("ZOOM_CLIENT_ID"))));

        let mut config = populated_config();
        config.client_secret.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("ZOOM_CLIENT_SECRET"))));
    }
}
