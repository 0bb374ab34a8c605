//! Zoom alert service library
//!
//! Authenticates against Zoom's OAuth endpoints, looks up recipients by
//! email, and posts chat alerts on the caller's behalf, optionally exposing
//! the same operations over a small HTTP surface.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  ZoomAlertModule │  Facade embedded by host applications
//! └────────┬─────────┘
//!          │
//!          ├──► auth::SessionManager  (token lifecycle + CSRF state + persistence)
//!          ├──► zoom::ZoomClient      (user lookup, chat posting)
//!          └──► http::router          (axum routes under /api/v1)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use zoomalert::{Config, ZoomAlertModule};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!
//!     let module = ZoomAlertModule::new(config).await?;
//!
//!     if !module.is_authorized().await {
//!         let (url, _state) = module.authorization_url()?;
//!         println!("Visit to authorize: {url}");
//!         return Ok(());
//!     }
//!
//!     module.send_alert("ops@example.com", "Deploy finished").await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod config;
pub mod http;
pub mod module;
pub mod telemetry;
pub mod testing;
pub mod zoom;

// Re-export commonly used types
pub use auth::{AuthError, OAuthConfig, SessionManager, TokenSet};
pub use config::{Config, ConfigError};
pub use module::{ModuleError, ZoomAlertModule};
pub use zoom::{AlertLevel, MessageContent, ZoomClient, ZoomError};
