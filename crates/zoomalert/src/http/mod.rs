//! HTTP surface
//!
//! A small axum router exposing the authorization flow and the alert-sending
//! operations under `/api/v1`.

pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::module::ZoomAlertModule;

/// Build the `/api/v1` router backed by the given module.
#[must_use]
pub fn router(module: Arc<ZoomAlertModule>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/auth/status", get(handlers::auth_status))
        .route("/api/v1/oauth/authorize", get(handlers::oauth_authorize))
        .route("/api/v1/oauth/callback", get(handlers::oauth_callback))
        .route("/api/v1/alert", post(handlers::send_alert))
        .route("/api/v1/alert/rich", post(handlers::send_rich_alert))
        .route("/api/v1/alert/templated", post(handlers::send_templated_alert))
        .with_state(module)
        .layer(TraceLayer::new_for_http())
}
