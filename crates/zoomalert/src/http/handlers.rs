//! HTTP request handlers
//!
//! Translate inbound requests into module calls and map results to JSON
//! responses. Validation and CSRF failures map to 400, missing authorization
//! to 401, upstream rejections to 502.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

use crate::auth::AuthError;
use crate::module::{ModuleError, ZoomAlertModule};
use crate::zoom::{AlertLevel, MessageContent, ZoomError};

/// Request payload for plain text alerts.
#[derive(Debug, Deserialize)]
pub struct AlertRequest {
    pub email: String,
    pub message: String,
}

/// Request payload for rich alerts.
#[derive(Debug, Deserialize)]
pub struct RichAlertRequest {
    pub email: String,
    pub content: MessageContent,
}

/// Request payload for severity-templated alerts.
#[derive(Debug, Deserialize)]
pub struct TemplatedAlertRequest {
    pub email: String,
    pub heading: String,
    pub body: String,
    pub level: AlertLevel,
    #[serde(default)]
    pub closeable: bool,
}

/// Response envelope for alert operations.
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AlertResponse {
    fn ok(message: &str) -> Self {
        Self { success: true, message: message.to_string(), error: None }
    }

    fn failed(message: &str, error: &ModuleError) -> Self {
        Self { success: false, message: message.to_string(), error: Some(error.to_string()) }
    }
}

/// Query parameters delivered to the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

fn alert_status(error: &ModuleError) -> StatusCode {
    match error {
        ModuleError::MissingArgument(_) | ModuleError::Config(_) => StatusCode::BAD_REQUEST,
        ModuleError::Unauthorized | ModuleError::Auth(AuthError::AuthorizationRequired) => {
            StatusCode::UNAUTHORIZED
        }
        ModuleError::Zoom(ZoomError::UserNotFound(_)) => StatusCode::NOT_FOUND,
        ModuleError::Zoom(ZoomError::Api { .. }) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond_alert(result: Result<(), ModuleError>) -> (StatusCode, Json<AlertResponse>) {
    match result {
        Ok(()) => (StatusCode::OK, Json(AlertResponse::ok("Alert sent successfully"))),
        Err(err) => {
            error!(error = %err, "failed to send alert");
            (alert_status(&err), Json(AlertResponse::failed("Failed to send alert", &err)))
        }
    }
}

/// `GET /api/v1/health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "zoom-alert-service",
    }))
}

/// `GET /api/v1/auth/status`
pub async fn auth_status(State(module): State<Arc<ZoomAlertModule>>) -> Json<Value> {
    let authorized = module.is_authorized().await;

    let message = if authorized {
        "User authorization available - full user lookup enabled"
    } else {
        "User authorization required - visit /api/v1/oauth/authorize to begin"
    };

    Json(json!({
        "user_authorized": authorized,
        "message": message,
    }))
}

/// `GET /api/v1/oauth/authorize`
///
/// Issues a CSRF state and returns the authorization URL for the caller to
/// open in a browser.
pub async fn oauth_authorize(
    State(module): State<Arc<ZoomAlertModule>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let (url, state) = module.authorization_url().map_err(|err| {
        error!(error = %err, "failed to issue oauth state");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to generate OAuth state: {err}") })),
        )
    })?;

    Ok(Json(json!({
        "authorization_url": url,
        "state": state,
        "message": "Please visit the authorization URL to complete the OAuth flow",
    })))
}

/// `GET /api/v1/oauth/callback`
///
/// Completes the authorization round trip: provider errors are passed
/// through, the state is validated-and-consumed, and the code is exchanged.
pub async fn oauth_callback(
    State(module): State<Arc<ZoomAlertModule>>,
    Query(query): Query<CallbackQuery>,
) -> (StatusCode, Json<Value>) {
    if let Some(provider_error) = query.error {
        let mut message = format!("OAuth authorization failed: {provider_error}");
        if let Some(description) = query.error_description {
            message = format!("{message} ({description})");
        }
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": provider_error, "message": message })),
        );
    }

    let code = query.code.unwrap_or_default();
    if code.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing authorization code in callback" })),
        );
    }

    let state = query.state.unwrap_or_default();
    match module.handle_oauth_callback(&code, &state).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Authorization successful", "status": "authorized" })),
        ),
        Err(err @ AuthError::StateMissingOrExpired) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Invalid or expired state parameter: {err}") })),
        ),
        Err(err) => {
            error!(error = %err, "code exchange failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to exchange code for token: {err}") })),
            )
        }
    }
}

/// `POST /api/v1/alert`
pub async fn send_alert(
    State(module): State<Arc<ZoomAlertModule>>,
    Json(request): Json<AlertRequest>,
) -> (StatusCode, Json<AlertResponse>) {
    respond_alert(module.send_alert(&request.email, &request.message).await)
}

/// `POST /api/v1/alert/rich`
pub async fn send_rich_alert(
    State(module): State<Arc<ZoomAlertModule>>,
    Json(request): Json<RichAlertRequest>,
) -> (StatusCode, Json<AlertResponse>) {
    respond_alert(module.send_rich_alert(&request.email, request.content).await)
}

/// `POST /api/v1/alert/templated`
pub async fn send_templated_alert(
    State(module): State<Arc<ZoomAlertModule>>,
    Json(request): Json<TemplatedAlertRequest>,
) -> (StatusCode, Json<AlertResponse>) {
    respond_alert(
        module
            .send_templated_alert(
                &request.email,
                &request.heading,
                &request.body,
                request.level,
                request.closeable,
            )
            .await,
    )
}
