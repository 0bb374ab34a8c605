//! Integration tests for the OAuth session core
//!
//! Drives the real grant-flow client against a stub authorization server and
//! the file-backed token store against a temporary directory.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};
use tempfile::tempdir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoomalert::auth::{
    AuthError, FileTokenStore, OAuthConfig, SessionManager, TokenSet, TokenStoreTrait,
};

fn stub_config(server: &MockServer) -> OAuthConfig {
    OAuthConfig::new(
        "test_client".to_string(),
        "test_secret".to_string(),
        "http://localhost:8080/api/v1/oauth/callback".to_string(),
    )
    .with_base_url(server.uri())
}

fn token_json(access: &str, refresh: Option<&str>, expires_in: i64) -> serde_json::Value {
    let mut body = serde_json::json!({
        "access_token": access,
        "token_type": "bearer",
        "expires_in": expires_in,
        "scope": "chat:write",
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = serde_json::Value::String(refresh.to_string());
    }
    body
}

fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{client_id}:{client_secret}")))
}

/// Validates the full authorization-code exchange against a stub server.
///
/// The stub requires the basic-auth header and the `authorization_code`
/// grant fields; the session must cache the returned token, answer
/// `access_token()` without further network calls, and persist the record.
#[tokio::test]
async fn exchange_caches_and_persists_tokens() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("create temp dir");
    let store = Arc::new(FileTokenStore::new(dir.path().join("tokens.json")));

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("Authorization", basic_auth_header("test_client", "test_secret").as_str()))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth_code_1"))
        .and(body_string_contains("redirect_uri="))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("X", Some("R"), 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let manager = SessionManager::new(stub_config(&server), store.clone());
    manager.exchange_code("auth_code_1").await.expect("exchange succeeds");

    // Cached fast path: no further token-endpoint calls (expect(1) enforces it).
    assert_eq!(manager.access_token().await.unwrap(), "X");
    assert_eq!(manager.access_token().await.unwrap(), "X");

    let persisted = store.load().await.expect("load").expect("record persisted");
    assert_eq!(persisted.access_token, "X");
    assert_eq!(persisted.refresh_token, Some("R".to_string()));
}

/// Validates the refresh grant for an expired persisted record.
///
/// A new manager loads an expired record with a refresh token, renews it
/// through the `refresh_token` grant, and lands on an expiry strictly later
/// than now.
#[tokio::test]
async fn expired_record_is_refreshed_transparently() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("create temp dir");
    let store = Arc::new(FileTokenStore::new(dir.path().join("tokens.json")));

    let expired = TokenSet {
        access_token: "stale".to_string(),
        refresh_token: Some("R1".to_string()),
        expires_at: Utc::now() - Duration::seconds(10),
    };
    store.save(&expired).await.expect("seed store");

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("X2", Some("R2"), 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let manager = SessionManager::new(stub_config(&server), store.clone());
    assert!(manager.initialize().await);

    assert_eq!(manager.access_token().await.unwrap(), "X2");

    let current = manager.current_tokens().await.expect("tokens cached");
    assert!(current.expires_at > Utc::now());

    let persisted = store.load().await.expect("load").expect("record persisted");
    assert_eq!(persisted.access_token, "X2");
    assert_eq!(persisted.refresh_token, Some("R2".to_string()));
}

/// Validates the client-credentials grant used for app tokens.
#[tokio::test]
async fn app_token_uses_client_credentials_grant() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("create temp dir");

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("Authorization", basic_auth_header("test_client", "test_secret").as_str()))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("APP", None, 3600)))
        .expect(2)
        .mount(&server)
        .await;

    let store = Arc::new(FileTokenStore::new(dir.path().join("tokens.json")));
    let manager = SessionManager::new(stub_config(&server), store);

    // Uncached by design: both calls hit the stub (expect(2) enforces it).
    assert_eq!(manager.app_access_token().await.unwrap(), "APP");
    assert_eq!(manager.app_access_token().await.unwrap(), "APP");
}

/// Validates that a rejected exchange surfaces the status and body.
#[tokio::test]
async fn rejected_exchange_carries_server_diagnostics() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("create temp dir");

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"reason":"invalid_grant"}"#))
        .mount(&server)
        .await;

    let store = Arc::new(FileTokenStore::new(dir.path().join("tokens.json")));
    let manager = SessionManager::new(stub_config(&server), store);

    let result = manager.exchange_code("bad_code").await;
    match result {
        Err(AuthError::ExchangeRejected { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected ExchangeRejected, got {other:?}"),
    }
}

/// Validates that a success response without an access token is treated as a
/// contract violation.
#[tokio::test]
async fn missing_access_token_is_malformed() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("create temp dir");

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "token_type": "bearer", "expires_in": 3600 })),
        )
        .mount(&server)
        .await;

    let store = Arc::new(FileTokenStore::new(dir.path().join("tokens.json")));
    let manager = SessionManager::new(stub_config(&server), store);

    let result = manager.exchange_code("code").await;
    assert!(matches!(result, Err(AuthError::MalformedTokenResponse(_))));
}

/// Validates the persistence round trip across manager instances.
///
/// A second manager constructed over the same path must report the same
/// authorization status as the first, with no network traffic, while the
/// persisted expiry has not elapsed.
#[tokio::test]
async fn persisted_record_survives_restart() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("create temp dir");
    let slot = dir.path().join("tokens.json");

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("X", Some("R"), 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let first = SessionManager::new(stub_config(&server), Arc::new(FileTokenStore::new(&slot)));
    first.exchange_code("code").await.expect("exchange succeeds");
    assert!(first.is_authorized().await);

    let second = SessionManager::new(stub_config(&server), Arc::new(FileTokenStore::new(&slot)));
    assert!(second.initialize().await);
    assert!(second.is_authorized().await);
    assert_eq!(second.access_token().await.unwrap(), "X");
}

/// Validates the corrupted-slot behavior: construction proceeds empty.
#[tokio::test]
async fn corrupted_persisted_record_behaves_like_first_run() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("create temp dir");
    let slot = dir.path().join("tokens.json");
    std::fs::write(&slot, b"{ this is not json").expect("write garbage");

    let manager = SessionManager::new(stub_config(&server), Arc::new(FileTokenStore::new(&slot)));
    assert!(!manager.initialize().await);
    assert!(!manager.is_authorized().await);
}
