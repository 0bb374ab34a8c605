//! Mock implementations of auth traits
//!
//! Provides scripted grant-flow and token-store objects for testing: preset
//! responses, invocation counters, and failure toggles.

// Allow missing error/panic docs for test mocks - they are designed to be
// simple and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::store::StoreError;
use crate::auth::traits::{OAuthClientTrait, TokenStoreTrait};
use crate::auth::types::{AuthError, TokenSet};

/// Scripted grant-flow client.
///
/// Each grant returns its preset [`TokenSet`] (cloned per call) or a
/// rejection error when nothing is scripted. Invocation counters let tests
/// assert on how many network round trips an operation would have made.
#[derive(Debug, Default)]
pub struct MockOAuthClient {
    exchange_response: Mutex<Option<TokenSet>>,
    refresh_response: Mutex<Option<TokenSet>>,
    app_response: Mutex<Option<TokenSet>>,
    exchange_count: AtomicUsize,
    refresh_count: AtomicUsize,
    app_count: AtomicUsize,
}

impl MockOAuthClient {
    /// Create a mock with no scripted responses (every grant is rejected).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result of the next `exchange_code` calls.
    pub fn set_exchange_response(&self, tokens: TokenSet) {
        // SAFETY: Mutex poisoning is acceptable in test mocks - if a test
        // panics the whole test fails anyway
        *self.exchange_response.lock().unwrap() = Some(tokens);
    }

    /// Script the result of the next `refresh` calls.
    pub fn set_refresh_response(&self, tokens: TokenSet) {
        *self.refresh_response.lock().unwrap() = Some(tokens);
    }

    /// Script the result of the next `client_credentials` calls.
    pub fn set_app_response(&self, tokens: TokenSet) {
        *self.app_response.lock().unwrap() = Some(tokens);
    }

    /// Number of `exchange_code` invocations so far.
    #[must_use]
    pub fn exchange_calls(&self) -> usize {
        self.exchange_count.load(Ordering::SeqCst)
    }

    /// Number of `refresh` invocations so far.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_count.load(Ordering::SeqCst)
    }

    /// Number of `client_credentials` invocations so far.
    #[must_use]
    pub fn app_calls(&self) -> usize {
        self.app_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://zoom.us/oauth/authorize?response_type=code&client_id=mock&state={state}")
    }

    async fn exchange_code(&self, _code: &str) -> Result<TokenSet, AuthError> {
        self.exchange_count.fetch_add(1, Ordering::SeqCst);
        self.exchange_response.lock().unwrap().clone().ok_or(AuthError::ExchangeRejected {
            status: 500,
            body: "mock: no exchange response scripted".to_string(),
        })
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenSet, AuthError> {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        self.refresh_response.lock().unwrap().clone().ok_or(AuthError::RefreshRejected {
            status: 500,
            body: "mock: no refresh response scripted".to_string(),
        })
    }

    async fn client_credentials(&self) -> Result<TokenSet, AuthError> {
        self.app_count.fetch_add(1, Ordering::SeqCst);
        self.app_response.lock().unwrap().clone().ok_or(AuthError::AppTokenRejected {
            status: 500,
            body: "mock: no app token response scripted".to_string(),
        })
    }
}

/// In-memory token store with failure toggles.
#[derive(Debug, Default)]
pub struct MockTokenStore {
    slot: Mutex<Option<TokenSet>>,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
    save_count: AtomicUsize,
}

impl MockTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a record, as if persisted by a prior run.
    pub fn set(&self, tokens: TokenSet) {
        *self.slot.lock().unwrap() = Some(tokens);
    }

    /// Snapshot of the stored record.
    #[must_use]
    pub fn get(&self) -> Option<TokenSet> {
        self.slot.lock().unwrap().clone()
    }

    /// Make subsequent saves fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent loads fail (simulates an unreadable record).
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Number of save invocations so far (including failed ones).
    #[must_use]
    pub fn save_calls(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStoreTrait for MockTokenStore {
    async fn save(&self, tokens: &TokenSet) -> Result<(), StoreError> {
        self.save_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("mock: save disabled")));
        }

        *self.slot.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenSet>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("mock: load disabled")));
        }

        Ok(self.slot.lock().unwrap().clone())
    }
}
