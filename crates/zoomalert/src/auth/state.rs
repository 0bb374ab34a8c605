//! CSRF state table for the authorization-code flow
//!
//! Issues unguessable single-use state tokens, validates-and-consumes them on
//! callback, and sweeps expired entries opportunistically on every access.
//! No background task: expiry is enforced lazily.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use super::types::AuthError;

/// Validity window for issued state tokens.
const STATE_TTL_MINUTES: i64 = 10;

/// Entropy fed into each state token before encoding.
const STATE_BYTES: usize = 32;

/// Metadata recorded for an issued state token.
#[derive(Debug, Clone)]
struct StateEntry {
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Lock-guarded table of outstanding CSRF state tokens.
///
/// Every operation mutates the table (issuance inserts, validation deletes,
/// both sweep), so the reader/writer lock is always taken in write mode.
#[derive(Debug)]
pub struct StateStore {
    entries: RwLock<HashMap<String, StateEntry>>,
    ttl: Duration,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Create a table with the standard 10-minute validity window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(STATE_TTL_MINUTES))
    }

    /// Create a table with a custom validity window.
    ///
    /// Tests use short windows to exercise expiry without waiting.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: RwLock::new(HashMap::new()), ttl }
    }

    /// Generate, record, and return a new state token.
    ///
    /// The token carries 256 bits of entropy, URL-safe base64 encoded.
    /// Expired entries are purged as a side effect.
    ///
    /// # Errors
    /// Returns `AuthError::Randomness` if the secure random source fails.
    pub fn issue(&self) -> Result<String, AuthError> {
        let mut bytes = [0u8; STATE_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|err| AuthError::Randomness(err.to_string()))?;

        let token = URL_SAFE_NO_PAD.encode(bytes);
        let now = Utc::now();

        let mut entries = self.entries.write();
        Self::sweep(&mut entries, now);
        entries.insert(
            token.clone(),
            StateEntry { created_at: now, expires_at: now + self.ttl },
        );

        Ok(token)
    }

    /// Validate a state token and consume it.
    ///
    /// A token validates at most once: the entry is removed whether the check
    /// succeeds or the entry turns out to be expired. Expired entries are
    /// purged as a side effect.
    ///
    /// # Errors
    /// Returns `AuthError::StateMissingOrExpired` if the token is empty,
    /// unknown, or past its validity window.
    pub fn validate_and_consume(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::StateMissingOrExpired);
        }

        let now = Utc::now();
        let mut entries = self.entries.write();
        Self::sweep(&mut entries, now);

        match entries.remove(token) {
            Some(entry) if now < entry.expires_at => {
                debug!(
                    age_secs = (now - entry.created_at).num_seconds(),
                    "consumed oauth state"
                );
                Ok(())
            }
            _ => Err(AuthError::StateMissingOrExpired),
        }
    }

    /// Number of outstanding (possibly expired) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn sweep(entries: &mut HashMap<String, StateEntry>, now: DateTime<Utc>) {
        entries.retain(|_, entry| now < entry.expires_at);
    }
}
