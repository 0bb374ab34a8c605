//! Durable token persistence
//!
//! A single JSON slot on disk, written after every successful exchange or
//! refresh and read once at startup. No history is kept; the slot is
//! overwritten in place and the last write wins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::traits::TokenStoreTrait;
use super::types::TokenSet;

/// Errors from the persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read/write failed
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted record could not be encoded or decoded
    #[error("token record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed token store.
///
/// The storage location is an opaque path supplied by configuration. Parent
/// directories are created on first save; on Unix the file is restricted to
/// the owning user.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store writing to the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured storage path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStoreTrait for FileTokenStore {
    async fn save(&self, tokens: &TokenSet) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(tokens)?;
        std::fs::write(&self.path, data)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %self.path.display(), "persisted token record");
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenSet>, StoreError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                // No record yet; normal for a first run.
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let tokens: TokenSet = serde_json::from_slice(&data)?;
        debug!(path = %self.path.display(), "loaded persisted token record");
        Ok(Some(tokens))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::store.
    use tempfile::tempdir;

    use super::*;

    /// Validates `FileTokenStore` behavior for the save/load round-trip
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the loaded record matches the saved access and refresh
    ///   tokens.
    /// - Confirms the expiry instant survives the round trip.
    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempdir().expect("create temp dir");
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        let tokens = TokenSet::new("access".to_string(), Some("refresh".to_string()), 3600);
        store.save(&tokens).await.expect("save tokens");

        let loaded = store.load().await.expect("load tokens").expect("record present");
        assert_eq!(loaded.access_token, tokens.access_token);
        assert_eq!(loaded.refresh_token, tokens.refresh_token);
        assert_eq!(loaded.expires_at, tokens.expires_at);
    }

    /// Validates `FileTokenStore::load` behavior for the first-run scenario.
    ///
    /// Assertions:
    /// - Ensures a missing file loads as `Ok(None)` rather than an error.
    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let dir = tempdir().expect("create temp dir");
        let store = FileTokenStore::new(dir.path().join("does-not-exist.json"));

        let loaded = store.load().await.expect("load tokens");
        assert!(loaded.is_none());
    }

    /// Validates `FileTokenStore::load` behavior for the corrupted-record
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures unparseable contents surface as a serialization error.
    #[tokio::test]
    async fn test_corrupted_record_fails_loudly() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, b"not json").expect("write garbage");

        let store = FileTokenStore::new(path);
        let result = store.load().await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    /// Validates `FileTokenStore::save` behavior for the nested-path scenario.
    ///
    /// Assertions:
    /// - Ensures missing parent directories are created on save.
    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempdir().expect("create temp dir");
        let store = FileTokenStore::new(dir.path().join("nested/state/tokens.json"));

        let tokens = TokenSet::new("access".to_string(), None, 3600);
        store.save(&tokens).await.expect("save tokens");

        assert!(store.path().exists());
    }
}
