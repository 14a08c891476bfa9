use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TokenStoreError {
    #[error("token storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token store lock poisoned")]
    Poisoned,
}

/// Where the bearer token lives between requests.
///
/// The desktop analogue of the browser's localStorage slot: one token,
/// attached to every outgoing request while present, absent otherwise.
pub trait TokenStore: Send + Sync {
    /// The current token, if any.
    fn token(&self) -> Option<String>;

    /// Persists a new token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError` if the token cannot be written.
    fn store(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Forgets the token (logout).
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError` if the stored token cannot be removed.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Token persisted to a small file on disk, surviving app restarts.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(err) => {
                // A missing file is just "not logged in".
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %self.path.display(), %err, "token file unreadable");
                }
                None
            }
        }
    }

    fn store(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local token store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    inner: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|guard| guard.clone())
    }

    fn store(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut guard = self.inner.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.inner.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}
