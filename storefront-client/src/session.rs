//! Session credential storage
//!
//! The gateway never reaches for ambient state: the access token lives in a
//! [`SessionStore`] handed to it at construction. The refresh credential is
//! not here at all; it is an HTTP-only cookie kept by the transport.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

use crate::error::Result;

/// Holder of the current access token
///
/// At most one token is current. `set_access_token` replaces it atomically;
/// the last writer wins.
pub trait SessionStore: Send + Sync {
    /// Current access token, if any
    fn access_token(&self) -> Option<String>;

    /// Replace the current access token
    fn set_access_token(&self, token: String);

    /// Forget the current access token
    fn clear(&self);
}

/// Process-lifetime session
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that starts out holding `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySession {
    fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_access_token(&self, token: String) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
    }

    fn clear(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

/// Session persisted to a JSON file so the token survives a restart
///
/// Reads are served from memory; every mutation is written through. A write
/// failure is logged and the in-memory value still changes, matching the
/// best-effort semantics of a browser's local storage.
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    inner: MemorySession,
}

impl FileSession {
    /// Open (or lazily create) the session file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = MemorySession::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                let file: SessionFile = serde_json::from_str(&content)?;
                if let Some(token) = file.access_token {
                    inner.set_access_token(token);
                }
            }
            debug!(path = %path.display(), "Loaded session file");
        }

        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, token: Option<String>) {
        let file = SessionFile { access_token: token };
        let result = serde_json::to_string_pretty(&file)
            .map_err(std::io::Error::from)
            .and_then(|json| {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(&self.path, json)
            });

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to persist session");
        }
    }
}

impl SessionStore for FileSession {
    fn access_token(&self) -> Option<String> {
        self.inner.access_token()
    }

    fn set_access_token(&self, token: String) {
        self.inner.set_access_token(token.clone());
        self.persist(Some(token));
    }

    fn clear(&self) {
        self.inner.clear();
        self.persist(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_session_lifecycle() {
        let session = MemorySession::new();
        assert_eq!(session.access_token(), None);

        session.set_access_token("first".to_string());
        session.set_access_token("second".to_string());
        assert_eq!(session.access_token().as_deref(), Some("second"));

        session.clear();
        assert_eq!(session.access_token(), None);
    }

    #[test]
    fn test_file_session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = FileSession::open(&path).unwrap();
        assert_eq!(session.access_token(), None);
        session.set_access_token("persisted".to_string());

        let reopened = FileSession::open(&path).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("persisted"));

        reopened.clear();
        let cleared = FileSession::open(&path).unwrap();
        assert_eq!(cleared.access_token(), None);
    }

    #[test]
    fn test_file_session_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(FileSession::open(&path).is_err());
    }
}
