//! Persisted client session
//!
//! The session record (user id, email, bearer token) survives between runs
//! so that every API call can authenticate. Logging out only discards the
//! local record; nothing is sent to the server.
//!
//! - `SessionStore` trait: common interface for storage backends
//! - `FileSessionStore`: JSON file, owner-only permissions on Unix
//! - `MemorySessionStore`: in-process, for tests and one-shot tools

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, SessionError};
use crate::types::{User, UserId};

/// Session record persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: UserId,
    pub email: String,
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            token: user.token.clone(),
            saved_at: Utc::now(),
        }
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.user_id,
            email: self.email.clone(),
            token: self.token.clone(),
        }
    }
}

/// Storage backend for the session record
pub trait SessionStore: Send + Sync {
    /// Load the stored session, `None` when logged out
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Replace the stored session
    fn save(&self, session: &StoredSession) -> Result<()>;

    /// Discard the stored session; clearing an empty store succeeds
    fn clear(&self) -> Result<()>;

    /// Bearer token for outgoing requests
    fn token(&self) -> Result<Option<String>> {
        Ok(self.load()?.map(|s| s.token))
    }

    /// Get the backend name (for logging and diagnostics)
    fn backend_name(&self) -> &str;
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io(e).into()),
        };
        let session = serde_json::from_str(&content).map_err(SessionError::Corrupt)?;
        Ok(Some(session))
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(SessionError::Io)?;
        }
        let content = serde_json::to_string_pretty(session).map_err(SessionError::Corrupt)?;
        std::fs::write(&self.path, content).map_err(SessionError::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions).map_err(SessionError::Io)?;
        }

        tracing::debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e).into()),
        }
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out logged in as `user`
    pub fn with_user(user: &User) -> Self {
        Self {
            session: Mutex::new(Some(StoredSession::from_user(user))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.session.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
