//! Operator sign-in: a pluggable credential check and an expiring session.
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_SESSION_HOURS: i64 = 24;

pub trait CredentialCheck {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Credentials taken from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCredentials {
    pub username: String,
    pub password: String,
}

impl CredentialCheck for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username.trim() && self.password == password
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn start(username: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.started_at < timeout
    }
}

/// Persists the current session as JSON between invocations.
pub struct SessionStore {
    path: PathBuf,
    timeout: Duration,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P, timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session if it is still active. Expired or unreadable
    /// sessions are removed.
    pub fn load_active(&self) -> Option<Session> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Session>(&contents) {
            Ok(session) if session.is_active(Utc::now(), self.timeout) => {
                debug!(user = %session.username, "Resuming session");
                Some(session)
            }
            Ok(session) => {
                info!(user = %session.username, "Session expired");
                self.clear();
                None
            }
            Err(e) => {
                warn!("Discarding unreadable session file: {e}");
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Failed to remove session file {}: {e}", self.path.display());
            }
        }
    }

    /// Checks credentials and, on success, starts and stores a new session.
    pub fn login(
        &self,
        check: &dyn CredentialCheck,
        username: &str,
        password: &str,
    ) -> Result<Option<Session>> {
        if !check.verify(username, password) {
            warn!(user = username, "Invalid credentials");
            return Ok(None);
        }
        let session = Session::start(username);
        self.save(&session)?;
        info!(user = %session.username, "Signed in");
        Ok(Some(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn credentials() -> StaticCredentials {
        StaticCredentials {
            username: "desk".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_static_credentials() {
        let check = credentials();
        assert!(check.verify("desk", "s3cret"));
        assert!(check.verify(" desk ", "s3cret"));
        assert!(!check.verify("desk", "S3CRET"));
        assert!(!check.verify("other", "s3cret"));
    }

    #[test]
    fn test_session_expiry() {
        let session = Session::start("desk");
        let timeout = Duration::hours(DEFAULT_SESSION_HOURS);
        assert!(session.is_active(session.started_at + Duration::hours(23), timeout));
        assert!(!session.is_active(session.started_at + Duration::hours(24), timeout));
    }

    #[test]
    fn test_login_persists_session() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = SessionStore::new(temp_dir.path().join("session.json"), Duration::hours(1));

        assert!(store.login(&credentials(), "desk", "wrong")?.is_none());
        assert!(store.load_active().is_none());

        let session = store.login(&credentials(), "desk", "s3cret")?.unwrap();
        assert_eq!(store.load_active(), Some(session));

        store.clear();
        assert!(store.load_active().is_none());
        Ok(())
    }

    #[test]
    fn test_expired_session_is_removed() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = SessionStore::new(temp_dir.path().join("session.json"), Duration::hours(1));
        let stale = Session {
            username: "desk".to_string(),
            started_at: Utc::now() - Duration::hours(2),
        };
        store.save(&stale)?;

        assert!(store.load_active().is_none());
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn test_corrupt_session_is_removed() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = SessionStore::new(temp_dir.path().join("session.json"), Duration::hours(1));
        fs::write(store.path(), "not json")?;

        assert!(store.load_active().is_none());
        assert!(!store.path().exists());
        Ok(())
    }
}
