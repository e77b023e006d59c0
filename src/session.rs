//! Login session for the single administrator.
//!
//! The session is a small JSON file holding `{ "username", "loggedInAt" }`. Its
//! presence is the only authentication signal; there is no expiry. The file is
//! read once by [`SessionStore::initialize`] and rewritten on login and logout.

use crate::{config::AdminCredentials, errors::Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{info, instrument, warn};

/// The logged-in user as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Username that logged in
    pub username: String,
    /// When the login happened
    pub logged_in_at: DateTime<Utc>,
}

/// Holds the current login and keeps the session file in sync with it
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    admin: AdminCredentials,
    user: Option<SessionUser>,
}

impl SessionStore {
    /// Reads any persisted session from `path`.
    ///
    /// A missing file means logged out. An unreadable or corrupt file is
    /// discarded with a warning and also treated as logged out.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read.
    #[instrument(skip(admin))]
    pub fn initialize(path: impl AsRef<Path> + std::fmt::Debug, admin: AdminCredentials) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let user = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<SessionUser>(&contents) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding unreadable session file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if let Some(user) = &user {
            info!("Restored session for '{}'", user.username);
        }
        Ok(Self { path, admin, user })
    }

    /// Attempts to log in. On success the session is persisted and `true` is
    /// returned; on a wrong pair nothing changes and `false` is returned.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be written.
    pub fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        if !self.admin.matches(username, password) {
            warn!("Rejected login attempt for '{}'", username);
            return Ok(false);
        }

        let user = SessionUser {
            username: username.to_string(),
            logged_in_at: Utc::now(),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&user)?)?;
        info!("Logged in as '{}'", user.username);
        self.user = Some(user);
        Ok(true)
    }

    /// Logs out and removes the session file. Logging out twice is fine.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if let Some(user) = self.user.take() {
            info!("Logged out '{}'", user.username);
        }
        Ok(())
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// True when someone is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn admin() -> AdminCredentials {
        AdminCredentials::new("tutor", "correct-horse")
    }

    #[test]
    fn test_starts_logged_out_without_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SessionStore::initialize(dir.path().join("session.json"), admin())?;
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        Ok(())
    }

    #[test]
    fn test_login_persists_across_initialize() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::initialize(&path, admin())?;
        assert!(store.login("tutor", "correct-horse")?);
        assert!(store.is_authenticated());

        let contents = fs::read_to_string(&path)?;
        assert!(contents.contains("\"username\""));
        assert!(contents.contains("\"loggedInAt\""));

        let restored = SessionStore::initialize(&path, admin())?;
        assert_eq!(restored.current_user(), store.current_user());
        Ok(())
    }

    #[test]
    fn test_wrong_password_does_not_log_in() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        let mut store = SessionStore::initialize(&path, admin())?;

        assert!(!store.login("tutor", "wrong")?);
        assert!(!store.is_authenticated());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_logout_removes_file_and_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        let mut store = SessionStore::initialize(&path, admin())?;
        store.login("tutor", "correct-horse")?;

        store.logout()?;
        assert!(!store.is_authenticated());
        assert!(!path.exists());

        store.logout()?;
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_treated_as_logged_out() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json")?;

        let store = SessionStore::initialize(&path, admin())?;
        assert!(!store.is_authenticated());
        Ok(())
    }

    #[test]
    fn test_reads_entry_written_elsewhere() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"username":"admin","loggedInAt":"2025-06-01T08:15:00.000Z"}"#,
        )?;

        let store = SessionStore::initialize(&path, AdminCredentials::default())?;
        let user = store.current_user().unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.logged_in_at.to_rfc3339(), "2025-06-01T08:15:00+00:00");
        Ok(())
    }
}
