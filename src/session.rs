//! Session persistence for the logged-in user.
//!
//! Holds the auth token returned by the login endpoint and persists it to a
//! JSON file so the session survives restarts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Durable session identity.
///
/// Loaded once on boot, updated on login, cleared on logout, and handed to
/// the API client rather than read ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token issued by the backend
    #[serde(default)]
    token: Option<String>,
    /// Email the token was issued for
    #[serde(default)]
    email: Option<String>,
    /// When the token was stored
    #[serde(default)]
    logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Load session from file.
    ///
    /// # Details
    /// If the file doesn't exist, returns an empty session.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;

        let session: Session =
            serde_json::from_str(&content).with_context(|| "Failed to parse session file")?;

        Ok(session)
    }

    /// Save session to file.
    ///
    /// # Details
    /// Creates parent directory if it doesn't exist.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize session")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;

        Ok(())
    }

    /// Record a fresh login.
    pub fn update(&mut self, token: String, email: &str) {
        self.token = Some(token);
        self.email = Some(email.to_string());
        self.logged_in_at = Some(Utc::now());
    }

    /// Forget the current login.
    pub fn clear(&mut self) {
        self.token = None;
        self.email = None;
        self.logged_in_at = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_default_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_session_update_and_clear() {
        let mut session = Session::default();
        session.update("tok-1".to_string(), "a@b.co");
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(session.email(), Some("a@b.co"));

        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.email().is_none());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let mut session = Session::default();
        session.update(String::new(), "a@b.co");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_session_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let session_path = temp_dir.path().join("nested").join("session.json");

        let mut session = Session::default();
        session.update("tok-2".to_string(), "x@y.in");
        session.save(&session_path).unwrap();
        assert!(session_path.exists());

        let loaded = Session::load(&session_path).unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_missing_file_loads_empty_session() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Session::load(&temp_dir.path().join("absent.json")).unwrap();
        assert!(!loaded.is_authenticated());
    }
}
