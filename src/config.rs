//! Configuration management for archdesk.
//!
//! Handles loading and saving configuration from JSONC files.
//! Manages backend endpoints, request timeouts and listing preferences.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the backend base address.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Application configuration structure.
///
/// Contains backend endpoints and user preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base address; the project collection lives under it
    pub backend_url: String,
    /// Full URL of the multipart upload endpoint
    pub upload_url: String,
    /// Full URL of the login endpoint
    pub login_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Number of project cards per listing page
    pub page_size: usize,
    /// Session file path (relative to config dir or absolute)
    pub session_path: String,
    /// Log file name, written to the config dir
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "https://www.backend.mga2002.in/api".to_string(),
            upload_url: "https://www.backend.mga2002.in/api/architecture/upload".to_string(),
            login_url: "https://projectassoicate.onrender.com/api/auth/login".to_string(),
            request_timeout_secs: 30,
            page_size: 9,
            session_path: "session.json".to_string(),
            log_file: "archdesk.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, then apply environment overrides.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/archdesk/config.jsonc`
    /// 3. `~/.config/archdesk/config.jsonc`
    ///
    /// If no config file exists, starts from the default configuration.
    /// `BACKEND_URL` replaces `backend_url` when set and non-empty.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env(std::env::var(BACKEND_URL_ENV).ok());
        Ok(config)
    }

    fn load_file(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| "Failed to deserialize config")?;

        Ok(config)
    }

    fn apply_env(&mut self, backend_url: Option<String>) {
        if let Some(url) = backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
    }

    /// Save configuration to file.
    ///
    /// # Details
    /// Creates config directory if it doesn't exist.
    #[cfg(test)]
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Directory holding config, session and log files.
    pub fn app_dir() -> Result<PathBuf> {
        let config_dir =
            config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
        Ok(config_dir.join("archdesk"))
    }

    /// Get default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("config.jsonc"))
    }

    /// Get session file path.
    ///
    /// # Details
    /// If session_path is absolute, returns it as-is.
    /// Otherwise, returns path relative to the app directory.
    pub fn session_file_path(&self) -> Result<PathBuf> {
        let session_path = Path::new(&self.session_path);
        if session_path.is_absolute() {
            Ok(session_path.to_path_buf())
        } else {
            Ok(Self::app_dir()?.join(&self.session_path))
        }
    }

    /// URL of the project collection endpoint.
    pub fn collection_url(&self) -> String {
        format!("{}/architecture/data", self.backend_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Page size, never zero.
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

/// Strip `//` comments from JSONC, leaving `//` inside strings alone.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| match comment_start(line) {
            Some(pos) => line[..pos].trim_end(),
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset of the first `//` outside a string literal.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.page_size, 9);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.collection_url(),
            "https://www.backend.mga2002.in/api/architecture/data"
        );
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let config = Config {
            backend_url: "http://localhost:4000/api".to_string(),
            page_size: 12,
            ..Config::default()
        };

        config.save(Some(&config_path)).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_file(Some(&config_path)).unwrap();
        assert_eq!(loaded.backend_url, "http://localhost:4000/api");
        assert_eq!(loaded.page_size, 12);
    }

    #[test]
    fn test_config_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let jsonc_content = r#"{
            // Local development backend
            "backend_url": "http://localhost:4000/api",
            "page_size": 6
        }"#;

        fs::write(&config_path, jsonc_content).unwrap();

        let loaded = Config::load_file(Some(&config_path)).unwrap();
        assert_eq!(loaded.backend_url, "http://localhost:4000/api");
        assert_eq!(loaded.page_size, 6);
        assert_eq!(loaded.request_timeout_secs, 30);
    }

    #[test]
    fn test_comment_marker_inside_string_is_kept() {
        let line = r#"{"backend_url": "http://host/api"}"#;
        assert_eq!(strip_line_comments(line), line);
        assert_eq!(strip_line_comments(r#"{"page_size": 3} // three"#), r#"{"page_size": 3}"#);
    }

    #[test]
    fn test_trailing_comment_after_url_value() {
        assert_eq!(
            strip_line_comments(r#""backend_url": "https://x.test/api", // staging"#),
            r#""backend_url": "https://x.test/api","#
        );
        assert_eq!(
            strip_line_comments(r#""log_file": "a\"//b.log" // note"#),
            r#""log_file": "a\"//b.log""#
        );
    }

    #[test]
    fn test_load_with_trailing_comment_on_url_line() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");
        fs::write(
            &config_path,
            "{\n  \"backend_url\": \"https://x.test/api\" // staging\n}",
        )
        .unwrap();

        let loaded = Config::load_file(Some(&config_path)).unwrap();
        assert_eq!(loaded.backend_url, "https://x.test/api");
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env(Some("http://example.test/api/".to_string()));
        assert_eq!(config.collection_url(), "http://example.test/api/architecture/data");

        let mut config = Config::default();
        config.apply_env(Some("   ".to_string()));
        assert_eq!(config.backend_url, Config::default().backend_url);
    }

    #[test]
    fn test_zero_values_are_floored() {
        let config = Config {
            page_size: 0,
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.page_size(), 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
