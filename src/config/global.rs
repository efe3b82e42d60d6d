//! Global configuration for gdscan.
//!
//! The configuration directory holds the optional `config.toml` and the stored
//! OAuth token (`storage.json`). Its default location is platform specific:
//!
//! - **Unix/macOS**: `~/.gdscan/`
//! - **Windows**: `%LOCALAPPDATA%\gdscan\`
//!
//! and can be replaced with `--config-dir`.
//!
//! # File Format
//!
//! Every key is optional:
//!
//! ```toml
//! # OAuth client downloaded from the Google Cloud console
//! client_secrets_path = "/home/me/client_id.json"
//! # Where the authorized token is kept (default: <config dir>/storage.json)
//! token_path = "/home/me/.gdscan/storage.json"
//!
//! # Listing: a small first page for quick feedback, then large pages
//! first_page_size = 100
//! page_size = 1000
//!
//! request_timeout_secs = 60
//! max_retries = 3
//! ```
//!
//! # Security Considerations
//!
//! The token file grants read access to the account's metadata. It is written with
//! `0600` permissions on Unix and must never be committed anywhere.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{
    DEFAULT_FIRST_PAGE_SIZE, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_PAGE_SIZE,
};
use crate::core::GdscanError;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Name of the stored token file inside the configuration directory.
pub const TOKEN_FILE_NAME: &str = "storage.json";

/// Default client secrets file name, looked up in the home directory.
pub const CLIENT_SECRETS_FILE_NAME: &str = "client_id.json";

/// Scan configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Path of the OAuth client secrets JSON file.
    ///
    /// Default: `~/client_id.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secrets_path: Option<PathBuf>,

    /// Path of the stored OAuth token.
    ///
    /// Default: `storage.json` in the configuration directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    /// Number of items requested by the first listing page.
    pub first_page_size: u32,

    /// Number of items requested by every later listing page (at most 1000).
    pub page_size: u32,

    /// Timeout for a single Drive API request, in seconds.
    pub request_timeout_secs: u64,

    /// How often a transient Drive API failure is retried.
    pub max_retries: usize,

    /// Directory the configuration was loaded from.
    #[serde(skip)]
    pub config_dir: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            client_secrets_path: None,
            token_path: None,
            first_page_size: DEFAULT_FIRST_PAGE_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            config_dir: PathBuf::new(),
        }
    }
}

impl ScanConfig {
    /// Load the configuration from `config_dir`, or from the default directory.
    ///
    /// A missing `config.toml` yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The default directory cannot be determined
    /// - The file exists but cannot be read or parsed
    /// - A value fails validation
    pub async fn load(config_dir: Option<&Path>) -> Result<Self> {
        let dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::default_dir()?,
        };

        let path = dir.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::load_from(&path).await?
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Self::default()
        };
        config.config_dir = dir;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a specific configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))
    }

    /// Default configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or, on Windows, local data) directory cannot
    /// be determined.
    pub fn default_dir() -> Result<PathBuf> {
        let dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("gdscan")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".gdscan")
        };
        Ok(dir)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GdscanError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), GdscanError> {
        for (key, value) in [("first_page_size", self.first_page_size), ("page_size", self.page_size)]
        {
            if value == 0 {
                return Err(GdscanError::Config {
                    message: format!("{key} must be greater than 0"),
                });
            }
            if value > MAX_PAGE_SIZE {
                return Err(GdscanError::Config {
                    message: format!("{key} must be at most {MAX_PAGE_SIZE}, got {value}"),
                });
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(GdscanError::Config {
                message: "request_timeout_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Client secrets path: configured, else `~/client_id.json`.
    pub fn client_secrets_path(&self) -> PathBuf {
        self.client_secrets_path.clone().unwrap_or_else(|| {
            dirs::home_dir().unwrap_or_default().join(CLIENT_SECRETS_FILE_NAME)
        })
    }

    /// Stored token path: configured, else `storage.json` in the configuration directory.
    pub fn token_path(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(|| self.config_dir.join(TOKEN_FILE_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ScanConfig::load(Some(temp.path())).await.unwrap();

        assert_eq!(config.first_page_size, 100);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.config_dir, temp.path());
        assert_eq!(config.token_path(), temp.path().join("storage.json"));
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "page_size = 500\nclient_secrets_path = \"/tmp/secrets.json\"\n",
        )
        .unwrap();

        let config = ScanConfig::load(Some(temp.path())).await.unwrap();
        assert_eq!(config.page_size, 500);
        assert_eq!(config.first_page_size, 100);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.client_secrets_path(), PathBuf::from("/tmp/secrets.json"));
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "page_size = 5000\n").unwrap();

        let err = ScanConfig::load(Some(temp.path())).await.unwrap_err();
        assert!(err.to_string().contains("page_size must be at most 1000"));
    }

    #[tokio::test]
    async fn test_malformed_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "page_size = [").unwrap();

        let err = ScanConfig::load(Some(temp.path())).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration"));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let config = ScanConfig {
            first_page_size: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(GdscanError::Config { .. })));

        let config = ScanConfig {
            request_timeout_secs: 0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
