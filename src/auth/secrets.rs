//! OAuth client secrets downloaded from the Google Cloud console.

use serde::Deserialize;
use std::path::Path;

use crate::core::GdscanError;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The `installed` (or `web`) section of a client secrets file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ClientSecrets {
    /// Read a client secrets file.
    ///
    /// # Errors
    ///
    /// Returns [`GdscanError::Auth`] if the file is missing or is not a client
    /// secrets file.
    pub async fn load(path: &Path) -> Result<Self, GdscanError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| GdscanError::Auth {
            reason: format!("cannot read client secrets file {}: {e}", path.display()),
        })?;
        Self::from_json(&content).map_err(|e| GdscanError::Auth {
            reason: format!("{} in {}", e, path.display()),
        })
    }

    /// Parse the contents of a client secrets file.
    ///
    /// # Errors
    ///
    /// Returns [`GdscanError::Auth`] if neither an `installed` nor a `web` section
    /// is present, or the JSON is malformed.
    pub fn from_json(content: &str) -> Result<Self, GdscanError> {
        let file: SecretsFile = serde_json::from_str(content).map_err(|e| GdscanError::Auth {
            reason: format!("invalid client secrets: {e}"),
        })?;
        file.installed.or(file.web).ok_or_else(|| GdscanError::Auth {
            reason: "client secrets have neither an 'installed' nor a 'web' section".to_string(),
        })
    }
}
