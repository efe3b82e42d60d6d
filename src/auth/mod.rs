//! OAuth 2.0 credentials for the Drive API.
//!
//! The [`Authenticator`] hands out an [`AccessToken`] for the read-only metadata
//! scope, in order of preference:
//!
//! 1. the stored token, while it is fresh
//! 2. a refreshed token, when a refresh token is stored
//! 3. a new authorization through the browser (see [`loopback`])
//!
//! Tokens obtained in steps 2 and 3 are stored for the next run. The resulting
//! handle is passed to the Drive client explicitly.

pub mod loopback;
pub mod secrets;
pub mod token;

pub use secrets::ClientSecrets;
pub use token::{AccessToken, StoredToken, TokenResponse};

use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::constants::AUTHORIZATION_TIMEOUT;
use crate::core::GdscanError;

/// Obtains access tokens for one client.
pub struct Authenticator {
    secrets: ClientSecrets,
    token_path: PathBuf,
    http: reqwest::Client,
}

impl Authenticator {
    pub fn new(secrets: ClientSecrets, token_path: PathBuf, http: reqwest::Client) -> Self {
        Self {
            secrets,
            token_path,
            http,
        }
    }

    /// Return a usable access token, authorizing interactively if needed.
    ///
    /// An unreadable or corrupt stored token counts as no token.
    ///
    /// # Errors
    ///
    /// Returns an error if a new token cannot be written, or the browser
    /// authorization fails.
    pub async fn access_token(&self) -> Result<AccessToken> {
        if let Some(token) = self.reuse_stored().await? {
            return Ok(token);
        }

        let token = self.authorize().await?;
        token.save(&self.token_path).await?;
        info!("Stored token in {}", self.token_path.display());
        Ok(token.access_token())
    }

    /// The stored token while fresh, else a refreshed one; `None` when a new
    /// authorization is needed.
    async fn reuse_stored(&self) -> Result<Option<AccessToken>> {
        let Some(stored) = self.stored_token().await else {
            return Ok(None);
        };
        if stored.is_fresh(Utc::now()) {
            debug!("Using stored token from {}", self.token_path.display());
            return Ok(Some(stored.access_token()));
        }

        let Some(refresh_token) = stored.refresh_token.clone() else {
            debug!("Stored token expired and cannot be refreshed");
            return Ok(None);
        };
        match self.refresh(refresh_token).await {
            Ok(token) => {
                debug!("Refreshed stored token");
                token.save(&self.token_path).await?;
                Ok(Some(token.access_token()))
            }
            Err(e) => {
                warn!("Refreshing the stored token failed: {e}; authorizing again");
                Ok(None)
            }
        }
    }

    async fn stored_token(&self) -> Option<StoredToken> {
        match StoredToken::load(&self.token_path).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring unusable stored token: {e:#}; authorizing again");
                None
            }
        }
    }

    async fn refresh(&self, refresh_token: String) -> Result<StoredToken, GdscanError> {
        let response = self
            .exchange(&[
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .await?;
        Ok(StoredToken::from_response(response, Some(refresh_token), Utc::now()))
    }

    async fn authorize(&self) -> Result<StoredToken, GdscanError> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());
        let state = loopback::new_state();
        let url = loopback::authorization_url(&self.secrets, &redirect_uri, &state)?;

        eprintln!("Go to the following link in your browser:\n\n    {url}\n");
        info!("Waiting for authorization on {redirect_uri}");

        let code =
            tokio::time::timeout(AUTHORIZATION_TIMEOUT, loopback::wait_for_code(listener, &state))
                .await
                .map_err(|_| GdscanError::Auth {
                    reason: format!(
                        "no authorization received within {} seconds",
                        AUTHORIZATION_TIMEOUT.as_secs()
                    ),
                })??;

        let response = self
            .exchange(&[
                ("code", code.as_str()),
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .await?;
        Ok(StoredToken::from_response(response, None, Utc::now()))
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<TokenResponse, GdscanError> {
        let response = self
            .http
            .post(&self.secrets.token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| GdscanError::Network {
                operation: "token request".to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GdscanError::Auth {
                reason: format!("token endpoint answered {status}: {}", body.trim()),
            });
        }

        response.json().await.map_err(|e| GdscanError::Auth {
            reason: format!("unexpected token response: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::HttpStub;
    use chrono::TimeDelta;
    use tempfile::TempDir;

    fn authenticator(temp: &TempDir, token_uri: String) -> Authenticator {
        let secrets = ClientSecrets {
            client_id: "cid".to_string(),
            client_secret: "cs".to_string(),
            auth_uri: "https://accounts.example/auth".to_string(),
            token_uri,
        };
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        Authenticator::new(secrets, temp.path().join("storage.json"), http)
    }

    fn stored(access_token: &str, refresh_token: Option<&str>, expires_in: TimeDelta) -> StoredToken {
        StoredToken {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at: Some(Utc::now() + expires_in),
            scope: None,
        }
    }

    #[tokio::test]
    async fn test_missing_token_needs_authorization() {
        let temp = TempDir::new().unwrap();
        let auth = authenticator(&temp, "http://127.0.0.1:9/token".to_string());
        assert!(auth.reuse_stored().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_token_is_ignored() {
        let temp = TempDir::new().unwrap();
        let auth = authenticator(&temp, "http://127.0.0.1:9/token".to_string());
        std::fs::write(&auth.token_path, "{ not json").unwrap();

        assert!(auth.stored_token().await.is_none());
        assert!(auth.reuse_stored().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fresh_token_is_used_as_is() {
        let temp = TempDir::new().unwrap();
        let stub = HttpStub::start(vec![]).await.unwrap();
        let auth = authenticator(&temp, stub.url("/token"));
        stored("fresh", Some("r1"), TimeDelta::hours(1)).save(&auth.token_path).await.unwrap();

        let token = auth.reuse_stored().await.unwrap().unwrap();
        assert_eq!(token.secret(), "fresh");
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_stored() {
        let temp = TempDir::new().unwrap();
        let stub = HttpStub::start(vec![(
            200,
            r#"{"access_token": "renewed", "expires_in": 3600}"#.to_string(),
        )])
        .await
        .unwrap();
        let auth = authenticator(&temp, stub.url("/token"));
        stored("old", Some("r1"), TimeDelta::hours(-1)).save(&auth.token_path).await.unwrap();

        let token = auth.reuse_stored().await.unwrap().unwrap();
        assert_eq!(token.secret(), "renewed");

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/token");
        assert!(requests[0].body.contains("grant_type=refresh_token"));
        assert!(requests[0].body.contains("refresh_token=r1"));

        let saved = StoredToken::load(&auth.token_path).await.unwrap().unwrap();
        assert_eq!(saved.access_token, "renewed");
        assert_eq!(saved.refresh_token.as_deref(), Some("r1"));
        assert!(saved.is_fresh(Utc::now()));
    }

    #[tokio::test]
    async fn test_rejected_refresh_falls_back_to_authorization() {
        let temp = TempDir::new().unwrap();
        let stub = HttpStub::start(vec![(400, r#"{"error": "invalid_grant"}"#.to_string())])
            .await
            .unwrap();
        let auth = authenticator(&temp, stub.url("/token"));
        let expired = stored("old", Some("revoked"), TimeDelta::hours(-1));
        expired.save(&auth.token_path).await.unwrap();

        assert!(auth.reuse_stored().await.unwrap().is_none());
        assert_eq!(stub.requests().len(), 1);
        assert_eq!(StoredToken::load(&auth.token_path).await.unwrap(), Some(expired));
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_token() {
        let temp = TempDir::new().unwrap();
        let stub = HttpStub::start(vec![]).await.unwrap();
        let auth = authenticator(&temp, stub.url("/token"));
        stored("old", None, TimeDelta::hours(-1)).save(&auth.token_path).await.unwrap();

        assert!(auth.reuse_stored().await.unwrap().is_none());
        assert!(stub.requests().is_empty());
    }
}
