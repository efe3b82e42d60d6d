//! Installed-app authorization through a loopback redirect.
//!
//! The user opens the consent URL in a browser; Google redirects to
//! `http://127.0.0.1:<port>/?code=...&state=...`, which a one-shot listener
//! answers before handing the code back.

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::debug;

use super::secrets::ClientSecrets;
use crate::constants::DRIVE_SCOPE;
use crate::core::GdscanError;

/// Random anti-forgery value echoed back by the redirect.
pub fn new_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Build the consent URL for `redirect_uri`.
///
/// # Errors
///
/// Returns [`GdscanError::Auth`] if the client secrets carry an invalid `auth_uri`.
pub fn authorization_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, GdscanError> {
    Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", DRIVE_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map_err(|e| GdscanError::Auth {
        reason: format!("invalid auth_uri '{}': {e}", secrets.auth_uri),
    })
}

/// Interpret the request target of a redirect.
///
/// Returns `Ok(None)` for unrelated requests (a browser asking for
/// `/favicon.ico`), the authorization code when the redirect carries one.
///
/// # Errors
///
/// Returns [`GdscanError::Auth`] if consent was denied or the state does not match.
pub fn parse_redirect_target(target: &str, expected_state: &str) -> Result<Option<String>, GdscanError> {
    let base = Url::parse("http://127.0.0.1/").map_err(|e| GdscanError::Other {
        message: e.to_string(),
    })?;
    let url = base.join(target).map_err(|e| GdscanError::Auth {
        reason: format!("malformed redirect '{target}': {e}"),
    })?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(GdscanError::Auth {
                    reason: format!("authorization was refused: {value}"),
                });
            }
            _ => {}
        }
    }

    let Some(code) = code else {
        return Ok(None);
    };
    if state.as_deref() != Some(expected_state) {
        return Err(GdscanError::Auth {
            reason: "authorization redirect carried an unexpected state".to_string(),
        });
    }
    Ok(Some(code))
}

/// Serve redirects on `listener` until one carries the authorization code.
///
/// # Errors
///
/// Returns an error if accepting or reading a connection fails, or the redirect
/// reports a refusal.
pub async fn wait_for_code(listener: TcpListener, state: &str) -> Result<String, GdscanError> {
    loop {
        let (mut stream, peer) = listener.accept().await?;
        let mut buf = vec![0u8; 8192];
        let n = stream.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);
        let target = request
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or("/");
        debug!("Redirect request from {peer}");

        let outcome = parse_redirect_target(target, state);
        let (status, body) = match &outcome {
            Ok(Some(_)) => ("200 OK", "Authorization complete. You can close this window."),
            Ok(None) => ("404 Not Found", ""),
            Err(_) => ("400 Bad Request", "Authorization failed. See the terminal for details."),
        };
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        // The browser may already have gone away; the code is what matters.
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;

        match outcome {
            Ok(Some(code)) => return Ok(code),
            Ok(None) => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets() -> ClientSecrets {
        ClientSecrets::from_json(r#"{"installed": {"client_id": "cid", "client_secret": "cs"}}"#)
            .unwrap()
    }

    #[test]
    fn test_state_is_random() {
        let first = new_state();
        let second = new_state();
        assert_ne!(first, second);

        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        // Version nibble of a random (v4) UUID, not a clock or process value.
        assert_eq!(&first[12..13], "4");
    }

    #[test]
    fn test_authorization_url_carries_scope_and_state() {
        let url = authorization_url(&secrets(), "http://127.0.0.1:8080", "xyz").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("client_id".into(), "cid".into())));
        assert!(pairs.contains(&("scope".into(), DRIVE_SCOPE.into())));
        assert!(pairs.contains(&("state".into(), "xyz".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "http://127.0.0.1:8080".into())));
    }

    #[test]
    fn test_redirect_with_code() {
        let code = parse_redirect_target("/?state=xyz&code=4%2F0Ab&scope=x", "xyz").unwrap();
        assert_eq!(code.as_deref(), Some("4/0Ab"));
    }

    #[test]
    fn test_unrelated_request_is_ignored() {
        assert_eq!(parse_redirect_target("/favicon.ico", "xyz").unwrap(), None);
    }

    #[test]
    fn test_refusal_and_forgery_are_errors() {
        let err = parse_redirect_target("/?error=access_denied&state=xyz", "xyz").unwrap_err();
        assert!(err.to_string().contains("access_denied"));

        let err = parse_redirect_target("/?code=c&state=other", "xyz").unwrap_err();
        assert!(matches!(err, GdscanError::Auth { .. }));
    }

    #[tokio::test]
    async fn test_listener_returns_code() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move { wait_for_code(listener, "s1").await });

        let mut favicon = tokio::net::TcpStream::connect(addr).await.unwrap();
        favicon.write_all(b"GET /favicon.ico HTTP/1.1\r\nHost: x\r\n\r\n").await.unwrap();
        let mut ignored = String::new();
        favicon.read_to_string(&mut ignored).await.unwrap();
        assert!(ignored.starts_with("HTTP/1.1 404"));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /?code=abc&state=s1 HTTP/1.1\r\nHost: x\r\n\r\n").await.unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();
        assert!(reply.contains("Authorization complete"));

        assert_eq!(server.await.unwrap().unwrap(), "abc");
    }
}
