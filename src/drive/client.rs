//! Drive v3 REST client.
//!
//! Two calls are used: the paged `files.list` that produces the initial batch, and
//! `files.get` restricted to id, name and parents, which backs [`ItemFetcher`].
//! Transient failures (429, 5xx, rate-limit 403s, connect errors and timeouts) are
//! retried here with exponential backoff; callers see either a result or a
//! final error.

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use super::models::{DriveFile, FileList};
use crate::auth::AccessToken;
use crate::config::ScanConfig;
use crate::constants::{
    DETAIL_FIELDS, DRIVE_FILES_URL, MAX_BACKOFF_DELAY, PARENT_FIELDS, STARTING_BACKOFF_DELAY_MS,
};
use crate::core::GdscanError;
use crate::store::{ItemFetcher, ItemRecord};
use crate::utils::progress::ProgressBar;

/// Outcome of a failed request attempt.
#[derive(Debug)]
enum Failure {
    /// Worth another attempt.
    Transient(GdscanError),
    Fatal(GdscanError),
}

impl Failure {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    fn error(&self) -> &GdscanError {
        match self {
            Self::Transient(e) | Self::Fatal(e) => e,
        }
    }

    fn into_error(self) -> GdscanError {
        match self {
            Self::Transient(e) | Self::Fatal(e) => e,
        }
    }
}

/// Authenticated Drive client.
#[derive(Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    token: AccessToken,
    files_url: Url,
    first_page_size: u32,
    page_size: u32,
    max_retries: usize,
}

impl DriveClient {
    /// Create a client for the public Drive endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GdscanError::Network`] if the HTTP client cannot be built.
    pub fn new(token: AccessToken, config: &ScanConfig) -> Result<Self, GdscanError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("gdscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GdscanError::Network {
                operation: "create HTTP client".to_string(),
                reason: e.to_string(),
            })?;
        let files_url = Url::parse(DRIVE_FILES_URL).map_err(|e| GdscanError::Other {
            message: e.to_string(),
        })?;

        Ok(Self {
            http,
            token,
            files_url,
            first_page_size: config.first_page_size,
            page_size: config.page_size,
            max_retries: config.max_retries,
        })
    }

    /// Point the client at another `files` endpoint.
    #[must_use]
    pub fn with_files_url(mut self, files_url: Url) -> Self {
        self.files_url = files_url;
        self
    }

    /// List every item visible to the account, with full details.
    ///
    /// A small first page gives quick feedback before the large ones. With a
    /// `limit`, no further page is requested once more than `limit` items have
    /// been collected; the result may therefore exceed `limit`.
    ///
    /// # Errors
    ///
    /// Returns the first request failure that survives retrying.
    pub async fn list_files(
        &self,
        limit: Option<usize>,
        progress: &ProgressBar,
    ) -> Result<Vec<DriveFile>, GdscanError> {
        let fields = list_fields();
        let mut files: Vec<DriveFile> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_size = self.first_page_size;

        loop {
            if limit.is_some_and(|limit| files.len() > limit) {
                debug!("Listing limit reached with {} files", files.len());
                break;
            }

            info!("Found {} files: requesting {} more", files.len(), page_size);
            progress.set_message(format!("Listing files ({} so far)", files.len()));

            let mut url = self.files_url.clone();
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &page_size.to_string());
                query.append_pair("fields", &fields);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: FileList = self.get_json("list files", url, None).await?;
            progress.inc(page.files.len() as u64);
            files.extend(page.files);

            page_size = self.page_size;
            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(files)
    }

    /// Fetch id, name and parents of a single item.
    ///
    /// # Errors
    ///
    /// Returns [`GdscanError::NotFound`] if the item does not exist or is not
    /// accessible, another error if the request fails.
    pub async fn get_file(&self, id: &str) -> Result<DriveFile, GdscanError> {
        let mut url = self.files_url.clone();
        url.path_segments_mut()
            .map_err(|()| GdscanError::Other {
                message: format!("{} cannot be a base URL", self.files_url),
            })?
            .push(id);
        url.query_pairs_mut().append_pair("fields", &PARENT_FIELDS.join(", "));

        self.get_json("get file", url, Some(id)).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: Url,
        id: Option<&str>,
    ) -> Result<T, GdscanError> {
        // 200ms, 400ms, 800ms... capped at MAX_BACKOFF_DELAY
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(STARTING_BACKOFF_DELAY_MS / 2)
            .max_delay(MAX_BACKOFF_DELAY)
            .map(jitter)
            .take(self.max_retries);

        RetryIf::start(
            strategy,
            || self.get_once(operation, url.clone(), id),
            |failure: &Failure| {
                let retry = failure.is_transient();
                if retry {
                    warn!("Retrying after transient failure: {}", failure.error());
                }
                retry
            },
        )
        .await
        .map_err(Failure::into_error)
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: Url,
        id: Option<&str>,
    ) -> Result<T, Failure> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.secret())
            .send()
            .await
            .map_err(|e| classify_send_error(operation, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(operation, status, &body, id));
        }

        response.json::<T>().await.map_err(|e| {
            let error = GdscanError::Network {
                operation: operation.to_string(),
                reason: format!("unexpected response body: {e}"),
            };
            if e.is_decode() {
                Failure::Fatal(error)
            } else {
                Failure::Transient(error)
            }
        })
    }
}

impl ItemFetcher for DriveClient {
    async fn fetch_item(&self, id: &str) -> Result<ItemRecord, GdscanError> {
        self.get_file(id).await.map(ItemRecord::from)
    }
}

/// `fields` parameter of the listing request.
fn list_fields() -> String {
    format!("nextPageToken, files({})", DETAIL_FIELDS.join(", "))
}

fn classify_send_error(operation: &str, error: &reqwest::Error) -> Failure {
    let failure = GdscanError::Network {
        operation: operation.to_string(),
        reason: error.to_string(),
    };
    if error.is_timeout() || error.is_connect() || error.is_request() {
        Failure::Transient(failure)
    } else {
        Failure::Fatal(failure)
    }
}

/// Map an unsuccessful response to an error, deciding whether to retry.
///
/// `id` is set for single-item requests, where 404 and non-rate-limit 403 mean
/// the item cannot be seen.
fn classify_status(operation: &str, status: StatusCode, body: &str, id: Option<&str>) -> Failure {
    let network = || GdscanError::Network {
        operation: operation.to_string(),
        reason: format!("HTTP {status}: {}", body.trim()),
    };

    match status {
        StatusCode::UNAUTHORIZED => Failure::Fatal(GdscanError::Auth {
            reason: format!("the Drive API rejected the access token during {operation}"),
        }),
        StatusCode::TOO_MANY_REQUESTS => Failure::Transient(network()),
        StatusCode::FORBIDDEN if is_rate_limited(body) => Failure::Transient(network()),
        StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => match id {
            Some(id) => Failure::Fatal(GdscanError::NotFound {
                id: id.to_string(),
            }),
            None => Failure::Fatal(network()),
        },
        s if s.is_server_error() => Failure::Transient(network()),
        _ => Failure::Fatal(network()),
    }
}

fn is_rate_limited(body: &str) -> bool {
    body.contains("rateLimitExceeded") || body.contains("userRateLimitExceeded")
}
