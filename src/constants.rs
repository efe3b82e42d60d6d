//! Global constants used throughout the gdscan codebase.
//!
//! Drive API field lists, paging parameters, timeouts and retry parameters live
//! here so they are discoverable in one place.

use std::time::Duration;

/// Path segment separator used in encoded item paths.
pub const PATH_SEPARATOR: char = '/';

/// Delimiter used to join several values inside a single report field.
pub const LIST_DELIMITER: char = ',';

/// OAuth scope requested by gdscan. Metadata only: file contents are never read.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly.metadata";

/// Base URL of the Drive v3 `files` collection.
pub const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

/// Fields needed to walk the parent graph.
pub const PARENT_FIELDS: &[&str] = &["id", "name", "parents"];

/// Fields requested for every item in the bulk listing.
pub const DETAIL_FIELDS: &[&str] =
    &["id", "mimeType", "name", "owners", "parents", "permissions", "shared", "webViewLink"];

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Column headers of the shared-items report.
pub const CSV_FIELDS: &[&str] = &["name", "type", "url", "owners", "paths", "permissions"];

/// Size of the first listing page, kept small so the first progress update is quick.
pub const DEFAULT_FIRST_PAGE_SIZE: u32 = 100;

/// Size of every following listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Largest page size the Drive API accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default timeout for a single Drive API request (60 seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default number of retries for transient Drive API failures.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Starting delay for exponential backoff (200ms).
pub const STARTING_BACKOFF_DELAY_MS: u64 = 200;

/// Maximum backoff delay for exponential backoff (5 seconds).
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(5);

/// Tokens expiring within this window are refreshed before use.
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// How long to wait for the browser to complete the authorization redirect.
pub const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(300);
