//! Test utilities for gdscan
//!
//! Helpers for unit and integration tests that exercise the resolution engine and
//! the report without a network connection:
//! - [`FakeFetcher`] - in-memory [`ItemFetcher`](crate::store::ItemFetcher) that
//!   records every call
//! - [`record`] and the [`fixtures`] builders for records and Drive listing items
//! - [`HttpStub`] - loopback HTTP endpoint with canned responses, standing in for
//!   the Drive API and the OAuth token endpoint
//! - [`init_test_logging`] for tracing output in tests
//!
//! # Example
//!
//! ```rust,no_run
//! use gdscan::resolver::PathResolver;
//! use gdscan::store::ItemStore;
//! use gdscan::test_utils::{FakeFetcher, record};
//!
//! # async fn example() {
//! let fetcher = FakeFetcher::with_records([record("root", "My Drive", &[])]);
//! let store = ItemStore::new(fetcher, [record("doc", "Doc", &["root"])]);
//! let mut resolver = PathResolver::new(store);
//!
//! assert_eq!(resolver.resolve_encoded("doc").await.unwrap(), ["My Drive/Doc"]);
//! assert_eq!(resolver.store().fetcher().calls(), ["root"]);
//! # }
//! ```

pub mod fake_fetcher;
pub mod fixtures;
pub mod http_stub;

pub use fake_fetcher::FakeFetcher;
pub use fixtures::{DriveFileFixture, record};
pub use http_stub::{HttpStub, StubRequest};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once regardless of how many times it is
/// called. Uses `level` if given, otherwise `RUST_LOG` if set, otherwise stays
/// silent.
///
/// ```bash
/// RUST_LOG=gdscan=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
