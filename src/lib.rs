//! gdscan - Google Drive shared-item scanner
//!
//! Lists every item visible to a Google Drive account and writes a CSV report of
//! the shared ones, with every folder path leading to each item, its owners and
//! the grants on it.
//!
//! # Architecture Overview
//!
//! Drive items form a directed graph rather than a tree: an item may sit in
//! several folders at once, and folders shared by other people may be missing
//! from the account's own listing. Reporting "where is this item" therefore means
//! enumerating every root-to-item path, fetching unlisted ancestors on demand.
//!
//! The resolution engine has three parts and no I/O of its own:
//!
//! - [`codec`] - reversible escaping of names so `/` and `,` stay structural
//! - [`store`] - id-keyed records seeded from the listing, fetching misses
//!   through an [`ItemFetcher`](store::ItemFetcher)
//! - [`resolver`] - memoized multi-parent path resolution with cycle detection
//!
//! Around it:
//!
//! - [`drive`] - Drive v3 REST client (bulk listing, single-item fetch, retries)
//! - [`auth`] - OAuth client secrets, stored token, refresh and browser consent
//! - [`report`] - shared-item filtering, owner/grant formatting, CSV output
//! - [`config`] - `~/.gdscan/config.toml`
//! - [`cli`] - command-line surface
//!
//! # Example
//!
//! ```rust,no_run
//! use gdscan::resolver::PathResolver;
//! use gdscan::store::{ItemFetcher, ItemRecord, ItemStore};
//!
//! # async fn example(fetcher: impl ItemFetcher) -> Result<(), gdscan::core::GdscanError> {
//! let listing = vec![
//!     ItemRecord::root("root", "My Drive"),
//!     ItemRecord::new("doc", "Q1, final", vec!["root".to_string(), "team".to_string()]),
//! ];
//! let mut resolver = PathResolver::new(ItemStore::new(fetcher, listing));
//!
//! // "team" is not in the listing and is fetched on demand.
//! for path in resolver.resolve_encoded("doc").await? {
//!     println!("{path}"); // e.g. "My Drive/Q1\54 final"
//! }
//! # Ok(())
//! # }
//! ```

// Resolution engine
pub mod codec;
pub mod resolver;
pub mod store;

// Google Drive integration
pub mod auth;
pub mod drive;

// Application
pub mod cli;
pub mod config;
pub mod core;
pub mod report;

// Supporting modules
pub mod constants;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
