//! Integration test suite for gdscan
//!
//! End-to-end tests through the public API and the compiled binary. None of them
//! touch the network: the resolution engine runs against
//! [`gdscan::test_utils::FakeFetcher`], and the binary is only exercised on paths
//! that fail or finish before authorization.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: multi-parent path resolution over a seeded store
//! - **report**: CSV output for a realistic listing
//! - **cli**: command-line behavior of the `gdscan` binary

mod cli;
mod report;
mod resolution;
