//! Configuration management for gdscan.
//!
//! See [`global`] for the file format and default locations. Command-line flags
//! override values from the file; the CLI applies them after loading.

pub mod global;

pub use global::ScanConfig;
