//! Core types shared across gdscan.
//!
//! Currently this is the error taxonomy and the user-facing error reporting; see
//! [`error`] for details.

pub mod error;

pub use error::{ErrorContext, GdscanError, user_friendly_error};
