//! Supporting utilities that are not specific to the resolution engine.
//!
//! - [`progress`] - terminal progress indicators for listing and reporting

pub mod progress;
