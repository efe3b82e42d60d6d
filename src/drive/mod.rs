//! Google Drive v3 collaborator.
//!
//! [`DriveClient`] lists every item visible to the account and fetches single
//! items for the [`ItemStore`](crate::store::ItemStore); [`models`] holds the wire
//! types. Only metadata is requested, never file contents.

pub mod client;
pub mod models;

pub use client::DriveClient;
pub use models::{DriveFile, FileList, Permission, User};
