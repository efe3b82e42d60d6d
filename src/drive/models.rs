//! Drive v3 wire models.
//!
//! Only the fields gdscan requests are modelled. Everything beyond id, name and
//! parents is descriptive data that the resolution engine never interprets; the
//! report reads it.

use serde::{Deserialize, Serialize};

use crate::constants::FOLDER_MIME_TYPE;
use crate::store::ItemRecord;

/// A file or folder as returned by `files.list` / `files.get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<User>,

    /// Parent folder ids; empty for roots and for items shared with the user
    /// whose parents are not visible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    /// Absent when the caller may not see the item's permissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    #[serde(default)]
    pub shared: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }

    /// The fields path resolution needs.
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord::new(self.id.clone(), self.name.clone(), self.parents.clone())
    }
}

impl From<DriveFile> for ItemRecord {
    fn from(file: DriveFile) -> Self {
        ItemRecord::new(file.id, file.name, file.parents)
    }
}

/// A Drive user (file owner).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

/// One access grant on a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub id: String,

    /// Grantee type: `user`, `group`, `domain` or `anyone`.
    #[serde(default, rename = "type")]
    pub grantee_type: String,

    /// `owner`, `organizer`, `fileOrganizer`, `writer`, `commenter` or `reader`.
    #[serde(default)]
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Set on grants to accounts that have since been deleted.
    #[serde(default)]
    pub deleted: bool,
}

/// One page of `files.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub next_page_token: Option<String>,

    #[serde(default)]
    pub files: Vec<DriveFile>,
}
