//! Test fixtures for item records and Drive listing entries.

use crate::constants::FOLDER_MIME_TYPE;
use crate::drive::{DriveFile, Permission, User};
use crate::store::ItemRecord;

/// Build an [`ItemRecord`] from string slices.
pub fn record(id: &str, name: &str, parents: &[&str]) -> ItemRecord {
    ItemRecord::new(id, name, parents.iter().map(|p| (*p).to_string()).collect())
}

/// Builder for [`DriveFile`] entries as they come out of the bulk listing.
#[derive(Clone, Debug)]
pub struct DriveFileFixture {
    file: DriveFile,
}

impl DriveFileFixture {
    /// A private document with one owner (`Ada Lovelace <ada@example.com>`).
    pub fn document(id: &str, name: &str) -> Self {
        Self {
            file: DriveFile {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: Some("application/vnd.google-apps.document".to_string()),
                owners: vec![User {
                    display_name: "Ada Lovelace".to_string(),
                    email_address: Some("ada@example.com".to_string()),
                }],
                web_view_link: Some(format!("https://docs.google.com/document/d/{id}")),
                ..DriveFile::default()
            },
        }
    }

    /// A private folder with the same owner as [`DriveFileFixture::document`].
    pub fn folder(id: &str, name: &str) -> Self {
        let mut fixture = Self::document(id, name);
        fixture.file.mime_type = Some(FOLDER_MIME_TYPE.to_string());
        fixture.file.web_view_link = Some(format!("https://drive.google.com/drive/folders/{id}"));
        fixture
    }

    #[must_use]
    pub fn parents(mut self, parents: &[&str]) -> Self {
        self.file.parents = parents.iter().map(|p| (*p).to_string()).collect();
        self
    }

    #[must_use]
    pub fn shared(mut self) -> Self {
        self.file.shared = true;
        self
    }

    #[must_use]
    pub fn owner(mut self, display_name: &str, email: Option<&str>) -> Self {
        self.file.owners = vec![User {
            display_name: display_name.to_string(),
            email_address: email.map(str::to_string),
        }];
        self
    }

    /// Grant `role` to a user.
    #[must_use]
    pub fn user_permission(mut self, display_name: &str, email: &str, role: &str) -> Self {
        self.push_permission(Permission {
            id: format!("perm-{email}"),
            grantee_type: "user".to_string(),
            role: role.to_string(),
            display_name: Some(display_name.to_string()),
            email_address: Some(email.to_string()),
            ..Permission::default()
        });
        self
    }

    /// Grant `role` to a non-user grantee type (`anyone`, `domain`, `group`).
    #[must_use]
    pub fn permission(mut self, grantee_type: &str, role: &str) -> Self {
        self.push_permission(Permission {
            id: format!("perm-{grantee_type}"),
            grantee_type: grantee_type.to_string(),
            role: role.to_string(),
            ..Permission::default()
        });
        self
    }

    /// A grant to an account that has since been deleted.
    #[must_use]
    pub fn deleted_permission(mut self, role: &str) -> Self {
        self.push_permission(Permission {
            id: "perm-deleted".to_string(),
            grantee_type: "user".to_string(),
            role: role.to_string(),
            deleted: true,
            ..Permission::default()
        });
        self
    }

    pub fn build(self) -> DriveFile {
        self.file
    }

    fn push_permission(&mut self, permission: Permission) {
        self.file.permissions.get_or_insert_with(Vec::new).push(permission);
    }
}
