//! Shared-item report.
//!
//! One CSV row per shared item, in listing order:
//!
//! | column        | content                                                        |
//! |---------------|----------------------------------------------------------------|
//! | `name`        | raw item name                                                  |
//! | `type`        | `folder` or `file`                                             |
//! | `url`         | web view link                                                  |
//! | `owners`      | encoded `Name <email>` of every owner, joined by `,`            |
//! | `paths`       | every encoded path of the item, joined by `,`                  |
//! | `permissions` | encoded grantee plus ` (role)` per live grant, joined by `,`    |
//!
//! Owners, paths and grantees are encoded with [`crate::codec`], so the only raw
//! commas inside those columns are list delimiters. Rows are only written once
//! every path of the item has been resolved; the first item that cannot be
//! resolved aborts the report.

pub mod csv;

use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, info};

use crate::codec::encode;
use crate::constants::{CSV_FIELDS, LIST_DELIMITER};
use crate::drive::{DriveFile, Permission, User};
use crate::resolver::PathResolver;
use crate::store::ItemFetcher;
use crate::utils::progress::ProgressBar;
use csv::CsvWriter;

/// A rendered report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub item_type: &'static str,
    pub url: String,
    pub owners: String,
    pub paths: String,
    pub permissions: String,
}

impl ReportRow {
    /// Fields in [`CSV_FIELDS`] order.
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.name,
            self.item_type,
            &self.url,
            &self.owners,
            &self.paths,
            &self.permissions,
        ]
    }
}

/// Counts of a finished report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total_files: usize,
    pub shared_files: usize,
    /// Number of paths written over all rows.
    pub paths: usize,
}

/// `Name <email>`, or just the name when the email is not visible.
pub fn format_user(display_name: &str, email: Option<&str>) -> String {
    match email {
        Some(email) => format!("{display_name} <{email}>"),
        None => display_name.to_string(),
    }
}

/// How a grantee appears in the `permissions` column, before encoding.
pub fn format_grantee(permission: &Permission) -> String {
    match permission.grantee_type.as_str() {
        "user" => format_user(
            permission.display_name.as_deref().unwrap_or_default(),
            permission.email_address.as_deref(),
        ),
        "anyone" => "(Anyone)".to_string(),
        other => format!("({other})"),
    }
}

fn join_encoded(values: impl Iterator<Item = String>) -> String {
    values.collect::<Vec<_>>().join(&LIST_DELIMITER.to_string())
}

/// `owners` column.
pub fn encode_owners(owners: &[User]) -> String {
    join_encoded(
        owners.iter().map(|u| encode(&format_user(&u.display_name, u.email_address.as_deref()))),
    )
}

/// `permissions` column; grants to deleted accounts are skipped.
pub fn encode_permissions(permissions: Option<&[Permission]>) -> String {
    join_encoded(
        permissions
            .unwrap_or_default()
            .iter()
            .filter(|p| !p.deleted)
            .map(|p| format!("{} ({})", encode(&format_grantee(p)), p.role)),
    )
}

/// Items whose `shared` flag is set, in listing order.
pub fn shared_items(files: &[DriveFile]) -> Vec<&DriveFile> {
    files.iter().filter(|f| f.shared).collect()
}

/// Resolve the paths of `file` and render its row.
///
/// # Errors
///
/// Returns any resolution error for the item, with the item named in the context.
pub async fn build_row<F: ItemFetcher>(
    resolver: &mut PathResolver<F>,
    file: &DriveFile,
) -> Result<ReportRow> {
    let paths = resolver
        .resolve(&file.id)
        .await
        .with_context(|| format!("Failed to resolve paths for '{}' ({})", file.name, file.id))?;

    Ok(ReportRow {
        name: file.name.clone(),
        item_type: if file.is_folder() { "folder" } else { "file" },
        url: file.web_view_link.clone().unwrap_or_default(),
        owners: encode_owners(&file.owners),
        paths: join_encoded(paths.iter().map(|p| p.encoded().to_string())),
        permissions: encode_permissions(file.permissions.as_deref()),
    })
}

/// Write the report for every shared item in `files` to `out`.
///
/// # Errors
///
/// Returns the first resolution or write error. Rows written before the error
/// remain in `out`; callers writing to a file should discard it.
pub async fn write_shared_items<F, W>(
    out: W,
    resolver: &mut PathResolver<F>,
    files: &[DriveFile],
    progress: &ProgressBar,
) -> Result<ReportSummary>
where
    F: ItemFetcher,
    W: Write,
{
    let shared = shared_items(files);
    let mut writer = CsvWriter::new(out);
    writer.write_record(CSV_FIELDS).context("Failed to write report header")?;

    info!("Found {} files", files.len());
    info!("Found {} shared files", shared.len());

    let mut summary = ReportSummary {
        total_files: files.len(),
        shared_files: shared.len(),
        paths: 0,
    };

    for file in shared {
        progress.set_message(file.name.clone());
        let row = build_row(resolver, file).await?;
        summary.paths += resolver.cached(&file.id).map_or(0, |paths| paths.len());
        writer
            .write_record(row.fields())
            .with_context(|| format!("Failed to write report row for '{}'", file.name))?;
        progress.inc(1);
    }

    writer.flush().context("Failed to flush report")?;
    debug!(
        "Report complete: {} rows, {} single-item fetches",
        writer.records() - 1,
        resolver.store().fetch_count()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GdscanError;
    use crate::store::ItemStore;
    use crate::test_utils::{DriveFileFixture, FakeFetcher, record};

    fn resolver_for(files: &[DriveFile], fetcher: FakeFetcher) -> PathResolver<FakeFetcher> {
        PathResolver::new(ItemStore::new(fetcher, files.iter().map(DriveFile::to_record)))
    }

    async fn render(files: &[DriveFile], fetcher: FakeFetcher) -> Result<(String, ReportSummary)> {
        let mut resolver = resolver_for(files, fetcher);
        let mut out = Vec::new();
        let summary =
            write_shared_items(&mut out, &mut resolver, files, &ProgressBar::hidden()).await?;
        Ok((String::from_utf8(out)?, summary))
    }

    #[test]
    fn test_format_user() {
        assert_eq!(format_user("Ada", Some("ada@example.com")), "Ada <ada@example.com>");
        assert_eq!(format_user("Ada", None), "Ada");
    }

    #[test]
    fn test_format_grantee() {
        let files = [DriveFileFixture::document("d", "Doc")
            .user_permission("Bob", "bob@example.com", "writer")
            .permission("anyone", "reader")
            .permission("domain", "commenter")
            .build()];
        let grantees: Vec<String> =
            files[0].permissions.as_ref().unwrap().iter().map(format_grantee).collect();
        assert_eq!(grantees, ["Bob <bob@example.com>", "(Anyone)", "(domain)"]);
    }

    #[test]
    fn test_permissions_skip_deleted_and_encode_commas() {
        let file = DriveFileFixture::document("d", "Doc")
            .user_permission("Smith, Bob", "bob@example.com", "writer")
            .deleted_permission("reader")
            .permission("anyone", "reader")
            .build();
        assert_eq!(
            encode_permissions(file.permissions.as_deref()),
            "Smith\\54 Bob <bob@example.com> (writer),(Anyone) (reader)"
        );
        assert_eq!(encode_permissions(None), "");
    }

    #[tokio::test]
    async fn test_report_rows() {
        let files = vec![
            DriveFileFixture::folder("root", "My Drive").build(),
            DriveFileFixture::folder("projects", "Projects").parents(&["root"]).shared().build(),
            DriveFileFixture::document("plan", "Plan, v2")
                .parents(&["projects", "ext"])
                .shared()
                .permission("anyone", "reader")
                .build(),
            DriveFileFixture::document("private", "Private").parents(&["root"]).build(),
        ];
        let fetcher = FakeFetcher::with_records([record("ext", "Shared/Team", &[])]);

        let (csv, summary) = render(&files, fetcher).await.unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], "name,type,url,owners,paths,permissions");
        assert_eq!(
            lines[1],
            "Projects,folder,https://drive.google.com/drive/folders/projects,Ada Lovelace <ada@example.com>,My Drive/Projects,"
        );
        assert_eq!(
            lines[2],
            "\"Plan, v2\",file,https://docs.google.com/document/d/plan,Ada Lovelace <ada@example.com>,\"My Drive/Projects/Plan\\54 v2,Shared\\57Team/Plan\\54 v2\",(Anyone) (reader)"
        );
        assert_eq!(lines[3], "");
        assert_eq!(
            summary,
            ReportSummary {
                total_files: 4,
                shared_files: 2,
                paths: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_unresolvable_item_aborts_report() {
        let files = vec![
            DriveFileFixture::document("orphan", "Orphan").parents(&["gone"]).shared().build(),
        ];

        let err = render(&files, FakeFetcher::new()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to resolve paths for 'Orphan'"));
        assert!(matches!(
            err.downcast_ref::<GdscanError>(),
            Some(GdscanError::NotFound { id }) if id == "gone"
        ));
    }
}
