use gdscan::codec::{decode, decode_path_list};
use gdscan::drive::DriveFile;
use gdscan::report::write_shared_items;
use gdscan::resolver::PathResolver;
use gdscan::store::ItemStore;
use gdscan::test_utils::{DriveFileFixture, FakeFetcher, record};
use gdscan::utils::progress::ProgressBar;

fn listing() -> Vec<DriveFile> {
    vec![
        DriveFileFixture::folder("root", "My Drive").build(),
        DriveFileFixture::folder("clients", "Clients").parents(&["root"]).build(),
        DriveFileFixture::document("contract", "Contract \"A\", signed")
            .parents(&["clients", "legal"])
            .shared()
            .owner("Smith, Jo", Some("jo@example.com"))
            .user_permission("Lee", "lee@example.com", "commenter")
            .permission("domain", "reader")
            .deleted_permission("writer")
            .build(),
        DriveFileFixture::document("notes", "Notes").parents(&["root"]).build(),
    ]
}

/// Split CRLF-terminated output into rows of fields, honouring quotes.
fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', _) => quoted = !quoted,
            (',', false) => row.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (c, _) => field.push(c),
        }
    }
    rows
}

#[tokio::test]
async fn test_report_round_trips_through_csv() {
    let files = listing();
    let fetcher = FakeFetcher::with_records([record("legal", "Legal/Compliance", &[])]);
    let mut resolver =
        PathResolver::new(ItemStore::new(fetcher, files.iter().map(DriveFile::to_record)));

    let mut out = Vec::new();
    let summary = write_shared_items(&mut out, &mut resolver, &files, &ProgressBar::hidden())
        .await
        .unwrap();
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.shared_files, 1);
    assert_eq!(summary.paths, 2);

    let rows = parse_csv(&String::from_utf8(out).unwrap());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], ["name", "type", "url", "owners", "paths", "permissions"]);

    let row = &rows[1];
    assert_eq!(row[0], "Contract \"A\", signed");
    assert_eq!(row[1], "file");
    assert_eq!(row[2], "https://docs.google.com/document/d/contract");
    assert_eq!(decode(&row[3]).unwrap(), "Smith, Jo <jo@example.com>");

    let paths = decode_path_list(&row[4]).unwrap();
    assert_eq!(
        paths,
        [
            vec!["My Drive", "Clients", "Contract \"A\", signed"],
            vec!["Legal/Compliance", "Contract \"A\", signed"],
        ]
    );

    assert_eq!(row[5], "Lee <lee@example.com> (commenter),(domain) (reader)");
}

#[tokio::test]
async fn test_no_shared_items_gives_header_only() {
    let files = vec![DriveFileFixture::folder("root", "My Drive").build()];
    let mut resolver =
        PathResolver::new(ItemStore::new(FakeFetcher::new(), files.iter().map(DriveFile::to_record)));

    let mut out = Vec::new();
    let summary = write_shared_items(&mut out, &mut resolver, &files, &ProgressBar::hidden())
        .await
        .unwrap();

    assert_eq!(summary.shared_files, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "name,type,url,owners,paths,permissions\r\n");
    assert_eq!(resolver.store().fetch_count(), 0);
}
