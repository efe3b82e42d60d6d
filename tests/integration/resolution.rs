use gdscan::codec::decode_path;
use gdscan::core::GdscanError;
use gdscan::resolver::PathResolver;
use gdscan::store::ItemStore;
use gdscan::test_utils::{FakeFetcher, init_test_logging, record};

/// A listing limited to the user's own items: the team folder tree lives in
/// someone else's drive and is only reachable through single-item fetches.
fn limited_listing() -> PathResolver<FakeFetcher> {
    init_test_logging(None);

    let fetcher = FakeFetcher::with_records([
        record("team-root", "Team Drive", &[]),
        record("team", "Engineering", &["team-root"]),
        record("specs", "Specs/Designs", &["team"]),
    ]);
    let listing = [
        record("mine", "My Drive", &[]),
        record("archive", "Archive, 2023", &["mine"]),
        record("doc", "Roadmap", &["archive", "specs"]),
        record("sheet", "Budget", &["specs"]),
    ];
    PathResolver::new(ItemStore::new(fetcher, listing))
}

#[tokio::test]
async fn test_item_in_owned_and_shared_folders() {
    let mut resolver = limited_listing();

    let paths = resolver.resolve_encoded("doc").await.unwrap();
    assert_eq!(
        paths,
        [
            "My Drive/Archive\\54 2023/Roadmap",
            "Team Drive/Engineering/Specs\\57Designs/Roadmap",
        ]
    );

    let fetcher = resolver.store().fetcher();
    assert_eq!(fetcher.calls(), ["specs", "team", "team-root"]);
}

#[tokio::test]
async fn test_unlisted_ancestors_are_fetched_once_per_run() {
    let mut resolver = limited_listing();

    resolver.resolve("doc").await.unwrap();
    let paths = resolver.resolve_encoded("sheet").await.unwrap();
    assert_eq!(paths, ["Team Drive/Engineering/Specs\\57Designs/Budget"]);

    assert_eq!(resolver.store().fetch_count(), 3);
    for id in ["specs", "team", "team-root"] {
        assert_eq!(resolver.store().fetcher().call_count(id), 1, "{id}");
    }
}

#[tokio::test]
async fn test_encoded_paths_decode_to_raw_names() {
    let mut resolver = limited_listing();
    let paths = resolver.resolve("doc").await.unwrap();

    for path in paths.iter() {
        assert_eq!(decode_path(path.encoded()).unwrap(), path.names());
    }
    assert_eq!(paths[1].names(), ["Team Drive", "Engineering", "Specs/Designs", "Roadmap"]);
}

#[tokio::test]
async fn test_inaccessible_ancestor_fails_whole_item() {
    let fetcher = FakeFetcher::with_records([record("a", "A", &[])]);
    let listing = [record("doc", "Doc", &["a", "hidden"])];
    let mut resolver = PathResolver::new(ItemStore::new(fetcher, listing));

    let err = resolver.resolve("doc").await.unwrap_err();
    assert!(matches!(err, GdscanError::NotFound { ref id } if id == "hidden"));
    assert!(resolver.cached("doc").is_none());
    // The ancestor resolved before the failure stays memoized.
    assert!(resolver.cached("a").is_some());
}

#[tokio::test]
async fn test_inconsistent_fetcher_is_rejected() {
    let fetcher = FakeFetcher::new().with_alias("parent", record("other", "Other", &[]));
    let listing = [record("doc", "Doc", &["parent"])];
    let mut resolver = PathResolver::new(ItemStore::new(fetcher, listing));

    let err = resolver.resolve("doc").await.unwrap_err();
    assert!(matches!(
        err,
        GdscanError::Consistency { ref requested, ref returned }
            if requested == "parent" && returned == "other"
    ));
    assert!(!resolver.store().contains("other"));
    assert!(!resolver.store().contains("parent"));
}

#[tokio::test]
async fn test_cycle_is_reported() {
    let listing = [
        record("doc", "Doc", &["x"]),
        record("x", "X", &["y"]),
        record("y", "Y", &["x"]),
    ];
    let mut resolver = PathResolver::new(ItemStore::new(FakeFetcher::new(), listing));

    let err = resolver.resolve("doc").await.unwrap_err();
    match err {
        GdscanError::Cycle { chain } => assert_eq!(chain, "x → y → x"),
        other => panic!("expected a cycle, got {other:?}"),
    }
}
