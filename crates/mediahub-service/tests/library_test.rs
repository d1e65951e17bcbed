//! Integration tests for the media library session state.

mod helpers;

use helpers::{Call, Harness, asset, file};

use tokio::sync::watch;

use mediahub_core::config::AppConfig;
use mediahub_core::error::ErrorKind;
use mediahub_core::types::AssetId;
use mediahub_entity::FolderPath;
use mediahub_service::{MediaLibrary, RetirementPolicy, UploadTarget};

async fn library(h: &Harness) -> MediaLibrary {
    let mut library = MediaLibrary::new(&h.stores(), &AppConfig::default());
    library.refresh().await.unwrap();
    library
}

#[tokio::test]
async fn test_refresh_sorts_by_id() {
    let h = Harness::new(vec![asset("3", "a"), asset("1", "a"), asset("2", "a")]);
    let library = library(&h).await;

    let ids: Vec<&str> = library.assets().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    let folder = library.folder(&FolderPath::navigation("a"));
    let grid: Vec<&str> = folder.items.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(grid, vec!["1.png", "2.png", "3.png"]);
}

#[tokio::test]
async fn test_create_folder_validation() {
    let h = Harness::new(vec![asset("1", "photos")]);
    let mut library = library(&h).await;

    for bad in ["", "   ", "a/b", ".", ".."] {
        let err = library.create_folder(bad).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{bad:?}");
    }

    let err = library.create_folder("photos").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let path = library.create_folder(" drafts ").unwrap();
    assert_eq!(path, FolderPath::navigation("drafts"));
    assert!(library.overlay().contains(&path));
    assert_eq!(library.create_folder("drafts").unwrap_err().kind, ErrorKind::Conflict);
    assert!(library.tree().child("drafts").is_some());
}

#[tokio::test]
async fn test_upload_promotes_virtual_folder() {
    let h = Harness::new(Vec::new());
    let mut library = library(&h).await;

    library.navigate(FolderPath::navigation("products"));
    let path = library.create_folder("sku-1").unwrap();
    library.enter("sku-1");
    assert_eq!(library.current_path(), &path);
    assert!(library.current_folder().items.is_empty());

    let (tx, _rx) = watch::channel(0);
    let report = library
        .upload(vec![file("front.jpg", 32)], UploadTarget::Current, tx)
        .await;

    assert!(report.is_complete_success());
    assert!(library.overlay().is_empty());
    let current = library.current_folder();
    assert_eq!(current.items.len(), 1);
    assert_eq!(current.items[0].folder, "products/sku-1");
}

#[tokio::test]
async fn test_upload_at_root_lands_in_default() {
    let h = Harness::new(Vec::new());
    let mut library = library(&h).await;

    let (tx, _rx) = watch::channel(0);
    library
        .upload(vec![file("loose.png", 8)], UploadTarget::Current, tx)
        .await;

    assert_eq!(library.assets()[0].folder, "default");
}

#[tokio::test]
async fn test_move_selected_clears_selection() {
    let h = Harness::new(vec![asset("4", "p/q"), asset("5", "p/q"), asset("6", "p")]);
    let mut library = library(&h).await;

    assert!(library.move_selected("r").await.unwrap_err().is_validation());

    library.select(AssetId::from("4"));
    library.select(AssetId::from("5"));
    library.select(AssetId::from("6"));
    library.deselect(&AssetId::from("6"));

    let report = library.move_selected("r").await.unwrap();
    assert_eq!(report.moved.len(), 2);
    assert!(library.selection().is_empty());
    assert!(library.folder(&FolderPath::navigation("p/q")).items.is_empty());
    assert_eq!(library.folder(&FolderPath::navigation("r")).items.len(), 2);
}

#[tokio::test]
async fn test_failed_move_keeps_selection_and_refreshes() {
    let h = Harness::new(vec![asset("4", "p"), asset("5", "p")]);
    h.metadata.fail_update_of("5");
    let mut library = library(&h).await;
    library.select(AssetId::from("4"));
    library.select(AssetId::from("5"));

    assert!(library.move_selected("r").await.is_err());
    assert_eq!(library.selection().len(), 2);
    assert_eq!(library.folder(&FolderPath::navigation("r")).items.len(), 1);
}

#[tokio::test]
async fn test_move_assets_keeps_given_order() {
    let h = Harness::new(vec![asset("4", "p"), asset("5", "p"), asset("6", "p")]);
    let mut library = library(&h).await;
    library.select(AssetId::from("5"));
    h.log.clear();

    let ids = [AssetId::from("6"), AssetId::from("4"), AssetId::from("5")];
    library.move_assets(&ids, "r").await.unwrap();

    let updated: Vec<Call> = h.log.mutations();
    assert_eq!(
        updated,
        vec![
            Call::Update(AssetId::from("6"), "r".into()),
            Call::Update(AssetId::from("4"), "r".into()),
            Call::Update(AssetId::from("5"), "r".into()),
        ]
    );
    assert!(library.selection().is_empty());
}

#[tokio::test]
async fn test_upload_report_survives_failed_refresh() {
    let h = Harness::new(Vec::new());
    let mut library = library(&h).await;
    h.metadata.fail_lists_after(0);

    let (tx, _rx) = watch::channel(0);
    let report = library
        .upload(
            vec![file("a.png", 8), file("b.png", 20 * 1024 * 1024)],
            UploadTarget::Folder(FolderPath::navigation("shots")),
            tx,
        )
        .await;

    assert_eq!(report.uploaded().count(), 1);
    assert!(report.outcomes[1].is_rejected());
    assert_eq!(
        library.refresh_error().map(|e| e.kind),
        Some(ErrorKind::ExternalService)
    );
    assert!(library.assets().is_empty());

    h.metadata.fail_lists_after(usize::MAX);
    library.refresh().await.unwrap();
    assert!(library.refresh_error().is_none());
    assert_eq!(library.assets().len(), 1);
}

#[tokio::test]
async fn test_delete_navigates_even_when_refresh_fails() {
    let h = Harness::new(vec![asset("1", "a/b"), asset("2", "a")]);
    let mut library = library(&h).await;
    library.navigate(FolderPath::navigation("a/b"));
    h.metadata.fail_lists_after(0);

    let report = library
        .delete_folder(&FolderPath::navigation("a/b"), None)
        .await
        .unwrap();

    assert!(report.is_retired());
    assert_eq!(library.current_path(), &FolderPath::navigation("a"));
    assert!(library.refresh_error().is_some());
}

#[tokio::test]
async fn test_delete_navigates_to_parent() {
    let h = Harness::new(vec![asset("1", "a/b"), asset("2", "a/b/c"), asset("3", "a")]);
    let mut library = library(&h).await;
    library.navigate(FolderPath::navigation("a/b/c"));
    h.log.clear();

    let report = library
        .delete_folder(&FolderPath::navigation("a/b"), None)
        .await
        .unwrap();

    assert!(report.is_retired());
    assert_eq!(library.current_path(), &FolderPath::navigation("a"));
    assert!(library.tree().get(&FolderPath::navigation("a/b")).is_none());
    assert_eq!(library.current_folder().items.len(), 1);
    assert_eq!(
        h.log.mutations().last(),
        Some(&Call::DeleteFolder("a/b".into()))
    );
}

#[tokio::test]
async fn test_strict_failure_keeps_navigation() {
    let h = Harness::new(vec![asset("1", "a/b"), asset("2", "a/b")]);
    h.metadata.fail_delete_of("2");
    let mut library = library(&h).await;
    library.navigate(FolderPath::navigation("a/b"));

    let report = library
        .delete_folder(&FolderPath::navigation("a/b"), None)
        .await
        .unwrap();

    assert_eq!(report.policy, RetirementPolicy::Strict);
    assert!(!report.is_retired());
    assert_eq!(library.current_path(), &FolderPath::navigation("a/b"));
    let current = library.current_folder();
    let remaining: Vec<&str> = current.items.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(remaining, vec!["2"]);
}

#[tokio::test]
async fn test_stale_navigation_resolves_to_empty() {
    let h = Harness::new(vec![asset("1", "a")]);
    let mut library = library(&h).await;
    library.navigate(FolderPath::navigation("gone/forever"));

    let node = library.current_folder();
    assert!(node.children.is_empty());
    assert!(node.items.is_empty());

    library.navigate_up();
    library.navigate_up();
    library.navigate_up();
    assert!(library.current_path().is_root());
}
