//! Integration tests for tree building, folder deletion, and moves.

mod helpers;

use helpers::{Call, Harness, asset};

use mediahub_core::error::ErrorKind;
use mediahub_core::traits::MetadataStore;
use mediahub_core::types::{Asset, AssetId};
use mediahub_entity::FolderPath;
use mediahub_service::{
    DeletionCoordinator, DeletionPhase, FolderDeletionOutcome, MoveCoordinator, RemoteDeletion,
    RetirementPolicy, VirtualOverlay, build_tree, merge_overlay,
};

fn ids(assets: &[Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.id.as_str()).collect()
}

fn coordinator(h: &Harness) -> DeletionCoordinator {
    DeletionCoordinator::new(h.metadata.clone(), h.assets.clone())
}

fn nested() -> Vec<Asset> {
    vec![asset("1", "a"), asset("2", "a/b"), asset("3", "a/c"), asset("9", "z")]
}

#[test]
fn test_tree_shape() {
    let tree = build_tree(&[asset("1", "a/b"), asset("2", "a/b"), asset("3", "a")]);

    let a = tree.child("a").unwrap();
    assert_eq!(ids(&a.items), vec!["3"]);
    assert_eq!(ids(&a.child("b").unwrap().items), vec!["1", "2"]);
    assert!(tree.items.is_empty());
}

#[test]
fn test_navigator_is_total() {
    let tree = build_tree(&nested());
    for path in ["missing", "a/missing/deeper", "z/a", "a/b/c/d/e"] {
        let node = tree.resolve(&FolderPath::navigation(path));
        assert!(node.children.is_empty());
        assert!(node.items.is_empty());
    }
}

#[tokio::test]
async fn test_empty_folder_delete_touches_no_store() {
    let h = Harness::new(Vec::new());
    let mut overlay = VirtualOverlay::new();
    overlay.add(FolderPath::navigation("x/y"));
    overlay.add(FolderPath::navigation("x/y/z"));
    overlay.add(FolderPath::navigation("x/w"));
    let tree = merge_overlay(build_tree(&[]), &overlay);

    let report = coordinator(&h)
        .delete_folder(
            &tree,
            &mut overlay,
            &FolderPath::navigation("x/y"),
            RetirementPolicy::Strict,
        )
        .await
        .unwrap();

    assert!(matches!(
        report.outcome,
        FolderDeletionOutcome::Retired { summary: None }
    ));
    assert!(report.items.is_empty());
    assert!(h.log.calls().is_empty());
    assert_eq!(
        overlay.paths().map(|p| p.join()).collect::<Vec<_>>(),
        vec!["x/w"]
    );
    assert_eq!(report.navigate_to(), FolderPath::navigation("x"));
}

#[tokio::test]
async fn test_cascading_delete_is_sequential_depth_first() {
    let h = Harness::new(nested());
    let mut overlay = VirtualOverlay::new();
    let tree = build_tree(&nested());
    let deletions = coordinator(&h);
    let phase = deletions.subscribe();

    let report = deletions
        .delete_folder(
            &tree,
            &mut overlay,
            &FolderPath::navigation("a"),
            RetirementPolicy::Strict,
        )
        .await
        .unwrap();

    assert_eq!(
        h.log.calls(),
        vec![
            Call::RemoteDelete("a/1".into()),
            Call::Delete(AssetId::from("1")),
            Call::RemoteDelete("a/b/2".into()),
            Call::Delete(AssetId::from("2")),
            Call::RemoteDelete("a/c/3".into()),
            Call::Delete(AssetId::from("3")),
            Call::DeleteFolder("a".into()),
        ]
    );
    assert!(matches!(
        report.outcome,
        FolderDeletionOutcome::Retired { summary: Some(_) }
    ));
    assert_eq!(*phase.borrow(), DeletionPhase::Done);

    let left = h.metadata.list().await.unwrap();
    assert_eq!(ids(&left), vec!["9"]);
}

#[tokio::test]
async fn test_remote_failures_do_not_block_metadata_delete() {
    let h = Harness::new(nested());
    h.assets.fail_remote_deletes();
    let mut overlay = VirtualOverlay::new();

    let report = coordinator(&h)
        .delete_folder(
            &build_tree(&nested()),
            &mut overlay,
            &FolderPath::navigation("a"),
            RetirementPolicy::Strict,
        )
        .await
        .unwrap();

    assert!(report.is_retired());
    assert_eq!(report.failures().count(), 0);
    assert!(
        report
            .items
            .iter()
            .all(|item| matches!(item.remote, RemoteDeletion::Failed(_)))
    );
}

#[tokio::test]
async fn test_url_without_object_id_skips_remote_delete() {
    let mut odd = asset("7", "misc");
    odd.url = "https://elsewhere.test/files/7.png".into();
    let h = Harness::new(vec![odd.clone()]);
    let mut overlay = VirtualOverlay::new();

    let report = coordinator(&h)
        .delete_folder(
            &build_tree(&[odd]),
            &mut overlay,
            &FolderPath::navigation("misc"),
            RetirementPolicy::Strict,
        )
        .await
        .unwrap();

    assert!(matches!(report.items[0].remote, RemoteDeletion::Skipped));
    assert_eq!(
        h.log.calls(),
        vec![
            Call::Delete(AssetId::from("7")),
            Call::DeleteFolder("misc".into())
        ]
    );
}

#[tokio::test]
async fn test_strict_policy_keeps_folder_on_item_failure() {
    let h = Harness::new(nested());
    h.metadata.fail_delete_of("2");
    let mut overlay = VirtualOverlay::new();
    overlay.add(FolderPath::navigation("a/empty"));
    let deletions = coordinator(&h);
    let phase = deletions.subscribe();

    let report = deletions
        .delete_folder(
            &merge_overlay(build_tree(&nested()), &overlay),
            &mut overlay,
            &FolderPath::navigation("a"),
            RetirementPolicy::Strict,
        )
        .await
        .unwrap();

    // every asset is still attempted
    let deletes = h
        .log
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Delete(_)))
        .count();
    assert_eq!(deletes, 3);
    assert!(!h.log.calls().contains(&Call::DeleteFolder("a".into())));

    assert!(matches!(report.outcome, FolderDeletionOutcome::Kept { .. }));
    assert_eq!(report.navigate_to(), FolderPath::navigation("a"));
    let failed: Vec<_> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].asset_id.as_str(), "2");
    assert!(
        failed[0]
            .metadata
            .as_ref()
            .unwrap_err()
            .message
            .contains("asset 2")
    );
    assert!(overlay.contains(&FolderPath::navigation("a/empty")));
    assert_eq!(*phase.borrow(), DeletionPhase::Failed);
}

#[tokio::test]
async fn test_optimistic_policy_retires_despite_errors() {
    let h = Harness::new(nested());
    h.metadata.fail_delete_of("2");
    let mut overlay = VirtualOverlay::new();
    overlay.add(FolderPath::navigation("a/empty"));

    let report = coordinator(&h)
        .delete_folder(
            &merge_overlay(build_tree(&nested()), &overlay),
            &mut overlay,
            &FolderPath::navigation("a"),
            RetirementPolicy::Optimistic,
        )
        .await
        .unwrap();

    assert!(matches!(
        report.outcome,
        FolderDeletionOutcome::RetiredWithErrors { .. }
    ));
    assert!(h.log.calls().contains(&Call::DeleteFolder("a".into())));
    assert!(overlay.is_empty());
    assert_eq!(report.navigate_to(), FolderPath::root());
}

#[tokio::test]
async fn test_finalize_failure_depends_on_policy() {
    for (policy, retired) in [
        (RetirementPolicy::Strict, false),
        (RetirementPolicy::Optimistic, true),
    ] {
        let h = Harness::new(nested());
        h.metadata.fail_delete_folder();
        let mut overlay = VirtualOverlay::new();
        overlay.add(FolderPath::navigation("a/empty"));

        let report = coordinator(&h)
            .delete_folder(
                &build_tree(&nested()),
                &mut overlay,
                &FolderPath::navigation("a"),
                policy,
            )
            .await
            .unwrap();

        assert_eq!(report.is_retired(), retired, "{policy}");
        assert_eq!(overlay.is_empty(), retired, "{policy}");
        assert_eq!(report.failures().count(), 0);
    }
}

#[tokio::test]
async fn test_root_delete_rejected() {
    let h = Harness::new(nested());
    let mut overlay = VirtualOverlay::new();

    let err = coordinator(&h)
        .delete_folder(
            &build_tree(&nested()),
            &mut overlay,
            &FolderPath::root(),
            RetirementPolicy::Optimistic,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.log.calls().is_empty());
}

#[tokio::test]
async fn test_move_assets() {
    let assets = vec![asset("4", "p/q"), asset("5", "p/q"), asset("6", "p")];
    let h = Harness::new(assets);

    let report = MoveCoordinator::new(h.metadata.clone())
        .move_assets(&[AssetId::from("4"), AssetId::from("5")], "r")
        .await
        .unwrap();
    assert_eq!(ids(&report.moved), vec!["4", "5"]);

    let tree = build_tree(&h.metadata.list().await.unwrap());
    assert!(tree.resolve(&FolderPath::navigation("p/q")).items.is_empty());
    assert_eq!(
        ids(&tree.resolve(&FolderPath::navigation("r")).items),
        vec!["4", "5"]
    );
    assert_eq!(ids(&tree.resolve(&FolderPath::navigation("p")).items), vec!["6"]);
}

#[tokio::test]
async fn test_move_stops_at_first_failure() {
    let h = Harness::new(vec![asset("4", "p"), asset("5", "p"), asset("6", "p")]);
    h.metadata.fail_update_of("5");

    let err = MoveCoordinator::new(h.metadata.clone())
        .move_assets(
            &[AssetId::from("4"), AssetId::from("5"), AssetId::from("6")],
            "/r/",
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert!(err.message.contains("asset 5"), "{}", err.message);
    assert!(err.message.contains("1 of 3"), "{}", err.message);
    assert_eq!(
        h.log.calls(),
        vec![
            Call::Update(AssetId::from("4"), "r".into()),
            Call::Update(AssetId::from("5"), "r".into()),
        ]
    );

    let left = h.metadata.list().await.unwrap();
    let folders: Vec<&str> = left.iter().map(|a| a.folder.as_str()).collect();
    assert_eq!(folders, vec!["r", "p", "p"]);
}

#[tokio::test]
async fn test_move_to_root_rejected() {
    let h = Harness::new(vec![asset("4", "p")]);
    let err = MoveCoordinator::new(h.metadata.clone())
        .move_assets(&[AssetId::from("4")], "//")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(h.log.calls().is_empty());
}
