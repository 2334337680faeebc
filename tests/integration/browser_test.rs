//! Integration tests for folder browsing, breadcrumbs, and single-item actions.

mod helpers;

use filedeck_client::DriveOp;
use filedeck_core::AppError;
use filedeck_core::types::FolderId;
use filedeck_entity::{EntityType, ItemKey};
use filedeck_service::{AncestorLookup, Notification};

fn ids(entries: &[filedeck_entity::BreadcrumbEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

#[tokio::test]
async fn test_deep_folder_breadcrumbs() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();

    browser.open(Some(FolderId::from("F4"))).await.expect("open");

    let names: Vec<String> = browser.breadcrumbs().await.into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Docs", "2024", "Q1", "Jan"]);
    assert_eq!(app.drive.calls(DriveOp::GetAncestors).await, 1);
}

#[tokio::test]
async fn test_ancestors_failure_falls_back_to_identical_chain() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let resolver = app.ctx.breadcrumbs();
    let start = FolderId::from("F4");

    let direct = resolver.resolve(Some(&start)).await;

    app.drive
        .fail_always(DriveOp::GetAncestors, AppError::remote("ancestors unavailable"))
        .await;
    app.drive.reset_calls().await;

    assert!(matches!(
        resolver.lookup_ancestors(&start).await,
        AncestorLookup::Unavailable(_)
    ));
    let walked = resolver.resolve(Some(&start)).await;

    assert_eq!(ids(&walked), vec!["F1", "F2", "F3", "F4"]);
    assert_eq!(walked, direct);
    assert!(app.drive.calls(DriveOp::ListChildren).await >= 4);
    assert!(app.notifier.all().await.is_empty());
}

#[tokio::test]
async fn test_root_has_no_breadcrumbs() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();

    browser.open(None).await.expect("open");

    assert!(browser.breadcrumbs().await.is_empty());
    let contents = browser.contents().await;
    let folders: Vec<&str> = contents.folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(folders.len(), 2);
    assert!(folders.contains(&"Docs") && folders.contains(&"Photos"));
    assert_eq!(contents.files.len(), 2);
    assert_eq!(app.drive.calls(DriveOp::GetAncestors).await, 0);
}

#[tokio::test]
async fn test_selection_resets_when_navigating() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    browser.toggle(ItemKey::new("a", EntityType::File)).await;
    browser.toggle(ItemKey::new("F1", EntityType::Folder)).await;
    assert!(browser.batch_toolbar_visible().await);

    browser.open(Some(FolderId::from("F1"))).await.expect("open");
    assert!(browser.selection().await.is_empty());
    assert!(!browser.batch_toolbar_visible().await);
}

#[tokio::test]
async fn test_rename_then_move_then_delete() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");
    let key = ItemKey::new("a", EntityType::File);

    browser.rename(&key, "  notes.txt ").await.expect("rename");
    assert_eq!(app.drive.file("a").await.expect("file").name, "notes.txt");

    browser
        .move_item(&key, Some(FolderId::from("P1")))
        .await
        .expect("move");
    assert_eq!(app.drive.child_names(Some("P1")).await, vec!["notes.txt"]);
    assert!(browser.find_listed("a", EntityType::File).await.is_none());

    browser.open(Some(FolderId::from("P1"))).await.expect("open");
    browser.delete_item(&key).await.expect("delete");
    assert!(app.drive.is_trashed(&key).await);
    assert!(browser.contents().await.is_empty());

    let titles: Vec<String> = app
        .notifier
        .take()
        .await
        .iter()
        .map(|n| n.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Renamed", "Moved", "Deleted"]);
}

#[tokio::test]
async fn test_move_into_own_subfolder_is_reported() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    let err = browser
        .move_item(
            &ItemKey::new("F1", EntityType::Folder),
            Some(FolderId::from("F3")),
        )
        .await
        .expect_err("cycle");

    assert_eq!(err.kind, filedeck_core::ErrorKind::Conflict);
    assert!(!browser.is_busy(&ItemKey::new("F1", EntityType::Folder)));
    let notes = app.notifier.take().await;
    assert_eq!(notes.len(), 1);
    match &notes[0] {
        Notification::Failure { title, detail } => {
            assert_eq!(title, "Move failed");
            assert!(detail.starts_with("'Docs'"));
        }
        other => panic!("unexpected notification {other:?}"),
    }
}

#[tokio::test]
async fn test_session_expiry_only_asks_for_sign_in() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    app.drive
        .fail_next(DriveOp::ListChildren, AppError::authentication("Unauthorized"))
        .await;
    let browser = app.ctx.browser();

    let err = browser.open(None).await.expect_err("expired");
    assert!(err.is_auth_failure());
    assert_eq!(app.notifier.take().await, vec![Notification::SignInRequired]);
}
