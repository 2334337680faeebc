//! Integration tests for the trash view.

mod helpers;

use filedeck_client::DriveOp;
use filedeck_entity::{EntityType, ItemKey};

#[tokio::test]
async fn test_deleted_folder_shows_in_trash_and_restores() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");
    let docs = ItemKey::new("F1", EntityType::Folder);

    browser.delete_item(&docs).await.expect("delete");
    assert!(app.drive.folder("F2").await.is_none());

    let trash = app.ctx.trash();
    let contents = trash.load().await.expect("load");
    assert!(contents.folders.iter().any(|f| f.id.as_str() == "F1"));

    trash.restore(&docs).await.expect("restore");
    assert!(app.drive.folder("F1").await.is_some());
    assert_eq!(
        app.drive.child_names(Some("F1")).await,
        vec!["2024", "report.pdf"]
    );
    assert!(!trash.contents().await.folders.iter().any(|f| f.id.as_str() == "F1"));
}

#[tokio::test]
async fn test_purge_and_batch_restore() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");
    browser.select_all().await;
    browser.batch_delete().await.expect("trash all");
    assert!(app.drive.child_names(None).await.is_empty());

    let trash = app.ctx.trash();
    trash.load().await.expect("load");
    let a = ItemKey::new("a", EntityType::File);
    trash.delete_permanently(&a).await.expect("purge");
    assert!(!app.drive.exists(&a).await);

    trash.select_all().await;
    let summary = trash.batch_restore().await.expect("restore");
    assert!(summary.is_complete());
    assert_eq!(app.drive.calls(DriveOp::BatchRestore).await, 1);
    assert_eq!(app.drive.child_names(None).await, vec!["Docs", "Photos", "b.txt"]);
    assert!(trash.selection().await.is_empty());
}
