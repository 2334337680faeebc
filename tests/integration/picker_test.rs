//! Integration tests for the destination picker.

mod helpers;

use filedeck_core::types::FolderId;
use filedeck_entity::{BreadcrumbEntry, EntityType, ItemKey};

#[tokio::test]
async fn test_entering_docs_then_2024_builds_trail() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let picker = app.ctx.picker(None).await;

    let docs = picker.folders().await.into_iter().find(|f| f.name == "Docs").expect("Docs");
    picker.enter_folder(docs).await;
    let year = picker.folders().await.into_iter().find(|f| f.name == "2024").expect("2024");
    picker.enter_folder(year).await;

    assert_eq!(
        picker.breadcrumbs().await,
        vec![BreadcrumbEntry::new("F1", "Docs"), BreadcrumbEntry::new("F2", "2024")]
    );
    assert_eq!(picker.current_folder().await, Some(FolderId::from("F2")));
}

#[tokio::test]
async fn test_back_out_of_every_level_returns_to_root() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let picker = app.ctx.picker(None).await;

    let path = ["Docs", "2024", "Q1", "Jan"];
    for name in path {
        let next = picker
            .folders()
            .await
            .into_iter()
            .find(|f| f.name == name)
            .expect("child listed");
        picker.enter_folder(next).await;
    }
    assert_eq!(picker.depth().await, path.len());

    for _ in path {
        assert!(picker.go_back().await);
    }

    assert_eq!(picker.current_folder().await, None);
    assert!(picker.breadcrumbs().await.is_empty());
    assert!(!picker.go_back().await);
    assert_eq!(picker.confirm(), None);
}

#[tokio::test]
async fn test_picked_destination_feeds_a_move() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    let picker = app.ctx.picker(None).await;
    let photos = picker.folders().await.into_iter().find(|f| f.name == "Photos").expect("Photos");
    picker.enter_folder(photos).await;
    let target = picker.confirm();

    browser
        .move_item(&ItemKey::new("b", EntityType::File), target)
        .await
        .expect("move");
    assert_eq!(app.drive.child_names(Some("P1")).await, vec!["b.txt"]);
}

#[tokio::test]
async fn test_opening_inside_a_folder_resolves_its_trail() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let picker = app.ctx.picker(Some(FolderId::from("F3"))).await;

    let names: Vec<String> = picker.breadcrumbs().await.into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Docs", "2024", "Q1"]);
    assert_eq!(picker.depth().await, 0);
    let children: Vec<String> = picker.folders().await.into_iter().map(|f| f.name).collect();
    assert_eq!(children, vec!["Jan"]);

    picker.go_to_root().await;
    assert!(picker.breadcrumbs().await.is_empty());
    assert_eq!(picker.folders().await.len(), 2);
}
