//! Integration tests for batch delete, move, and restore through the browser.

mod helpers;

use filedeck_client::DriveOp;
use filedeck_core::AppError;
use filedeck_core::types::FolderId;
use filedeck_entity::{BatchFailure, BatchOutcome, BatchResult, EntityType, ItemKey};
use filedeck_service::Notification;

fn outcome(id: &str, entity_type: EntityType) -> BatchOutcome {
    BatchOutcome {
        id: id.to_string(),
        entity_type: Some(entity_type),
    }
}

fn failure(id: &str, entity_type: EntityType, error: &str) -> BatchFailure {
    BatchFailure {
        id: id.to_string(),
        entity_type: Some(entity_type),
        error: error.to_string(),
    }
}

#[tokio::test]
async fn test_partial_delete_keeps_exactly_the_failed_keys() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    app.drive.insert_file("c", "c.txt", None, "c").await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    browser.select_all().await;
    assert_eq!(browser.selection().await.len(), 5);

    app.drive
        .script_batch(BatchResult {
            successes: vec![
                outcome("F1", EntityType::Folder),
                outcome("a", EntityType::File),
                outcome("c", EntityType::File),
            ],
            errors: vec![
                failure("P1", EntityType::Folder, "Locked"),
                failure("b", EntityType::File, "Locked"),
            ],
        })
        .await;

    let summary = browser.batch_delete().await.expect("batch");

    assert_eq!(summary.message(), "3 deleted, 2 failed");
    assert_eq!(
        browser.selection().await.keys(),
        vec![
            ItemKey::new("P1", EntityType::Folder),
            ItemKey::new("b", EntityType::File),
        ]
    );
    assert_eq!(app.drive.calls(DriveOp::BatchDelete).await, 1);
    assert_eq!(
        app.notifier.take().await,
        vec![Notification::failure("Batch delete completed", "3 deleted, 2 failed")]
    );
}

#[tokio::test]
async fn test_move_with_cycle_keeps_only_the_folder_selected() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    browser.toggle(ItemKey::new("a", EntityType::File)).await;
    browser.toggle(ItemKey::new("F1", EntityType::Folder)).await;

    let summary = browser
        .batch_move(Some(FolderId::from("F2")))
        .await
        .expect("batch");

    assert_eq!(summary.succeeded, vec![ItemKey::new("a", EntityType::File)]);
    assert_eq!(
        browser.selection().await.keys(),
        vec![ItemKey::new("F1", EntityType::Folder)]
    );
    assert_eq!(app.drive.child_names(Some("F2")).await, vec!["Q1", "a.txt"]);
    assert!(
        summary
            .result
            .error_for(&ItemKey::new("F1", EntityType::Folder))
            .is_some_and(|e| e.contains("Cannot move a folder into itself"))
    );
    assert!(browser.find_listed("a", EntityType::File).await.is_none());
}

#[tokio::test]
async fn test_whole_batch_failure_keeps_selection_and_refreshes() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");
    browser.toggle(ItemKey::new("a", EntityType::File)).await;
    browser.toggle(ItemKey::new("b", EntityType::File)).await;
    app.drive
        .fail_next(DriveOp::BatchDelete, AppError::remote("Service unavailable"))
        .await;
    app.drive.reset_calls().await;

    let err = browser.batch_delete().await.expect_err("down");

    assert_eq!(err.message, "Service unavailable");
    assert_eq!(browser.selection().await.len(), 2);
    assert_eq!(app.drive.calls(DriveOp::ListChildren).await, 1);
    assert_eq!(
        app.notifier.take().await,
        vec![Notification::failure("Batch delete failed", "Service unavailable")]
    );
}

#[tokio::test]
async fn test_empty_selection_is_rejected_locally() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    let err = browser.batch_move(None).await.expect_err("empty");

    assert_eq!(err.kind, filedeck_core::ErrorKind::Validation);
    assert_eq!(app.drive.calls(DriveOp::BatchMove).await, 0);
    assert_eq!(app.notifier.failure_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_batch_move_rejected_while_delete_in_flight() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");
    browser.toggle(ItemKey::new("a", EntityType::File)).await;
    app.drive
        .delay_op(DriveOp::BatchDelete, std::time::Duration::from_millis(400))
        .await;

    let delete = browser.batch_delete();
    let move_while_running = async {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(browser.is_batch_running());
        browser.batch_move(Some(FolderId::from("P1"))).await
    };
    let (deleted, moved) = tokio::join!(delete, move_while_running);

    assert!(deleted.expect("delete").is_complete());
    assert_eq!(
        moved.expect_err("in flight").kind,
        filedeck_core::ErrorKind::Validation
    );
    assert!(!browser.is_batch_running());
    assert_eq!(app.drive.calls(DriveOp::BatchMove).await, 0);
    assert!(app.drive.is_trashed(&ItemKey::new("a", EntityType::File)).await);
}
