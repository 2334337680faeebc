//! Integration tests for uploads into the browsed folder.

mod helpers;

use filedeck_client::DriveOp;
use filedeck_core::config::AppConfig;
use filedeck_core::types::FolderId;
use filedeck_entity::FileBlob;
use filedeck_service::{FileInput, Notification};

#[tokio::test]
async fn test_second_of_three_fails_single_refresh_and_cleared_input() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(Some(FolderId::from("P1"))).await.expect("open");
    app.drive.fail_upload_of("two.jpg").await;
    app.drive.reset_calls().await;

    let mut input = FileInput::new(vec![
        FileBlob::new("one.jpg", "1"),
        FileBlob::new("two.jpg", "2"),
        FileBlob::new("three.jpg", "3"),
    ]);
    let uploads = app.ctx.uploads();
    let target = browser.current_folder().await;

    let err = uploads
        .upload_files(&mut input, target.as_ref(), &browser)
        .await
        .expect_err("partial");

    assert!(input.is_empty());
    assert!(!uploads.is_uploading());
    assert_eq!(app.drive.calls(DriveOp::UploadSingle).await, 3);
    assert_eq!(app.drive.calls(DriveOp::ListChildren).await, 1);
    assert_eq!(err.message, "1 of 3 files could not be uploaded");
    assert_eq!(err.kind, filedeck_core::ErrorKind::Transport);
    assert_eq!(
        app.notifier.take().await,
        vec![Notification::failure("Upload failed", "1 of 3 files could not be uploaded")]
    );

    let listed: Vec<String> = browser.contents().await.files.into_iter().map(|f| f.name).collect();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&"one.jpg".to_string()));
    assert!(listed.contains(&"three.jpg".to_string()));
}

#[tokio::test]
async fn test_directory_upload_rebuilds_tree() {
    let app = helpers::TestApp::new();
    app.seed_tree().await;
    let browser = app.ctx.browser();
    browser.open(Some(FolderId::from("F1"))).await.expect("open");

    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("scans");
    std::fs::create_dir_all(root.join("march")).expect("mkdir");
    std::fs::write(root.join("cover.png"), b"png").expect("write");
    std::fs::write(root.join("march").join("page1.png"), b"p1").expect("write");

    let mut input = FileInput::from_directory(&root).await.expect("collect");
    app.ctx
        .uploads()
        .upload_folder(&mut input, Some(&FolderId::from("F1")), &browser)
        .await
        .expect("upload");

    let requests = app.drive.multi_uploads().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].paths, vec!["scans/cover.png", "scans/march/page1.png"]);
    assert!(
        browser
            .contents()
            .await
            .folders
            .iter()
            .any(|f| f.name == "scans")
    );
    assert_eq!(
        app.notifier.take().await,
        vec![Notification::success("Uploaded", "Folder uploaded successfully")]
    );
}

#[tokio::test]
async fn test_files_from_disk_upload_to_root() {
    let app = helpers::TestApp::new();
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("hello.txt");
    std::fs::write(&path, b"hello").expect("write");

    let mut input = FileInput::from_files(&[path]).await.expect("read");
    let files = app
        .ctx
        .uploads()
        .upload_files(&mut input, None, &browser)
        .await
        .expect("upload");

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].size, 5);
    assert_eq!(browser.contents().await.files.len(), 1);
}

#[tokio::test]
async fn test_configured_size_limit_blocks_dispatch() {
    let mut config = AppConfig::default();
    config.upload.max_file_size_bytes = 4;
    let app = helpers::TestApp::with_config(config);
    let browser = app.ctx.browser();
    browser.open(None).await.expect("open");

    let mut input = FileInput::new(vec![FileBlob::new("big.bin", "12345")]);
    let err = app
        .ctx
        .uploads()
        .upload_files(&mut input, None, &browser)
        .await
        .expect_err("too big");

    assert_eq!(err.kind, filedeck_core::ErrorKind::Validation);
    assert_eq!(app.drive.calls(DriveOp::UploadSingle).await, 0);
    assert!(input.is_empty());
}
