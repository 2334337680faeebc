//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use filedeck_client::MemoryDrive;
use filedeck_core::config::AppConfig;
use filedeck_service::{DriveContext, MemoryNotifier};

/// Test application context
pub struct TestApp {
    /// In-memory drive for seeding and inspection
    pub drive: MemoryDrive,
    /// Collected user-facing notifications
    pub notifier: MemoryNotifier,
    /// Context the views are built from
    pub ctx: DriveContext,
}

impl TestApp {
    /// Create a test application over an empty drive
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with explicit settings
    pub fn with_config(config: AppConfig) -> Self {
        let drive = MemoryDrive::new();
        let notifier = MemoryNotifier::new();
        let ctx = DriveContext::new(Arc::new(drive.clone()), Arc::new(notifier.clone()), config);
        Self {
            drive,
            notifier,
            ctx,
        }
    }

    /// Seed `Docs(F1) / 2024(F2) / Q1(F3) / Jan(F4)` plus a few root items.
    ///
    /// ```text
    /// /
    /// ├── Docs (F1)
    /// │   ├── 2024 (F2)
    /// │   │   └── Q1 (F3)
    /// │   │       └── Jan (F4)
    /// │   └── report.pdf (r1)
    /// ├── Photos (P1)
    /// ├── a.txt (a)
    /// └── b.txt (b)
    /// ```
    pub async fn seed_tree(&self) {
        self.drive.insert_folder("F1", "Docs", None).await;
        self.drive.insert_folder("F2", "2024", Some("F1")).await;
        self.drive.insert_folder("F3", "Q1", Some("F2")).await;
        self.drive.insert_folder("F4", "Jan", Some("F3")).await;
        self.drive.insert_folder("P1", "Photos", None).await;
        self.drive
            .insert_file("r1", "report.pdf", Some("F1"), "report")
            .await;
        self.drive.insert_file("a", "a.txt", None, "aaa").await;
        self.drive.insert_file("b", "b.txt", None, "bb").await;
    }
}
