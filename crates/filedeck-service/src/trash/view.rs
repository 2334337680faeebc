//! Trash listing with restore, permanent delete, and batch restore.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use tokio::sync::Mutex;
use tracing::info;

use filedeck_client::DriveApi;
use filedeck_core::AppResult;
use filedeck_entity::{BatchOperation, ItemKey, TrashContents};

use crate::batch::{BatchCoordinator, BatchSummary};
use crate::notification::{Notification, Notifier, report_failure};
use crate::selection::SelectionManager;
use crate::view::{ListingView, RowGuard};

#[derive(Debug, Default)]
struct TrashState {
    contents: TrashContents,
    selection: SelectionManager,
}

/// Lists the trash and brings items back or purges them.
///
/// Restore and permanent delete hold a per-row flag, like the folder
/// browser's row actions.
#[derive(Debug)]
pub struct TrashView {
    api: Arc<dyn DriveApi>,
    notifier: Arc<dyn Notifier>,
    batch: BatchCoordinator,
    busy: DashSet<ItemKey>,
    state: Mutex<TrashState>,
}

impl TrashView {
    /// Creates a new trash view, not yet loaded.
    pub fn new(api: Arc<dyn DriveApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            batch: BatchCoordinator::new(Arc::clone(&api), Arc::clone(&notifier)),
            api,
            notifier,
            busy: DashSet::new(),
            state: Mutex::new(TrashState::default()),
        }
    }

    /// Load the trash listing.
    pub async fn load(&self) -> AppResult<TrashContents> {
        match self.api.list_trash().await {
            Ok(contents) => {
                self.state.lock().await.contents = contents.clone();
                Ok(contents)
            }
            Err(e) => {
                report_failure(self.notifier.as_ref(), "Failed to load trash", &e).await;
                Err(e)
            }
        }
    }

    /// The listing on screen.
    pub async fn contents(&self) -> TrashContents {
        self.state.lock().await.contents.clone()
    }

    /// Flip one item's selection.
    pub async fn toggle(&self, key: ItemKey) -> bool {
        self.state.lock().await.selection.toggle(key)
    }

    /// Select everything in the trash, or clear a non-empty selection.
    pub async fn select_all(&self) {
        let mut state = self.state.lock().await;
        let TrashState {
            contents, selection,
        } = &mut *state;
        selection.select_all(&contents.folders, &contents.files);
    }

    /// A snapshot of the selection.
    pub async fn selection(&self) -> SelectionManager {
        self.state.lock().await.selection.clone()
    }

    /// Whether a restore or purge of this row is in flight.
    pub fn is_busy(&self, key: &ItemKey) -> bool {
        self.busy.contains(key)
    }

    /// Whether a batch restore is in flight.
    pub fn is_batch_running(&self) -> bool {
        self.batch.is_running()
    }

    /// Bring one item back out of the trash.
    pub async fn restore(&self, key: &ItemKey) -> AppResult<()> {
        let _row = RowGuard::claim(&self.busy, key, self.notifier.as_ref(), "Restore failed").await?;
        let result = match key {
            ItemKey::Folder(id) => self.api.restore_folder(id).await,
            ItemKey::File(id) => self.api.restore_file(id).await,
        };
        self.finish(key, result, "Restored", "Item restored", "Restore failed")
            .await
    }

    /// Delete one item for good.
    pub async fn delete_permanently(&self, key: &ItemKey) -> AppResult<()> {
        let _row = RowGuard::claim(&self.busy, key, self.notifier.as_ref(), "Delete failed").await?;
        let result = self.api.permanently_delete(key).await;
        self.finish(key, result, "Deleted", "Item permanently deleted", "Delete failed")
            .await
    }

    /// Restore every selected item with one request.
    pub async fn batch_restore(&self) -> AppResult<BatchSummary> {
        let items = self.state.lock().await.selection.batch_items();
        self.batch.execute(BatchOperation::Restore, items, self).await
    }

    async fn finish(
        &self,
        key: &ItemKey,
        result: AppResult<()>,
        success_title: &str,
        success_detail: &str,
        failure_title: &str,
    ) -> AppResult<()> {
        match result {
            Ok(()) => {
                info!(item = %key, "{success_title}");
                self.notifier
                    .notify(Notification::success(success_title, success_detail))
                    .await;
                self.state.lock().await.selection.remove_keys([key]);
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                report_failure(self.notifier.as_ref(), failure_title, &e).await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ListingView for TrashView {
    async fn refresh(&self) {
        // Failures are reported by `load`.
        let _ = self.load().await;
    }

    async fn deselect(&self, keys: &[ItemKey]) {
        self.state.lock().await.selection.remove_keys(keys);
    }
}
