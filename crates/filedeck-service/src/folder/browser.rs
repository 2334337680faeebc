//! The primary folder view: listing, selection, and single-item actions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashSet;
use tokio::sync::Mutex;
use tracing::{debug, info};

use filedeck_client::DriveApi;
use filedeck_core::types::{FileId, FolderId};
use filedeck_core::{AppError, AppResult};
use filedeck_entity::{
    BatchItem, BatchOperation, BreadcrumbEntry, EntityType, Folder, FolderContents, ItemKey,
    StorageUsage,
};

use crate::batch::{BatchCoordinator, BatchSummary};
use crate::folder::breadcrumb::BreadcrumbResolver;
use crate::notification::{Notification, Notifier, report_failure};
use crate::selection::SelectionManager;
use crate::view::{ListingView, RowGuard};

#[derive(Debug, Default)]
struct BrowserState {
    current: Option<FolderId>,
    contents: FolderContents,
    breadcrumbs: Vec<BreadcrumbEntry>,
    selection: SelectionManager,
    loading: bool,
}

/// Shows one folder at a time and runs actions against its items.
///
/// Navigation clears the selection. Each load is tagged with a
/// generation number; a response is applied only if no newer load
/// started meanwhile. Single-item actions hold a per-row flag so the
/// same row cannot be acted on twice at once, while other rows stay
/// usable.
#[derive(Debug)]
pub struct FolderBrowser {
    api: Arc<dyn DriveApi>,
    notifier: Arc<dyn Notifier>,
    resolver: BreadcrumbResolver,
    batch: BatchCoordinator,
    generation: AtomicU64,
    busy: DashSet<ItemKey>,
    state: Mutex<BrowserState>,
}

impl FolderBrowser {
    /// Creates a new folder browser positioned at the root, not yet loaded.
    pub fn new(api: Arc<dyn DriveApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            resolver: BreadcrumbResolver::new(Arc::clone(&api)),
            batch: BatchCoordinator::new(Arc::clone(&api), Arc::clone(&notifier)),
            api,
            notifier,
            generation: AtomicU64::new(0),
            busy: DashSet::new(),
            state: Mutex::new(BrowserState::default()),
        }
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Navigate to `folder` (`None` = root), clearing the selection.
    pub async fn open(&self, folder: Option<FolderId>) -> AppResult<()> {
        let generation = {
            let mut state = self.state.lock().await;
            state.current = folder.clone();
            state.selection.clear();
            state.loading = true;
            self.next_generation()
        };
        info!(folder_id = ?folder, "Opening folder");
        self.load(generation, folder).await
    }

    /// Reload the current folder, keeping the selection.
    pub async fn reload(&self) -> AppResult<()> {
        let (generation, folder) = {
            let mut state = self.state.lock().await;
            state.loading = true;
            (self.next_generation(), state.current.clone())
        };
        self.load(generation, folder).await
    }

    /// Navigate to the parent of the current folder. A no-op at the root.
    pub async fn go_up(&self) -> AppResult<()> {
        let parent = {
            let state = self.state.lock().await;
            if state.current.is_none() {
                return Ok(());
            }
            state.contents.folder.as_ref().and_then(|f| f.parent_id.clone())
        };
        self.open(parent).await
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn load(&self, generation: u64, folder: Option<FolderId>) -> AppResult<()> {
        let (listing, breadcrumbs) = tokio::join!(
            self.api.list_children(folder.as_ref()),
            self.resolver.resolve(folder.as_ref()),
        );

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(folder_id = ?folder, "Discarding stale folder listing");
            return Ok(());
        }

        match listing {
            Ok(contents) => {
                let mut state = self.state.lock().await;
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!(folder_id = ?folder, "Discarding stale folder listing");
                    return Ok(());
                }
                state.contents = contents;
                state.breadcrumbs = breadcrumbs;
                state.loading = false;
                Ok(())
            }
            Err(e) => {
                self.state.lock().await.loading = false;
                report_failure(self.notifier.as_ref(), "Failed to load folder", &e).await;
                Err(e)
            }
        }
    }

    // ── Observers ───────────────────────────────────────────────────

    /// The folder on screen (`None` = root).
    pub async fn current_folder(&self) -> Option<FolderId> {
        self.state.lock().await.current.clone()
    }

    /// The listing on screen.
    pub async fn contents(&self) -> FolderContents {
        self.state.lock().await.contents.clone()
    }

    /// Breadcrumbs for the folder on screen.
    pub async fn breadcrumbs(&self) -> Vec<BreadcrumbEntry> {
        self.state.lock().await.breadcrumbs.clone()
    }

    /// Storage usage reported with the last listing.
    pub async fn storage(&self) -> Option<StorageUsage> {
        self.state.lock().await.contents.storage
    }

    /// Whether a listing load is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Whether an action on this row is in flight.
    pub fn is_busy(&self, key: &ItemKey) -> bool {
        self.busy.contains(key)
    }

    // ── Selection ───────────────────────────────────────────────────

    /// A snapshot of the selection.
    pub async fn selection(&self) -> SelectionManager {
        self.state.lock().await.selection.clone()
    }

    /// Flip one item's selection. Returns whether it is now selected.
    pub async fn toggle(&self, key: ItemKey) -> bool {
        self.state.lock().await.selection.toggle(key)
    }

    /// Select everything listed, or clear a non-empty selection.
    pub async fn select_all(&self) {
        let mut state = self.state.lock().await;
        let BrowserState {
            contents, selection, ..
        } = &mut *state;
        selection.select_all(&contents.folders, &contents.files);
    }

    /// Clear the selection.
    pub async fn clear_selection(&self) {
        self.state.lock().await.selection.clear();
    }

    /// Whether the batch toolbar is shown.
    pub async fn batch_toolbar_visible(&self) -> bool {
        self.state.lock().await.selection.toolbar_visible()
    }

    /// The selection as batch request items.
    pub async fn batch_items(&self) -> Vec<BatchItem> {
        self.state.lock().await.selection.batch_items()
    }

    // ── Batch actions ───────────────────────────────────────────────

    /// Move every selected item to the trash.
    pub async fn batch_delete(&self) -> AppResult<BatchSummary> {
        let items = self.batch_items().await;
        self.batch.execute(BatchOperation::Delete, items, self).await
    }

    /// Move every selected item under `target` (`None` = root).
    pub async fn batch_move(&self, target: Option<FolderId>) -> AppResult<BatchSummary> {
        let items = self.batch_items().await;
        self.batch.execute(BatchOperation::Move { target }, items, self).await
    }

    /// Whether a batch request from this view is in flight.
    pub fn is_batch_running(&self) -> bool {
        self.batch.is_running()
    }

    // ── Single-item actions ─────────────────────────────────────────

    /// Create a sub-folder of the current folder.
    pub async fn create_folder(&self, name: &str) -> AppResult<Folder> {
        let name = self.require_name(name, "Create folder failed").await?;
        let parent = self.current_folder().await;

        match self.api.create_folder(&name, parent.as_ref()).await {
            Ok(folder) => {
                info!(folder_id = %folder.id, name = %folder.name, "Folder created");
                self.notifier
                    .notify(Notification::success("Created", format!("Folder '{name}' created")))
                    .await;
                self.reload_quietly().await;
                Ok(folder)
            }
            Err(e) => {
                report_failure(self.notifier.as_ref(), "Create folder failed", &e).await;
                Err(e)
            }
        }
    }

    /// Rename a listed folder or file.
    pub async fn rename(&self, key: &ItemKey, name: &str) -> AppResult<()> {
        let name = self.require_name(name, "Rename failed").await?;
        let _row = self.claim_row(key, "Rename failed").await?;

        let result = match key {
            ItemKey::Folder(id) => self.api.rename_folder(id, &name).await.map(|_| ()),
            ItemKey::File(id) => self.api.rename_file(id, &name).await.map(|_| ()),
        };
        self.finish_row_action(key, result, "Renamed", "Item renamed successfully", "Rename failed")
            .await
    }

    /// Move a listed item to the trash. Folders go with their contents.
    pub async fn delete_item(&self, key: &ItemKey) -> AppResult<()> {
        let _row = self.claim_row(key, "Delete failed").await?;
        let label = self.label_for(key).await;

        let result = match key {
            ItemKey::Folder(id) => self.api.delete_folder(id, true).await,
            ItemKey::File(id) => self.api.delete_file(id).await,
        };
        self.finish_row_action(
            key,
            result,
            "Deleted",
            &format!("{label} moved to trash"),
            "Delete failed",
        )
        .await
    }

    /// Move a listed item under `target` (`None` = root), as confirmed in a picker.
    pub async fn move_item(&self, key: &ItemKey, target: Option<FolderId>) -> AppResult<()> {
        let _row = self.claim_row(key, "Move failed").await?;

        let result = match key {
            ItemKey::Folder(id) => self.api.move_folder(id, target.as_ref()).await,
            ItemKey::File(id) => self.api.move_file(id, target.as_ref()).await,
        };
        self.finish_row_action(key, result, "Moved", "Item moved successfully", "Move failed")
            .await
    }

    /// Fetch a file's contents.
    pub async fn download_file(&self, id: &FileId) -> AppResult<Bytes> {
        let key = ItemKey::File(id.clone());
        let _row = self.claim_row(&key, "Download failed").await?;
        let label = self.label_for(&key).await;

        match self.api.download_file(id).await {
            Ok(bytes) => {
                self.notifier
                    .notify(Notification::success("Downloaded", format!("{label} downloaded")))
                    .await;
                Ok(bytes)
            }
            Err(e) => {
                let err = AppError::new(e.kind, format!("{label}: {}", e.message));
                report_failure(self.notifier.as_ref(), "Download failed", &err).await;
                Err(e)
            }
        }
    }

    async fn require_name(&self, name: &str, title: &str) -> AppResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            let err = AppError::validation("Name cannot be empty");
            report_failure(self.notifier.as_ref(), title, &err).await;
            return Err(err);
        }
        Ok(trimmed.to_string())
    }

    async fn claim_row(&self, key: &ItemKey, title: &str) -> AppResult<RowGuard<'_>> {
        RowGuard::claim(&self.busy, key, self.notifier.as_ref(), title).await
    }

    async fn finish_row_action(
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
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                let label = self.label_for(key).await;
                let err = AppError::new(e.kind, format!("{label}: {}", e.message));
                report_failure(self.notifier.as_ref(), failure_title, &err).await;
                Err(e)
            }
        }
    }

    /// Display name of a listed item, falling back to its key.
    async fn label_for(&self, key: &ItemKey) -> String {
        let state = self.state.lock().await;
        let name = match key {
            ItemKey::Folder(id) => state
                .contents
                .folders
                .iter()
                .find(|f| &f.id == id)
                .map(|f| f.name.clone()),
            ItemKey::File(id) => state
                .contents
                .files
                .iter()
                .find(|f| &f.id == id)
                .map(|f| f.name.clone()),
        };
        name.map_or_else(|| key.to_string(), |n| format!("'{n}'"))
    }

    async fn reload_quietly(&self) {
        // Failures are already reported by `load`.
        let _ = self.reload().await;
    }

    /// The key of a listed item by id and type, if it is on screen.
    pub async fn find_listed(&self, id: &str, entity_type: EntityType) -> Option<ItemKey> {
        let state = self.state.lock().await;
        let listed = match entity_type {
            EntityType::Folder => state.contents.folders.iter().any(|f| f.id.as_str() == id),
            EntityType::File => state.contents.files.iter().any(|f| f.id.as_str() == id),
        };
        listed.then(|| ItemKey::new(id, entity_type))
    }
}

#[async_trait]
impl ListingView for FolderBrowser {
    async fn refresh(&self) {
        self.reload_quietly().await;
    }

    async fn deselect(&self, keys: &[ItemKey]) {
        self.state.lock().await.selection.remove_keys(keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use filedeck_client::{DriveOp, MemoryDrive};
    use filedeck_core::ErrorKind;

    use crate::notification::MemoryNotifier;

    async fn setup() -> (MemoryDrive, MemoryNotifier, FolderBrowser) {
        let drive = MemoryDrive::new();
        drive.insert_folder("F1", "Docs", None).await;
        drive.insert_folder("F2", "2024", Some("F1")).await;
        drive.insert_file("a", "tax.pdf", Some("F2"), "pdf").await;
        drive.insert_file("r", "readme.md", None, "hi").await;
        let notifier = MemoryNotifier::new();
        let browser = FolderBrowser::new(Arc::new(drive.clone()), Arc::new(notifier.clone()));
        (drive, notifier, browser)
    }

    #[tokio::test]
    async fn test_open_loads_listing_and_breadcrumbs() {
        let (_drive, _notifier, browser) = setup().await;
        browser.open(Some(FolderId::from("F2"))).await.expect("open");

        let contents = browser.contents().await;
        assert_eq!(contents.files.len(), 1);
        assert_eq!(contents.parent_name.as_deref(), Some("Docs"));
        let trail: Vec<_> = browser.breadcrumbs().await.into_iter().map(|b| b.name).collect();
        assert_eq!(trail, vec!["Docs", "2024"]);
        assert!(browser.storage().await.is_some());
    }

    #[tokio::test]
    async fn test_navigation_clears_selection() {
        let (_drive, _notifier, browser) = setup().await;
        browser.open(None).await.expect("open");
        browser.select_all().await;
        assert!(browser.batch_toolbar_visible().await);

        browser.open(Some(FolderId::from("F1"))).await.expect("open");
        assert!(!browser.batch_toolbar_visible().await);
    }

    #[tokio::test]
    async fn test_go_up_walks_to_root() {
        let (_drive, _notifier, browser) = setup().await;
        browser.open(Some(FolderId::from("F2"))).await.expect("open");
        browser.go_up().await.expect("up");
        assert_eq!(browser.current_folder().await, Some(FolderId::from("F1")));
        browser.go_up().await.expect("up");
        assert_eq!(browser.current_folder().await, None);
        browser.go_up().await.expect("noop");
        assert_eq!(browser.current_folder().await, None);
    }

    #[tokio::test]
    async fn test_blank_name_never_reaches_remote() {
        let (drive, notifier, browser) = setup().await;
        browser.open(None).await.expect("open");

        let err = browser.create_folder("   ").await.expect_err("blank");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(drive.calls(DriveOp::CreateFolder).await, 0);
        assert_eq!(notifier.failure_count().await, 1);

        let err = browser
            .rename(&ItemKey::new("r", EntityType::File), "")
            .await
            .expect_err("blank");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(drive.calls(DriveOp::Rename).await, 0);
    }

    #[tokio::test]
    async fn test_create_folder_refreshes_listing() {
        let (_drive, _notifier, browser) = setup().await;
        browser.open(None).await.expect("open");
        browser.create_folder("  Music ").await.expect("create");

        let names: Vec<_> = browser.contents().await.folders.into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Docs", "Music"]);
    }

    #[tokio::test]
    async fn test_failed_move_names_the_item() {
        let (_drive, notifier, browser) = setup().await;
        browser.open(None).await.expect("open");
        let key = ItemKey::new("F1", EntityType::Folder);

        let err = browser
            .move_item(&key, Some(FolderId::from("F2")))
            .await
            .expect_err("cycle");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(!browser.is_busy(&key));
        let last = notifier.take().await.pop().expect("notified");
        match last {
            Notification::Failure { title, detail } => {
                assert_eq!(title, "Move failed");
                assert!(detail.starts_with("'Docs': "));
            }
            other => panic!("unexpected notification {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_folder_is_recursive() {
        let (drive, _notifier, browser) = setup().await;
        browser.open(None).await.expect("open");
        browser
            .delete_item(&ItemKey::new("F1", EntityType::Folder))
            .await
            .expect("delete");

        assert!(drive.is_trashed(&ItemKey::new("F1", EntityType::Folder)).await);
        let names: Vec<_> = browser.contents().await.folders.into_iter().map(|f| f.name).collect();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_download_returns_bytes() {
        let (_drive, _notifier, browser) = setup().await;
        browser.open(None).await.expect("open");
        let bytes = browser.download_file(&FileId::from("r")).await.expect("download");
        assert_eq!(&bytes[..], b"hi");
    }

    #[tokio::test]
    async fn test_expired_session_requests_sign_in() {
        let (drive, notifier, browser) = setup().await;
        drive
            .fail_next(DriveOp::ListChildren, AppError::authentication("Unauthorized"))
            .await;
        assert!(browser.open(None).await.is_err());
        assert_eq!(notifier.take().await, vec![Notification::SignInRequired]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_listing_does_not_overwrite_newer_folder() {
        let (drive, _notifier, browser) = setup().await;
        drive.delay_listing(Some("F1"), Duration::from_secs(2)).await;

        let (slow, fast) = tokio::join!(browser.open(Some(FolderId::from("F1"))), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            browser.open(Some(FolderId::from("F2"))).await
        });
        slow.expect("slow");
        fast.expect("fast");

        assert_eq!(browser.current_folder().await, Some(FolderId::from("F2")));
        let contents = browser.contents().await;
        assert_eq!(contents.folder.map(|f| f.id), Some(FolderId::from("F2")));
        assert_eq!(contents.files.len(), 1);
    }
}
