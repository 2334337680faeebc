//! Modal destination picker for move operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use filedeck_client::DriveApi;
use filedeck_core::types::FolderId;
use filedeck_entity::{BreadcrumbEntry, Folder};

use crate::folder::breadcrumb::BreadcrumbResolver;
use crate::notification::{Notifier, report_failure};

/// One folder entered while browsing the picker.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFrame {
    /// The folder that was entered.
    pub folder: Folder,
}

#[derive(Debug, Default)]
struct PickerState {
    current: Option<FolderId>,
    stack: Vec<NavigationFrame>,
    breadcrumbs: Vec<BreadcrumbEntry>,
    folders: Vec<Folder>,
    loading: bool,
}

/// Lets the user walk the folder tree and choose a move destination.
///
/// Independent of the primary view: it keeps its own back-stack and
/// breadcrumbs. Every transition reloads the sub-folders of the new
/// position and re-resolves the breadcrumbs; a response that arrives
/// after a newer transition is dropped. No cycle checks happen here,
/// the service rejects invalid moves.
#[derive(Debug)]
pub struct DestinationPicker {
    api: Arc<dyn DriveApi>,
    resolver: BreadcrumbResolver,
    notifier: Arc<dyn Notifier>,
    generation: AtomicU64,
    state: Mutex<PickerState>,
}

impl DestinationPicker {
    /// Open the picker at `initial` (`None` = root) and load its first listing.
    pub async fn open(
        api: Arc<dyn DriveApi>,
        notifier: Arc<dyn Notifier>,
        initial: Option<FolderId>,
    ) -> Self {
        let picker = Self {
            resolver: BreadcrumbResolver::new(Arc::clone(&api)),
            api,
            notifier,
            generation: AtomicU64::new(0),
            state: Mutex::new(PickerState {
                current: initial,
                ..PickerState::default()
            }),
        };
        picker.transition(|_| true).await;
        picker
    }

    /// Descend into `folder`.
    pub async fn enter_folder(&self, folder: Folder) {
        self.transition(move |state| {
            state.current = Some(folder.id.clone());
            state.breadcrumbs.push(BreadcrumbEntry::for_folder(&folder));
            state.stack.push(NavigationFrame { folder });
            true
        })
        .await;
    }

    /// Step back one level. Returns `false` when there is nothing to go back to.
    pub async fn go_back(&self) -> bool {
        self.transition(|state| {
            if state.stack.pop().is_none() {
                return false;
            }
            state.current = state.stack.last().map(|frame| frame.folder.id.clone());
            state.breadcrumbs.pop();
            true
        })
        .await
    }

    /// Jump to the root, forgetting the back-stack.
    pub async fn go_to_root(&self) {
        self.transition(|state| {
            state.current = None;
            state.stack.clear();
            state.breadcrumbs.clear();
            true
        })
        .await;
    }

    /// Choose the current position and close the picker.
    pub fn confirm(self) -> Option<FolderId> {
        let state = self.state.into_inner();
        debug!(target_folder = ?state.current, "Destination confirmed");
        state.current
    }

    /// The folder currently shown (`None` = root).
    pub async fn current_folder(&self) -> Option<FolderId> {
        self.state.lock().await.current.clone()
    }

    /// Breadcrumbs for the current position.
    pub async fn breadcrumbs(&self) -> Vec<BreadcrumbEntry> {
        self.state.lock().await.breadcrumbs.clone()
    }

    /// Sub-folders of the current position.
    pub async fn folders(&self) -> Vec<Folder> {
        self.state.lock().await.folders.clone()
    }

    /// Number of frames on the back-stack.
    pub async fn depth(&self) -> usize {
        self.state.lock().await.stack.len()
    }

    /// Whether a listing load is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Apply a state change and, when it moved, reload the new position.
    async fn transition(&self, change: impl FnOnce(&mut PickerState) -> bool) -> bool {
        let (generation, target) = {
            let mut state = self.state.lock().await;
            if !change(&mut state) {
                return false;
            }
            state.loading = true;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (generation, state.current.clone())
        };
        self.load(generation, target).await;
        true
    }

    async fn load(&self, generation: u64, target: Option<FolderId>) {
        let (listing, breadcrumbs) = tokio::join!(
            self.api.list_children(target.as_ref()),
            self.resolver.resolve(target.as_ref()),
        );

        let folders = match listing {
            Ok(contents) => contents.folders,
            Err(e) => {
                report_failure(self.notifier.as_ref(), "Failed to load folders", &e).await;
                Vec::new()
            }
        };

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(folder_id = ?target, "Discarding stale picker listing");
            return;
        }
        state.folders = folders;
        state.breadcrumbs = breadcrumbs;
        state.loading = false;
    }
}
