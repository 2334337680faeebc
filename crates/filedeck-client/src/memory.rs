//! In-memory drive using a Tokio mutex, for tests and offline demos.
//!
//! Mirrors the service's observable rules: soft-delete into a trash,
//! recursive-delete guard, sibling name conflicts, best-effort batches,
//! and rejection of cyclic folder moves. Every call is counted per
//! [`DriveOp`], and faults or delays can be injected per operation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

use filedeck_core::types::{FileId, FolderId, ShareId};
use filedeck_core::{AppError, AppResult};
use filedeck_entity::{
    BatchFailure, BatchItem, BatchOutcome, BatchResult, CreateShare, File, FileBlob, Folder,
    FolderContents, ItemKey, SearchResults, Share, ShareParty, SharedItem, StorageUsage,
    TrashContents,
};

use crate::api::{DriveApi, DriveOp};

/// Default quota of a fresh drive (15 GB).
const DEFAULT_QUOTA: u64 = 15 * 1024 * 1024 * 1024;

#[derive(Debug, Clone)]
struct FolderNode {
    folder: Folder,
    trashed: bool,
}

#[derive(Debug, Clone)]
struct FileNode {
    file: File,
    data: Bytes,
    trashed: bool,
}

/// One recorded `upload_multi` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiUpload {
    /// Relative paths in request order.
    pub paths: Vec<String>,
    /// Folder the tree was rebuilt under.
    pub base_folder_id: Option<FolderId>,
}

#[derive(Debug, Default)]
struct Inner {
    folders: HashMap<FolderId, FolderNode>,
    files: HashMap<FileId, FileNode>,
    incoming_shares: Vec<Share>,
    sent_shares: Vec<Share>,
    quota: u64,
    calls: HashMap<DriveOp, usize>,
    one_shot_faults: HashMap<DriveOp, VecDeque<AppError>>,
    persistent_faults: HashMap<DriveOp, AppError>,
    failing_uploads: HashSet<String>,
    list_delays: HashMap<Option<FolderId>, Duration>,
    op_delays: HashMap<DriveOp, Duration>,
    scripted_ancestors: HashMap<FolderId, Vec<Folder>>,
    scripted_batches: VecDeque<BatchResult>,
    multi_uploads: Vec<MultiUpload>,
}

impl Inner {
    fn folder_is_live(&self, id: &FolderId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.folders.get(cid) {
                Some(node) if !node.trashed => current = node.folder.parent_id.as_ref(),
                _ => return false,
            }
        }
        true
    }

    fn file_is_live(&self, id: &FileId) -> bool {
        match self.files.get(id) {
            Some(node) if !node.trashed => node
                .file
                .folder_id
                .as_ref()
                .is_none_or(|f| self.folder_is_live(f)),
            _ => false,
        }
    }

    fn live_folder(&self, id: &FolderId) -> AppResult<&Folder> {
        match self.folders.get(id) {
            Some(node) if self.folder_is_live(id) => Ok(&node.folder),
            _ => Err(AppError::not_found(format!("Folder {id} not found"))),
        }
    }

    fn live_file(&self, id: &FileId) -> AppResult<&File> {
        match self.files.get(id) {
            Some(node) if self.file_is_live(id) => Ok(&node.file),
            _ => Err(AppError::not_found(format!("File {id} not found"))),
        }
    }

    fn require_parent(&self, parent: Option<&FolderId>) -> AppResult<()> {
        match parent {
            Some(id) => self.live_folder(id).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Whether `candidate` is `ancestor` or lies below it.
    fn is_within(&self, candidate: &FolderId, ancestor: &FolderId) -> bool {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.folders.get(id).and_then(|n| n.folder.parent_id.as_ref());
        }
        false
    }

    fn child_folders(&self, parent: Option<&FolderId>) -> Vec<Folder> {
        let mut folders: Vec<Folder> = self
            .folders
            .values()
            .filter(|n| !n.trashed && n.folder.parent_id.as_ref() == parent)
            .map(|n| n.folder.clone())
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        folders
    }

    fn child_files(&self, parent: Option<&FolderId>) -> Vec<File> {
        let mut files: Vec<File> = self
            .files
            .values()
            .filter(|n| !n.trashed && n.file.folder_id.as_ref() == parent)
            .map(|n| n.file.clone())
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }

    fn check_folder_name(
        &self,
        name: &str,
        parent: Option<&FolderId>,
        except: Option<&FolderId>,
    ) -> AppResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if name.contains('/') {
            return Err(AppError::validation("Folder name cannot contain '/'"));
        }
        let taken = self
            .child_folders(parent)
            .iter()
            .any(|f| f.name == name && Some(&f.id) != except);
        if taken {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }
        Ok(name.to_string())
    }

    fn new_folder(&mut self, name: String, parent: Option<FolderId>) -> Folder {
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(Uuid::new_v4().to_string()),
            name,
            parent_id: parent,
            created_at: Some(now),
            updated_at: Some(now),
            size: None,
        };
        self.folders.insert(
            folder.id.clone(),
            FolderNode {
                folder: folder.clone(),
                trashed: false,
            },
        );
        folder
    }

    fn new_file(&mut self, name: String, folder_id: Option<FolderId>, data: Bytes) -> File {
        let now = Utc::now();
        let mut file = File::new(
            FileId::new(Uuid::new_v4().to_string()),
            name,
            folder_id,
            data.len() as u64,
        );
        file.created_at = Some(now);
        file.updated_at = Some(now);
        self.files.insert(
            file.id.clone(),
            FileNode {
                file: file.clone(),
                data,
                trashed: false,
            },
        );
        file
    }

    fn used_bytes(&self) -> u64 {
        self.files.values().map(|n| n.file.size).sum()
    }

    fn storage(&self) -> StorageUsage {
        StorageUsage {
            used: self.used_bytes(),
            quota: self.quota,
        }
    }

    fn reserve(&self, bytes: u64) -> AppResult<()> {
        if self.used_bytes().saturating_add(bytes) > self.quota {
            return Err(AppError::validation("Storage quota exceeded"));
        }
        Ok(())
    }

    /// Find a live sub-folder by name, creating it when missing.
    fn ensure_child_folder(&mut self, name: &str, parent: Option<FolderId>) -> FolderId {
        if let Some(existing) = self
            .child_folders(parent.as_ref())
            .into_iter()
            .find(|f| f.name == name)
        {
            return existing.id;
        }
        self.new_folder(name.to_string(), parent).id
    }

    fn move_item(&mut self, key: &ItemKey, target: Option<&FolderId>) -> AppResult<()> {
        self.require_parent(target)?;
        match key {
            ItemKey::Folder(id) => {
                self.live_folder(id)?;
                if let Some(target) = target
                    && self.is_within(target, id)
                {
                    return Err(AppError::conflict(
                        "Cannot move a folder into itself or one of its subfolders",
                    ));
                }
                let name = self.folders.get(id).map(|n| n.folder.name.clone()).unwrap_or_default();
                self.check_folder_name(&name, target, Some(id))?;
                if let Some(node) = self.folders.get_mut(id) {
                    node.folder.parent_id = target.cloned();
                    node.folder.updated_at = Some(Utc::now());
                }
            }
            ItemKey::File(id) => {
                self.live_file(id)?;
                if let Some(node) = self.files.get_mut(id) {
                    node.file.folder_id = target.cloned();
                    node.file.updated_at = Some(Utc::now());
                }
            }
        }
        Ok(())
    }

    fn trash(&mut self, key: &ItemKey, recursive: bool) -> AppResult<()> {
        match key {
            ItemKey::Folder(id) => {
                self.live_folder(id)?;
                let has_children = !self.child_folders(Some(id)).is_empty()
                    || !self.child_files(Some(id)).is_empty();
                if has_children && !recursive {
                    return Err(AppError::conflict("Folder is not empty"));
                }
                if let Some(node) = self.folders.get_mut(id) {
                    node.trashed = true;
                }
            }
            ItemKey::File(id) => {
                self.live_file(id)?;
                if let Some(node) = self.files.get_mut(id) {
                    node.trashed = true;
                }
            }
        }
        Ok(())
    }

    fn restore(&mut self, key: &ItemKey) -> AppResult<()> {
        match key {
            ItemKey::Folder(id) => {
                let parent = match self.folders.get(id) {
                    Some(node) if node.trashed => node.folder.parent_id.clone(),
                    _ => return Err(AppError::not_found(format!("Folder {id} is not in the trash"))),
                };
                let orphaned = parent.as_ref().is_some_and(|p| !self.folder_is_live(p));
                if let Some(node) = self.folders.get_mut(id) {
                    node.trashed = false;
                    if orphaned {
                        node.folder.parent_id = None;
                    }
                }
            }
            ItemKey::File(id) => {
                let folder = match self.files.get(id) {
                    Some(node) if node.trashed => node.file.folder_id.clone(),
                    _ => return Err(AppError::not_found(format!("File {id} is not in the trash"))),
                };
                let orphaned = folder.as_ref().is_some_and(|f| !self.folder_is_live(f));
                if let Some(node) = self.files.get_mut(id) {
                    node.trashed = false;
                    if orphaned {
                        node.file.folder_id = None;
                    }
                }
            }
        }
        Ok(())
    }

    fn purge(&mut self, key: &ItemKey) -> AppResult<()> {
        match key {
            ItemKey::Folder(id) => {
                if !self.folders.contains_key(id) {
                    return Err(AppError::not_found(format!("Folder {id} not found")));
                }
                let doomed: HashSet<FolderId> = self
                    .folders
                    .keys()
                    .filter(|candidate| self.is_within(candidate, id))
                    .cloned()
                    .collect();
                self.files
                    .retain(|_, n| n.file.folder_id.as_ref().is_none_or(|f| !doomed.contains(f)));
                self.folders.retain(|fid, _| !doomed.contains(fid));
            }
            ItemKey::File(id) => {
                if self.files.remove(id).is_none() {
                    return Err(AppError::not_found(format!("File {id} not found")));
                }
            }
        }
        Ok(())
    }

    fn apply_batch(
        &mut self,
        items: &[BatchItem],
        mut apply: impl FnMut(&mut Inner, &ItemKey) -> AppResult<()>,
    ) -> BatchResult {
        let mut result = BatchResult::default();
        for item in items {
            match apply(self, &item.key()) {
                Ok(()) => result.successes.push(BatchOutcome {
                    id: item.id.clone(),
                    entity_type: Some(item.entity_type),
                }),
                Err(e) => result.errors.push(BatchFailure {
                    id: item.id.clone(),
                    entity_type: Some(item.entity_type),
                    error: e.message,
                }),
            }
        }
        result
    }
}

/// A complete drive held in memory.
#[derive(Debug, Clone)]
pub struct MemoryDrive {
    /// Protected inner state.
    inner: Arc<Mutex<Inner>>,
}

impl Default for MemoryDrive {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDrive {
    /// Create an empty drive with the default quota.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                quota: DEFAULT_QUOTA,
                ..Inner::default()
            })),
        }
    }

    /// Count the call, surface any injected fault, then wait out any injected delay.
    async fn begin(&self, op: DriveOp) -> AppResult<MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock().await;
        *inner.calls.entry(op).or_default() += 1;
        if let Some(err) = inner.one_shot_faults.get_mut(&op).and_then(VecDeque::pop_front) {
            debug!(operation = %op, error = %err, "Injected one-shot fault");
            return Err(err);
        }
        if let Some(err) = inner.persistent_faults.get(&op) {
            return Err(err.clone());
        }
        if let Some(delay) = inner.op_delays.get(&op).copied() {
            drop(inner);
            tokio::time::sleep(delay).await;
            return Ok(self.inner.lock().await);
        }
        Ok(inner)
    }

    async fn next_scripted_batch(&self, op: DriveOp) -> AppResult<Option<BatchResult>> {
        let mut inner = self.begin(op).await?;
        Ok(inner.scripted_batches.pop_front())
    }

    // ── Seeding ──────────────────────────────────────────────────────

    /// Insert a folder with a fixed id.
    pub async fn insert_folder(&self, id: &str, name: &str, parent: Option<&str>) -> Folder {
        let folder = Folder::new(id, name, parent.map(FolderId::from));
        self.inner.lock().await.folders.insert(
            folder.id.clone(),
            FolderNode {
                folder: folder.clone(),
                trashed: false,
            },
        );
        folder
    }

    /// Insert a file with a fixed id.
    pub async fn insert_file(&self, id: &str, name: &str, folder: Option<&str>, data: impl Into<Bytes>) -> File {
        let data = data.into();
        let file = File::new(id, name, folder.map(FolderId::from), data.len() as u64);
        self.inner.lock().await.files.insert(
            file.id.clone(),
            FileNode {
                file: file.clone(),
                data,
                trashed: false,
            },
        );
        file
    }

    /// Add a share another account granted to the current user.
    pub async fn insert_incoming_share(&self, share: Share) {
        self.inner.lock().await.incoming_shares.push(share);
    }

    /// Override the storage quota.
    pub async fn set_quota(&self, quota: u64) {
        self.inner.lock().await.quota = quota;
    }

    // ── Fault injection ─────────────────────────────────────────────

    /// Fail the next call of `op` with `err`.
    pub async fn fail_next(&self, op: DriveOp, err: AppError) {
        self.inner
            .lock()
            .await
            .one_shot_faults
            .entry(op)
            .or_default()
            .push_back(err);
    }

    /// Fail every call of `op` with `err` until [`Self::clear_faults`].
    pub async fn fail_always(&self, op: DriveOp, err: AppError) {
        self.inner.lock().await.persistent_faults.insert(op, err);
    }

    /// Remove every injected fault.
    pub async fn clear_faults(&self) {
        let mut inner = self.inner.lock().await;
        inner.one_shot_faults.clear();
        inner.persistent_faults.clear();
        inner.failing_uploads.clear();
    }

    /// Drop the connection on any upload of a file with this name.
    pub async fn fail_upload_of(&self, name: &str) {
        self.inner.lock().await.failing_uploads.insert(name.to_string());
    }

    /// Hold every call of `op` for `delay` after it is counted. The state
    /// lock is released while the call waits, so calls overlap.
    pub async fn delay_op(&self, op: DriveOp, delay: Duration) {
        self.inner.lock().await.op_delays.insert(op, delay);
    }

    /// Delay listings of `folder` (`None` = root) by `delay`.
    pub async fn delay_listing(&self, folder: Option<&str>, delay: Duration) {
        self.inner
            .lock()
            .await
            .list_delays
            .insert(folder.map(FolderId::from), delay);
    }

    /// Answer `get_ancestors(id)` with `chain` instead of the real path.
    pub async fn script_ancestors(&self, id: &str, chain: Vec<Folder>) {
        self.inner
            .lock()
            .await
            .scripted_ancestors
            .insert(FolderId::from(id), chain);
    }

    /// Answer the next batch call with `result` without mutating anything.
    pub async fn script_batch(&self, result: BatchResult) {
        self.inner.lock().await.scripted_batches.push_back(result);
    }

    // ── Inspection ──────────────────────────────────────────────────

    /// How many times `op` was called.
    pub async fn calls(&self, op: DriveOp) -> usize {
        self.inner.lock().await.calls.get(&op).copied().unwrap_or(0)
    }

    /// Reset every call counter.
    pub async fn reset_calls(&self) {
        self.inner.lock().await.calls.clear();
    }

    /// A live folder by id.
    pub async fn folder(&self, id: &str) -> Option<Folder> {
        let inner = self.inner.lock().await;
        inner.live_folder(&FolderId::from(id)).ok().cloned()
    }

    /// A live file by id.
    pub async fn file(&self, id: &str) -> Option<File> {
        let inner = self.inner.lock().await;
        inner.live_file(&FileId::from(id)).ok().cloned()
    }

    /// Whether the item itself was soft-deleted.
    pub async fn is_trashed(&self, key: &ItemKey) -> bool {
        let inner = self.inner.lock().await;
        match key {
            ItemKey::Folder(id) => inner.folders.get(id).is_some_and(|n| n.trashed),
            ItemKey::File(id) => inner.files.get(id).is_some_and(|n| n.trashed),
        }
    }

    /// Whether the item still exists, trashed or not.
    pub async fn exists(&self, key: &ItemKey) -> bool {
        let inner = self.inner.lock().await;
        match key {
            ItemKey::Folder(id) => inner.folders.contains_key(id),
            ItemKey::File(id) => inner.files.contains_key(id),
        }
    }

    /// Sorted names of the live folders and files directly under `folder`.
    pub async fn child_names(&self, folder: Option<&str>) -> Vec<String> {
        let inner = self.inner.lock().await;
        let parent = folder.map(FolderId::from);
        let mut names: Vec<String> = inner
            .child_folders(parent.as_ref())
            .into_iter()
            .map(|f| f.name)
            .chain(inner.child_files(parent.as_ref()).into_iter().map(|f| f.name))
            .collect();
        names.sort();
        names
    }

    /// Every `upload_multi` request received so far.
    pub async fn multi_uploads(&self) -> Vec<MultiUpload> {
        self.inner.lock().await.multi_uploads.clone()
    }
}

fn upload_dropped(name: &str) -> AppError {
    AppError::transport(format!("Connection reset while uploading '{name}'"))
}

#[async_trait]
impl DriveApi for MemoryDrive {
    async fn list_children(&self, folder_id: Option<&FolderId>) -> AppResult<FolderContents> {
        let delay = {
            let inner = self.begin(DriveOp::ListChildren).await?;
            inner.list_delays.get(&folder_id.cloned()).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let inner = self.inner.lock().await;
        let (folder, parent_name) = match folder_id {
            Some(id) => {
                let folder = inner.live_folder(id)?.clone();
                let parent_name = folder
                    .parent_id
                    .as_ref()
                    .and_then(|p| inner.folders.get(p))
                    .map(|n| n.folder.name.clone());
                (Some(folder), parent_name)
            }
            None => (None, None),
        };
        Ok(FolderContents {
            parent_name,
            folder,
            folders: inner.child_folders(folder_id),
            files: inner.child_files(folder_id),
            storage: Some(inner.storage()),
        })
    }

    async fn get_ancestors(&self, folder_id: &FolderId) -> AppResult<Vec<Folder>> {
        let inner = self.begin(DriveOp::GetAncestors).await?;
        if let Some(chain) = inner.scripted_ancestors.get(folder_id) {
            return Ok(chain.clone());
        }
        let mut chain = vec![inner.live_folder(folder_id)?.clone()];
        while let Some(parent) = chain.last().and_then(|f| f.parent_id.clone()) {
            chain.push(inner.live_folder(&parent)?.clone());
        }
        chain.reverse();
        Ok(chain)
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&FolderId>) -> AppResult<Folder> {
        let mut inner = self.begin(DriveOp::CreateFolder).await?;
        inner.require_parent(parent_id)?;
        let name = inner.check_folder_name(name, parent_id, None)?;
        Ok(inner.new_folder(name, parent_id.cloned()))
    }

    async fn rename_folder(&self, id: &FolderId, name: &str) -> AppResult<Folder> {
        let mut inner = self.begin(DriveOp::Rename).await?;
        let parent = inner.live_folder(id)?.parent_id.clone();
        let name = inner.check_folder_name(name, parent.as_ref(), Some(id))?;
        let node = inner
            .folders
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        node.folder.name = name;
        node.folder.updated_at = Some(Utc::now());
        Ok(node.folder.clone())
    }

    async fn rename_file(&self, id: &FileId, name: &str) -> AppResult<File> {
        let mut inner = self.begin(DriveOp::Rename).await?;
        inner.live_file(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        let node = inner
            .files
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        node.file.name = name.to_string();
        node.file.updated_at = Some(Utc::now());
        Ok(node.file.clone())
    }

    async fn move_folder(&self, id: &FolderId, target: Option<&FolderId>) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::Move).await?;
        inner.move_item(&ItemKey::Folder(id.clone()), target)
    }

    async fn move_file(&self, id: &FileId, target: Option<&FolderId>) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::Move).await?;
        inner.move_item(&ItemKey::File(id.clone()), target)
    }

    async fn delete_folder(&self, id: &FolderId, recursive: bool) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::Delete).await?;
        inner.trash(&ItemKey::Folder(id.clone()), recursive)
    }

    async fn delete_file(&self, id: &FileId) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::Delete).await?;
        inner.trash(&ItemKey::File(id.clone()), false)
    }

    async fn restore_folder(&self, id: &FolderId) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::Restore).await?;
        inner.restore(&ItemKey::Folder(id.clone()))
    }

    async fn restore_file(&self, id: &FileId) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::Restore).await?;
        inner.restore(&ItemKey::File(id.clone()))
    }

    async fn permanently_delete(&self, key: &ItemKey) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::PermanentDelete).await?;
        inner.purge(key)
    }

    async fn batch_delete(&self, items: &[BatchItem]) -> AppResult<BatchResult> {
        if let Some(scripted) = self.next_scripted_batch(DriveOp::BatchDelete).await? {
            return Ok(scripted);
        }
        let mut inner = self.inner.lock().await;
        Ok(inner.apply_batch(items, |state, key| state.trash(key, true)))
    }

    async fn batch_move(&self, items: &[BatchItem], target: Option<&FolderId>) -> AppResult<BatchResult> {
        if let Some(scripted) = self.next_scripted_batch(DriveOp::BatchMove).await? {
            return Ok(scripted);
        }
        let mut inner = self.inner.lock().await;
        Ok(inner.apply_batch(items, |state, key| state.move_item(key, target)))
    }

    async fn batch_restore(&self, items: &[BatchItem]) -> AppResult<BatchResult> {
        if let Some(scripted) = self.next_scripted_batch(DriveOp::BatchRestore).await? {
            return Ok(scripted);
        }
        let mut inner = self.inner.lock().await;
        Ok(inner.apply_batch(items, |state, key| state.restore(key)))
    }

    async fn upload_single(&self, blob: FileBlob, folder_id: Option<&FolderId>) -> AppResult<File> {
        let mut inner = self.begin(DriveOp::UploadSingle).await?;
        if inner.failing_uploads.contains(&blob.name) {
            return Err(upload_dropped(&blob.name));
        }
        inner.require_parent(folder_id)?;
        inner.reserve(blob.size())?;
        Ok(inner.new_file(blob.name, folder_id.cloned(), blob.data))
    }

    async fn upload_multi(
        &self,
        blobs: Vec<FileBlob>,
        paths: Vec<String>,
        base_folder_id: Option<&FolderId>,
    ) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::UploadMulti).await?;
        if blobs.len() != paths.len() {
            return Err(AppError::validation("Each uploaded file needs exactly one path"));
        }
        if let Some(blob) = blobs.iter().find(|b| inner.failing_uploads.contains(&b.name)) {
            return Err(upload_dropped(&blob.name));
        }
        inner.require_parent(base_folder_id)?;
        inner.reserve(blobs.iter().map(FileBlob::size).sum())?;

        inner.multi_uploads.push(MultiUpload {
            paths: paths.clone(),
            base_folder_id: base_folder_id.cloned(),
        });
        for (blob, path) in blobs.into_iter().zip(paths) {
            let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            let file_name = segments.pop().unwrap_or(blob.name.as_str()).to_string();
            let mut parent = base_folder_id.cloned();
            for segment in segments {
                parent = Some(inner.ensure_child_folder(segment, parent));
            }
            inner.new_file(file_name, parent, blob.data);
        }
        Ok(())
    }

    async fn download_file(&self, id: &FileId) -> AppResult<Bytes> {
        let inner = self.begin(DriveOp::Download).await?;
        inner.live_file(id)?;
        inner
            .files
            .get(id)
            .map(|n| n.data.clone())
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn search(&self, query: &str) -> AppResult<SearchResults> {
        let inner = self.begin(DriveOp::Search).await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(SearchResults::default());
        }
        let mut results = SearchResults {
            folders: inner
                .folders
                .values()
                .filter(|n| inner.folder_is_live(&n.folder.id))
                .filter(|n| n.folder.name.to_lowercase().contains(&needle))
                .map(|n| n.folder.clone())
                .collect(),
            files: inner
                .files
                .values()
                .filter(|n| inner.file_is_live(&n.file.id))
                .filter(|n| n.file.name.to_lowercase().contains(&needle))
                .map(|n| n.file.clone())
                .collect(),
        };
        results.folders.sort_by(|a, b| a.name.cmp(&b.name));
        results.files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(results)
    }

    async fn shared_with_me(&self) -> AppResult<Vec<Share>> {
        let inner = self.begin(DriveOp::ListShares).await?;
        Ok(inner.incoming_shares.clone())
    }

    async fn shares_sent(&self) -> AppResult<Vec<Share>> {
        let inner = self.begin(DriveOp::ListShares).await?;
        Ok(inner.sent_shares.clone())
    }

    async fn create_share(&self, request: &CreateShare) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::CreateShare).await?;
        let key = ItemKey::new(request.item_id.clone(), request.item_type);
        let name = match &key {
            ItemKey::Folder(id) => inner.live_folder(id)?.name.clone(),
            ItemKey::File(id) => inner.live_file(id)?.name.clone(),
        };
        let duplicate = inner.sent_shares.iter().any(|s| {
            s.item_id == request.item_id
                && s.shared_with.as_ref().is_some_and(|p| p.email == request.email)
        });
        if duplicate {
            return Err(AppError::conflict(format!(
                "Already shared with {}",
                request.email
            )));
        }
        inner.sent_shares.push(Share {
            id: ShareId::new(Uuid::new_v4().to_string()),
            item_id: request.item_id.clone(),
            item_type: request.item_type,
            owner_id: None,
            shared_with_id: None,
            permission: request.permission,
            created_at: Some(Utc::now()),
            owner: None,
            shared_with: Some(ShareParty {
                email: request.email.clone(),
            }),
            item: Some(SharedItem { name }),
        });
        Ok(())
    }

    async fn delete_share(&self, id: &ShareId) -> AppResult<()> {
        let mut inner = self.begin(DriveOp::DeleteShare).await?;
        let before = inner.sent_shares.len();
        inner.sent_shares.retain(|s| &s.id != id);
        if inner.sent_shares.len() == before {
            return Err(AppError::not_found(format!("Share {id} not found")));
        }
        Ok(())
    }

    async fn list_trash(&self) -> AppResult<TrashContents> {
        let inner = self.begin(DriveOp::ListTrash).await?;
        let mut trash = TrashContents {
            folders: inner
                .folders
                .values()
                .filter(|n| n.trashed)
                .map(|n| n.folder.clone())
                .collect(),
            files: inner
                .files
                .values()
                .filter(|n| n.trashed)
                .map(|n| n.file.clone())
                .collect(),
        };
        trash.folders.sort_by(|a, b| a.name.cmp(&b.name));
        trash.files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(trash)
    }
}
