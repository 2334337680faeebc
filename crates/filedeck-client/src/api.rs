//! The remote drive contract consumed by every FileDeck service.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

use filedeck_core::AppResult;
use filedeck_core::types::{FileId, FolderId, ShareId};
use filedeck_entity::{
    BatchItem, BatchResult, CreateShare, File, FileBlob, Folder, FolderContents, ItemKey,
    SearchResults, Share, TrashContents,
};

/// Every remote operation, used for logging, call counting, and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveOp {
    /// `list_children`
    ListChildren,
    /// `get_ancestors`
    GetAncestors,
    /// `create_folder`
    CreateFolder,
    /// `rename_folder` / `rename_file`
    Rename,
    /// `move_folder` / `move_file`
    Move,
    /// `delete_folder` / `delete_file`
    Delete,
    /// `restore_folder` / `restore_file`
    Restore,
    /// `permanently_delete`
    PermanentDelete,
    /// `batch_delete`
    BatchDelete,
    /// `batch_move`
    BatchMove,
    /// `batch_restore`
    BatchRestore,
    /// `upload_single`
    UploadSingle,
    /// `upload_multi`
    UploadMulti,
    /// `download_file`
    Download,
    /// `search`
    Search,
    /// `shared_with_me` / `shares_sent`
    ListShares,
    /// `create_share`
    CreateShare,
    /// `delete_share`
    DeleteShare,
    /// `list_trash`
    ListTrash,
}

impl fmt::Display for DriveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Operations exposed by the remote drive service.
///
/// The remote tree is the only shared mutable resource; every value
/// returned here is a snapshot that a later refresh may invalidate.
/// Implementations never retry.
#[async_trait]
pub trait DriveApi: Send + Sync + fmt::Debug + 'static {
    /// List the direct children of a folder (`None` = root).
    async fn list_children(&self, folder_id: Option<&FolderId>) -> AppResult<FolderContents>;

    /// Fetch the ancestor chain of a folder, root first, ending with the folder itself.
    async fn get_ancestors(&self, folder_id: &FolderId) -> AppResult<Vec<Folder>>;

    /// Create a folder under `parent_id` (`None` = root).
    async fn create_folder(&self, name: &str, parent_id: Option<&FolderId>) -> AppResult<Folder>;

    /// Rename a folder.
    async fn rename_folder(&self, id: &FolderId, name: &str) -> AppResult<Folder>;

    /// Rename a file.
    async fn rename_file(&self, id: &FileId, name: &str) -> AppResult<File>;

    /// Move a folder under `target` (`None` = root).
    async fn move_folder(&self, id: &FolderId, target: Option<&FolderId>) -> AppResult<()>;

    /// Move a file into `target` (`None` = root).
    async fn move_file(&self, id: &FileId, target: Option<&FolderId>) -> AppResult<()>;

    /// Soft-delete a folder; non-empty folders require `recursive`.
    async fn delete_folder(&self, id: &FolderId, recursive: bool) -> AppResult<()>;

    /// Soft-delete a file.
    async fn delete_file(&self, id: &FileId) -> AppResult<()>;

    /// Restore a trashed folder.
    async fn restore_folder(&self, id: &FolderId) -> AppResult<()>;

    /// Restore a trashed file.
    async fn restore_file(&self, id: &FileId) -> AppResult<()>;

    /// Purge an item for good.
    async fn permanently_delete(&self, key: &ItemKey) -> AppResult<()>;

    /// Soft-delete many items in one best-effort request.
    async fn batch_delete(&self, items: &[BatchItem]) -> AppResult<BatchResult>;

    /// Move many items in one best-effort request.
    async fn batch_move(&self, items: &[BatchItem], target: Option<&FolderId>) -> AppResult<BatchResult>;

    /// Restore many items in one best-effort request.
    async fn batch_restore(&self, items: &[BatchItem]) -> AppResult<BatchResult>;

    /// Upload one file into `folder_id` (`None` = root).
    async fn upload_single(&self, blob: FileBlob, folder_id: Option<&FolderId>) -> AppResult<File>;

    /// Upload a directory tree in one request; `paths[i]` is the relative path of `blobs[i]`.
    async fn upload_multi(
        &self,
        blobs: Vec<FileBlob>,
        paths: Vec<String>,
        base_folder_id: Option<&FolderId>,
    ) -> AppResult<()>;

    /// Download a file's contents.
    async fn download_file(&self, id: &FileId) -> AppResult<Bytes>;

    /// Search folder and file names.
    async fn search(&self, query: &str) -> AppResult<SearchResults>;

    /// Shares other accounts granted to the current user.
    async fn shared_with_me(&self) -> AppResult<Vec<Share>>;

    /// Shares the current user granted to others.
    async fn shares_sent(&self) -> AppResult<Vec<Share>>;

    /// Grant another account access to an item.
    async fn create_share(&self, request: &CreateShare) -> AppResult<()>;

    /// Revoke a share.
    async fn delete_share(&self, id: &ShareId) -> AppResult<()>;

    /// List soft-deleted items.
    async fn list_trash(&self) -> AppResult<TrashContents>;
}
