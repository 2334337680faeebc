//! Folder entity model and folder listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filedeck_core::types::FolderId;

use crate::file::File;

/// A folder in the remote hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null for root folders).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// When the folder was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the folder was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Aggregate size of the folder's contents in bytes, when the service reports it.
    #[serde(default)]
    pub size: Option<u64>,
}

impl Folder {
    /// Create a folder record with only the fields navigation needs.
    pub fn new(id: impl Into<FolderId>, name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id,
            created_at: None,
            updated_at: None,
            size: None,
        }
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Storage quota usage reported alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Bytes in use.
    pub used: u64,
    /// Total bytes available to the user.
    pub quota: u64,
}

impl StorageUsage {
    /// Fraction of the quota in use, in `0.0..=1.0` (0 for an unlimited quota).
    pub fn ratio(&self) -> f64 {
        if self.quota == 0 {
            0.0
        } else {
            (self.used as f64 / self.quota as f64).min(1.0)
        }
    }
}

/// The direct children of one folder (or of the root when `folder` is `None`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderContents {
    /// Name of the listed folder's parent, when the service includes it.
    #[serde(default)]
    pub parent_name: Option<String>,
    /// The listed folder itself; `None` for the root listing.
    #[serde(default)]
    pub folder: Option<Folder>,
    /// Direct sub-folders.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Files directly inside the folder.
    #[serde(default)]
    pub files: Vec<File>,
    /// Storage usage of the signed-in user.
    #[serde(default)]
    pub storage: Option<StorageUsage>,
}

impl FolderContents {
    /// Whether the listing has neither folders nor files.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Total number of listed entries.
    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }
}
