//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filedeck_core::types::{FileId, FolderId};

/// A file stored in the remote drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// The folder containing this file (null for the root).
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Current version number.
    #[serde(default = "default_version")]
    pub current_version: i32,
    /// When the file was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the file was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl File {
    /// Create a file record with only the fields listings need.
    pub fn new(id: impl Into<FileId>, name: impl Into<String>, folder_id: Option<FolderId>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folder_id,
            size,
            current_version: default_version(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

fn default_version() -> i32 {
    1
}
