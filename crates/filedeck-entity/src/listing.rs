//! Flat listings returned by search and trash endpoints.

use serde::{Deserialize, Serialize};

use crate::file::File;
use crate::folder::Folder;

/// Matches for a search query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching folders.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Matching files.
    #[serde(default)]
    pub files: Vec<File>,
}

impl SearchResults {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Soft-deleted items awaiting restore or purge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrashContents {
    /// Trashed folders.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Trashed files.
    #[serde(default)]
    pub files: Vec<File>,
}

impl TrashContents {
    /// Whether the trash is empty.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}
