//! Entity type discriminator and the composite selection key.

use std::fmt;

use serde::{Deserialize, Serialize};

use filedeck_core::AppError;
use filedeck_core::types::{FileId, FolderId};

/// Distinguishes folders from files when both share a selection or batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// A folder.
    Folder,
    /// A file.
    File,
}

impl EntityType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "folder" => Ok(Self::Folder),
            "file" => Ok(Self::File),
            _ => Err(AppError::validation(format!("Invalid entity type: '{s}'"))),
        }
    }
}

/// Composite identity of a selectable item.
///
/// File ids and folder ids come from independent id-spaces, so the key
/// carries its entity type; `Folder("1")` and `File("1")` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    /// A folder.
    Folder(FolderId),
    /// A file.
    File(FileId),
}

impl ItemKey {
    /// Build a key from a raw id and its entity type.
    pub fn new(id: impl Into<String>, entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Folder => Self::Folder(FolderId::new(id)),
            EntityType::File => Self::File(FileId::new(id)),
        }
    }

    /// The key's entity type.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Folder(_) => EntityType::Folder,
            Self::File(_) => EntityType::File,
        }
    }

    /// The raw id, without its entity type.
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(id) => id.as_str(),
            Self::File(id) => id.as_str(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type(), self.id())
    }
}

impl From<FolderId> for ItemKey {
    fn from(id: FolderId) -> Self {
        Self::Folder(id)
    }
}

impl From<FileId> for ItemKey {
    fn from(id: FileId) -> Self {
        Self::File(id)
    }
}
