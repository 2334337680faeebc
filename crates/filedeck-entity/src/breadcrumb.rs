//! Breadcrumb entries for navigational display.

use serde::{Deserialize, Serialize};

use filedeck_core::types::FolderId;

use crate::folder::Folder;

/// Label of the implicit root entry rendered before every trail.
pub const ROOT_LABEL: &str = "My Drive";

/// One step of a root-to-leaf folder path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    /// Folder id.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Navigation target for this entry.
    pub href: String,
}

impl BreadcrumbEntry {
    /// Create an entry for a folder id and name.
    pub fn new(id: impl Into<FolderId>, name: impl Into<String>) -> Self {
        let id = id.into();
        let href = format!("/app/folder/{id}");
        Self {
            id,
            name: name.into(),
            href,
        }
    }

    /// Create an entry for a folder record.
    pub fn for_folder(folder: &Folder) -> Self {
        Self::new(folder.id.clone(), folder.name.clone())
    }
}

/// Render a trail as `My Drive / Docs / 2024`.
pub fn display_path(entries: &[BreadcrumbEntry]) -> String {
    std::iter::once(ROOT_LABEL)
        .chain(entries.iter().map(|e| e.name.as_str()))
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_and_display() {
        let trail = vec![BreadcrumbEntry::new("F1", "Docs"), BreadcrumbEntry::new("F2", "2024")];
        assert_eq!(trail[1].href, "/app/folder/F2");
        assert_eq!(display_path(&trail), "My Drive / Docs / 2024");
        assert_eq!(display_path(&[]), "My Drive");
    }
}
