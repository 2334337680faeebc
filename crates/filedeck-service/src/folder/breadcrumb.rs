//! Root-to-leaf breadcrumb resolution.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use filedeck_client::DriveApi;
use filedeck_core::types::FolderId;
use filedeck_entity::{BreadcrumbEntry, Folder};

/// Outcome of the single-call ancestors lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestorLookup {
    /// The service returned a usable root-to-leaf chain.
    Resolved(Vec<BreadcrumbEntry>),
    /// The call failed or the chain was unusable; the reason is kept for logging.
    Unavailable(String),
}

/// Builds the breadcrumb trail for a folder.
///
/// Tries the ancestors endpoint first and falls back to walking parent
/// links one listing at a time. Never fails: the worst case is an empty
/// or partial trail.
#[derive(Debug, Clone)]
pub struct BreadcrumbResolver {
    /// Remote drive.
    api: Arc<dyn DriveApi>,
}

impl BreadcrumbResolver {
    /// Creates a new breadcrumb resolver.
    pub fn new(api: Arc<dyn DriveApi>) -> Self {
        Self { api }
    }

    /// Trail from the first level below the root down to `start` inclusive.
    pub async fn resolve(&self, start: Option<&FolderId>) -> Vec<BreadcrumbEntry> {
        let Some(start) = start else {
            return Vec::new();
        };

        match self.lookup_ancestors(start).await {
            AncestorLookup::Resolved(trail) => trail,
            AncestorLookup::Unavailable(reason) => {
                warn!(folder_id = %start, reason = %reason, "Ancestors unavailable, walking parents");
                self.walk_parents(start).await
            }
        }
    }

    /// One call to the ancestors endpoint, checked for shape.
    pub async fn lookup_ancestors(&self, start: &FolderId) -> AncestorLookup {
        match self.api.get_ancestors(start).await {
            Ok(chain) => match validate_chain(start, &chain) {
                Ok(()) => AncestorLookup::Resolved(chain.iter().map(BreadcrumbEntry::for_folder).collect()),
                Err(reason) => AncestorLookup::Unavailable(reason),
            },
            Err(e) => AncestorLookup::Unavailable(e.to_string()),
        }
    }

    /// Follow parent links from `start` upwards, one folder lookup per level.
    ///
    /// Stops at a root folder, a missing record, a failed lookup, or a
    /// folder seen twice.
    pub async fn walk_parents(&self, start: &FolderId) -> Vec<BreadcrumbEntry> {
        let mut trail = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(start.clone());

        while let Some(id) = current.take() {
            if !seen.insert(id.clone()) {
                warn!(folder_id = %id, "Parent chain loops, truncating breadcrumbs");
                break;
            }
            let folder = match self.api.list_children(Some(&id)).await {
                Ok(contents) => contents.folder,
                Err(e) => {
                    warn!(folder_id = %id, error = %e, "Breadcrumb lookup failed");
                    None
                }
            };
            let Some(folder) = folder else {
                break;
            };
            trail.push(BreadcrumbEntry::for_folder(&folder));
            current = folder.parent_id;
        }

        trail.reverse();
        trail
    }
}

/// A usable chain is non-empty, ends at `start`, and starts at a root folder,
/// with every reported parent link pointing at the previous entry.
fn validate_chain(start: &FolderId, chain: &[Folder]) -> Result<(), String> {
    let Some(last) = chain.last() else {
        return Err("empty ancestor chain".to_string());
    };
    if &last.id != start {
        return Err(format!("chain ends at {} instead of {start}", last.id));
    }
    if chain[0].parent_id.is_some() {
        return Err(format!("chain starts below the root at {}", chain[0].id));
    }
    for pair in chain.windows(2) {
        if let Some(parent) = &pair[1].parent_id
            && parent != &pair[0].id
        {
            return Err(format!("{} is not a child of {}", pair[1].id, pair[0].id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedeck_client::{DriveOp, MemoryDrive};
    use filedeck_core::AppError;

    async fn drive() -> MemoryDrive {
        let drive = MemoryDrive::new();
        drive.insert_folder("F1", "Docs", None).await;
        drive.insert_folder("F2", "2024", Some("F1")).await;
        drive
    }

    fn ids(trail: &[BreadcrumbEntry]) -> Vec<&str> {
        trail.iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_null_start_is_empty() {
        let resolver = BreadcrumbResolver::new(Arc::new(drive().await));
        assert!(resolver.resolve(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_uses_ancestors_in_one_call() {
        let drive = drive().await;
        let resolver = BreadcrumbResolver::new(Arc::new(drive.clone()));
        let trail = resolver.resolve(Some(&FolderId::from("F2"))).await;

        assert_eq!(trail, vec![BreadcrumbEntry::new("F1", "Docs"), BreadcrumbEntry::new("F2", "2024")]);
        assert_eq!(drive.calls(DriveOp::GetAncestors).await, 1);
        assert_eq!(drive.calls(DriveOp::ListChildren).await, 0);
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let drive = drive().await;
        drive.fail_always(DriveOp::GetAncestors, AppError::remote("Not implemented")).await;
        let resolver = BreadcrumbResolver::new(Arc::new(drive.clone()));
        let trail = resolver.resolve(Some(&FolderId::from("F2"))).await;

        assert_eq!(ids(&trail), vec!["F1", "F2"]);
        assert_eq!(drive.calls(DriveOp::ListChildren).await, 2);
    }

    #[tokio::test]
    async fn test_malformed_chain_falls_back() {
        let drive = drive().await;
        drive
            .script_ancestors("F2", vec![Folder::new("F9", "Elsewhere", None)])
            .await;
        let resolver = BreadcrumbResolver::new(Arc::new(drive.clone()));

        assert!(matches!(
            resolver.lookup_ancestors(&FolderId::from("F2")).await,
            AncestorLookup::Unavailable(_)
        ));
        assert_eq!(ids(&resolver.resolve(Some(&FolderId::from("F2"))).await), vec!["F1", "F2"]);
    }

    #[tokio::test]
    async fn test_walk_stops_at_missing_folder() {
        let drive = drive().await;
        drive.fail_always(DriveOp::GetAncestors, AppError::remote("down")).await;
        let resolver = BreadcrumbResolver::new(Arc::new(drive));
        assert!(resolver.resolve(Some(&FolderId::from("gone"))).await.is_empty());
    }

    #[test]
    fn test_validate_chain_rules() {
        let start = FolderId::from("B");
        let good = vec![Folder::new("A", "a", None), Folder::new("B", "b", Some("A".into()))];
        assert!(validate_chain(&start, &good).is_ok());

        let broken = vec![Folder::new("A", "a", None), Folder::new("B", "b", Some("X".into()))];
        assert!(validate_chain(&start, &broken).is_err());
        assert!(validate_chain(&start, &[]).is_err());
    }
}
