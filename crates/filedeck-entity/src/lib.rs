//! # filedeck-entity
//!
//! Entity models for FileDeck. Every struct in this crate is either a
//! record returned by the remote drive service (folders, files, shares)
//! or a client-side value object used to coordinate selections, batch
//! mutations, breadcrumbs, and uploads. Wire-facing types serialize with
//! the service's camelCase field names.

pub mod breadcrumb;
pub mod file;
pub mod folder;
pub mod item;
pub mod listing;
pub mod share;

pub use breadcrumb::BreadcrumbEntry;
pub use file::{File, FileBlob};
pub use folder::{Folder, FolderContents, StorageUsage};
pub use item::{BatchFailure, BatchItem, BatchOperation, BatchOutcome, BatchResult, EntityType, ItemKey};
pub use listing::{SearchResults, TrashContents};
pub use share::{CreateShare, Share, ShareParty, SharePermission, SharedItem};
