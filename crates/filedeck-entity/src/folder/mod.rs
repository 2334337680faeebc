//! Folder domain entities.

pub mod model;

pub use model::{Folder, FolderContents, StorageUsage};
