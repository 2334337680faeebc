//! Folder navigation: the primary browser, breadcrumbs, and the destination picker.

pub mod breadcrumb;
pub mod browser;
pub mod picker;

pub use breadcrumb::{AncestorLookup, BreadcrumbResolver};
pub use browser::FolderBrowser;
pub use picker::{DestinationPicker, NavigationFrame};
