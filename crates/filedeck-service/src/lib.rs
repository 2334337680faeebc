//! # filedeck-service
//!
//! Client-side orchestration for FileDeck. Each service coordinates
//! calls against a [`DriveApi`](filedeck_client::DriveApi) with the
//! local state of one view: the current selection, the navigation
//! position, and the listing on screen.
//!
//! Services follow constructor injection: the drive and the notifier
//! are handed in as `Arc` references at construction time. Remote
//! failures are caught where they happen, reported once through the
//! [`Notifier`], and returned to the caller.

pub mod batch;
pub mod context;
pub mod folder;
pub mod notification;
pub mod search;
pub mod selection;
pub mod share;
pub mod trash;
pub mod upload;
pub mod view;

pub use batch::{BatchCoordinator, BatchSummary};
pub use context::DriveContext;
pub use folder::{AncestorLookup, BreadcrumbResolver, DestinationPicker, FolderBrowser, NavigationFrame};
pub use notification::{LogNotifier, MemoryNotifier, Notification, Notifier};
pub use search::SearchService;
pub use selection::SelectionManager;
pub use share::ShareService;
pub use trash::TrashView;
pub use upload::{FileInput, UploadOrchestrator};
pub use view::ListingView;
