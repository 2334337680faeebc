//! Shared dependencies handed to every view and service.

use std::sync::Arc;

use filedeck_client::{DriveApi, HttpDriveClient};
use filedeck_core::AppResult;
use filedeck_core::config::AppConfig;
use filedeck_core::types::FolderId;

use crate::batch::BatchCoordinator;
use crate::folder::{BreadcrumbResolver, DestinationPicker, FolderBrowser};
use crate::notification::Notifier;
use crate::search::SearchService;
use crate::share::ShareService;
use crate::trash::TrashView;
use crate::upload::UploadOrchestrator;

/// The drive, the notification sink, and the configuration one client session works with.
#[derive(Debug, Clone)]
pub struct DriveContext {
    /// Remote drive.
    pub api: Arc<dyn DriveApi>,
    /// User-facing notifications.
    pub notifier: Arc<dyn Notifier>,
    /// Loaded configuration.
    pub config: AppConfig,
}

impl DriveContext {
    /// Creates a context over an existing drive.
    pub fn new(api: Arc<dyn DriveApi>, notifier: Arc<dyn Notifier>, config: AppConfig) -> Self {
        Self {
            api,
            notifier,
            config,
        }
    }

    /// Creates a context talking HTTP to the configured service.
    pub fn connect(config: AppConfig, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let client = HttpDriveClient::new(&config.api)?;
        Ok(Self::new(Arc::new(client), notifier, config))
    }

    /// A folder browser for the primary view.
    pub fn browser(&self) -> FolderBrowser {
        FolderBrowser::new(Arc::clone(&self.api), Arc::clone(&self.notifier))
    }

    /// A breadcrumb resolver.
    pub fn breadcrumbs(&self) -> BreadcrumbResolver {
        BreadcrumbResolver::new(Arc::clone(&self.api))
    }

    /// Open a destination picker at `initial`.
    pub async fn picker(&self, initial: Option<FolderId>) -> DestinationPicker {
        DestinationPicker::open(Arc::clone(&self.api), Arc::clone(&self.notifier), initial).await
    }

    /// A batch coordinator.
    pub fn batch(&self) -> BatchCoordinator {
        BatchCoordinator::new(Arc::clone(&self.api), Arc::clone(&self.notifier))
    }

    /// An upload orchestrator using the configured limits.
    pub fn uploads(&self) -> UploadOrchestrator {
        UploadOrchestrator::new(
            Arc::clone(&self.api),
            Arc::clone(&self.notifier),
            self.config.upload.clone(),
        )
    }

    /// The trash view.
    pub fn trash(&self) -> TrashView {
        TrashView::new(Arc::clone(&self.api), Arc::clone(&self.notifier))
    }

    /// The share service.
    pub fn shares(&self) -> ShareService {
        ShareService::new(Arc::clone(&self.api), Arc::clone(&self.notifier))
    }

    /// The search service.
    pub fn search(&self) -> SearchService {
        SearchService::new(Arc::clone(&self.api), Arc::clone(&self.notifier))
    }
}
