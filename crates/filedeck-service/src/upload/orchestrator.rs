//! Upload fan-out with a single refresh once everything settles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use filedeck_client::DriveApi;
use filedeck_core::config::UploadConfig;
use filedeck_core::types::FolderId;
use filedeck_core::{AppError, AppResult, ErrorKind};
use filedeck_entity::{File, FileBlob};

use crate::notification::{Notification, Notifier, report_failure};
use crate::upload::input::FileInput;
use crate::view::ListingView;

/// Clears the in-progress flag when an upload finishes, however it ends.
struct UploadingGuard<'a>(&'a AtomicBool);

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Uploads picked files and keeps the view in sync.
#[derive(Debug)]
pub struct UploadOrchestrator {
    /// Remote drive.
    api: Arc<dyn DriveApi>,
    /// User-facing notifications.
    notifier: Arc<dyn Notifier>,
    /// Upload settings.
    config: UploadConfig,
    /// Set while an upload is running; disables the upload controls.
    uploading: AtomicBool,
}

impl UploadOrchestrator {
    /// Creates a new upload orchestrator.
    pub fn new(api: Arc<dyn DriveApi>, notifier: Arc<dyn Notifier>, config: UploadConfig) -> Self {
        Self {
            api,
            notifier,
            config,
            uploading: AtomicBool::new(false),
        }
    }

    /// Whether an upload is in progress.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Upload every picked file as its own request, all in flight together.
    ///
    /// Waits for every upload to settle, then refreshes `view` once. Any
    /// failure yields one aggregate notification and error.
    #[instrument(skip_all, fields(files = input.len(), folder_id = ?target))]
    pub async fn upload_files(
        &self,
        input: &mut FileInput,
        target: Option<&FolderId>,
        view: &dyn ListingView,
    ) -> AppResult<Vec<File>> {
        let blobs = input.take();
        if blobs.is_empty() {
            return Ok(Vec::new());
        }
        let _guard = self.begin().await?;
        self.check_sizes(&blobs).await?;

        let total = blobs.len();
        let limiter = (self.config.max_concurrency > 0)
            .then(|| Arc::new(Semaphore::new(self.config.max_concurrency)));

        let uploads = blobs.into_iter().map(|blob| {
            let limiter = limiter.clone();
            async move {
                let _permit = match &limiter {
                    Some(sem) => match sem.acquire().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            return Err(AppError::with_source(
                                ErrorKind::Internal,
                                "Upload limiter closed",
                                e,
                            ));
                        }
                    },
                    None => None,
                };
                let name = blob.name.clone();
                self.api.upload_single(blob, target).await.inspect_err(|e| {
                    warn!(file = %name, error = %e, "File upload failed");
                })
            }
        });
        let results = join_all(uploads).await;

        let mut uploaded = Vec::with_capacity(total);
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(file) => uploaded.push(file),
                Err(e) => errors.push(e),
            }
        }

        view.refresh().await;

        if errors.is_empty() {
            info!(count = uploaded.len(), "Files uploaded");
            self.notifier
                .notify(Notification::success("Uploaded", "Files uploaded successfully"))
                .await;
            return Ok(uploaded);
        }

        let kind = errors
            .iter()
            .find(|e| e.is_auth_failure())
            .or(errors.first())
            .map_or(ErrorKind::Remote, |e| e.kind);
        let err = AppError::new(
            kind,
            format!("{} of {total} files could not be uploaded", errors.len()),
        );
        report_failure(self.notifier.as_ref(), "Upload failed", &err).await;
        Err(err)
    }

    /// Upload a picked directory in one request, rebuilding its tree under `target`.
    #[instrument(skip_all, fields(files = input.len(), folder_id = ?target))]
    pub async fn upload_folder(
        &self,
        input: &mut FileInput,
        target: Option<&FolderId>,
        view: &dyn ListingView,
    ) -> AppResult<()> {
        let blobs = input.take();
        if blobs.is_empty() {
            return Ok(());
        }
        let _guard = self.begin().await?;
        self.check_sizes(&blobs).await?;

        let paths: Vec<String> = blobs.iter().map(|b| b.upload_path().to_string()).collect();
        let count = blobs.len();
        let outcome = self.api.upload_multi(blobs, paths, target).await;

        view.refresh().await;

        match outcome {
            Ok(()) => {
                info!(count, "Folder uploaded");
                self.notifier
                    .notify(Notification::success("Uploaded", "Folder uploaded successfully"))
                    .await;
                Ok(())
            }
            Err(e) => {
                report_failure(self.notifier.as_ref(), "Upload failed", &e).await;
                Err(e)
            }
        }
    }

    async fn begin(&self) -> AppResult<UploadingGuard<'_>> {
        if self
            .uploading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            let err = AppError::validation("An upload is already in progress");
            report_failure(self.notifier.as_ref(), "Upload failed", &err).await;
            return Err(err);
        }
        Ok(UploadingGuard(&self.uploading))
    }

    async fn check_sizes(&self, blobs: &[FileBlob]) -> AppResult<()> {
        let limit = self.config.max_file_size_bytes;
        if let Some(blob) = blobs.iter().find(|b| b.size() > limit) {
            let err = AppError::validation(format!(
                "'{}' is larger than the {limit} byte upload limit",
                blob.name
            ));
            report_failure(self.notifier.as_ref(), "Upload failed", &err).await;
            return Err(err);
        }
        Ok(())
    }
}
