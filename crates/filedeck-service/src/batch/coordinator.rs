//! Dispatches one batch request and reconciles the view with its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument};

use filedeck_client::DriveApi;
use filedeck_core::{AppError, AppResult};
use filedeck_entity::{BatchItem, BatchOperation, BatchResult, ItemKey};

use crate::notification::{Notification, Notifier, report_failure};
use crate::view::ListingView;

/// Aggregate outcome of one batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// The operation that ran.
    pub operation: BatchOperation,
    /// Keys the service confirmed as mutated.
    pub succeeded: Vec<ItemKey>,
    /// Requested keys not confirmed, whether rejected or omitted.
    pub failed: Vec<ItemKey>,
    /// The raw per-item result.
    pub result: BatchResult,
}

impl BatchSummary {
    fn new(operation: BatchOperation, items: &[BatchItem], result: BatchResult) -> Self {
        Self {
            succeeded: result.succeeded_keys(items),
            failed: result.unconfirmed_keys(items),
            operation,
            result,
        }
    }

    /// Whether every requested item was confirmed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Combined counts, e.g. `3 deleted, 2 failed`.
    pub fn message(&self) -> String {
        format!(
            "{} {}, {} failed",
            self.succeeded.len(),
            self.operation.past_tense(),
            self.failed.len()
        )
    }
}

/// Clears the in-flight flag when a batch settles.
struct BatchRunningGuard<'a>(&'a AtomicBool);

impl Drop for BatchRunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs delete, move, and restore over many items with one request.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    /// Remote drive.
    api: Arc<dyn DriveApi>,
    /// User-facing notifications.
    notifier: Arc<dyn Notifier>,
    /// Set while a batch request is in flight; shared by clones.
    running: Arc<AtomicBool>,
}

impl BatchCoordinator {
    /// Creates a new batch coordinator.
    pub fn new(api: Arc<dyn DriveApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a batch request is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Apply `operation` to `items` and bring `view` up to date.
    ///
    /// Sends exactly one request. On a per-item result, only confirmed
    /// keys leave the selection. On a whole-request failure the selection
    /// is left alone. The view is refreshed either way. A second call
    /// while one is in flight is rejected without a request.
    #[instrument(skip_all, fields(operation = operation.as_str(), count = items.len()))]
    pub async fn execute(
        &self,
        operation: BatchOperation,
        items: Vec<BatchItem>,
        view: &dyn ListingView,
    ) -> AppResult<BatchSummary> {
        if items.is_empty() {
            let err = AppError::validation("Select at least one item");
            report_failure(self.notifier.as_ref(), "Nothing selected", &err).await;
            return Err(err);
        }
        let _guard = self.claim(&operation).await?;

        let response = match &operation {
            BatchOperation::Delete => self.api.batch_delete(&items).await,
            BatchOperation::Move { target } => self.api.batch_move(&items, target.as_ref()).await,
            BatchOperation::Restore => self.api.batch_restore(&items).await,
        };

        let result = match response {
            Ok(result) => result,
            Err(e) => {
                let title = format!("Batch {} failed", operation.as_str());
                report_failure(self.notifier.as_ref(), &title, &e).await;
                view.refresh().await;
                return Err(e);
            }
        };

        let summary = BatchSummary::new(operation, &items, result);
        info!(
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "Batch {} completed",
            summary.operation.as_str()
        );

        view.deselect(&summary.succeeded).await;
        view.refresh().await;

        let title = format!("Batch {} completed", summary.operation.as_str());
        let notification = if summary.is_complete() {
            Notification::success(title, summary.message())
        } else {
            Notification::failure(title, summary.message())
        };
        self.notifier.notify(notification).await;

        Ok(summary)
    }

    async fn claim(&self, operation: &BatchOperation) -> AppResult<BatchRunningGuard<'_>> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            let err = AppError::validation("A batch operation is already in progress");
            let title = format!("Batch {} failed", operation.as_str());
            report_failure(self.notifier.as_ref(), &title, &err).await;
            return Err(err);
        }
        Ok(BatchRunningGuard(&self.running))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use filedeck_client::{DriveOp, MemoryDrive};
    use filedeck_entity::{BatchFailure, BatchOutcome, EntityType};

    use crate::notification::MemoryNotifier;
    use crate::selection::SelectionManager;

    #[derive(Default)]
    struct TestView {
        selection: Mutex<SelectionManager>,
        refreshes: Mutex<usize>,
    }

    #[async_trait]
    impl ListingView for TestView {
        async fn refresh(&self) {
            *self.refreshes.lock().await += 1;
        }

        async fn deselect(&self, keys: &[ItemKey]) {
            self.selection.lock().await.remove_keys(keys);
        }
    }

    fn coordinator(drive: &MemoryDrive, notifier: &MemoryNotifier) -> BatchCoordinator {
        BatchCoordinator::new(Arc::new(drive.clone()), Arc::new(notifier.clone()))
    }

    #[tokio::test]
    async fn test_empty_items_never_dispatch() {
        let drive = MemoryDrive::new();
        let notifier = MemoryNotifier::new();
        let view = TestView::default();

        let err = coordinator(&drive, &notifier)
            .execute(BatchOperation::Delete, Vec::new(), &view)
            .await
            .expect_err("empty");

        assert_eq!(err.kind, filedeck_core::ErrorKind::Validation);
        assert_eq!(drive.calls(DriveOp::BatchDelete).await, 0);
        assert_eq!(*view.refreshes.lock().await, 0);
    }

    #[tokio::test]
    async fn test_partial_result_keeps_rejected_keys() {
        let drive = MemoryDrive::new();
        drive
            .script_batch(BatchResult {
                successes: vec![BatchOutcome {
                    id: "a".into(),
                    entity_type: None,
                }],
                errors: vec![BatchFailure {
                    id: "b".into(),
                    entity_type: Some(EntityType::Folder),
                    error: "cycle".into(),
                }],
            })
            .await;
        let notifier = MemoryNotifier::new();
        let view = TestView::default();
        {
            let mut selection = view.selection.lock().await;
            selection.toggle_item("a", EntityType::File);
            selection.toggle_item("b", EntityType::Folder);
        }
        let items = view.selection.lock().await.batch_items();

        let summary = coordinator(&drive, &notifier)
            .execute(BatchOperation::Move { target: None }, items, &view)
            .await
            .expect("batch");

        assert_eq!(summary.message(), "1 moved, 1 failed");
        assert_eq!(
            view.selection.lock().await.keys(),
            vec![ItemKey::new("b", EntityType::Folder)]
        );
        assert_eq!(*view.refreshes.lock().await, 1);
        assert_eq!(drive.calls(DriveOp::BatchMove).await, 1);
        assert_eq!(
            notifier.take().await,
            vec![Notification::failure("Batch move completed", "1 moved, 1 failed")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_batch_rejected_while_first_in_flight() {
        let drive = MemoryDrive::new();
        drive.insert_file("a", "a.txt", None, "a").await;
        drive.delay_op(DriveOp::BatchDelete, Duration::from_millis(500)).await;
        let notifier = MemoryNotifier::new();
        let view = TestView::default();
        let coordinator = coordinator(&drive, &notifier);
        let items = vec![BatchItem::new("a", EntityType::File)];

        let first = coordinator.execute(BatchOperation::Delete, items.clone(), &view);
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(coordinator.is_running());
            coordinator.execute(BatchOperation::Delete, items.clone(), &view).await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.expect("first").succeeded.len(), 1);
        let err = second.expect_err("in flight");
        assert_eq!(err.kind, filedeck_core::ErrorKind::Validation);
        assert_eq!(drive.calls(DriveOp::BatchDelete).await, 1);
        assert_eq!(*view.refreshes.lock().await, 1);
        assert!(!coordinator.is_running());

        coordinator
            .execute(BatchOperation::Delete, items, &view)
            .await
            .expect("runs again once settled");
        assert_eq!(drive.calls(DriveOp::BatchDelete).await, 2);
    }

    #[tokio::test]
    async fn test_whole_failure_clears_nothing() {
        let drive = MemoryDrive::new();
        drive
            .fail_next(DriveOp::BatchRestore, AppError::transport("connection reset"))
            .await;
        let notifier = MemoryNotifier::new();
        let view = TestView::default();
        view.selection.lock().await.toggle_item("a", EntityType::File);
        let items = view.selection.lock().await.batch_items();

        coordinator(&drive, &notifier)
            .execute(BatchOperation::Restore, items, &view)
            .await
            .expect_err("transport");

        assert_eq!(view.selection.lock().await.len(), 1);
        assert_eq!(*view.refreshes.lock().await, 1);
        assert_eq!(notifier.failure_count().await, 1);
    }
}
