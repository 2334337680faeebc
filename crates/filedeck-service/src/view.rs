//! The seam between mutation services and the view that shows their effects.

use async_trait::async_trait;
use dashmap::DashSet;

use filedeck_core::{AppError, AppResult};
use filedeck_entity::ItemKey;

use crate::notification::{Notifier, report_failure};

/// A listing view that mutation services keep in sync.
///
/// Batch and upload services never patch the listing themselves; they
/// drop confirmed keys from the view's selection and ask it to reload.
#[async_trait]
pub trait ListingView: Send + Sync {
    /// Reload the current listing. Failures are reported by the view.
    async fn refresh(&self);

    /// Remove keys from the view's selection.
    async fn deselect(&self, keys: &[ItemKey]);
}

/// Releases a row's loading flag when the row's action finishes.
pub(crate) struct RowGuard<'a> {
    busy: &'a DashSet<ItemKey>,
    key: ItemKey,
}

impl<'a> RowGuard<'a> {
    /// Mark `key` busy, or report and reject if an action on it is in flight.
    pub(crate) async fn claim(
        busy: &'a DashSet<ItemKey>,
        key: &ItemKey,
        notifier: &dyn Notifier,
        title: &str,
    ) -> AppResult<Self> {
        if !busy.insert(key.clone()) {
            let err = AppError::validation(format!("{key} is already being updated"));
            report_failure(notifier, title, &err).await;
            return Err(err);
        }
        Ok(Self {
            busy,
            key: key.clone(),
        })
    }
}

impl Drop for RowGuard<'_> {
    fn drop(&mut self) {
        self.busy.remove(&self.key);
    }
}
