//! Folder and file name search.

use std::sync::Arc;

use tracing::debug;

use filedeck_client::DriveApi;
use filedeck_core::AppResult;
use filedeck_entity::SearchResults;

use crate::notification::{Notifier, report_failure};

/// Searches folder and file names.
#[derive(Debug, Clone)]
pub struct SearchService {
    /// Remote drive.
    api: Arc<dyn DriveApi>,
    /// User-facing notifications.
    notifier: Arc<dyn Notifier>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(api: Arc<dyn DriveApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Search for `query`. A blank query matches nothing and sends no request.
    pub async fn search(&self, query: &str) -> AppResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }
        match self.api.search(query).await {
            Ok(results) => {
                debug!(query = %query, folders = results.folders.len(), files = results.files.len(), "Search completed");
                Ok(results)
            }
            Err(e) => {
                report_failure(self.notifier.as_ref(), "Search failed", &e).await;
                Err(e)
            }
        }
    }
}
