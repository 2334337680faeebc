//! Share listing, creation, and revocation.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use filedeck_client::DriveApi;
use filedeck_core::types::ShareId;
use filedeck_core::{AppError, AppResult};
use filedeck_entity::{CreateShare, ItemKey, Share, SharePermission};

use crate::notification::{Notification, Notifier, report_failure};

/// Manages shares granted to and by the current user.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Remote drive.
    api: Arc<dyn DriveApi>,
    /// User-facing notifications.
    notifier: Arc<dyn Notifier>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(api: Arc<dyn DriveApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Shares other accounts granted to the current user.
    pub async fn shared_with_me(&self) -> AppResult<Vec<Share>> {
        match self.api.shared_with_me().await {
            Ok(shares) => Ok(shares),
            Err(e) => self.fail("Failed to load shares", e).await,
        }
    }

    /// Shares the current user granted to others.
    pub async fn sent(&self) -> AppResult<Vec<Share>> {
        match self.api.shares_sent().await {
            Ok(shares) => Ok(shares),
            Err(e) => self.fail("Failed to load shares", e).await,
        }
    }

    /// Grant `email` access to an item.
    pub async fn create(
        &self,
        item: &ItemKey,
        email: &str,
        permission: SharePermission,
    ) -> AppResult<()> {
        let request = CreateShare {
            item_id: item.id().to_string(),
            item_type: item.entity_type(),
            email: email.trim().to_string(),
            permission,
        };
        if let Err(e) = request.validate() {
            let err = AppError::validation(format!("Invalid share: {e}"));
            report_failure(self.notifier.as_ref(), "Share failed", &err).await;
            return Err(err);
        }

        match self.api.create_share(&request).await {
            Ok(()) => {
                info!(item = %item, permission = %permission, "Item shared");
                self.notifier
                    .notify(Notification::success("Shared", "Item shared successfully"))
                    .await;
                Ok(())
            }
            Err(e) => {
                report_failure(self.notifier.as_ref(), "Share failed", &e).await;
                Err(e)
            }
        }
    }

    /// Revoke a share.
    pub async fn revoke(&self, id: &ShareId) -> AppResult<()> {
        match self.api.delete_share(id).await {
            Ok(()) => {
                info!(share_id = %id, "Share revoked");
                self.notifier
                    .notify(Notification::success("Revoked", "Access removed"))
                    .await;
                Ok(())
            }
            Err(e) => {
                report_failure(self.notifier.as_ref(), "Revoke failed", &e).await;
                Err(e)
            }
        }
    }

    async fn fail<T>(&self, title: &str, err: AppError) -> AppResult<T> {
        report_failure(self.notifier.as_ref(), title, &err).await;
        Err(err)
    }
}
