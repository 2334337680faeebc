//! Notification sink abstraction with logging and in-memory implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use filedeck_core::AppError;

/// A message for the user about the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The operation completed.
    Success {
        /// Short headline.
        title: String,
        /// Supporting detail.
        detail: String,
    },
    /// The operation failed.
    Failure {
        /// Short headline.
        title: String,
        /// Supporting detail.
        detail: String,
    },
    /// The session expired; the user has to sign in again.
    SignInRequired,
}

impl Notification {
    /// Build a success notification.
    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Success {
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Build a failure notification.
    pub fn failure(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Failure {
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Whether this reports a failure of any kind.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Success { .. })
    }

    /// The headline, if any.
    pub fn title(&self) -> &str {
        match self {
            Self::Success { title, .. } | Self::Failure { title, .. } => title,
            Self::SignInRequired => "Sign in required",
        }
    }
}

/// Destination for user-facing notifications.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Deliver one notification.
    async fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success { title, detail } => info!(title = %title, "{detail}"),
            Notification::Failure { title, detail } => warn!(title = %title, "{detail}"),
            Notification::SignInRequired => warn!("Session expired, sign in again"),
        }
    }
}

/// Collects notifications in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    /// Delivered notifications in order.
    received: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    pub async fn all(&self) -> Vec<Notification> {
        self.received.lock().await.clone()
    }

    /// Drain everything delivered so far.
    pub async fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().await)
    }

    /// Number of failure notifications delivered so far.
    pub async fn failure_count(&self) -> usize {
        self.received
            .lock()
            .await
            .iter()
            .filter(|n| n.is_failure())
            .count()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, notification: Notification) {
        self.received.lock().await.push(notification);
    }
}

/// Log a failed remote call and tell the user about it.
///
/// An expired session never produces an operation-specific message; the
/// user is only asked to sign in again.
pub async fn report_failure(notifier: &dyn Notifier, title: &str, err: &AppError) {
    warn!(kind = %err.kind, error = %err.message, "{title}");
    let notification = if err.is_auth_failure() {
        Notification::SignInRequired
    } else {
        Notification::failure(title, err.message.clone())
    };
    notifier.notify(notification).await;
}
