//! Terminal rendering of user-facing notifications.

use async_trait::async_trait;

use filedeck_service::{Notification, Notifier};

use crate::output;

/// Prints notifications as status lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success { title, detail } => {
                output::print_success(&format!("{title}: {detail}"));
            }
            Notification::Failure { title, detail } => {
                output::print_error(&format!("{title}: {detail}"));
            }
            Notification::SignInRequired => {
                output::print_warning(
                    "Your session has expired. Update api.bearer_token or api.session_cookie and sign in again.",
                );
            }
        }
    }
}
