//! User-facing notifications raised by the services.

pub mod notifier;

pub use notifier::{LogNotifier, MemoryNotifier, Notification, Notifier, report_failure};
