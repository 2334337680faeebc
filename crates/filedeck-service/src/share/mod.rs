//! Sharing items with other accounts.

pub mod service;

pub use service::ShareService;
