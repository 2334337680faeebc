//! Name search across the drive.

pub mod service;

pub use service::SearchService;
