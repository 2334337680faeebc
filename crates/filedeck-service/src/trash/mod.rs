//! The trash view: soft-deleted items awaiting restore or purge.

pub mod view;

pub use view::TrashView;
