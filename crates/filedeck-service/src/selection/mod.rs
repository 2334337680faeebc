//! Multi-item selection for one listing view.

pub mod manager;

pub use manager::SelectionManager;
