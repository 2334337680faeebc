//! Best-effort batch mutations over a selection.

pub mod coordinator;

pub use coordinator::{BatchCoordinator, BatchSummary};
