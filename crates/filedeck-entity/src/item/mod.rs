//! Heterogeneous item identity shared by selections and batch mutations.

pub mod batch;
pub mod key;

pub use batch::{BatchFailure, BatchItem, BatchOperation, BatchOutcome, BatchResult};
pub use key::{EntityType, ItemKey};
