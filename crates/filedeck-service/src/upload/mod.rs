//! Concurrent file and folder uploads.

pub mod input;
pub mod orchestrator;

pub use input::FileInput;
pub use orchestrator::UploadOrchestrator;
