//! File domain entities.

pub mod blob;
pub mod model;

pub use blob::FileBlob;
pub use model::File;
