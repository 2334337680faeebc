//! # filedeck-client
//!
//! The remote drive contract ([`DriveApi`]) and its implementations:
//!
//! - [`HttpDriveClient`] talks to the real service over HTTP.
//! - [`MemoryDrive`] keeps a whole drive in memory, with the same
//!   soft-delete, batch, and cycle-rejection semantics as the service,
//!   plus call counters and fault injection for tests.

pub mod api;
pub mod http;
pub mod memory;

pub use api::{DriveApi, DriveOp};
pub use http::HttpDriveClient;
pub use memory::MemoryDrive;
