//! # filedeck-core
//!
//! Core crate for FileDeck. Contains configuration schemas, typed
//! identifiers for remote entities, and the unified error system.
//!
//! This crate has **no** internal dependencies on other FileDeck crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
