//! Core type definitions used across the FileDeck workspace.

pub mod id;

pub use id::*;
