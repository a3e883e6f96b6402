//! Shared module - Common types and utilities
//!
//! Types used by more than one feature: the input record shapes, offset
//! ranges, judgment categories and identifier minting.

pub mod models;
pub mod utils;

// Re-exports for convenience
pub use models::*;
pub use utils::id_generator::{IdGenerator, WordKeyScheme};
