//! Utility functions

pub mod fs;
pub mod id_generator;

pub use fs::{sanitize_file_stem, write_atomic};
pub use id_generator::{content_hash, IdGenerator, WordKeyScheme};
