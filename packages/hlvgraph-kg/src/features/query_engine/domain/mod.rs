//! Query engine domain
//!
//! Query definitions only; evaluation happens in the store.

pub mod templates;

pub use templates::{prefix_block, string_literal, InstanceQuery, QueryKind, VariationRange};
