//! Common test utilities for hlvgraph-kg
//!
//! Fixtures write DWUG-shaped lexical item directories into a temporary data
//! root; assertions compare stores and exported tables.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
