//! Feature modules
//!
//! Each feature follows the same layering:
//! - `domain`: pure models and port traits
//! - `infrastructure`: adapters (files, SPARQL store, HTTP)
//! - `application`: use cases wiring the two together

pub mod graph_builder;
pub mod loader;
pub mod query_engine;
pub mod visualization;
