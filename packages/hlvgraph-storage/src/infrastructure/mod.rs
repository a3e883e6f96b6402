//! Infrastructure layer - Store adapters
//!
//! oxigraph: in-memory store with SPARQL evaluation and Turtle I/O

#[cfg(feature = "oxigraph")]
pub mod oxigraph_store;

#[cfg(feature = "oxigraph")]
pub use oxigraph_store::OxigraphStore;
