//! hlvgraph-storage - Annotation graph store
//!
//! > Build the graph once, query it many times.
//!
//! ## Core Principles
//!
//! 1. **Write once**: triples are only added during graph construction; there
//!    is no update or delete path
//! 2. **Fixed schema**: every node IRI is minted from a [`domain::Namespace`]
//!    and every prefix is bound at store creation
//! 3. **Opaque engine**: SPARQL evaluation and Turtle I/O are delegated to
//!    oxigraph behind the [`GraphStore`] port
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hlvgraph_storage::{GraphStore, OxigraphStore};
//!
//! let store = OxigraphStore::open_turtle("graphs/dwug_en.ttl")?;
//! let table = store.select("SELECT DISTINCT ?pos WHERE { ?w nif:posTag ?pos }")?;
//! ```

pub mod domain;
pub mod error;

pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{
    vocab, GraphStore, Literal, LiteralKind, Namespace, ResultTable, Term, Triple,
};

#[cfg(feature = "oxigraph")]
pub use infrastructure::OxigraphStore;
