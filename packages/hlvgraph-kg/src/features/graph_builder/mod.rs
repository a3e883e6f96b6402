// Graph Builder - DWUG rows → RDF annotation graph
//
// ## Architecture
// - Domain: node models, `BuildContext` (counter + dedup sets), `BuildStats`
// - Infrastructure: `GraphBuilder` and the `NodeWriter` that emits triples
// - Application: `KgPipeline` (load items, build, write Turtle, report)

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export application layer
pub use application::{load_graph, BuildReport, GraphBuildUseCase, ItemFailure, KgPipeline};

// Re-exports
pub use domain::{Annotation, Annotator, BuildContext, BuildStats, Sentence, WordOccurrence};

pub use infrastructure::{BuiltGraph, GraphBuilder};
