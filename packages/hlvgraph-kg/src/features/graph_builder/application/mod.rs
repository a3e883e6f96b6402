//! Graph Builder Application Layer

pub mod graph_usecase;

pub use graph_usecase::{load_graph, BuildReport, GraphBuildUseCase, ItemFailure, KgPipeline};
