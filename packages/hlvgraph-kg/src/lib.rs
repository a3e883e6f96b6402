/*
 * hlvgraph - Human label variation as a knowledge graph
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Record models, categories, offset ranges, identifier minting
 * - features/    : Vertical slices (loader → graph_builder → query_engine → visualization)
 * - config/      : Versioned YAML configuration
 *
 * Flow:
 * - DWUG `uses.csv` / `judgments.csv` per lexical item
 * - RDF graph (NIF words and sentences, annotations, annotators) → Turtle
 * - SPARQL exports (CSV) and plots (SVG) / rendered instances (PNG)
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (load → build → query → visualize)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, KgConfig};
pub use errors::{ErrorKind, KgError, Result};

pub use features::graph_builder::{
    load_graph, BuildReport, BuildStats, GraphBuildUseCase, GraphBuilder, KgPipeline,
};
pub use features::loader::{LexicalItemRows, RecordSource, TsvDirectorySource};
pub use features::query_engine::{QueryKind, QueryService, VariationRange};
pub use features::visualization::{ColorMode, ImageRenderer, RdfGrapherClient, VisualizationService};

pub use hlvgraph_storage::{GraphStore, OxigraphStore};
