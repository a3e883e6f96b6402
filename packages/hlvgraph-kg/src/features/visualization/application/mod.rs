//! Visualization Application Layer

pub mod vis_usecase;

pub use vis_usecase::{AnnotationEdge, VisualizationService};
