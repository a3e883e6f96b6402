// Visualization - layouts, plots and rendered instance images
//
// ## Architecture
// - Domain: Fruchterman-Reingold layout, color modes
// - Infrastructure: JSON caches, SVG writer, RDF Grapher client
// - Application: `VisualizationService` (full / per-annotator plots, instances)

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::VisualizationService;
pub use domain::{ColorMap, ColorMode, LayoutParams, Positions};
pub use infrastructure::{ImageRenderer, RdfGrapherClient};
