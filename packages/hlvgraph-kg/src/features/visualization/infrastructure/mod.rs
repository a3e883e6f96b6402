// Visualization Infrastructure

pub mod json_cache;
pub mod render_client;
pub mod svg_plot;

pub use json_cache::JsonCache;
pub use render_client::{render_to_file, ImageRenderer, RdfGrapherClient, RenderError};
pub use svg_plot::ScatterPlot;
