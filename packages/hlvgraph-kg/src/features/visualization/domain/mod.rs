//! Visualization domain
//!
//! - `layout`: force-directed positions for the annotation/annotator graph
//! - `palette`: color modes, legends and the label -> color map

pub mod layout;
pub mod palette;

pub use layout::{spring_layout, LayoutGraph, LayoutParams, Positions};
pub use palette::{ColorMap, ColorMode, LegendEntry, NumLabelsRow, ANNOTATOR_COLOR};

/// Distance from the origin per numeric category in the full plot
pub const CATEGORY_SCALES: [f64; 6] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5];
