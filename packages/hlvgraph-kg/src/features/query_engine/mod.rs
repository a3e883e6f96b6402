// Query Engine - SPARQL over the annotation graph
//
// ## Architecture
// - Domain: `QueryKind` templates, `InstanceQuery`, string escaping
// - Infrastructure: CSV export of result tables
// - Application: `QueryService` (run, export, instance sub-graphs)

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::QueryService;
pub use domain::{InstanceQuery, QueryKind, VariationRange};
