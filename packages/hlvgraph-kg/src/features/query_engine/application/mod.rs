//! Query Engine Application Layer

pub mod query_usecase;

pub use query_usecase::QueryService;
