// Graph Builder Infrastructure

pub mod builder;
pub mod node_writer;

pub use builder::{BuiltGraph, GraphBuilder};
pub use node_writer::NodeWriter;
