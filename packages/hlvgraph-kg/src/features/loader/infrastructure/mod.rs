// Loader Infrastructure

pub mod tsv_reader;

pub use tsv_reader::{read_records, TsvDirectorySource};
