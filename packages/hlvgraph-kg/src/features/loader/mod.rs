// Loader - DWUG tab-separated tables
//
// Reads `uses.csv` and `judgments.csv` of each lexical item directory.
//
// ## Architecture
// - Domain: `LexicalItemRows`, `UsesIndex`, the `RecordSource` port
// - Infrastructure: strict TSV reader over a data directory

pub mod domain;
pub mod infrastructure;

pub use domain::{LexicalItemRows, RecordSource, UsesIndex};
pub use infrastructure::{read_records, TsvDirectorySource};
