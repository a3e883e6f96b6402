// Query Engine Infrastructure

pub mod csv_export;

pub use csv_export::write_table;
