//! Error types for hlvgraph-kg
//!
//! Provides unified error handling across the crate. Every variant maps to an
//! [`ErrorKind`], which is what the pipeline uses to decide whether a failure
//! is isolated to one lexical item or aborts the run.

use std::fmt;
use std::path::{Path, PathBuf};

use hlvgraph_storage::StorageError;
use thiserror::Error;

use crate::config::ConfigError;

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing directory or file
    FileAccess,
    /// Malformed row, range, category or annotator name
    Parse,
    /// Dangling reference between tables, or an unknown graph entity
    Reference,
    Storage,
    Query,
    Config,
    Render,
    Cache,
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileAccess => "file_access",
            ErrorKind::Parse => "parse",
            ErrorKind::Reference => "reference",
            ErrorKind::Storage => "storage",
            ErrorKind::Query => "query",
            ErrorKind::Config => "config",
            ErrorKind::Render => "render",
            ErrorKind::Cache => "cache",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for hlvgraph-kg operations
#[derive(Debug, Error)]
pub enum KgError {
    #[error("Cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {location}: {message}")]
    Parse { location: String, message: String },

    #[error("Malformed range '{value}' in {location}: expected 'start:end'")]
    MalformedRange { location: String, value: String },

    #[error("Unrecognized category '{value}' in {location}: expected one of 0, 1, 2, 3, 4")]
    UnrecognizedCategory { location: String, value: String },

    #[error("Annotator name '{0}' contains no digits")]
    AnnotatorWithoutDigits(String),

    #[error("Missing reference in {location}: no use row with identifier '{identifier}'")]
    MissingReference { location: String, identifier: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Query '{name}' failed: {source}")]
    Query {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rendering {} failed: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KgError::FileAccess { .. } => ErrorKind::FileAccess,
            KgError::Parse { .. }
            | KgError::MalformedRange { .. }
            | KgError::UnrecognizedCategory { .. }
            | KgError::AnnotatorWithoutDigits(_) => ErrorKind::Parse,
            KgError::MissingReference { .. } | KgError::NotFound(_) => ErrorKind::Reference,
            KgError::Storage(_) => ErrorKind::Storage,
            KgError::Query { .. } => ErrorKind::Query,
            KgError::Config(_) => ErrorKind::Config,
            KgError::Render { .. } => ErrorKind::Render,
            KgError::Cache(_) | KgError::Json(_) => ErrorKind::Cache,
            KgError::Io(_) | KgError::Csv(_) => ErrorKind::IO,
        }
    }

    /// Create a parse error
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        KgError::Parse {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a file access error
    pub fn file_access(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        KgError::FileAccess {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn query(name: impl Into<String>, source: StorageError) -> Self {
        KgError::Query {
            name: name.into(),
            source,
        }
    }
}

/// Result type alias for hlvgraph operations
pub type Result<T> = std::result::Result<T, KgError>;
