//! Strict tab-separated reader
//!
//! No quoting: a `"` is an ordinary character. Every data row must have as
//! many fields as the header. Required columns are checked up front and
//! addressed by name, so their order in the file does not matter.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::errors::{KgError, Result};
use crate::features::loader::domain::{LexicalItemRows, RecordSource};
use crate::shared::models::{JudgmentRecord, TsvRecord, UseRecord};

/// Lexical items stored as subdirectories of one data directory
#[derive(Debug, Clone)]
pub struct TsvDirectorySource {
    root: PathBuf,
}

impl TsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordSource for TsvDirectorySource {
    fn list_items(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| KgError::file_access(&self.root, e))?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| KgError::file_access(&self.root, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| KgError::file_access(entry.path(), e))?
                .is_dir();
            if !is_dir {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => items.push(name),
                Err(raw) => debug!(name = ?raw, "skipping non UTF-8 directory name"),
            }
        }

        items.sort();
        info!(root = %self.root.display(), items = items.len(), "discovered lexical items");
        Ok(items)
    }

    fn load_item(&self, name: &str) -> Result<LexicalItemRows> {
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(KgError::file_access(
                &dir,
                io::Error::new(io::ErrorKind::NotFound, "lexical item directory not found"),
            ));
        }

        let uses = read_records::<UseRecord>(&dir.join(UseRecord::FILE_NAME), name)?;
        let judgments = read_records::<JudgmentRecord>(&dir.join(JudgmentRecord::FILE_NAME), name)?;

        debug!(
            item = name,
            uses = uses.len(),
            judgments = judgments.len(),
            "loaded lexical item"
        );

        Ok(LexicalItemRows {
            name: name.to_string(),
            uses,
            judgments,
        })
    }
}

/// Read every row of one table.
///
/// The file handle lives inside this call and is closed on every path,
/// including errors.
pub fn read_records<R: TsvRecord>(path: &Path, item: &str) -> Result<Vec<R>> {
    let file = File::open(path).map_err(|e| KgError::file_access(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(false)
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let location = format!("{}/{}", item, R::FILE_NAME);
    let headers = reader
        .headers()
        .map_err(|e| KgError::parse(&location, e.to_string()))?
        .clone();
    check_headers::<R>(&headers, &location)?;

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<R>().enumerate() {
        // header is line 1
        let record =
            row.map_err(|e| KgError::parse(format!("{} line {}", location, idx + 2), e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

fn check_headers<R: TsvRecord>(headers: &StringRecord, location: &str) -> Result<()> {
    for column in R::COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(KgError::parse(
                location,
                format!("missing required column '{}'", column),
            ));
        }
    }

    let extra: Vec<&str> = headers
        .iter()
        .filter(|h| !R::COLUMNS.iter().any(|c| c == h))
        .collect();
    if !extra.is_empty() {
        debug!(location, columns = ?extra, "ignoring extra columns");
    }
    Ok(())
}
