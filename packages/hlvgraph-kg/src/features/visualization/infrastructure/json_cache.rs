//! Content-addressed JSON cache
//!
//! Entries live in `{dir}/{namespace}_{fingerprint}.json`. The fingerprint is
//! a content hash of whatever the value was computed from, so a changed input
//! never hits an old entry. Unreadable or mismatching entries are recomputed
//! and overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{KgError, Result};
use crate::shared::utils::write_atomic;

pub const CACHE_VERSION: u32 = 1;

/// File name length of the fingerprint part
const KEY_LEN: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub version: u32,
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub value: T,
}

#[derive(Debug, Clone)]
pub struct JsonCache {
    dir: PathBuf,
}

impl JsonCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, namespace: &str, fingerprint: &str) -> PathBuf {
        let key = &fingerprint[..fingerprint.len().min(KEY_LEN)];
        self.dir.join(format!("{}_{}.json", namespace, key))
    }

    pub fn load<T: DeserializeOwned>(&self, namespace: &str, fingerprint: &str) -> Option<T> {
        let path = self.path_for(namespace, fingerprint);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!(path = %path.display(), "cache miss");
                return None;
            }
        };

        match serde_json::from_slice::<CacheEntry<T>>(&bytes) {
            Ok(entry) if entry.version == CACHE_VERSION && entry.fingerprint == fingerprint => {
                debug!(path = %path.display(), created_at = %entry.created_at, "cache hit");
                Some(entry.value)
            }
            Ok(entry) => {
                warn!(
                    path = %path.display(),
                    version = entry.version,
                    "stale cache entry, recomputing"
                );
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable cache entry, recomputing");
                None
            }
        }
    }

    pub fn store<T: Serialize>(&self, namespace: &str, fingerprint: &str, value: &T) -> Result<PathBuf> {
        let path = self.path_for(namespace, fingerprint);
        let entry = CacheEntry {
            version: CACHE_VERSION,
            fingerprint: fingerprint.to_string(),
            created_at: Utc::now(),
            value,
        };
        write_atomic(&path, |w| {
            serde_json::to_writer_pretty(w, &entry)
                .map_err(|e| KgError::Cache(format!("{}: {}", path.display(), e)))
        })?;
        Ok(path)
    }

    pub fn get_or_compute<T, F>(&self, namespace: &str, fingerprint: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.load(namespace, fingerprint) {
            return Ok(value);
        }
        let value = compute()?;
        self.store(namespace, fingerprint, &value)?;
        Ok(value)
    }
}
