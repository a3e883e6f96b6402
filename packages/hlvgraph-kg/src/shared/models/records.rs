//! Input row shapes
//!
//! One lexical item directory holds two tab-separated tables:
//! `uses.csv` (one row per usage of the item) and `judgments.csv` (one row
//! per pairwise relatedness judgment). Only the columns listed in
//! [`TsvRecord::COLUMNS`] are read; any others are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::span::OffsetRange;
use crate::errors::{KgError, Result};

/// A row type read from a tab-separated table
pub trait TsvRecord: DeserializeOwned {
    /// File name inside the lexical item directory
    const FILE_NAME: &'static str;
    /// Columns that must be present in the header
    const COLUMNS: &'static [&'static str];
}

/// One usage of the target word in context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseRecord {
    pub identifier: String,
    pub context: String,
    pub context_tokenized: String,
    pub indexes_target_token: String,
    pub indexes_target_token_tokenized: String,
    pub indexes_target_sentence: String,
    pub date: String,
    pub pos: String,
}

impl TsvRecord for UseRecord {
    const FILE_NAME: &'static str = "uses.csv";
    const COLUMNS: &'static [&'static str] = &[
        "identifier",
        "context",
        "context_tokenized",
        "indexes_target_token",
        "indexes_target_token_tokenized",
        "indexes_target_sentence",
        "date",
        "pos",
    ];
}

impl UseRecord {
    /// The target token, selected from the whitespace-split tokenized context
    pub fn target_token(&self, location: &str) -> Result<&str> {
        let index: usize = self.indexes_target_token_tokenized.parse().map_err(|_| {
            KgError::parse(
                location,
                format!(
                    "indexes_target_token_tokenized '{}' is not a token index",
                    self.indexes_target_token_tokenized
                ),
            )
        })?;

        self.context_tokenized
            .split_whitespace()
            .nth(index)
            .ok_or_else(|| {
                KgError::parse(
                    location,
                    format!(
                        "token index {} out of range for context_tokenized with {} tokens",
                        index,
                        self.context_tokenized.split_whitespace().count()
                    ),
                )
            })
    }

    pub fn token_range(&self, location: &str) -> Result<OffsetRange> {
        OffsetRange::parse(&self.indexes_target_token, location)
    }

    pub fn sentence_range(&self, location: &str) -> Result<OffsetRange> {
        OffsetRange::parse(&self.indexes_target_sentence, location)
    }
}

/// One pairwise relatedness judgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentRecord {
    pub identifier1: String,
    pub identifier2: String,
    pub judgment: String,
    pub comment: String,
    pub annotator: String,
}

impl TsvRecord for JudgmentRecord {
    const FILE_NAME: &'static str = "judgments.csv";
    const COLUMNS: &'static [&'static str] =
        &["identifier1", "identifier2", "judgment", "comment", "annotator"];
}
