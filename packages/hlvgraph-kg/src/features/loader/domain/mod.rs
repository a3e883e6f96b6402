//! Loader domain models
//!
//! - `LexicalItemRows`: both tables of one lexical item
//! - `UsesIndex`: identifier lookup into the uses table
//! - `RecordSource`: port for listing and loading lexical items

use ahash::AHashMap;

use crate::errors::{KgError, Result};
use crate::shared::models::{JudgmentRecord, UseRecord};

/// The rows of one lexical item directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalItemRows {
    /// Directory name; doubles as the lemma of every occurrence
    pub name: String,
    pub uses: Vec<UseRecord>,
    pub judgments: Vec<JudgmentRecord>,
}

impl LexicalItemRows {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn uses_index(&self) -> UsesIndex<'_> {
        UsesIndex::new(&self.uses)
    }
}

/// Identifier -> use row. When an identifier repeats, the first row wins.
#[derive(Debug)]
pub struct UsesIndex<'a> {
    by_id: AHashMap<&'a str, &'a UseRecord>,
}

impl<'a> UsesIndex<'a> {
    pub fn new(uses: &'a [UseRecord]) -> Self {
        let mut by_id = AHashMap::with_capacity(uses.len());
        for row in uses {
            by_id.entry(row.identifier.as_str()).or_insert(row);
        }
        Self { by_id }
    }

    pub fn get(&self, identifier: &str) -> Option<&'a UseRecord> {
        self.by_id.get(identifier).copied()
    }

    /// Like [`UsesIndex::get`], but a missing identifier is a reference error
    pub fn resolve(&self, identifier: &str, location: &str) -> Result<&'a UseRecord> {
        self.get(identifier)
            .ok_or_else(|| KgError::MissingReference {
                location: location.to_string(),
                identifier: identifier.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Where lexical items come from
pub trait RecordSource {
    /// Names of all available lexical items, sorted
    fn list_items(&self) -> Result<Vec<String>>;

    /// Load both tables of one item
    fn load_item(&self, name: &str) -> Result<LexicalItemRows>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn use_row(identifier: &str, context: &str) -> UseRecord {
        UseRecord {
            identifier: identifier.into(),
            context: context.into(),
            context_tokenized: context.into(),
            indexes_target_token: "0:3".into(),
            indexes_target_token_tokenized: "0".into(),
            indexes_target_sentence: "0:3".into(),
            date: "1900".into(),
            pos: "NN".into(),
        }
    }

    #[test]
    fn test_first_row_wins() {
        let uses = vec![use_row("s1", "first"), use_row("s1", "second")];
        let index = UsesIndex::new(&uses);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("s1").unwrap().context, "first");
    }

    #[test]
    fn test_resolve_missing() {
        let mut item = LexicalItemRows::new("foo");
        item.uses.push(use_row("s1", "foo"));
        let index = item.uses_index();
        let err = index.resolve("s9", "foo/judgments.csv line 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(err.to_string().contains("s9"));
    }
}
