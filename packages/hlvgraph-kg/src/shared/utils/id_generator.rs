//! ID generation utilities
//!
//! Mints the local identifiers of graph nodes. All identifiers are
//! deterministic functions of the input rows, so rebuilding from the same
//! data yields the same graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{KgError, Result};
use crate::shared::models::OffsetRange;

/// How a word occurrence key is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordKeyScheme {
    /// `{surface}_{sentence_id}`
    #[default]
    SentenceId,
    /// `{surface}_{start}_{end}` from the target token offsets
    Offsets,
}

impl WordKeyScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordKeyScheme::SentenceId => "sentence_id",
            WordKeyScheme::Offsets => "offsets",
        }
    }
}

impl fmt::Display for WordKeyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordKeyScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sentence_id" => Ok(WordKeyScheme::SentenceId),
            "offsets" => Ok(WordKeyScheme::Offsets),
            other => Err(format!(
                "unknown word key scheme '{}' (expected 'sentence_id' or 'offsets')",
                other
            )),
        }
    }
}

/// ID Generator for graph node identifiers
pub struct IdGenerator;

impl IdGenerator {
    /// Word occurrence key
    pub fn word_id(
        scheme: WordKeyScheme,
        surface: &str,
        sentence_id: &str,
        token: OffsetRange,
    ) -> String {
        match scheme {
            WordKeyScheme::SentenceId => format!("{}_{}", surface, sentence_id),
            WordKeyScheme::Offsets => format!("{}_{}_{}", surface, token.start, token.end),
        }
    }

    /// Sentences are keyed by the use identifier, unchanged
    pub fn sentence_id(use_identifier: &str) -> String {
        use_identifier.to_string()
    }

    pub fn annotation_id(counter: u64) -> String {
        counter.to_string()
    }

    /// `{word1}_{word2}`, shared by every annotation of the same ordered pair
    pub fn annotation_label(word1: &str, word2: &str) -> String {
        format!("{}_{}", word1, word2)
    }

    /// First run of ASCII digits in the annotator name
    ///
    /// `"annotator5"` -> `"5"`, `"rater12b3"` -> `"12"`.
    pub fn annotator_id(name: &str) -> Result<String> {
        let digits: String = name
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();

        if digits.is_empty() {
            return Err(KgError::AnnotatorWithoutDigits(name.to_string()));
        }
        Ok(digits)
    }
}

/// Generate a content hash for change detection (blake3, hex)
pub fn content_hash(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_id_schemes() {
        let token = OffsetRange::new(4, 7);
        assert_eq!(
            IdGenerator::word_id(WordKeyScheme::SentenceId, "foo", "s1", token),
            "foo_s1"
        );
        assert_eq!(
            IdGenerator::word_id(WordKeyScheme::Offsets, "foo", "s1", token),
            "foo_4_7"
        );
    }

    #[test]
    fn test_annotator_id() {
        assert_eq!(IdGenerator::annotator_id("annotator5").unwrap(), "5");
        assert_eq!(IdGenerator::annotator_id("rater12b3").unwrap(), "12");
        assert_eq!(IdGenerator::annotator_id("007").unwrap(), "007");
        assert!(matches!(
            IdGenerator::annotator_id("anonymous"),
            Err(KgError::AnnotatorWithoutDigits(_))
        ));
    }

    #[test]
    fn test_annotation_label() {
        assert_eq!(
            IdGenerator::annotation_label("foo_s1", "bar_s2"),
            "foo_s1_bar_s2"
        );
        assert_eq!(IdGenerator::annotation_id(12), "12");
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("offsets".parse::<WordKeyScheme>().unwrap(), WordKeyScheme::Offsets);
        assert!("words".parse::<WordKeyScheme>().is_err());
        assert_eq!(WordKeyScheme::default(), WordKeyScheme::SentenceId);
    }

    #[test]
    fn test_content_hash_deterministic() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
        assert_eq!(content_hash(b"abc").len(), 64);
    }
}
