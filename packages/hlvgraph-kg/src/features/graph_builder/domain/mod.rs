//! Graph builder domain models
//!
//! # Nodes
//!
//! - `WordOccurrence`: the target word in one sentence
//! - `Sentence`: the use context, keyed by the use identifier
//! - `Annotation`: one judgment linking exactly two word occurrences
//! - `Annotator`: the person who made the judgment
//!
//! # Build state
//!
//! - `BuildContext`: explicit state threaded through one build (annotation
//!   counter and the dedup sets for nodes written once)
//! - `BuildStats`: what the build produced

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use tracing::debug;

use crate::shared::models::{Category, OffsetRange};
use crate::shared::utils::WordKeyScheme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOccurrence {
    pub id: String,
    pub surface: String,
    /// Name of the lexical item the occurrence belongs to
    pub lemma: String,
    pub pos_tag: String,
    pub span: OffsetRange,
    pub sentence_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub id: String,
    pub text: String,
    /// Passed through as an `xsd:gYear` lexical form
    pub year: String,
    pub span: OffsetRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub id: u64,
    pub label: String,
    pub category: Category,
    pub comment: String,
    pub words: [String; 2],
    pub annotator_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotator {
    /// Digits extracted from the annotator name
    pub id: String,
    pub name: String,
}

/// Counts of what one build produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub lexical_items: usize,
    pub word_occurrences: usize,
    pub sentences: usize,
    pub annotations: usize,
    pub annotators: usize,
    /// The value the annotation counter would hand out next
    pub next_annotation_id: u64,
    pub triples: usize,
}

/// Mutable state of one build.
///
/// Annotation ids come from a counter starting at 1 that increases by one per
/// judgment row, in processing order. Words, sentences and annotators are
/// written once per identifier.
#[derive(Debug)]
pub struct BuildContext {
    scheme: WordKeyScheme,
    next_annotation_id: u64,
    /// word id -> sentence id it was minted for
    words: AHashMap<String, String>,
    sentences: AHashSet<String>,
    /// annotator id -> first name seen
    annotators: AHashMap<String, String>,
    stats: BuildStats,
}

impl BuildContext {
    pub fn new(scheme: WordKeyScheme) -> Self {
        Self {
            scheme,
            next_annotation_id: 1,
            words: AHashMap::new(),
            sentences: AHashSet::new(),
            annotators: AHashMap::new(),
            stats: BuildStats {
                next_annotation_id: 1,
                ..Default::default()
            },
        }
    }

    pub fn scheme(&self) -> WordKeyScheme {
        self.scheme
    }

    pub fn next_annotation_id(&self) -> u64 {
        self.next_annotation_id
    }

    /// Hand out the current annotation id and advance the counter
    pub fn take_annotation_id(&mut self) -> u64 {
        let id = self.next_annotation_id;
        self.next_annotation_id += 1;
        self.stats.annotations += 1;
        self.stats.next_annotation_id = self.next_annotation_id;
        id
    }

    /// Record a word occurrence; `true` when it is new.
    ///
    /// Under `Offsets` the same key can come back for another sentence. The
    /// occurrence then attaches to the existing node, whose attributes stay
    /// as first written.
    pub fn register_word(&mut self, word_id: &str, sentence_id: &str) -> bool {
        match self.words.get(word_id) {
            Some(existing) => {
                if existing != sentence_id {
                    debug!(
                        word = word_id,
                        first = %existing,
                        sentence = sentence_id,
                        "word occurrence merged across sentences"
                    );
                }
                false
            }
            None => {
                self.words
                    .insert(word_id.to_string(), sentence_id.to_string());
                self.stats.word_occurrences += 1;
                true
            }
        }
    }

    /// `true` when the sentence is new
    pub fn register_sentence(&mut self, sentence_id: &str) -> bool {
        let inserted = self.sentences.insert(sentence_id.to_string());
        if inserted {
            self.stats.sentences += 1;
        }
        inserted
    }

    /// `true` when the annotator id is new; the first name seen is kept
    pub fn register_annotator(&mut self, annotator: &Annotator) -> bool {
        if self.annotators.contains_key(&annotator.id) {
            return false;
        }
        self.annotators
            .insert(annotator.id.clone(), annotator.name.clone());
        self.stats.annotators += 1;
        true
    }

    pub fn finish_item(&mut self) {
        self.stats.lexical_items += 1;
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn into_stats(self) -> BuildStats {
        self.stats
    }
}
