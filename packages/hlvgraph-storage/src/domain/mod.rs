//! Domain layer for the graph store
//!
//! # Domain Models
//!
//! - `Namespace`: prefix + base IRI, mints node IRIs from local identifiers
//! - `Term` / `Literal`: RDF terms with the literal typing the graph uses
//!   (string, integer, gYear, language-tagged string)
//! - `Triple`: subject / predicate / object
//! - `ResultTable`: tabular SPARQL SELECT result
//!
//! # Port Trait
//!
//! - `GraphStore`: write-once, read-many triple store abstraction
//!
//! # Examples
//!
//! ```rust,ignore
//! use hlvgraph_storage::domain::{vocab, GraphStore, Literal, Term, Triple};
//!
//! fn example(store: &mut impl GraphStore) -> Result<()> {
//!     let word = Term::iri(vocab::HLV_WORD.iri("foo_s1"));
//!     store.insert(&Triple::new(word.clone(), vocab::rdf::TYPE, Term::iri(vocab::nif::WORD)))?;
//!     store.insert(&Triple::new(word, vocab::rdfs::LABEL, Literal::string("foo_s1")))?;
//!
//!     let mut out = Vec::new();
//!     store.write_turtle(&mut out)?;
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::io::Write;

use crate::Result;

// ═══════════════════════════════════════════════════════════════════════════
// Namespaces
// ═══════════════════════════════════════════════════════════════════════════

/// A prefix bound to a base IRI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub base: &'static str,
}

impl Namespace {
    pub const fn new(prefix: &'static str, base: &'static str) -> Self {
        Self { prefix, base }
    }

    /// Node IRI for a local identifier.
    ///
    /// Characters that may not appear in an IRI are percent-encoded, so the
    /// mapping from local identifier to IRI stays injective.
    pub fn iri(&self, local: &str) -> String {
        format!("{}{}", self.base, encode_local(local))
    }

    /// Same as [`Namespace::iri`], wrapped as a term
    pub fn term(&self, local: &str) -> Term {
        Term::Iri(self.iri(local))
    }
}

fn needs_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            ' ' | '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}' | '%' | '#'
        )
}

/// Percent-encode the characters of a local name that are illegal in an IRI
pub fn encode_local(local: &str) -> Cow<'_, str> {
    if !local.chars().any(needs_escape) {
        return Cow::Borrowed(local);
    }

    let mut out = String::with_capacity(local.len() + 8);
    let mut buf = [0u8; 4];
    for c in local.chars() {
        if needs_escape(c) {
            for b in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "%{:02X}", b);
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

macro_rules! terms {
    ($base:literal { $($name:ident => $local:literal),* $(,)? }) => {
        pub const BASE: &str = $base;
        $(pub const $name: &str = concat!($base, $local);)*
    };
}

/// Fixed vocabulary of the annotation graph
pub mod vocab {
    use super::Namespace;

    pub const HLV: Namespace = Namespace::new("hlv", "http://hlv.org/");
    pub const NIF: Namespace = Namespace::new(
        "nif",
        "http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#",
    );
    pub const RDAI: Namespace = Namespace::new("rdai", "http://rdaregistry.info/Elements/i/");
    pub const RDAIO: Namespace =
        Namespace::new("rdaio", "http://rdaregistry.info/Elements/i/object/");
    pub const RDAA: Namespace = Namespace::new("rdaa", "http://rdaregistry.info/Elements/a/");
    pub const HLV_WORD: Namespace = Namespace::new("hlv_word", "https://hlv.org/word/");
    pub const HLV_SENTENCE: Namespace =
        Namespace::new("hlv_sentence", "https://hlv.org/sentence/");
    pub const HLV_ANNOTATION: Namespace =
        Namespace::new("hlv_annotation", "https://hlv.org/annotation/");
    pub const HLV_ANNOTATOR: Namespace =
        Namespace::new("hlv_annotator", "https://hlv.org/annotator/");
    pub const SCHEMA: Namespace = Namespace::new("schema", "https://schema.org/");
    pub const RDF: Namespace =
        Namespace::new("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
    pub const RDFS: Namespace = Namespace::new("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
    pub const XSD: Namespace = Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema#");

    /// Prefixes bound on every store and every query
    pub const PREFIXES: &[Namespace] = &[
        HLV,
        NIF,
        RDAI,
        RDAIO,
        RDAA,
        HLV_WORD,
        HLV_SENTENCE,
        HLV_ANNOTATION,
        HLV_ANNOTATOR,
        SCHEMA,
        RDF,
        RDFS,
        XSD,
    ];

    pub mod nif {
        terms!("http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#" {
            WORD => "Word",
            CONTEXT => "Context",
            ANNOTATION_CLASS => "Annotation",
            SOURCE_URL => "sourceUrl",
            ANCHOR_OF => "anchorOf",
            LEMMA => "lemma",
            POS_TAG => "posTag",
            BEGIN_INDEX => "beginIndex",
            END_INDEX => "endIndex",
            IS_STRING => "isString",
            REFERENCE_CONTEXT => "referenceContext",
            ANNOTATION => "annotation",
            CATEGORY => "category",
        });
    }

    pub mod schema {
        terms!("https://schema.org/" {
            DATASET => "Dataset",
            OBSERVATION => "Observation",
            OBSERVATION_DATE => "observationDate",
        });
    }

    /// RDA item elements
    pub mod rdai {
        terms!("http://rdaregistry.info/Elements/i/" {
            ITEM => "P40080",
            NOTE => "P40064",
        });
    }

    pub mod rdaio {
        terms!("http://rdaregistry.info/Elements/i/object/" {
            HAS_ANNOTATOR => "P40015",
        });
    }

    /// RDA agent elements
    pub mod rdaa {
        terms!("http://rdaregistry.info/Elements/a/" {
            AGENT => "P50157",
        });
    }

    pub mod rdf {
        terms!("http://www.w3.org/1999/02/22-rdf-syntax-ns#" {
            TYPE => "type",
            LANG_STRING => "langString",
        });
    }

    pub mod rdfs {
        terms!("http://www.w3.org/2000/01/rdf-schema#" {
            LABEL => "label",
        });
    }

    pub mod xsd {
        terms!("http://www.w3.org/2001/XMLSchema#" {
            STRING => "string",
            INTEGER => "integer",
            G_YEAR => "gYear",
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Terms
// ═══════════════════════════════════════════════════════════════════════════

/// Literal datatype as used by the graph schema
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    /// xsd:string (plain literal)
    String,
    /// xsd:integer
    Integer,
    /// xsd:gYear
    Year,
    /// rdf:langString with its language tag
    LangString(String),
    /// Any other datatype IRI (only produced when reading foreign data)
    Typed(String),
}

/// RDF literal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub kind: LiteralKind,
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            kind: LiteralKind::String,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            lexical: value.to_string(),
            kind: LiteralKind::Integer,
        }
    }

    pub fn year(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            kind: LiteralKind::Year,
        }
    }

    pub fn lang_string(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            kind: LiteralKind::LangString(language.into()),
        }
    }

    pub fn datatype(&self) -> &str {
        match &self.kind {
            LiteralKind::String => vocab::xsd::STRING,
            LiteralKind::Integer => vocab::xsd::INTEGER,
            LiteralKind::Year => vocab::xsd::G_YEAR,
            LiteralKind::LangString(_) => vocab::rdf::LANG_STRING,
            LiteralKind::Typed(datatype) => datatype,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match &self.kind {
            LiteralKind::LangString(lang) => Some(lang),
            _ => None,
        }
    }
}

/// RDF term (subject or object position)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Plain value: IRI, blank node id or literal lexical form
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(id) => id,
            Term::Literal(lit) => &lit.lexical,
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// N-Triples rendering
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(id) => write!(f, "_:{}", id),
            Term::Literal(lit) => {
                f.write_char('"')?;
                write_escaped(f, &lit.lexical)?;
                f.write_char('"')?;
                match &lit.kind {
                    LiteralKind::String => Ok(()),
                    LiteralKind::LangString(lang) => write!(f, "@{}", lang),
                    _ => write!(f, "^^<{}>", lit.datatype()),
                }
            }
        }
    }
}

/// A single statement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Query Results
// ═══════════════════════════════════════════════════════════════════════════

/// Result of a SELECT query: ordered columns, one optional binding per cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Term>>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Binding of `column` in row `row`
    pub fn value(&self, row: usize, column: &str) -> Option<&Term> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// Lexical values of one column (unbound cells are skipped)
    pub fn column_values(&self, column: &str) -> Vec<&str> {
        match self.column_index(column) {
            Some(idx) => self
                .rows
                .iter()
                .filter_map(|row| row.get(idx).and_then(|cell| cell.as_ref()))
                .map(Term::lexical)
                .collect(),
            None => Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port Trait
// ═══════════════════════════════════════════════════════════════════════════

/// Triple store abstraction.
///
/// The graph is written once during construction and only read afterwards,
/// so there are no update or delete operations.
pub trait GraphStore {
    /// Add a triple; returns `false` when it was already present
    fn insert(&mut self, triple: &Triple) -> Result<bool>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, triple: &Triple) -> Result<bool>;

    /// Objects of `(subject, predicate, ?)`
    fn objects(&self, subject: &Term, predicate: &str) -> Result<Vec<Term>>;

    /// Subjects of `(?, predicate, object)`
    fn subjects(&self, predicate: &str, object: &Term) -> Result<Vec<Term>>;

    /// All triples in a stable (sorted) order
    fn triples(&self) -> Result<Vec<Triple>>;

    /// Serialize the whole store as Turtle with the bound prefixes
    fn write_turtle(&self, writer: &mut dyn Write) -> Result<()>;

    /// Evaluate a SPARQL SELECT query
    fn select(&self, sparql: &str) -> Result<ResultTable>;

    /// Evaluate a SPARQL CONSTRUCT query
    fn construct(&self, sparql: &str) -> Result<Vec<Triple>>;

    /// SHA-256 over the sorted N-Triples rendering of the store
    fn content_digest(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        for triple in self.triples()? {
            hasher.update(triple.to_string().as_bytes());
            hasher.update(b"\n");
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_iri() {
        assert_eq!(
            vocab::HLV_SENTENCE.iri("mag_1856_590750.txt-21-18"),
            "https://hlv.org/sentence/mag_1856_590750.txt-21-18"
        );
    }

    #[test]
    fn test_encode_local_escapes_illegal_chars() {
        assert_eq!(encode_local("foo_s1"), "foo_s1");
        assert_eq!(encode_local("a b"), "a%20b");
        assert_eq!(encode_local("\"x\""), "%22x%22");
        assert_eq!(encode_local("50%"), "50%25");
        assert_eq!(encode_local("C#"), "C%23");
    }

    #[test]
    fn test_encode_local_is_injective_on_percent() {
        // a literal "%20" and an escaped space must not collide
        assert_ne!(encode_local("a%20b"), encode_local("a b"));
    }

    #[test]
    fn test_vocab_terms() {
        assert_eq!(
            vocab::nif::REFERENCE_CONTEXT,
            "http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#referenceContext"
        );
        assert_eq!(vocab::rdaio::HAS_ANNOTATOR, "http://rdaregistry.info/Elements/i/object/P40015");
        assert_eq!(vocab::xsd::G_YEAR, "http://www.w3.org/2001/XMLSchema#gYear");
        assert_eq!(vocab::nif::BASE, vocab::NIF.base);
    }

    #[test]
    fn test_term_display() {
        let iri = Term::iri("https://hlv.org/word/foo_s1");
        assert_eq!(iri.to_string(), "<https://hlv.org/word/foo_s1>");

        let lang = Term::from(Literal::lang_string("say \"hi\"", "en"));
        assert_eq!(lang.to_string(), "\"say \\\"hi\\\"\"@en");

        let int = Term::from(Literal::integer(42));
        assert_eq!(
            int.to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );

        let plain = Term::from(Literal::string("x"));
        assert_eq!(plain.to_string(), "\"x\"");
    }

    #[test]
    fn test_result_table_access() {
        let mut table = ResultTable::new(vec!["pos".to_string(), "n".to_string()]);
        table.rows.push(vec![Some(Literal::string("NN").into()), None]);
        table.rows.push(vec![Some(Literal::string("VB").into()), Some(Literal::integer(2).into())]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.column_values("pos"), vec!["NN", "VB"]);
        assert_eq!(table.column_values("n"), vec!["2"]);
        assert!(table.value(0, "n").is_none());
        assert_eq!(table.value(1, "n").map(Term::lexical), Some("2"));
        assert!(table.column_values("missing").is_empty());
    }
}
