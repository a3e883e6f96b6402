//! oxigraph adapter for GraphStore
//!
//! Wraps an in-memory `oxigraph::store::Store`. Everything lives in the
//! default graph; prefixes are bound once at construction and reused for
//! every Turtle serialization.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::vocab::xsd;
use oxigraph::model::{
    BlankNode, GraphName, GraphNameRef, Literal as OxLiteral, NamedNode, Quad, Subject,
    Term as OxTerm,
};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::domain::{vocab, GraphStore, Literal, LiteralKind, Namespace, ResultTable, Term, Triple};
use crate::{Result, StorageError};

/// In-memory triple store backed by oxigraph
pub struct OxigraphStore {
    store: Store,
    prefixes: Vec<Namespace>,
}

impl OxigraphStore {
    /// Empty store with the annotation graph prefixes bound
    pub fn new() -> Result<Self> {
        Self::with_prefixes(vocab::PREFIXES)
    }

    pub fn with_prefixes(prefixes: &[Namespace]) -> Result<Self> {
        let store = Store::new()
            .map_err(|e| StorageError::backend("Failed to create in-memory store").with_source(e))?;
        Ok(Self {
            store,
            prefixes: prefixes.to_vec(),
        })
    }

    /// Parse a Turtle document into a fresh store
    pub fn from_turtle(reader: impl Read) -> Result<Self> {
        let mut store = Self::new()?;
        store.load_turtle(reader)?;
        Ok(store)
    }

    /// Load a Turtle file from disk
    pub fn open_turtle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            StorageError::serialization(format!("Cannot open graph file {}", path.display()))
                .with_source(e)
        })?;
        Self::from_turtle(BufReader::new(file))
    }

    /// Build a store from already converted triples
    pub fn from_triples<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> Result<Self> {
        let mut store = Self::new()?;
        for triple in triples {
            store.insert(triple)?;
        }
        Ok(store)
    }

    pub fn load_turtle(&mut self, reader: impl Read) -> Result<()> {
        self.store
            .load_from_reader(RdfParser::from_format(RdfFormat::Turtle), reader)
            .map_err(|e| StorageError::serialization("Failed to parse Turtle").with_source(e))
    }

    /// Turtle rendering as a string
    pub fn to_turtle_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_turtle(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| StorageError::serialization("Turtle output is not UTF-8").with_source(e))
    }

    pub fn prefixes(&self) -> &[Namespace] {
        &self.prefixes
    }

    fn to_quad(triple: &Triple) -> Result<Quad> {
        Ok(Quad::new(
            to_subject(&triple.subject)?,
            named_node(&triple.predicate)?,
            to_term(&triple.object)?,
            GraphName::DefaultGraph,
        ))
    }
}

impl fmt::Debug for OxigraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefixes: Vec<&str> = self.prefixes.iter().map(|ns| ns.prefix).collect();
        let mut debug = f.debug_struct("OxigraphStore");
        debug.field("prefixes", &prefixes);
        match self.len() {
            Ok(len) => debug.field("len", &len),
            Err(_) => debug.field("len", &"unavailable"),
        };
        debug.finish()
    }
}

impl GraphStore for OxigraphStore {
    fn insert(&mut self, triple: &Triple) -> Result<bool> {
        let quad = Self::to_quad(triple)?;
        self.store
            .insert(&quad)
            .map_err(|e| StorageError::backend("Insert failed").with_source(e))
    }

    fn len(&self) -> Result<usize> {
        self.store
            .len()
            .map_err(|e| StorageError::backend("Failed to count triples").with_source(e))
    }

    fn contains(&self, triple: &Triple) -> Result<bool> {
        let quad = Self::to_quad(triple)?;
        self.store
            .contains(&quad)
            .map_err(|e| StorageError::backend("Lookup failed").with_source(e))
    }

    fn objects(&self, subject: &Term, predicate: &str) -> Result<Vec<Term>> {
        let subject = to_subject(subject)?;
        let predicate = named_node(predicate)?;
        let mut objects = Vec::new();
        for quad in self.store.quads_for_pattern(
            Some(subject.as_ref()),
            Some(predicate.as_ref()),
            None,
            Some(GraphNameRef::DefaultGraph),
        ) {
            let quad = quad.map_err(|e| StorageError::backend("Scan failed").with_source(e))?;
            objects.push(from_term(&quad.object));
        }
        objects.sort();
        Ok(objects)
    }

    fn subjects(&self, predicate: &str, object: &Term) -> Result<Vec<Term>> {
        let predicate = named_node(predicate)?;
        let object = to_term(object)?;
        let mut subjects = Vec::new();
        for quad in self.store.quads_for_pattern(
            None,
            Some(predicate.as_ref()),
            Some(object.as_ref()),
            Some(GraphNameRef::DefaultGraph),
        ) {
            let quad = quad.map_err(|e| StorageError::backend("Scan failed").with_source(e))?;
            subjects.push(from_term(&OxTerm::from(quad.subject)));
        }
        subjects.sort();
        Ok(subjects)
    }

    fn triples(&self) -> Result<Vec<Triple>> {
        let mut triples = Vec::new();
        for quad in
            self.store
                .quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
        {
            let quad = quad.map_err(|e| StorageError::backend("Scan failed").with_source(e))?;
            triples.push(Triple {
                subject: from_term(&OxTerm::from(quad.subject)),
                predicate: quad.predicate.into_string(),
                object: from_term(&quad.object),
            });
        }
        triples.sort();
        Ok(triples)
    }

    fn write_turtle(&self, writer: &mut dyn Write) -> Result<()> {
        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
        for ns in &self.prefixes {
            serializer = serializer
                .with_prefix(ns.prefix, ns.base)
                .map_err(|e| StorageError::invalid_iri(ns.base).with_source(e))?;
        }
        self.store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, writer)
            .map_err(|e| StorageError::serialization("Turtle serialization failed").with_source(e))?;
        Ok(())
    }

    fn select(&self, sparql: &str) -> Result<ResultTable> {
        let results = self
            .store
            .query(sparql)
            .map_err(|e| StorageError::query("SELECT evaluation failed").with_source(e))?;

        match results {
            QueryResults::Solutions(solutions) => {
                let columns: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_owned())
                    .collect();
                let mut table = ResultTable::new(columns);
                for solution in solutions {
                    let solution = solution
                        .map_err(|e| StorageError::query("Solution iteration failed").with_source(e))?;
                    let row = table
                        .columns
                        .iter()
                        .map(|column| solution.get(column.as_str()).map(from_term))
                        .collect();
                    table.rows.push(row);
                }
                Ok(table)
            }
            _ => Err(StorageError::query("Expected a SELECT query")),
        }
    }

    fn construct(&self, sparql: &str) -> Result<Vec<Triple>> {
        let results = self
            .store
            .query(sparql)
            .map_err(|e| StorageError::query("CONSTRUCT evaluation failed").with_source(e))?;

        match results {
            QueryResults::Graph(graph) => {
                let mut triples = Vec::new();
                for triple in graph {
                    let triple = triple
                        .map_err(|e| StorageError::query("Triple iteration failed").with_source(e))?;
                    triples.push(Triple {
                        subject: from_term(&OxTerm::from(triple.subject)),
                        predicate: triple.predicate.into_string(),
                        object: from_term(&triple.object),
                    });
                }
                triples.sort();
                triples.dedup();
                Ok(triples)
            }
            _ => Err(StorageError::query("Expected a CONSTRUCT query")),
        }
    }
}

// ============================================================
// Term conversion
// ============================================================

fn named_node(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| StorageError::invalid_iri(iri).with_source(e))
}

fn to_subject(term: &Term) -> Result<Subject> {
    match term {
        Term::Iri(iri) => Ok(named_node(iri)?.into()),
        Term::Blank(id) => Ok(BlankNode::new(id.as_str())
            .map_err(|e| StorageError::invalid_term(format!("Invalid blank node id: {}", id)).with_source(e))?
            .into()),
        Term::Literal(lit) => Err(StorageError::invalid_term(format!(
            "Literal \"{}\" cannot be a subject",
            lit.lexical
        ))),
    }
}

fn to_term(term: &Term) -> Result<OxTerm> {
    match term {
        Term::Literal(lit) => Ok(to_literal(lit)?.into()),
        other => Ok(to_subject(other)?.into()),
    }
}

fn to_literal(lit: &Literal) -> Result<OxLiteral> {
    let value = lit.lexical.as_str();
    Ok(match &lit.kind {
        LiteralKind::String => OxLiteral::new_simple_literal(value),
        LiteralKind::Integer => OxLiteral::new_typed_literal(value, xsd::INTEGER),
        LiteralKind::Year => OxLiteral::new_typed_literal(value, xsd::G_YEAR),
        LiteralKind::LangString(lang) => OxLiteral::new_language_tagged_literal(value, lang.as_str())
            .map_err(|e| StorageError::invalid_term(format!("Invalid language tag: {}", lang)).with_source(e))?,
        LiteralKind::Typed(datatype) => OxLiteral::new_typed_literal(value, named_node(datatype)?),
    })
}

fn from_literal(lit: &OxLiteral) -> Literal {
    let lexical = lit.value().to_owned();
    if let Some(lang) = lit.language() {
        return Literal::lang_string(lexical, lang);
    }
    let datatype = lit.datatype();
    let kind = if datatype == xsd::STRING {
        LiteralKind::String
    } else if datatype == xsd::INTEGER {
        LiteralKind::Integer
    } else if datatype == xsd::G_YEAR {
        LiteralKind::Year
    } else {
        LiteralKind::Typed(datatype.as_str().to_owned())
    };
    Literal { lexical, kind }
}

#[allow(unreachable_patterns)]
fn from_term(term: &OxTerm) -> Term {
    match term {
        OxTerm::NamedNode(node) => Term::Iri(node.as_str().to_owned()),
        OxTerm::BlankNode(node) => Term::Blank(node.as_str().to_owned()),
        OxTerm::Literal(lit) => Term::Literal(from_literal(lit)),
        other => Term::Blank(other.to_string()),
    }
}
