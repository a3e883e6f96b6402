//! SPARQL templates
//!
//! Every query starts with the same PREFIX block, generated from the store's
//! namespace table. Interpolated values are either integers or escaped string
//! literals.

use std::fmt::Write as _;

use hlvgraph_storage::vocab;

/// `PREFIX p: <base>` for every bound namespace
pub fn prefix_block() -> String {
    let mut block = String::new();
    for ns in vocab::PREFIXES {
        let _ = writeln!(block, "PREFIX {}: <{}>", ns.prefix, ns.base);
    }
    block
}

/// A double-quoted SPARQL string literal
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Bounds on the number of distinct categories an annotation label received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariationRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl VariationRange {
    pub fn exactly(n: u32) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub fn at_least(n: u32) -> Self {
        Self { min: n, max: None }
    }

    pub fn between(min: u32, max: u32) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    fn having(&self, expr: &str) -> String {
        match self.max {
            Some(max) if max == self.min => format!("HAVING ({} = {})", expr, max),
            Some(max) => format!("HAVING ({} >= {} && {} <= {})", expr, self.min, expr, max),
            None => format!("HAVING ({} >= {})", expr, self.min),
        }
    }
}

/// Tabular queries over the annotation graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Annotation count per category
    CategoryStats,
    /// Numeric categories in use
    DistinctCategories,
    /// Distinct / total label counts and category range per annotation label
    NumLabels,
    /// Annotation labels whose distinct category count is within bounds
    Variation(VariationRange),
    /// Token and sentence of every annotation, for every annotator
    AnnotatedSentences,
    /// Annotations of one annotator (by label)
    AnnotationsPerAnnotator(String),
    PosTags,
    Annotators,
    /// Label, numeric category and annotator of every annotation
    AnnotationGraph,
}

impl QueryKind {
    /// File stem of the exported CSV
    pub fn name(&self) -> String {
        match self {
            QueryKind::CategoryStats => "category_stats".to_string(),
            QueryKind::DistinctCategories => "categories".to_string(),
            QueryKind::NumLabels => "num_labels".to_string(),
            QueryKind::Variation(range) => match range.max {
                Some(max) => format!("variations_{}_{}", range.min, max),
                None => format!("variations_{}_open", range.min),
            },
            QueryKind::AnnotatedSentences => "annotated_sents".to_string(),
            QueryKind::AnnotationsPerAnnotator(name) => format!("annotator_{}", name),
            QueryKind::PosTags => "pos_tags".to_string(),
            QueryKind::Annotators => "annotators".to_string(),
            QueryKind::AnnotationGraph => "annotation_graph".to_string(),
        }
    }

    pub fn sparql(&self) -> String {
        let body = match self {
            QueryKind::CategoryStats => "\
SELECT ?category ?category_lbl (COUNT(DISTINCT ?annotation) AS ?count)
WHERE {
  ?annotation a nif:Annotation ;
              nif:category ?category ;
              nif:category ?category_lbl .
  FILTER(isNumeric(?category))
  FILTER(datatype(?category_lbl) = xsd:string)
}
GROUP BY ?category ?category_lbl
ORDER BY ?category"
                .to_string(),

            QueryKind::DistinctCategories => "\
SELECT DISTINCT ?category
WHERE {
  ?annotation a nif:Annotation ;
              nif:category ?category .
  FILTER(isNumeric(?category))
}
ORDER BY ?category"
                .to_string(),

            QueryKind::NumLabels => format!(
                "\
SELECT ?annotation_lbl
       (COUNT(DISTINCT ?category) AS ?num_distinct_lbls)
       (COUNT(?annotation_lbl) / 2 AS ?num_total_lbls)
       (MAX(?category) - MIN(?category) AS ?range)
WHERE {{
{}
}}
GROUP BY ?annotation_lbl
ORDER BY ?annotation_lbl",
                PAIR_PATTERN
            ),

            QueryKind::Variation(range) => format!(
                "\
SELECT ?annotation_lbl (COUNT(DISTINCT ?category) AS ?num_distinct_lbls)
WHERE {{
{}
}}
GROUP BY ?annotation_lbl
{}
ORDER BY ?annotation_lbl",
                PAIR_PATTERN,
                range.having("COUNT(DISTINCT ?category)")
            ),

            QueryKind::AnnotatedSentences => "\
SELECT DISTINCT ?annotator ?token ?sentence
WHERE {
  ?annotation a nif:Annotation ;
              rdaio:P40015/rdfs:label ?annotator .
  ?word nif:annotation ?annotation ;
        nif:anchorOf ?token ;
        nif:referenceContext/nif:isString ?sentence .
}
ORDER BY ?annotator ?token ?sentence"
                .to_string(),

            QueryKind::AnnotationsPerAnnotator(name) => format!(
                "\
SELECT DISTINCT ?annotation_lbl ?token ?sentence
WHERE {{
  ?annotator a rdaa:P50157 ;
             rdfs:label {} .
  ?annotation rdaio:P40015 ?annotator ;
              rdfs:label ?annotation_lbl .
  ?word nif:annotation ?annotation ;
        nif:anchorOf ?token ;
        nif:referenceContext/nif:isString ?sentence .
}}
ORDER BY ?annotation_lbl ?token ?sentence",
                string_literal(name)
            ),

            QueryKind::PosTags => "\
SELECT DISTINCT ?pos
WHERE {
  ?word a nif:Word ;
        nif:posTag ?pos .
}
ORDER BY ?pos"
                .to_string(),

            QueryKind::Annotators => "\
SELECT DISTINCT ?annotator_lbl
WHERE {
  ?annotator a rdaa:P50157 ;
             rdfs:label ?annotator_lbl .
}
ORDER BY ?annotator_lbl"
                .to_string(),

            QueryKind::AnnotationGraph => "\
SELECT DISTINCT ?annotation_lbl ?category ?annotator ?annotator_lbl
WHERE {
  ?annotation a nif:Annotation ;
              rdfs:label ?annotation_lbl ;
              nif:category ?category ;
              rdaio:P40015 ?annotator .
  ?annotator rdfs:label ?annotator_lbl .
  FILTER(isNumeric(?category))
}
ORDER BY ?annotation_lbl ?annotator_lbl"
                .to_string(),
        };
        format!("{}\n{}", prefix_block(), body)
    }
}

/// Annotations joined with both of their words, restricted to pairs from two
/// different sentences. Each annotation matches twice (once per word order).
const PAIR_PATTERN: &str = "  ?annotation a nif:Annotation ;
              rdfs:label ?annotation_lbl ;
              nif:category ?category .
  FILTER(isNumeric(?category))
  ?word1 nif:annotation ?annotation ;
         nif:referenceContext/rdfs:label ?sentence1 .
  ?word2 nif:annotation ?annotation ;
         nif:referenceContext/rdfs:label ?sentence2 .
  FILTER(?sentence1 != ?sentence2)";

/// Sub-graph around one annotated word pair: both words, their sentences and
/// every annotation linking them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceQuery {
    pub word1: String,
    pub word2: String,
}

impl InstanceQuery {
    pub fn new(word1: impl Into<String>, word2: impl Into<String>) -> Self {
        Self {
            word1: word1.into(),
            word2: word2.into(),
        }
    }

    pub fn sparql(&self) -> String {
        format!(
            "{}
CONSTRUCT {{ ?s ?p ?o }}
WHERE {{
  ?word1 a nif:Word ;
         rdfs:label {} ;
         nif:annotation ?annotation ;
         nif:referenceContext ?sentence1 .
  ?word2 a nif:Word ;
         rdfs:label {} ;
         nif:annotation ?annotation ;
         nif:referenceContext ?sentence2 .
  ?s ?p ?o .
  FILTER(?s IN (?word1, ?word2, ?sentence1, ?sentence2, ?annotation))
}}",
            prefix_block(),
            string_literal(&self.word1),
            string_literal(&self.word2)
        )
    }
}
