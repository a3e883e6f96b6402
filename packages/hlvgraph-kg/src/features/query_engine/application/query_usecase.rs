//! Query Service
//!
//! Runs the templated queries against a store and exports results as CSV
//! files named after the query (`{query_dir}/{name}.csv`).

use std::path::{Path, PathBuf};

use hlvgraph_storage::{GraphStore, ResultTable, Triple};
use tracing::{debug, info};

use crate::errors::{KgError, Result};
use crate::features::query_engine::domain::{InstanceQuery, QueryKind, VariationRange};
use crate::features::query_engine::infrastructure::write_table;
use crate::shared::utils::{sanitize_file_stem, write_atomic};

pub struct QueryService<'a, S: GraphStore> {
    store: &'a S,
    output_dir: PathBuf,
}

impl<'a, S: GraphStore> QueryService<'a, S> {
    pub fn new(store: &'a S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `{output_dir}/{kind.name()}.csv`
    pub fn output_path(&self, kind: &QueryKind) -> PathBuf {
        self.output_dir
            .join(format!("{}.csv", sanitize_file_stem(&kind.name())))
    }

    pub fn run(&self, kind: &QueryKind) -> Result<ResultTable> {
        let table = self
            .store
            .select(&kind.sparql())
            .map_err(|e| KgError::query(kind.name(), e))?;
        debug!(query = %kind.name(), rows = table.len(), "query evaluated");
        Ok(table)
    }

    /// Run and write the CSV file
    pub fn export(&self, kind: &QueryKind) -> Result<(ResultTable, PathBuf)> {
        let table = self.run(kind)?;
        let path = self.output_path(kind);
        write_atomic(&path, |w| write_table(&table, w))?;
        info!(query = %kind.name(), rows = table.len(), path = %path.display(), "query exported");
        Ok((table, path))
    }

    pub fn category_stats(&self) -> Result<ResultTable> {
        self.run(&QueryKind::CategoryStats)
    }

    pub fn distinct_categories(&self) -> Result<ResultTable> {
        self.run(&QueryKind::DistinctCategories)
    }

    pub fn num_labels(&self) -> Result<ResultTable> {
        self.run(&QueryKind::NumLabels)
    }

    pub fn variation(&self, min: u32, max: Option<u32>) -> Result<ResultTable> {
        self.run(&QueryKind::Variation(VariationRange { min, max }))
    }

    pub fn annotations_per_annotator(&self, name: &str) -> Result<ResultTable> {
        self.run(&QueryKind::AnnotationsPerAnnotator(name.to_string()))
    }

    pub fn annotated_sentences(&self) -> Result<ResultTable> {
        self.run(&QueryKind::AnnotatedSentences)
    }

    pub fn pos_tags(&self) -> Result<ResultTable> {
        self.run(&QueryKind::PosTags)
    }

    /// Annotator labels, sorted
    pub fn annotators(&self) -> Result<Vec<String>> {
        let table = self.run(&QueryKind::Annotators)?;
        Ok(table
            .column_values("annotator_lbl")
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Triples describing one annotated word pair
    pub fn instance_subgraph(&self, word1: &str, word2: &str) -> Result<Vec<Triple>> {
        let query = InstanceQuery::new(word1, word2);
        self.store
            .construct(&query.sparql())
            .map_err(|e| KgError::query("instance", e))
    }

    /// The queries a full run exports
    pub fn standard_suite() -> Vec<QueryKind> {
        vec![
            QueryKind::CategoryStats,
            QueryKind::NumLabels,
            QueryKind::Variation(VariationRange::exactly(1)),
            QueryKind::Variation(VariationRange::at_least(2)),
            QueryKind::PosTags,
            QueryKind::AnnotatedSentences,
            QueryKind::Annotators,
        ]
    }

    pub fn export_standard_suite(&self) -> Result<Vec<PathBuf>> {
        Self::standard_suite()
            .iter()
            .map(|kind| self.export(kind).map(|(_, path)| path))
            .collect()
    }
}
