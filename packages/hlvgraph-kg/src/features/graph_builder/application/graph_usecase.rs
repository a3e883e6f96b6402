//! Graph Build UseCase
//!
//! Loads lexical items one at a time, builds the graph and writes it to
//! `{graph_dir}/{dataset}.ttl`. A lexical item whose files cannot be opened is
//! skipped and reported; every other error aborts the run.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use hlvgraph_storage::{GraphStore, OxigraphStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::KgConfig;
use crate::errors::{ErrorKind, KgError, Result};
use crate::features::graph_builder::domain::BuildStats;
use crate::features::graph_builder::infrastructure::{BuiltGraph, GraphBuilder};
use crate::features::loader::{LexicalItemRows, RecordSource, TsvDirectorySource};
use crate::shared::utils::write_atomic;

/// A lexical item that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub item: String,
    pub reason: String,
}

/// Outcome of one build run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub dataset: String,
    pub processed: Vec<String>,
    pub failed: Vec<ItemFailure>,
    pub stats: BuildStats,
    /// Turtle file, once written
    pub output: Option<PathBuf>,
}

impl BuildReport {
    pub fn log_summary(&self) {
        for failure in &self.failed {
            warn!(item = %failure.item, reason = %failure.reason, "lexical item skipped");
        }
        info!(
            dataset = %self.dataset,
            processed = self.processed.len(),
            failed = self.failed.len(),
            annotations = self.stats.annotations,
            triples = self.stats.triples,
            output = ?self.output,
            "build finished"
        );
    }
}

/// Graph Build UseCase Trait
pub trait GraphBuildUseCase {
    /// Build the in-memory graph
    fn build_graph(&self) -> Result<(BuiltGraph, BuildReport)>;

    /// Build and write the Turtle file
    fn build_and_save(&self) -> Result<(BuiltGraph, BuildReport)>;
}

/// Load → build → serialize
#[derive(Debug, Clone)]
pub struct KgPipeline<R: RecordSource> {
    source: R,
    config: KgConfig,
}

impl KgPipeline<TsvDirectorySource> {
    pub fn from_config(config: KgConfig) -> Self {
        let source = TsvDirectorySource::new(config.data_path.clone());
        Self { source, config }
    }
}

impl<R: RecordSource> KgPipeline<R> {
    pub fn new(source: R, config: KgConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &KgConfig {
        &self.config
    }

    /// Configured items (sorted, deduplicated) or every discovered one
    fn item_names(&self) -> Result<Vec<String>> {
        match &self.config.lexical_items {
            Some(items) => {
                let mut items = items.clone();
                items.sort();
                items.dedup();
                Ok(items)
            }
            None => self.source.list_items(),
        }
    }

    /// Read every item, isolating file access failures
    fn load_items(&self, report: &mut BuildReport) -> Result<BTreeMap<String, LexicalItemRows>> {
        let mut loaded = BTreeMap::new();

        for name in self.item_names()? {
            match self.source.load_item(&name) {
                Ok(rows) => {
                    report.processed.push(name.clone());
                    loaded.insert(name, rows);
                }
                Err(err) if err.kind() == ErrorKind::FileAccess => {
                    warn!(item = %name, error = %err, "cannot read lexical item");
                    report.failed.push(ItemFailure {
                        item: name,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(loaded)
    }

    /// Graph file from a previous run, or a fresh build when it is absent
    /// or `rebuild` is set
    pub fn load_or_build(&self, rebuild: bool) -> Result<OxigraphStore> {
        let path = self.config.graph_path();
        if !rebuild && path.is_file() {
            info!(path = %path.display(), "reusing serialized graph");
            return load_graph(&self.config);
        }
        let (built, report) = self.build_and_save()?;
        report.log_summary();
        Ok(built.store)
    }
}

impl<R: RecordSource> GraphBuildUseCase for KgPipeline<R> {
    fn build_graph(&self) -> Result<(BuiltGraph, BuildReport)> {
        let mut report = BuildReport {
            dataset: self.config.dataset_name.clone(),
            ..Default::default()
        };

        let items = self.load_items(&mut report)?;
        let builder = GraphBuilder::new(&self.config.language, self.config.word_key_scheme);
        let built = builder.build(&self.config.dataset_name, &items)?;

        report.stats = built.stats.clone();
        Ok((built, report))
    }

    fn build_and_save(&self) -> Result<(BuiltGraph, BuildReport)> {
        let (built, mut report) = self.build_graph()?;

        let path = self.config.graph_path();
        write_atomic(&path, |w| Ok(built.store.write_turtle(w)?))?;
        info!(path = %path.display(), triples = report.stats.triples, "graph serialized");

        report.output = Some(path);
        Ok((built, report))
    }
}

/// Parse `{graph_dir}/{dataset}.ttl` back into a store
pub fn load_graph(config: &KgConfig) -> Result<OxigraphStore> {
    let path = config.graph_path();
    if !path.is_file() {
        return Err(KgError::file_access(
            &path,
            io::Error::new(io::ErrorKind::NotFound, "graph file not found; run `build` first"),
        ));
    }
    Ok(OxigraphStore::open_turtle(&path)?)
}
