//! Visualization UseCase
//!
//! Produces the full annotation plot, one plot per annotator and rendered
//! images of single annotated word pairs. Layout positions and color maps are
//! cached in `resource_dir` under content-hash keys.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use hlvgraph_storage::{GraphStore, OxigraphStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::KgConfig;
use crate::errors::{KgError, Result};
use crate::features::query_engine::{QueryKind, QueryService};
use crate::features::visualization::domain::{
    spring_layout, ColorMap, ColorMode, LayoutGraph, LayoutParams, NumLabelsRow, Positions,
    ANNOTATOR_COLOR, CATEGORY_SCALES,
};
use crate::features::visualization::infrastructure::{render_to_file, ImageRenderer, JsonCache, ScatterPlot};
use crate::shared::utils::{content_hash, sanitize_file_stem};

const ANNOTATION_RADIUS: f64 = 2.0;
const ANNOTATOR_RADIUS: f64 = 8.0;

/// One annotation label linked to the annotator who gave it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEdge {
    pub annotation_lbl: String,
    pub category: u8,
    /// Annotator IRI, the layout node key
    pub annotator: String,
    pub annotator_lbl: String,
}

pub struct VisualizationService<'a, S: GraphStore> {
    store: &'a S,
    config: &'a KgConfig,
    queries: QueryService<'a, S>,
    cache: JsonCache,
}

impl<'a, S: GraphStore> VisualizationService<'a, S> {
    pub fn new(store: &'a S, config: &'a KgConfig) -> Self {
        Self {
            store,
            config,
            queries: QueryService::new(store, config.output.query_dir.clone()),
            cache: JsonCache::new(config.cache_dir()),
        }
    }

    pub fn annotation_edges(&self) -> Result<Vec<AnnotationEdge>> {
        let kind = QueryKind::AnnotationGraph;
        let table = self.queries.run(&kind)?;

        let mut edges = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let cell = |column: &str| {
                table
                    .value(row, column)
                    .map(|term| term.lexical().to_string())
                    .ok_or_else(|| {
                        KgError::parse(
                            format!("{} row {}", kind.name(), row + 1),
                            format!("unbound '{}'", column),
                        )
                    })
            };
            let category = cell("category")?;
            let category = category.parse::<u8>().map_err(|_| {
                KgError::parse(
                    format!("{} row {}", kind.name(), row + 1),
                    format!("category '{}' is not a small integer", category),
                )
            })?;
            edges.push(AnnotationEdge {
                annotation_lbl: cell("annotation_lbl")?,
                category,
                annotator: cell("annotator")?,
                annotator_lbl: cell("annotator_lbl")?,
            });
        }
        debug!(edges = edges.len(), "annotation edges collected");
        Ok(edges)
    }

    /// Positions of every annotation label and annotator node
    pub fn annotation_layout(&self, edges: &[AnnotationEdge]) -> Result<Positions> {
        let mut graph = LayoutGraph::new();
        for edge in edges {
            graph.add_edge(&edge.annotation_lbl, &edge.annotator);
        }
        let params = LayoutParams::from(&self.config.layout);
        let fingerprint = graph.fingerprint(&params);

        self.cache.get_or_compute("layout", &fingerprint, || {
            info!(
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "computing layout"
            );
            Ok(spring_layout(&graph, &params))
        })
    }

    /// `num_labels.csv` from the query directory, exported first when absent
    fn num_labels_csv(&self) -> Result<Vec<u8>> {
        let path = self.queries.output_path(&QueryKind::NumLabels);
        if !path.is_file() {
            debug!(path = %path.display(), "num_labels export missing, running query");
            self.queries.export(&QueryKind::NumLabels)?;
        }
        fs::read(&path).map_err(|e| KgError::file_access(&path, e))
    }

    pub fn colors(&self, mode: ColorMode) -> Result<ColorMap> {
        let csv_bytes = self.num_labels_csv()?;
        let mut keyed = mode.as_str().as_bytes().to_vec();
        keyed.push(0);
        keyed.extend_from_slice(&csv_bytes);
        let fingerprint = content_hash(&keyed);

        self.cache
            .get_or_compute(&format!("colors_{}", mode), &fingerprint, || {
                let rows = parse_num_labels(&csv_bytes)?;
                Ok(ColorMap::from_rows(mode, &rows))
            })
    }

    pub fn full_plot_path(&self, mode: ColorMode) -> PathBuf {
        self.config.output.visualization_dir.join("full").join(format!(
            "full_annotations_{}_{}.svg",
            mode,
            sanitize_file_stem(&self.config.dataset_name)
        ))
    }

    pub fn annotator_plot_path(&self, annotator: &str, mode: ColorMode) -> PathBuf {
        self.config
            .output
            .visualization_dir
            .join("annotator")
            .join(mode.as_str())
            .join(format!(
                "{}_{}_{}.svg",
                sanitize_file_stem(annotator),
                mode,
                sanitize_file_stem(&self.config.dataset_name)
            ))
    }

    pub fn instance_path(&self, word1: &str, word2: &str) -> PathBuf {
        self.config.output.visualization_dir.join("instance").join(format!(
            "{}_{}_{}.png",
            sanitize_file_stem(word1),
            sanitize_file_stem(word2),
            sanitize_file_stem(&self.config.dataset_name)
        ))
    }

    pub fn full_annotation_plot(&self, mode: ColorMode) -> Result<PathBuf> {
        let edges = self.annotation_edges()?;
        let positions = self.annotation_layout(&edges)?;
        let colors = self.colors(mode)?;
        self.write_full_plot(&edges, &positions, &colors, mode)
    }

    fn write_full_plot(
        &self,
        edges: &[AnnotationEdge],
        positions: &Positions,
        colors: &ColorMap,
        mode: ColorMode,
    ) -> Result<PathBuf> {
        // A label judged several times sits at its highest category
        let mut categories: BTreeMap<&str, u8> = BTreeMap::new();
        for edge in edges {
            let entry = categories.entry(edge.annotation_lbl.as_str()).or_insert(edge.category);
            *entry = (*entry).max(edge.category);
        }

        let mut plot = ScatterPlot::new("Full annotation graph");
        for (label, category) in &categories {
            let Some([x, y]) = positions.get(*label) else {
                continue;
            };
            let scale = CATEGORY_SCALES
                .get(*category as usize)
                .copied()
                .unwrap_or(1.0);
            plot.push(x * scale, y * scale, ANNOTATION_RADIUS, colors.color(label));
        }
        plot.legend = mode.legend();

        let path = self.full_plot_path(mode);
        plot.write(&path)?;
        info!(mode = %mode, points = plot.points.len(), path = %path.display(), "full plot written");
        Ok(path)
    }

    pub fn annotator_plot(&self, annotator: &str, mode: ColorMode) -> Result<PathBuf> {
        let edges = self.annotation_edges()?;
        let positions = self.annotation_layout(&edges)?;
        let colors = self.colors(mode)?;
        self.write_annotator_plot(annotator, &edges, &positions, &colors, mode)
    }

    fn write_annotator_plot(
        &self,
        annotator: &str,
        edges: &[AnnotationEdge],
        positions: &Positions,
        colors: &ColorMap,
        mode: ColorMode,
    ) -> Result<PathBuf> {
        let mut labels: Vec<&str> = edges
            .iter()
            .filter(|edge| edge.annotator_lbl == annotator)
            .map(|edge| edge.annotation_lbl.as_str())
            .collect();
        if labels.is_empty() {
            return Err(KgError::NotFound(format!(
                "no annotations by annotator '{}'",
                annotator
            )));
        }
        labels.sort_unstable();
        labels.dedup();

        let mut plot = ScatterPlot::new(annotator);
        for label in labels {
            if let Some([x, y]) = positions.get(label) {
                plot.push(*x, *y, ANNOTATION_RADIUS, colors.color(label));
            }
        }
        plot.push(0.0, 0.0, ANNOTATOR_RADIUS, ANNOTATOR_COLOR);
        plot.legend = mode.legend();

        let path = self.annotator_plot_path(annotator, mode);
        plot.write(&path)?;
        debug!(annotator = %annotator, mode = %mode, path = %path.display(), "annotator plot written");
        Ok(path)
    }

    /// Full plot plus one plot per annotator, for each mode
    pub fn run_all(&self, modes: &[ColorMode]) -> Result<Vec<PathBuf>> {
        let edges = self.annotation_edges()?;
        let positions = self.annotation_layout(&edges)?;
        let annotators = self.queries.annotators()?;

        let mut written = Vec::new();
        for &mode in modes {
            let colors = self.colors(mode)?;
            written.push(self.write_full_plot(&edges, &positions, &colors, mode)?);
            for annotator in &annotators {
                written.push(self.write_annotator_plot(annotator, &edges, &positions, &colors, mode)?);
            }
        }
        info!(files = written.len(), "visualizations written");
        Ok(written)
    }

    /// Render the sub-graph of one annotated word pair as a PNG image
    pub fn inspect_instance(
        &self,
        word1: &str,
        word2: &str,
        renderer: &dyn ImageRenderer,
    ) -> Result<PathBuf> {
        let triples = self.queries.instance_subgraph(word1, word2)?;
        if triples.is_empty() {
            return Err(KgError::NotFound(format!(
                "no annotation links '{}' and '{}'",
                word1, word2
            )));
        }
        let turtle = OxigraphStore::from_triples(&triples)?.to_turtle_string()?;

        let path = self.instance_path(word1, word2);
        render_to_file(renderer, &turtle, &path)?;
        info!(triples = triples.len(), path = %path.display(), "instance rendered");
        Ok(path)
    }

    pub fn store(&self) -> &S {
        self.store
    }
}

fn parse_num_labels(bytes: &[u8]) -> Result<Vec<NumLabelsRow>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
