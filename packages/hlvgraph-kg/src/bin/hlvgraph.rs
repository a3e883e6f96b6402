//! hlvgraph CLI
//!
//! # Usage
//!
//! ```bash
//! # Build graphs/dwug_en.ttl from the DWUG data directory
//! hlvgraph --config hlvgraph.yaml build
//!
//! # Export every standard query to query_results/
//! hlvgraph query all
//!
//! # Plots for both color modes, or one annotator
//! hlvgraph visualize
//! hlvgraph visualize --mode range --annotator annotator3
//!
//! # Render one annotated word pair via RDF Grapher
//! hlvgraph inspect circled_mag_1856_590750.txt-21-18 circling_fic_1849_7230.txt-2441-6
//!
//! # Everything, reusing the graph file when present
//! hlvgraph run --pair w1,w2
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use hlvgraph_kg::features::query_engine::QueryKind;
use hlvgraph_kg::{
    load_graph, ColorMode, GraphBuildUseCase, KgConfig, KgPipeline, OxigraphStore, QueryService,
    RdfGrapherClient, VariationRange, VisualizationService,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hlvgraph")]
#[command(about = "Human label variation knowledge graph from DWUG judgments", long_about = None)]
struct Cli {
    /// YAML configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and write it as Turtle
    Build,

    /// Run SPARQL queries and export CSV files
    Query {
        #[command(subcommand)]
        query: QueryCommand,
    },

    /// Write the full and per-annotator plots
    Visualize {
        #[arg(short, long, value_enum, default_value_t = ModeArg::Both)]
        mode: ModeArg,

        /// Only this annotator (by label, e.g. annotator3)
        #[arg(short, long)]
        annotator: Option<String>,
    },

    /// Render the sub-graph of one annotated word pair
    Inspect { word1: String, word2: String },

    /// Build (or reuse) the graph, export queries, write plots
    Run {
        /// Rebuild even when the graph file exists
        #[arg(long)]
        rebuild: bool,

        /// Word pairs to render, as `word1,word2`
        #[arg(long = "pair", value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum QueryCommand {
    /// Standard suite
    All,
    /// Distinct numeric categories
    Categories,
    /// Annotation counts per category
    CategoryStats,
    /// Distinct / total label counts and range per annotation label
    NumLabels,
    /// Labels whose distinct category count is within bounds
    Variation {
        #[arg(long, default_value = "1")]
        min: u32,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Annotations of one annotator
    Annotator { name: String },
    PosTags,
    AnnotatedSentences,
    Annotators,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Distinct,
    Range,
    Both,
}

impl ModeArg {
    fn modes(self) -> Vec<ColorMode> {
        match self {
            ModeArg::Distinct => vec![ColorMode::Distinct],
            ModeArg::Range => vec![ColorMode::Range],
            ModeArg::Both => ColorMode::ALL.to_vec(),
        }
    }
}

fn parse_pair(value: &str) -> Result<(String, String), String> {
    match value.split_once(',') {
        Some((a, b)) if !a.is_empty() && !b.is_empty() => Ok((a.to_string(), b.to_string())),
        _ => Err(format!("expected 'word1,word2', got '{}'", value)),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = KgConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Build => {
            let pipeline = KgPipeline::from_config(config);
            let (_, report) = pipeline.build_and_save()?;
            report.log_summary();
        }
        Commands::Query { query } => {
            let store = load_graph(&config)?;
            run_query(&store, &config, query)?;
        }
        Commands::Visualize { mode, annotator } => {
            let store = load_graph(&config)?;
            let service = VisualizationService::new(&store, &config);
            match annotator {
                Some(name) => {
                    for mode in mode.modes() {
                        let path = service.annotator_plot(&name, mode)?;
                        info!(path = %path.display(), "annotator plot written");
                    }
                }
                None => {
                    service.run_all(&mode.modes())?;
                }
            }
        }
        Commands::Inspect { word1, word2 } => {
            let store = load_graph(&config)?;
            let renderer = RdfGrapherClient::new(&config.render)?;
            VisualizationService::new(&store, &config).inspect_instance(&word1, &word2, &renderer)?;
        }
        Commands::Run { rebuild, pairs } => {
            let pipeline = KgPipeline::from_config(config.clone());
            let store = pipeline.load_or_build(rebuild)?;

            QueryService::new(&store, config.output.query_dir.clone()).export_standard_suite()?;

            let service = VisualizationService::new(&store, &config);
            service.run_all(&ColorMode::ALL)?;

            if !pairs.is_empty() {
                let renderer = RdfGrapherClient::new(&config.render)?;
                for (word1, word2) in &pairs {
                    service.inspect_instance(word1, word2, &renderer)?;
                }
            }
        }
    }
    Ok(())
}

fn run_query(store: &OxigraphStore, config: &KgConfig, query: QueryCommand) -> anyhow::Result<()> {
    let service = QueryService::new(store, config.output.query_dir.clone());
    let kind = match query {
        QueryCommand::All => {
            let paths = service.export_standard_suite()?;
            info!(files = paths.len(), "standard queries exported");
            return Ok(());
        }
        QueryCommand::Categories => QueryKind::DistinctCategories,
        QueryCommand::CategoryStats => QueryKind::CategoryStats,
        QueryCommand::NumLabels => QueryKind::NumLabels,
        QueryCommand::Variation { min, max } => {
            if matches!(max, Some(max) if max < min) {
                bail!("--max must not be below --min");
            }
            QueryKind::Variation(VariationRange { min, max })
        }
        QueryCommand::Annotator { name } => QueryKind::AnnotationsPerAnnotator(name),
        QueryCommand::PosTags => QueryKind::PosTags,
        QueryCommand::AnnotatedSentences => QueryKind::AnnotatedSentences,
        QueryCommand::Annotators => QueryKind::Annotators,
    };
    service.export(&kind)?;
    Ok(())
}
