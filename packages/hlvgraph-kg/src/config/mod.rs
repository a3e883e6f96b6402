//! Run configuration
//!
//! One YAML document (schema `version: 1`) describes where the TSV data lives,
//! which dataset and language tag to use, where outputs go, and the layout and
//! rendering parameters. Three environment variables can override the data
//! location afterwards:
//!
//! - `HLVGRAPH_DATA_PATH`
//! - `HLVGRAPH_DATASET`
//! - `HLVGRAPH_LANGUAGE`
//!
//! ```yaml
//! version: 1
//! data_path: ./dwug_en/data
//! dataset_name: dwug_en
//! language: en
//! word_key_scheme: sentence_id
//! layout:
//!   iterations: 50
//! ```

pub mod error;
pub mod kg_config;

pub use error::{ConfigError, ConfigResult};
pub use kg_config::{
    KgConfig, LayoutConfig, OutputConfig, RenderConfig, ENV_DATASET, ENV_DATA_PATH, ENV_LANGUAGE,
};
