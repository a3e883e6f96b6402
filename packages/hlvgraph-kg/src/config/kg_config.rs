//! Versioned YAML configuration for a run

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use crate::shared::utils::WordKeyScheme;

pub const ENV_DATA_PATH: &str = "HLVGRAPH_DATA_PATH";
pub const ENV_DATASET: &str = "HLVGRAPH_DATASET";
pub const ENV_LANGUAGE: &str = "HLVGRAPH_LANGUAGE";

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Top-level run configuration (YAML schema v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KgConfig {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Directory holding one subdirectory per lexical item
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Dataset name; names the dataset node and every output file
    #[serde(default = "default_dataset_name")]
    pub dataset_name: String,

    /// Language tag for sentence texts, surface forms and comments
    #[serde(default = "default_language")]
    pub language: String,

    /// Explicit item list; `None` means every subdirectory of `data_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexical_items: Option<Vec<String>>,

    #[serde(default)]
    pub word_key_scheme: WordKeyScheme,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

/// Output directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputConfig {
    pub graph_dir: PathBuf,
    pub query_dir: PathBuf,
    pub resource_dir: PathBuf,
    pub visualization_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graph_dir: PathBuf::from("./graphs"),
            query_dir: PathBuf::from("./query_results"),
            resource_dir: PathBuf::from("./resources"),
            visualization_dir: PathBuf::from("./visualizations"),
        }
    }
}

/// Force-directed layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LayoutConfig {
    pub iterations: usize,
    /// Optimal distance between nodes (`k`)
    pub optimal_distance: f64,
    /// Positions are rescaled to `[-scale, scale]`
    pub scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            optimal_distance: 0.8,
            scale: 2000.0,
        }
    }
}

/// Remote RDF Grapher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RenderConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://www.ldf.fi/service/rdf-grapher".to_string(),
            timeout_secs: 30,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./dwug_en/data")
}

fn default_dataset_name() -> String {
    "dwug_en".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for KgConfig {
    fn default() -> Self {
        Self {
            version: 1,
            data_path: default_data_path(),
            dataset_name: default_dataset_name(),
            language: default_language(),
            lexical_items: None,
            word_key_scheme: WordKeyScheme::default(),
            output: OutputConfig::default(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl KgConfig {
    /// Resolve the configuration for a run: YAML file (or defaults), then
    /// environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: KgConfig = serde_yaml::from_str(content)?;

        if !SUPPORTED_VERSIONS.contains(&config.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (the environment in production)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENV_DATA_PATH) {
            debug!(data_path = %path, "data path overridden from environment");
            self.data_path = PathBuf::from(path);
        }
        if let Some(name) = lookup(ENV_DATASET) {
            debug!(dataset = %name, "dataset name overridden from environment");
            self.dataset_name = name;
        }
        if let Some(lang) = lookup(ENV_LANGUAGE) {
            debug!(language = %lang, "language overridden from environment");
            self.language = lang;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.dataset_name.is_empty()
            || !self
                .dataset_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(ConfigError::invalid(
                "dataset_name",
                format!(
                    "'{}' must be non-empty and use only ASCII letters, digits, '_', '-' or '.'",
                    self.dataset_name
                ),
            ));
        }

        if !is_language_tag(&self.language) {
            return Err(ConfigError::invalid(
                "language",
                format!("'{}' is not a language tag (e.g. 'en', 'de-AT')", self.language),
            ));
        }

        if let Some(items) = &self.lexical_items {
            if let Some(bad) = items
                .iter()
                .find(|item| item.is_empty() || item.contains(['/', '\\']) || *item == "..")
            {
                return Err(ConfigError::invalid(
                    "lexical_items",
                    format!("'{}' is not a directory name", bad),
                ));
            }
        }

        if self.layout.iterations == 0 || self.layout.iterations > 10_000 {
            return Err(ConfigError::range_with_hint(
                "layout.iterations",
                self.layout.iterations,
                1,
                10_000,
                "Layout iterations must be finite",
            ));
        }

        if !(self.layout.optimal_distance.is_finite() && self.layout.optimal_distance > 0.0) {
            return Err(ConfigError::invalid(
                "layout.optimal_distance",
                format!("must be a positive number, got {}", self.layout.optimal_distance),
            ));
        }

        if !(self.layout.scale.is_finite() && self.layout.scale > 0.0) {
            return Err(ConfigError::invalid(
                "layout.scale",
                format!("must be a positive number, got {}", self.layout.scale),
            ));
        }

        if !(self.render.endpoint.starts_with("http://")
            || self.render.endpoint.starts_with("https://"))
        {
            return Err(ConfigError::invalid(
                "render.endpoint",
                format!("'{}' is not an http(s) URL", self.render.endpoint),
            ));
        }

        if self.render.timeout_secs == 0 || self.render.timeout_secs > 600 {
            return Err(ConfigError::range_with_hint(
                "render.timeout_secs",
                self.render.timeout_secs,
                1,
                600,
                "Rendering requests need a bounded timeout",
            ));
        }

        Ok(())
    }

    /// `{graph_dir}/{dataset_name}.ttl`
    pub fn graph_path(&self) -> PathBuf {
        self.output
            .graph_dir
            .join(format!("{}.ttl", self.dataset_name))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.output.resource_dir.clone()
    }
}

fn is_language_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag.split('-').all(|part| {
            !part.is_empty() && part.len() <= 8 && part.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = KgConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.graph_path(), PathBuf::from("./graphs/dwug_en.ttl"));
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = KgConfig::from_yaml_str("version: 1\n").unwrap();
        assert_eq!(config, KgConfig::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
version: 1
data_path: /data/dwug_de/data
dataset_name: dwug_de
language: de
lexical_items: [Abgesang, Fuß]
word_key_scheme: offsets
layout:
  iterations: 10
"#;
        let config = KgConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/data/dwug_de/data"));
        assert_eq!(config.language, "de");
        assert_eq!(config.word_key_scheme, WordKeyScheme::Offsets);
        assert_eq!(config.layout.iterations, 10);
        assert_eq!(config.layout.scale, 2000.0);
        assert_eq!(
            config.lexical_items,
            Some(vec!["Abgesang".to_string(), "Fuß".to_string()])
        );
    }

    #[test]
    fn test_missing_version_rejected() {
        let err = KgConfig::from_yaml_str("dataset_name: x\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let err = KgConfig::from_yaml_str("version: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = KgConfig::from_yaml_str("version: 1\ndatset_name: typo\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_DATA_PATH, "/tmp/data"), (ENV_LANGUAGE, "sv")]
            .into_iter()
            .collect();
        let config = KgConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.data_path, PathBuf::from("/tmp/data"));
        assert_eq!(config.language, "sv");
        assert_eq!(config.dataset_name, "dwug_en");
    }

    #[test]
    fn test_validation_errors() {
        let mut config = KgConfig::default();
        config.dataset_name = "bad name".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = KgConfig::default();
        config.language = "".into();
        assert!(config.validate().is_err());

        let mut config = KgConfig::default();
        config.layout.iterations = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));

        let mut config = KgConfig::default();
        config.render.endpoint = "ftp://x".into();
        assert!(config.validate().is_err());

        let mut config = KgConfig::default();
        config.lexical_items = Some(vec!["../etc".into()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = KgConfig::default();
        config.language = "de".into();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(KgConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
