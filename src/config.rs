//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.comment-insights.toml` files.

use crate::cli::OutputFormat;
use crate::models::SentimentLabel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".comment-insights.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Label relabeling settings.
    #[serde(default)]
    pub labels: LabelConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Treat data-quality notices as a failure (exit code 2).
    #[serde(default)]
    pub strict: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
            strict: false,
        }
    }
}

fn default_output() -> String {
    "comment_insights_report.md".to_string()
}

/// Dataset location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the comment CSV file.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Categories compared one by one, in report order.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Number of sentiment histogram bins.
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Include per-category scatter points in the report.
    #[serde(default = "default_true")]
    pub include_scatter: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            histogram_bins: default_histogram_bins(),
            include_scatter: true,
        }
    }
}

fn default_categories() -> Vec<String> {
    vec!["기술", "연예", "정치"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_histogram_bins() -> usize {
    30
}

fn default_true() -> bool {
    true
}

/// Mapping from raw classifier codes to display labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Labels not listed here are kept unchanged.
    #[serde(default = "default_label_map")]
    pub map: BTreeMap<String, String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            map: default_label_map(),
        }
    }
}

fn default_label_map() -> BTreeMap<String, String> {
    [SentimentLabel::Positive, SentimentLabel::Negative]
        .into_iter()
        .map(|label| {
            (
                label.raw_code().to_string(),
                label.display_label().to_string(),
            )
        })
        .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = Some(data.clone());
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(ref categories) = args.categories {
            self.analysis.categories = categories.clone();
        }
        if let Some(bins) = args.bins {
            self.analysis.histogram_bins = bins;
        }
        if args.no_scatter {
            self.analysis.include_scatter = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
        if args.strict {
            self.general.strict = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.histogram_bins, 30);
        assert_eq!(config.analysis.categories, vec!["기술", "연예", "정치"]);
        assert_eq!(config.labels.map.get("LABEL_1").map(String::as_str), Some("positive"));
        assert!(config.data.path.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.json"
format = "json"
strict = true

[data]
path = "comments.csv"

[analysis]
categories = ["기술", "연예", "정치"]
histogram_bins = 20

[labels.map]
LABEL_1 = "긍정"
LABEL_0 = "부정"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.json");
        assert_eq!(config.general.format, OutputFormat::Json);
        assert!(config.general.strict);
        assert_eq!(config.data.path, Some(PathBuf::from("comments.csv")));
        assert_eq!(config.analysis.categories, vec!["기술", "연예", "정치"]);
        assert_eq!(config.analysis.histogram_bins, 20);
        assert!(config.analysis.include_scatter);
        assert_eq!(config.labels.map.get("LABEL_0").map(String::as_str), Some("부정"));
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        args.categories = Some(vec!["music".to_string()]);
        args.bins = Some(10);
        args.strict = true;

        config.merge_with_args(&args);

        assert_eq!(config.data.path, Some(PathBuf::from("comments.csv")));
        assert_eq!(config.analysis.categories, vec!["music"]);
        assert_eq!(config.analysis.histogram_bins, 10);
        assert!(config.general.strict);
        // Not given on the command line: file value kept
        assert_eq!(config.general.output, "comment_insights_report.md");
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[analysis]\nhistogram_bins = 5\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.analysis.histogram_bins, 5);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("LABEL_1"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.analysis.histogram_bins, 30);
    }
}
