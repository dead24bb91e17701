//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Comment Insights - bot vs human comment analytics
///
/// Loads a comment dataset and compares automated and human accounts:
/// sentiment distribution, label share, engagement totals, and
/// per-category sentiment and comment length.
///
/// Examples:
///   comment-insights --data comments.csv
///   comment-insights --data comments.csv --format json --output charts.json
///   comment-insights --data comments.csv --categories 기술,정치 --bins 20
///   comment-insights --data comments.csv --strict
///   comment-insights --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Comment CSV file to analyze
    ///
    /// Expected columns: bot, sentiment_score, sentiment_label, Reply,
    /// Likes, comment_length, Class. Can also be set in the config file.
    #[arg(short, long, value_name = "FILE", env = "COMMENT_INSIGHTS_DATA")]
    pub data: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Categories to compare, in order (comma-separated)
    ///
    /// Example: --categories 기술,연예,정치
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    /// Number of sentiment histogram bins
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<usize>,

    /// Leave per-category scatter points out of the report
    #[arg(long)]
    pub no_scatter: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .comment-insights.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when data-quality notices are raised
    ///
    /// Out-of-range sentiment scores and unmapped labels count;
    /// empty category groups do not.
    #[arg(long)]
    pub strict: bool,

    /// Generate a default .comment-insights.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format (chart-ready data)
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(bins) = self.bins {
            if bins == 0 {
                return Err("Histogram bins must be at least 1".to_string());
            }
        }

        if let Some(ref categories) = self.categories {
            if categories.iter().any(|c| c.trim().is_empty()) {
                return Err("Category names must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Data file does not exist: {}", data.display()));
            }
            if !data.is_file() {
                return Err(format!("Data path is not a file: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Build the log filter. `directives` (the `RUST_LOG` value) wins over
    /// `--verbose`/`--quiet` when present.
    pub fn log_filter(&self, directives: Option<&str>) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.log_level()).into())
            .parse_lossy(directives.unwrap_or_default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            data: Some(PathBuf::from("comments.csv")),
            output: None,
            format: None,
            categories: None,
            bins: None,
            no_scatter: false,
            config: None,
            verbose: false,
            quiet: false,
            strict: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "comment-insights",
            "--data",
            "comments.csv",
            "--categories",
            "tech,politics",
            "--format",
            "json",
            "--bins",
            "20",
        ])
        .unwrap();

        assert_eq!(args.data, Some(PathBuf::from("comments.csv")));
        assert_eq!(
            args.categories,
            Some(vec!["tech".to_string(), "politics".to_string()])
        );
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.bins, Some(20));
    }

    #[test]
    fn test_validation_zero_bins() {
        let mut args = make_args();
        args.data = None;
        args.bins = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_data_file() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("definitely/missing.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_existing_data_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.data = Some(file.path().to_path_buf());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.data = None;
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_filter() {
        let mut args = make_args();
        args.verbose = true;
        assert_eq!(args.log_filter(None).max_level_hint(), Some(LevelFilter::DEBUG));

        args.quiet = true;
        assert_eq!(args.log_filter(None).max_level_hint(), Some(LevelFilter::ERROR));

        assert_eq!(
            args.log_filter(Some("comment_insights=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
