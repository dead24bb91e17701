//! Comment Insights - bot vs human comment analytics CLI
//!
//! Loads a comment dataset, compares automated and human accounts,
//! and writes a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing data, unreadable CSV, bad config, etc.)
//!   2 - Data-quality notices raised with --strict

use anyhow::{Context, Result};
use comment_insights::cli::{Args, OutputFormat};
use comment_insights::config::{Config, CONFIG_FILE_NAME};
use comment_insights::report::{self, ReportOptions};
use comment_insights::source::{CsvSource, DataSource};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Comment Insights v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_analysis(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default config file.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the data path, categories, and label mapping.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(args.log_filter(rust_log.as_deref()))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete analysis workflow. Returns exit code (0 or 2).
fn run_analysis(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let data_path = config.data.path.clone().context(
        "No dataset given. Pass --data FILE or set [data] path in the config file",
    )?;

    // Step 1: Load the dataset once; everything downstream borrows it
    if !args.quiet {
        println!("📥 Loading dataset: {}", data_path.display());
    }
    let source = CsvSource::new(&data_path);
    let dataset = source
        .load()
        .with_context(|| format!("Failed to load dataset from {}", data_path.display()))?;

    if dataset.is_empty() {
        warn!("Dataset is empty; all means will be reported as n/a");
    }

    // Step 2: Aggregate
    if !args.quiet {
        println!("🔬 Comparing bot and user comments...");
        println!("   Categories: {}", config.analysis.categories.join(", "));
    }
    let options = ReportOptions::from(&config);
    let analysis = report::build_report(&dataset, &options, &source.describe());

    // Step 3: Render and save
    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&analysis)?,
        OutputFormat::Markdown => report::generate_markdown_report(&analysis),
    };

    let output_path = Path::new(&config.general.output);
    report::write_report(&output, output_path)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if !args.quiet {
        println!("\n📊 Analysis Summary:");
        println!(
            "   Records: {} ({} bot, {} user)",
            analysis.metadata.records,
            analysis.metadata.bot_records,
            analysis.metadata.user_records
        );
        println!("   Notices: {}", analysis.notices.len());
        println!(
            "\n✅ Analysis complete! Report saved to: {}",
            output_path.display()
        );
    }

    let data_issues = analysis.data_issues().count();
    if config.general.strict && data_issues > 0 {
        eprintln!(
            "\n⛔ {} data-quality notice(s) raised. Failing (exit code 2).",
            data_issues
        );
        return Ok(2);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
