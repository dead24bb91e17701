//! Comment Insights - bot vs human comment analytics.
//!
//! Computes grouped statistics over an immutable comment dataset,
//! split by actor type (bot or user) and optionally by category, and
//! turns them into chart-ready data and Markdown/JSON reports.
//!
//! ```no_run
//! use comment_insights::analysis::{partition_by_actor, summarize};
//! use comment_insights::source::{CsvSource, DataSource};
//!
//! let dataset = CsvSource::new("comments.csv").load()?;
//! let split = partition_by_actor(&dataset);
//! let bots = summarize(split.bots.iter().copied());
//! println!("bot mean sentiment: {}", bots.mean_sentiment);
//! # Ok::<(), comment_insights::error::SourceError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod source;

pub use error::{Notice, SourceError};
pub use models::{CommentRecord, Dataset, GroupKey, Summary};
