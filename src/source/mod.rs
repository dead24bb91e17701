//! Dataset sources.
//!
//! The aggregation code never reads files itself; it is handed a
//! [`Dataset`] by a [`DataSource`]. The CSV source understands the column
//! layout of the exported comment sheet.

use crate::error::SourceError;
use crate::models::{CommentRecord, Dataset};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Anything that can supply a parsed dataset.
pub trait DataSource {
    fn load(&self) -> Result<Dataset, SourceError>;

    /// Human-readable origin, used in report metadata.
    fn describe(&self) -> String;
}

/// One CSV row as exported by the comment collection sheet.
#[derive(Debug, Deserialize)]
struct CsvRow {
    bot: String,
    sentiment_score: f64,
    sentiment_label: String,
    #[serde(rename = "Reply")]
    reply: u64,
    #[serde(rename = "Likes")]
    likes: u64,
    comment_length: u64,
    #[serde(rename = "Class")]
    class: String,
}

/// Reads a dataset from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse records from any reader carrying CSV with a header row.
    pub fn read_from<R: Read>(reader: R) -> Result<Dataset, SourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let row = result?;
            // Header is line 1; data rows start at 2
            let is_bot = parse_bot_flag(&row.bot).ok_or_else(|| SourceError::InvalidBotFlag {
                row: index + 2,
                value: row.bot.clone(),
            })?;

            records.push(CommentRecord {
                is_bot,
                sentiment_score: row.sentiment_score,
                sentiment_label: row.sentiment_label,
                reply_count: row.reply,
                like_count: row.likes,
                comment_length: row.comment_length,
                category: row.class,
            });
        }

        debug!("Parsed {} CSV rows", records.len());
        Ok(Dataset::new(records))
    }
}

impl DataSource for CsvSource {
    fn load(&self) -> Result<Dataset, SourceError> {
        info!("Loading dataset from: {}", self.path.display());
        let file = File::open(&self.path)?;
        let dataset = Self::read_from(BufReader::new(file))?;
        info!("Loaded {} records", dataset.len());
        Ok(dataset)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Accepts `0`/`1` (the sheet's encoding) and `true`/`false`.
fn parse_bot_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
bot,sentiment_score,sentiment_label,Reply,Likes,comment_length,Class
1,0.2,LABEL_0,0,3,41,tech
0,0.8,LABEL_1,2,10,12,politics
true,0.6,LABEL_1,1,0,87,tech
";

    #[test]
    fn test_read_from_maps_columns() {
        let dataset = CsvSource::read_from(SAMPLE.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        let first = &dataset.records()[0];
        assert!(first.is_bot);
        assert_eq!(first.sentiment_label, "LABEL_0");
        assert_eq!(first.like_count, 3);
        assert_eq!(first.comment_length, 41);
        assert_eq!(first.category, "tech");

        let second = &dataset.records()[1];
        assert!(!second.is_bot);
        assert_eq!(second.reply_count, 2);
        assert!(dataset.records()[2].is_bot);
    }

    #[test]
    fn test_read_from_ignores_extra_columns() {
        let csv = "\
comment,bot,sentiment_score,sentiment_label,Reply,Likes,comment_length,Class
hello,0,0.5,LABEL_1,0,0,5,music
";
        let dataset = CsvSource::read_from(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].category, "music");
    }

    #[test]
    fn test_invalid_bot_flag() {
        let csv = "\
bot,sentiment_score,sentiment_label,Reply,Likes,comment_length,Class
maybe,0.5,LABEL_1,0,0,5,tech
";
        let err = CsvSource::read_from(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidBotFlag { row: 2, .. }));
    }

    #[test]
    fn test_non_numeric_score_is_csv_error() {
        let csv = "\
bot,sentiment_score,sentiment_label,Reply,Likes,comment_length,Class
1,high,LABEL_1,0,0,5,tech
";
        let err = CsvSource::read_from(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Csv(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvSource::new(file.path());
        let dataset = source.load().unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[test]
    fn test_load_sample_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_comments.csv");
        let dataset = CsvSource::new(path).load().unwrap();

        assert_eq!(dataset.len(), 10);
        assert_eq!(dataset.iter().filter(|r| r.is_bot).count(), 4);
        assert_eq!(
            dataset.categories(),
            vec!["기술", "연예", "정치"]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let source = CsvSource::new("does/not/exist.csv");
        assert!(matches!(source.load(), Err(SourceError::Io(_))));
    }

    #[test]
    fn test_parse_bot_flag() {
        assert_eq!(parse_bot_flag("1"), Some(true));
        assert_eq!(parse_bot_flag(" FALSE "), Some(false));
        assert_eq!(parse_bot_flag("0.0"), Some(false));
        assert_eq!(parse_bot_flag("2"), None);
    }
}
