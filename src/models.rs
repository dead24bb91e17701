//! Data models for comment analytics.
//!
//! This module contains the core data structures used throughout
//! the crate for representing comment records, datasets, and the
//! summaries computed over them.

use crate::analysis::{EngagementComparison, HistogramPair, LabelShare, ScatterSeries};
use crate::error::Notice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Which side of the actor-type split a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    /// Automated account
    Bot,
    /// Human account
    User,
}

impl ActorKind {
    /// Maps the actor-type flag onto a kind.
    pub fn from_flag(is_bot: bool) -> Self {
        if is_bot {
            ActorKind::Bot
        } else {
            ActorKind::User
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, ActorKind::Bot)
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKind::Bot => write!(f, "Bot"),
            ActorKind::User => write!(f, "User"),
        }
    }
}

/// Polarity of a sentiment label.
///
/// Labels are stored as free strings on the record because the raw
/// classifier codes (`LABEL_1`, `LABEL_0`) and their display forms
/// coexist until relabeling; this enum recognises both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Raw classifier code for this polarity.
    pub fn raw_code(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "LABEL_1",
            SentimentLabel::Negative => "LABEL_0",
        }
    }

    /// Default display label for this polarity.
    pub fn display_label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Recognise a raw code or a display label. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "label_1" | "positive" => Some(SentimentLabel::Positive),
            "label_0" | "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
        }
    }
}

/// A single comment observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Whether the comment was posted by an automated account.
    pub is_bot: bool,
    /// Classifier sentiment score, expected in `[0, 1]`.
    pub sentiment_score: f64,
    /// Sentiment label (raw code or display label).
    pub sentiment_label: String,
    /// Number of replies to the comment.
    pub reply_count: u64,
    /// Number of likes on the comment.
    pub like_count: u64,
    /// Comment length in characters.
    pub comment_length: u64,
    /// Topical group of the video the comment was posted under.
    pub category: String,
}

impl CommentRecord {
    pub fn actor(&self) -> ActorKind {
        ActorKind::from_flag(self.is_bot)
    }

    /// Returns true when the score lies in the expected `[0, 1]` range.
    pub fn score_in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.sentiment_score)
    }
}

/// An immutable, cheaply shareable sequence of records.
///
/// Cloning a dataset clones the `Arc`, not the records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Arc<[CommentRecord]>,
}

impl Dataset {
    pub fn new(records: Vec<CommentRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommentRecord> {
        self.records.iter()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for record in self.iter() {
            if !seen.iter().any(|c| c == &record.category) {
                seen.push(record.category.clone());
            }
        }
        seen
    }
}

impl From<Vec<CommentRecord>> for Dataset {
    fn from(records: Vec<CommentRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a CommentRecord;
    type IntoIter = std::slice::Iter<'a, CommentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Key used to select a partition cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub is_bot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl GroupKey {
    pub fn actor(is_bot: bool) -> Self {
        Self {
            is_bot,
            category: None,
        }
    }

    pub fn in_category(is_bot: bool, category: impl Into<String>) -> Self {
        Self {
            is_bot,
            category: Some(category.into()),
        }
    }

    pub fn matches(&self, record: &CommentRecord) -> bool {
        record.is_bot == self.is_bot
            && self
                .category
                .as_deref()
                .map_or(true, |c| record.category == c)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actor = ActorKind::from_flag(self.is_bot);
        match &self.category {
            Some(category) => write!(f, "{} / {}", actor, category),
            None => write!(f, "{}", actor),
        }
    }
}

/// Aggregate statistics over a group of records.
///
/// Means are `NaN` when `count == 0`. They serialize to `null` in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of records in the group.
    pub count: usize,
    /// Arithmetic mean of `sentiment_score`.
    #[serde(deserialize_with = "mean_or_nan")]
    pub mean_sentiment: f64,
    /// Frequency of each sentiment label.
    pub sentiment_distribution: BTreeMap<String, usize>,
    /// Sum of `like_count`.
    pub total_likes: u64,
    /// Sum of `reply_count`.
    pub total_replies: u64,
    /// Arithmetic mean of `comment_length`.
    #[serde(deserialize_with = "mean_or_nan")]
    pub mean_comment_length: f64,
}

/// Reads a mean written as `null` back as `NaN`.
fn mean_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Summary {
    /// Summary of a group with no records.
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean_sentiment: f64::NAN,
            sentiment_distribution: BTreeMap::new(),
            total_likes: 0,
            total_replies: 0,
            mean_comment_length: f64::NAN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Count for a single label, zero when absent.
    pub fn label_count(&self, label: &str) -> usize {
        self.sentiment_distribution.get(label).copied().unwrap_or(0)
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Bot and user summaries side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorComparison {
    pub bot: Summary,
    pub user: Summary,
}

impl ActorComparison {
    pub fn get(&self, actor: ActorKind) -> &Summary {
        match actor {
            ActorKind::Bot => &self.bot,
            ActorKind::User => &self.user,
        }
    }
}

/// Comparison for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub category: String,
    #[serde(flatten)]
    pub comparison: ActorComparison,
}

/// Metadata about the analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Where the dataset was loaded from.
    pub source: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Number of records in the dataset.
    pub records: usize,
    /// Number of bot records.
    pub bot_records: usize,
    /// Number of user records.
    pub user_records: usize,
    /// Histogram bin count used.
    pub histogram_bins: usize,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// Everything computed for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    #[serde(flatten)]
    pub comparison: CategoryComparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<ScatterSeries>,
}

/// The complete comparative analysis, ready for a rendering sink.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Bot vs user over the whole dataset.
    pub overall: ActorComparison,
    /// Share of each (relabeled) sentiment label.
    pub label_share: Vec<LabelShare>,
    /// Sentiment score histograms.
    pub histograms: HistogramPair,
    /// Reply and like totals.
    pub engagement: EngagementComparison,
    /// Per-category comparisons in the requested order.
    pub categories: Vec<CategoryReport>,
    /// Data-quality notices raised while building the report.
    pub notices: Vec<Notice>,
}

impl AnalysisReport {
    /// Notices that point at problems in the data itself.
    pub fn data_issues(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|n| n.is_data_issue())
    }
}
