//! Chart-ready views over a dataset.
//!
//! These are the numbers a rendering sink needs to draw the bot vs user
//! charts. Nothing here chooses colors, fonts or layout.

use crate::analysis::aggregator::partition_by_actor;
use crate::models::{ActorComparison, CommentRecord, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One equal-width bin of a sentiment histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Sentiment score histogram over `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Scores outside `[0, 1]` (or NaN); counted but never binned.
    pub out_of_range: usize,
}

impl Histogram {
    /// Number of binned scores.
    pub fn binned(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Build a histogram of sentiment scores with `bins` equal-width bins.
///
/// Bins are half-open `[lower, upper)` except the last, which also holds
/// a score of exactly `1.0`.
pub fn sentiment_histogram<'a, I>(group: I, bins: usize) -> Histogram
where
    I: IntoIterator<Item = &'a CommentRecord>,
{
    if bins == 0 {
        return Histogram::default();
    }

    let edge = |i: usize| i as f64 / bins as f64;
    let mut histogram = Histogram {
        bins: (0..bins)
            .map(|i| HistogramBin {
                lower: edge(i),
                upper: edge(i + 1),
                count: 0,
            })
            .collect(),
        out_of_range: 0,
    };

    for record in group {
        if !record.score_in_range() {
            histogram.out_of_range += 1;
            continue;
        }
        let index = bin_index(&histogram.bins, record.sentiment_score);
        histogram.bins[index].count += 1;
    }

    histogram
}

/// Index of the bin whose `[lower, upper)` range holds `score`.
///
/// The scaled estimate can land one bin off near an edge; the stored edges
/// decide.
fn bin_index(bins: &[HistogramBin], score: f64) -> usize {
    let last = bins.len() - 1;
    let mut index = ((score * bins.len() as f64) as usize).min(last);
    while index > 0 && score < bins[index].lower {
        index -= 1;
    }
    while index < last && score >= bins[index].upper {
        index += 1;
    }
    index
}

/// Bot and user histograms built with the same bin layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramPair {
    pub bot: Histogram,
    pub user: Histogram,
}

pub fn sentiment_histograms(dataset: &Dataset, bins: usize) -> HistogramPair {
    let split = partition_by_actor(dataset);
    HistogramPair {
        bot: sentiment_histogram(split.bots.iter().copied(), bins),
        user: sentiment_histogram(split.users.iter().copied(), bins),
    }
}

/// Share of one sentiment label across the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub label: String,
    pub count: usize,
    /// Percentage of all records, in `[0, 100]`.
    pub percent: f64,
}

/// Per-label counts and percentages, most frequent first.
///
/// Ties are broken by label so the output is deterministic.
pub fn label_share(dataset: &Dataset) -> Vec<LabelShare> {
    let total = dataset.len();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in dataset {
        *counts.entry(record.sentiment_label.as_str()).or_default() += 1;
    }

    let mut shares: Vec<LabelShare> = counts
        .into_iter()
        .map(|(label, count)| LabelShare {
            label: label.to_string(),
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    shares
}

/// A bot/user pair of integer totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorTotals {
    pub bot: u64,
    pub user: u64,
}

/// Reply and like totals for the grouped bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementComparison {
    pub replies: ActorTotals,
    pub likes: ActorTotals,
}

pub fn engagement_comparison(comparison: &ActorComparison) -> EngagementComparison {
    EngagementComparison {
        replies: ActorTotals {
            bot: comparison.bot.total_replies,
            user: comparison.user.total_replies,
        },
        likes: ActorTotals {
            bot: comparison.bot.total_likes,
            user: comparison.user.total_likes,
        },
    }
}

/// A (comment length, sentiment score) point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub comment_length: u64,
    pub sentiment_score: f64,
}

impl From<&CommentRecord> for ScatterPoint {
    fn from(record: &CommentRecord) -> Self {
        Self {
            comment_length: record.comment_length,
            sentiment_score: record.sentiment_score,
        }
    }
}

/// Scatter points for one category, split by actor type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub category: String,
    pub bot: Vec<ScatterPoint>,
    pub user: Vec<ScatterPoint>,
}

pub fn category_scatter(dataset: &Dataset, category: &str) -> ScatterSeries {
    let split = partition_by_actor(dataset.iter().filter(|r| r.category == category));
    ScatterSeries {
        category: category.to_string(),
        bot: split.bots.into_iter().map(ScatterPoint::from).collect(),
        user: split.users.into_iter().map(ScatterPoint::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::compare_actors;

    fn create_test_record(is_bot: bool, score: f64, label: &str) -> CommentRecord {
        CommentRecord {
            is_bot,
            sentiment_score: score,
            sentiment_label: label.to_string(),
            reply_count: 2,
            like_count: 5,
            comment_length: 12,
            category: "tech".to_string(),
        }
    }

    #[test]
    fn test_histogram_bin_placement() {
        let records = vec![
            create_test_record(true, 0.0, "a"),
            create_test_record(true, 0.24, "a"),
            create_test_record(true, 0.25, "a"),
            create_test_record(true, 0.99, "a"),
            create_test_record(true, 1.0, "a"),
        ];

        let histogram = sentiment_histogram(&records, 4);

        let counts: Vec<_> = histogram.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 2]);
        assert_eq!(histogram.bins[3].upper, 1.0);
        assert_eq!(histogram.out_of_range, 0);
    }

    #[test]
    fn test_histogram_bins_agree_with_edges() {
        for bins in [3, 7, 10, 30] {
            for step in 0..=100 {
                let score = step as f64 / 100.0;
                let histogram = sentiment_histogram(&[create_test_record(true, score, "a")], bins);
                let bin = histogram
                    .bins
                    .iter()
                    .find(|b| b.count == 1)
                    .unwrap();
                let is_last = bin.upper == 1.0;
                assert!(bin.lower <= score, "{} below [{}, {})", score, bin.lower, bin.upper);
                assert!(
                    score < bin.upper || (is_last && score == 1.0),
                    "{} above [{}, {})",
                    score,
                    bin.lower,
                    bin.upper
                );
            }
        }

        let records = vec![
            create_test_record(true, 0.3, "a"),
            create_test_record(true, 0.6, "a"),
            create_test_record(true, 0.7, "a"),
        ];
        let histogram = sentiment_histogram(&records, 10);
        assert_eq!(histogram.bins[3].lower, 0.3);
        assert_eq!(histogram.bins[3].count, 1);
        assert_eq!(histogram.bins[6].count, 1);
        assert_eq!(histogram.bins[7].count, 1);
    }

    #[test]
    fn test_histogram_out_of_range() {
        let records = vec![
            create_test_record(false, -0.2, "a"),
            create_test_record(false, 1.5, "a"),
            create_test_record(false, f64::NAN, "a"),
            create_test_record(false, 0.5, "a"),
        ];

        let histogram = sentiment_histogram(&records, 30);

        assert_eq!(histogram.bins.len(), 30);
        assert_eq!(histogram.out_of_range, 3);
        assert_eq!(histogram.binned(), 1);
    }

    #[test]
    fn test_histogram_zero_bins() {
        let records = vec![create_test_record(true, 0.5, "a")];
        let histogram = sentiment_histogram(&records, 0);
        assert!(histogram.bins.is_empty());
    }

    #[test]
    fn test_sentiment_histograms_split() {
        let dataset = Dataset::new(vec![
            create_test_record(true, 0.1, "a"),
            create_test_record(false, 0.9, "a"),
            create_test_record(false, 0.8, "a"),
        ]);

        let pair = sentiment_histograms(&dataset, 10);
        assert_eq!(pair.bot.binned(), 1);
        assert_eq!(pair.user.binned(), 2);
    }

    #[test]
    fn test_label_share() {
        let dataset = Dataset::new(vec![
            create_test_record(true, 0.9, "positive"),
            create_test_record(false, 0.1, "negative"),
            create_test_record(false, 0.8, "positive"),
            create_test_record(false, 0.7, "positive"),
        ]);

        let shares = label_share(&dataset);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].label, "positive");
        assert_eq!(shares[0].count, 3);
        assert!((shares[0].percent - 75.0).abs() < 1e-9);
        let total: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_share_empty() {
        assert!(label_share(&Dataset::default()).is_empty());
    }

    #[test]
    fn test_engagement_comparison() {
        let dataset = Dataset::new(vec![
            create_test_record(true, 0.5, "a"),
            create_test_record(false, 0.5, "a"),
            create_test_record(false, 0.5, "a"),
        ]);

        let engagement = engagement_comparison(&compare_actors(&dataset));

        assert_eq!(engagement.replies, ActorTotals { bot: 2, user: 4 });
        assert_eq!(engagement.likes, ActorTotals { bot: 5, user: 10 });
    }

    #[test]
    fn test_category_scatter() {
        let mut other = create_test_record(true, 0.3, "a");
        other.category = "politics".to_string();
        let dataset = Dataset::new(vec![
            create_test_record(true, 0.4, "a"),
            other,
            create_test_record(false, 0.6, "a"),
        ]);

        let series = category_scatter(&dataset, "tech");
        assert_eq!(series.bot.len(), 1);
        assert_eq!(series.user.len(), 1);
        assert_eq!(series.bot[0].sentiment_score, 0.4);

        let missing = category_scatter(&dataset, "music");
        assert!(missing.bot.is_empty() && missing.user.is_empty());
    }
}
