//! Comparative aggregation over comment datasets.
//!
//! Every function here is pure: it reads a dataset or a group of records
//! and returns fresh values. Empty groups produce empty summaries with NaN
//! means instead of failing.

use crate::error::Notice;
use crate::models::{
    ActorComparison, CategoryComparison, CommentRecord, Dataset, GroupKey, Summary,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Records split by actor type, each side in dataset order.
#[derive(Debug, Clone, Default)]
pub struct ActorSplit<'a> {
    pub bots: Vec<&'a CommentRecord>,
    pub users: Vec<&'a CommentRecord>,
}

/// Split records into those matching `predicate` and the rest.
///
/// Both sides keep the relative order of the input and together hold
/// every record exactly once.
pub fn partition<'a, I, P>(
    records: I,
    mut predicate: P,
) -> (Vec<&'a CommentRecord>, Vec<&'a CommentRecord>)
where
    I: IntoIterator<Item = &'a CommentRecord>,
    P: FnMut(&CommentRecord) -> bool,
{
    records.into_iter().partition(|r| predicate(*r))
}

/// Split records by the actor-type flag.
pub fn partition_by_actor<'a, I>(records: I) -> ActorSplit<'a>
where
    I: IntoIterator<Item = &'a CommentRecord>,
{
    let (bots, users) = partition(records, |r| r.is_bot);
    ActorSplit { bots, users }
}

/// Compute summary statistics for a group of records.
pub fn summarize<'a, I>(group: I) -> Summary
where
    I: IntoIterator<Item = &'a CommentRecord>,
{
    let mut count = 0usize;
    let mut sentiment = CompensatedSum::default();
    let mut length = CompensatedSum::default();
    let mut total_likes = 0u64;
    let mut total_replies = 0u64;
    let mut sentiment_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for record in group {
        count += 1;
        sentiment.add(record.sentiment_score);
        length.add(record.comment_length as f64);
        total_likes = total_likes.saturating_add(record.like_count);
        total_replies = total_replies.saturating_add(record.reply_count);
        *sentiment_distribution
            .entry(record.sentiment_label.clone())
            .or_insert(0) += 1;
    }

    if count == 0 {
        return Summary::empty();
    }

    Summary {
        count,
        mean_sentiment: sentiment.total() / count as f64,
        sentiment_distribution,
        total_likes,
        total_replies,
        mean_comment_length: length.total() / count as f64,
    }
}

/// Summarize the cell selected by `key`.
pub fn summarize_group(dataset: &Dataset, key: &GroupKey) -> Summary {
    let summary = summarize(dataset.iter().filter(|r| key.matches(r)));
    if summary.is_empty() {
        debug!("Group {} is empty", key);
    }
    summary
}

/// Summarize bots and users across the whole dataset.
pub fn compare_actors(dataset: &Dataset) -> ActorComparison {
    let split = partition_by_actor(dataset);
    ActorComparison {
        bot: summarize(split.bots.iter().copied()),
        user: summarize(split.users.iter().copied()),
    }
}

/// Summarize bots and users within each requested category.
///
/// Output follows the order of `categories`. Categories with no rows get
/// empty summaries on both sides.
pub fn summarize_by_category<S: AsRef<str>>(
    dataset: &Dataset,
    categories: &[S],
) -> Vec<CategoryComparison> {
    categories
        .iter()
        .map(|category| {
            let category = category.as_ref();
            let split = partition_by_actor(dataset.iter().filter(|r| r.category == category));
            debug!(
                "Category {}: {} bot, {} user records",
                category,
                split.bots.len(),
                split.users.len()
            );
            CategoryComparison {
                category: category.to_string(),
                comparison: ActorComparison {
                    bot: summarize(split.bots.iter().copied()),
                    user: summarize(split.users.iter().copied()),
                },
            }
        })
        .collect()
}

/// Empty-group notices for every empty cell of a per-category comparison.
pub fn empty_group_notices(comparisons: &[CategoryComparison]) -> Vec<Notice> {
    comparisons
        .iter()
        .flat_map(|entry| empty_sides(&entry.comparison, Some(&entry.category)))
        .collect()
}

/// Empty-group notices for the overall bot/user split.
pub fn actor_empty_notices(comparison: &ActorComparison) -> Vec<Notice> {
    empty_sides(comparison, None)
}

fn empty_sides(comparison: &ActorComparison, category: Option<&String>) -> Vec<Notice> {
    let mut notices = Vec::new();

    for (is_bot, summary) in [(true, &comparison.bot), (false, &comparison.user)] {
        if summary.is_empty() {
            let group = match category {
                Some(category) => GroupKey::in_category(is_bot, category.clone()),
                None => GroupKey::actor(is_bot),
            };
            let notice = Notice::EmptyGroup { group };
            warn!("{}", notice);
            notices.push(notice);
        }
    }

    notices
}

/// Replace labels found in `label_map`, leaving every other label as-is.
///
/// Each record is substituted at most once, so a display label that is
/// also a key of the map is not rewritten a second time.
pub fn relabel(dataset: &Dataset, label_map: &BTreeMap<String, String>) -> Dataset {
    relabel_with_notices(dataset, label_map).0
}

/// Same as [`relabel`], also reporting labels that had no mapping.
pub fn relabel_with_notices(
    dataset: &Dataset,
    label_map: &BTreeMap<String, String>,
) -> (Dataset, Vec<Notice>) {
    let mut unmapped: BTreeMap<String, usize> = BTreeMap::new();

    let records: Vec<CommentRecord> = dataset
        .iter()
        .map(|record| {
            let mut record = record.clone();
            match label_map.get(&record.sentiment_label) {
                Some(display) => record.sentiment_label = display.clone(),
                None => *unmapped.entry(record.sentiment_label.clone()).or_insert(0) += 1,
            }
            record
        })
        .collect();

    let notices: Vec<Notice> = unmapped
        .into_iter()
        .map(|(label, occurrences)| {
            let notice = Notice::UnmappedLabel { label, occurrences };
            info!("{}", notice);
            notice
        })
        .collect();

    (Dataset::new(records), notices)
}

/// Out-of-range notices for scores outside `[0, 1]`.
pub fn check_scores(dataset: &Dataset) -> Vec<Notice> {
    dataset
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.score_in_range())
        .map(|(index, r)| {
            let notice = Notice::OutOfRange {
                index,
                score: r.sentiment_score,
            };
            warn!("{}", notice);
            notice
        })
        .collect()
}

/// Neumaier summation; keeps float totals stable under reordering.
#[derive(Debug, Default, Clone, Copy)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}
