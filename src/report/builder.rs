//! Assembles an [`AnalysisReport`] from a loaded dataset.

use crate::analysis::{
    actor_empty_notices, category_scatter, check_scores, compare_actors, empty_group_notices, engagement_comparison,
    label_share, relabel_with_notices, sentiment_histograms, summarize_by_category,
};
use crate::config::Config;
use crate::models::{AnalysisReport, CategoryReport, Dataset, ReportMetadata};
use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// What to compute for a report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub categories: Vec<String>,
    pub histogram_bins: usize,
    pub label_map: BTreeMap<String, String>,
    pub include_scatter: bool,
}

impl From<&Config> for ReportOptions {
    fn from(config: &Config) -> Self {
        Self {
            categories: config.analysis.categories.clone(),
            histogram_bins: config.analysis.histogram_bins,
            label_map: config.labels.map.clone(),
            include_scatter: config.analysis.include_scatter,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Run every aggregation over `dataset` and collect the results.
///
/// The dataset is relabeled once up front; all later views see display
/// labels. Notices are gathered in the order: out-of-range scores,
/// unmapped labels, empty overall groups, empty category groups.
pub fn build_report(dataset: &Dataset, options: &ReportOptions, source: &str) -> AnalysisReport {
    let start_time = Instant::now();

    let mut notices = check_scores(dataset);

    let (dataset, unmapped) = relabel_with_notices(dataset, &options.label_map);
    notices.extend(unmapped);

    let overall = compare_actors(&dataset);
    debug!(
        "Overall: {} bot, {} user records",
        overall.bot.count, overall.user.count
    );
    notices.extend(actor_empty_notices(&overall));

    let comparisons = summarize_by_category(&dataset, &options.categories);
    notices.extend(empty_group_notices(&comparisons));

    let categories: Vec<CategoryReport> = comparisons
        .into_iter()
        .map(|comparison| {
            let scatter = options
                .include_scatter
                .then(|| category_scatter(&dataset, &comparison.category));
            CategoryReport {
                comparison,
                scatter,
            }
        })
        .collect();

    let metadata = ReportMetadata {
        source: source.to_string(),
        analysis_date: Utc::now(),
        records: dataset.len(),
        bot_records: overall.bot.count,
        user_records: overall.user.count,
        histogram_bins: options.histogram_bins,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    info!(
        "Analyzed {} records across {} categories ({} notices)",
        metadata.records,
        categories.len(),
        notices.len()
    );

    AnalysisReport {
        metadata,
        engagement: engagement_comparison(&overall),
        label_share: label_share(&dataset),
        histograms: sentiment_histograms(&dataset, options.histogram_bins),
        overall,
        categories,
        notices,
    }
}
