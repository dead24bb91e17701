//! Markdown and JSON report generation.
//!
//! Markdown output is a set of plain tables; the JSON output carries the
//! full chart-ready data for an external renderer.

use crate::analysis::{EngagementComparison, HistogramPair, LabelShare};
use crate::error::Notice;
use crate::models::{ActorComparison, AnalysisReport, CategoryReport, ReportMetadata, Summary};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Comment Insights Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_overall_section(&report.overall));
    output.push_str(&generate_histogram_section(&report.histograms));
    output.push_str(&generate_label_share_section(&report.label_share));
    output.push_str(&generate_engagement_section(&report.engagement));
    output.push_str(&generate_categories_section(&report.categories));
    output.push_str(&generate_notices_section(&report.notices));
    output.push_str(&generate_footer());

    output
}

/// Format a mean, showing `n/a` for empty groups.
fn format_mean(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.*}", precision, value)
    }
}

/// GitHub heading slug: lowercase, spaces become `-`, punctuation other
/// than `-` and `_` is dropped.
fn anchor(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Headings rendered before the category headings, in document order.
const HEADINGS_BEFORE_CATEGORIES: [&str; 8] = [
    "Table of Contents",
    "Metadata",
    "Bot vs User",
    "Sentiment Labels",
    "Sentiment Score Distribution",
    "Sentiment Label Share",
    "Replies and Likes",
    "By Category",
];

/// Anchors of the category headings. A slug already taken gets a `-N`
/// suffix, as GitHub numbers repeated headings.
fn category_anchors(categories: &[CategoryReport]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HEADINGS_BEFORE_CATEGORIES
        .iter()
        .map(|heading| (anchor(heading), 0))
        .collect();

    categories
        .iter()
        .map(|entry| {
            let slug = anchor(&entry.comparison.category);
            match seen.get_mut(&slug) {
                Some(repeats) => {
                    *repeats += 1;
                    format!("{}-{}", slug, repeats)
                }
                None => {
                    seen.insert(slug.clone(), 0);
                    slug
                }
            }
        })
        .collect()
}

/// Escape a value placed in a table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records:** {} ({} bot, {} user)\n",
        metadata.records, metadata.bot_records, metadata.user_records
    ));
    section.push_str(&format!(
        "- **Histogram Bins:** {}\n",
        metadata.histogram_bins
    ));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &AnalysisReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Bot vs User](#bot-vs-user)\n");
    toc.push_str("- [Sentiment Score Distribution](#sentiment-score-distribution)\n");
    toc.push_str("- [Sentiment Label Share](#sentiment-label-share)\n");
    toc.push_str("- [Replies and Likes](#replies-and-likes)\n");
    toc.push_str("- [By Category](#by-category)\n");

    for (entry, slug) in report
        .categories
        .iter()
        .zip(category_anchors(&report.categories))
    {
        toc.push_str(&format!("  - [{}](#{})\n", entry.comparison.category, slug));
    }

    if !report.notices.is_empty() {
        toc.push_str("- [Data Quality Notices](#data-quality-notices)\n");
    }

    toc.push('\n');

    toc
}

/// Rows shared by the overall and per-category comparison tables.
fn comparison_table(comparison: &ActorComparison) -> String {
    let mut table = String::new();

    table.push_str("| Metric | Bot | User |\n");
    table.push_str("|:---|:---:|:---:|\n");

    let rows: [(&str, fn(&Summary) -> String); 5] = [
        ("Comments", |s: &Summary| s.count.to_string()),
        ("Mean Sentiment", |s: &Summary| format_mean(s.mean_sentiment, 3)),
        ("Mean Comment Length", |s: &Summary| format_mean(s.mean_comment_length, 1)),
        ("Total Likes", |s: &Summary| s.total_likes.to_string()),
        ("Total Replies", |s: &Summary| s.total_replies.to_string()),
    ];

    for (name, value) in rows {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            name,
            value(&comparison.bot),
            value(&comparison.user)
        ));
    }
    table.push('\n');

    table
}

/// Generate the overall bot vs user section.
fn generate_overall_section(overall: &ActorComparison) -> String {
    let mut section = String::new();

    section.push_str("## Bot vs User\n\n");
    section.push_str(&comparison_table(overall));

    // Label breakdown per actor
    let mut labels: Vec<&String> = overall
        .bot
        .sentiment_distribution
        .keys()
        .chain(overall.user.sentiment_distribution.keys())
        .collect();
    labels.sort();
    labels.dedup();

    if !labels.is_empty() {
        section.push_str("### Sentiment Labels\n\n");
        section.push_str("| Label | Bot | User |\n");
        section.push_str("|:---|:---:|:---:|\n");
        for label in labels {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(label),
                overall.bot.label_count(label),
                overall.user.label_count(label)
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the histogram section. Bins empty on both sides are skipped.
fn generate_histogram_section(histograms: &HistogramPair) -> String {
    let mut section = String::new();

    section.push_str("## Sentiment Score Distribution\n\n");

    let rows: Vec<String> = histograms
        .bot
        .bins
        .iter()
        .zip(histograms.user.bins.iter())
        .filter(|(bot, user)| bot.count > 0 || user.count > 0)
        .map(|(bot, user)| {
            format!(
                "| {:.3} - {:.3} | {} | {} |\n",
                bot.lower, bot.upper, bot.count, user.count
            )
        })
        .collect();

    if rows.is_empty() {
        section.push_str("No sentiment scores to bin.\n\n");
    } else {
        section.push_str("| Score Range | Bot | User |\n");
        section.push_str("|:---|:---:|:---:|\n");
        for row in rows {
            section.push_str(&row);
        }
        section.push('\n');
    }

    let out_of_range = histograms.bot.out_of_range + histograms.user.out_of_range;
    if out_of_range > 0 {
        section.push_str(&format!(
            "*{} scores outside [0, 1] were not binned.*\n\n",
            out_of_range
        ));
    }

    section
}

/// Generate the label share section.
fn generate_label_share_section(shares: &[LabelShare]) -> String {
    let mut section = String::new();

    section.push_str("## Sentiment Label Share\n\n");

    if shares.is_empty() {
        section.push_str("No labeled comments.\n\n");
        return section;
    }

    section.push_str("| Label | Comments | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for share in shares {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            escape_cell(&share.label),
            share.count,
            share.percent
        ));
    }
    section.push('\n');

    section
}

/// Generate the replies and likes section.
fn generate_engagement_section(engagement: &EngagementComparison) -> String {
    let mut section = String::new();

    section.push_str("## Replies and Likes\n\n");
    section.push_str("| Metric | Bot | User |\n");
    section.push_str("|:---|:---:|:---:|\n");
    section.push_str(&format!(
        "| Replies | {} | {} |\n",
        engagement.replies.bot, engagement.replies.user
    ));
    section.push_str(&format!(
        "| Likes | {} | {} |\n\n",
        engagement.likes.bot, engagement.likes.user
    ));

    section
}

/// Generate the per-category section.
fn generate_categories_section(categories: &[CategoryReport]) -> String {
    let mut section = String::new();

    section.push_str("## By Category\n\n");

    if categories.is_empty() {
        section.push_str("No categories were requested.\n\n");
        return section;
    }

    for entry in categories {
        let category = &entry.comparison.category;
        section.push_str(&format!("### {}\n\n", category));
        section.push_str(&comparison_table(&entry.comparison.comparison));

        if let Some(ref scatter) = entry.scatter {
            section.push_str(&format!(
                "*Scatter points: {} bot, {} user*\n\n",
                scatter.bot.len(),
                scatter.user.len()
            ));
        }
    }

    section
}

/// Generate the notices section.
fn generate_notices_section(notices: &[Notice]) -> String {
    if notices.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Data Quality Notices\n\n");
    for notice in notices {
        let marker = if notice.is_data_issue() { "⚠️" } else { "ℹ️" };
        section.push_str(&format!("- {} {}\n", marker, notice));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by Comment Insights*\n");

    footer
}

/// Generate a JSON report.
///
/// Means of empty groups are written as `null`.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content, creating parent directories as needed.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}
