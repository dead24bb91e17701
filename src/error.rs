//! Data-quality notices and data source errors.
//!
//! Notices are never fatal: aggregation always produces a value and
//! notices are reported alongside it. Only loading a dataset can fail.

use serde::Serialize;
use thiserror::Error;

use crate::models::GroupKey;

/// Non-fatal data-quality findings.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A requested partition had no rows; its means are NaN.
    #[error("group '{group}' has no records")]
    EmptyGroup { group: GroupKey },

    /// A sentiment score fell outside `[0, 1]`.
    #[error("record {index} has sentiment score {score} outside [0, 1]")]
    OutOfRange { index: usize, score: f64 },

    /// `relabel` met a label absent from the mapping and kept it as-is.
    #[error("label '{label}' has no mapping ({occurrences} records kept unchanged)")]
    UnmappedLabel { label: String, occurrences: usize },
}

impl Notice {
    /// Empty groups are expected for sparse categories; the other notices
    /// indicate something off in the data itself.
    pub fn is_data_issue(&self) -> bool {
        !matches!(self, Notice::EmptyGroup { .. })
    }
}

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: invalid bot flag '{value}' (expected 0, 1, true or false)")]
    InvalidBotFlag { row: usize, value: String },
}
