//! Analysis modules.
//!
//! `aggregator` holds the grouped statistics; `charts` derives the
//! chart-ready views built on top of them.

pub mod aggregator;
pub mod charts;

pub use aggregator::*;
pub use charts::*;
