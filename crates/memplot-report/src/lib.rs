//! Parsers, summaries and chart rendering for memory-benchmark result files.
//!
//! This crate provides:
//! - best-effort text loading with an encoding fallback chain;
//! - tolerant line parsers for stride and blocked matrix-multiply results;
//! - NaN-aware summary statistics (means, speedups, best points);
//! - two-panel PNG comparison charts via plotters.

pub mod block;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod report;
pub mod stride;
pub mod trace;

pub use error::{ReportError, Result};
