//! Storage module for run artifacts.
//!
//! Every artifact of a run lives next to the configured output file and is
//! named by prefixing the output file name: `stats-out.txt`, `land-out.txt`
//! and so on. This module provides the path scheme and the plain-text
//! writers for the per-genotype trace and the per-generation statistics.

mod paths;
mod stats;
mod trace;

pub use paths::OutputPaths;
pub use stats::{format_stats_row, StatsWriter, STATS_HEADER};
pub use trace::{TraceFormat, TraceWriter, TRACE_COLUMNS};
