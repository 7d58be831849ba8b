//! Descriptive statistics over per-node values
//!
//! Distribution summaries, equal-width histograms and out-degree aggregates.

pub mod degree;
pub mod histogram;
pub mod summary;

pub use degree::{group_degree_stats, out_degrees, GroupStats};
pub use histogram::{Bin, Histogram};
pub use summary::Summary;
