#![warn(missing_docs)]
//! kvbench Statistics
//!
//! Two layers of timing statistics:
//! - `RunningMean`: the O(1) accumulator the scheduler feeds while a case is measured,
//!   normalizing each sample by the case's bulk factor
//! - `LatencySummary`: post-run distribution summary (mean, median, stddev, percentiles)
//!   over the per-iteration samples a recorder collected

mod accumulator;
mod percentiles;
mod summary;

pub use accumulator::{RunningMean, normalize_ms};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles};
pub use summary::{LatencySummary, compute_summary};
