//! Latency Summary
//!
//! Distribution summary over the per-iteration, bulk-normalized samples of one case.

use crate::percentiles::percentile_of_sorted;
use serde::{Deserialize, Serialize};

/// Summary of one case's per-iteration latencies, all values in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Fastest sample
    pub min: f64,
    /// Slowest sample
    pub max: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Compute a latency summary from raw samples
pub fn compute_summary(samples: &[f64]) -> LatencySummary {
    if samples.is_empty() {
        return LatencySummary::default();
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std_dev = if count < 2 {
        0.0
    } else {
        let variance =
            sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    };

    LatencySummary {
        count,
        mean,
        median: percentile_of_sorted(&sorted, 50.0),
        std_dev,
        min: sorted[0],
        max: sorted[count - 1],
        p90: percentile_of_sorted(&sorted, 90.0),
        p95: percentile_of_sorted(&sorted, 95.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    }
}

impl LatencySummary {
    /// Coefficient of variation in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Operations per second implied by the mean per-operation latency
    pub fn ops_per_sec(&self) -> Option<f64> {
        (self.mean > 0.0).then(|| 1000.0 / self.mean)
    }
}
