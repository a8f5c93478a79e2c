//! Running Mean Accumulator
//!
//! Keeps only the running total and the sample count, so memory and per-iteration
//! cost stay constant no matter how many iterations a case runs.

use std::time::Duration;

/// Convert a wall-clock duration into per-operation milliseconds.
///
/// `bulk_factor` is the number of logical operations the timed call performed.
/// A factor of zero is treated as one.
pub fn normalize_ms(elapsed: Duration, bulk_factor: u32) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / f64::from(bulk_factor.max(1))
}

/// Running sum/mean over the measured iterations of a single case.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    total_ms: f64,
    count: u64,
}

impl RunningMean {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one normalized sample and return the mean over everything recorded so far.
    ///
    /// After the sample for iteration `i` this is `total / (i + 1)`.
    pub fn record(&mut self, ms: f64) -> f64 {
        self.total_ms += ms;
        self.count += 1;
        self.mean()
    }

    /// Mean over the recorded samples (0.0 when empty)
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }

    /// Mean over a fixed iteration count, used for the cycle report.
    pub fn mean_over(&self, iterations: u64) -> f64 {
        if iterations == 0 {
            0.0
        } else {
            self.total_ms / iterations as f64
        }
    }

}
