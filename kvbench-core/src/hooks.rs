//! Run Callbacks
//!
//! [`RunHooks`] is the callback surface configured on a scheduler: global setup and
//! teardown, plus per-iteration, pre-measure and cycle notifications. Every method has
//! a no-op default so an implementor only overrides what it consumes.

use crate::error::{BenchError, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// One measured iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationSample {
    /// Iteration index
    pub index: u64,
    /// Wall-clock milliseconds divided by the bulk factor
    pub ms: f64,
    /// Running mean over iterations `0..=index`
    pub mean: f64,
}

/// One untimed warm-up iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefillSample {
    /// Iteration index
    pub index: u64,
}

/// Final result of a completed case
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Mean per-operation milliseconds over all measured iterations
    pub mean: f64,
}

/// Callbacks invoked by the scheduler
#[async_trait]
pub trait RunHooks: Send + Sync {
    /// Global setup, awaited before the first case
    async fn before_all(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Global teardown, awaited after the last case of a completed run
    async fn after_all(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// A warm-up iteration finished
    fn pre_measure_iteration(&self, _case: &str, _sample: PrefillSample) {}

    /// A measured iteration finished
    fn iteration(&self, _case: &str, _sample: IterationSample) {}

    /// A case finished its measured loop
    fn cycle(&self, _case: &str, _report: CycleReport) {}

    /// A case failed; the run continues with the next case
    fn case_failed(&self, _case: &str, _error: &BenchError) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RunHooks for NoHooks {}

/// Hooks that keep every measured sample, keyed by case name.
///
/// A case starting over at iteration 0 replaces what an earlier case of the same name
/// recorded.
#[derive(Debug, Default)]
pub struct SampleRecorder {
    samples: Mutex<HashMap<String, Vec<f64>>>,
}

impl SampleRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample
    pub fn record(&self, case: &str, sample: IterationSample) {
        let mut samples = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = samples.entry(case.to_string()).or_default();
        if sample.index == 0 {
            entry.clear();
        }
        entry.push(sample.ms);
    }

    /// Samples recorded for a case, in iteration order
    pub fn samples(&self, case: &str) -> Vec<f64> {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(case)
            .cloned()
            .unwrap_or_default()
    }

    /// Take every recorded sample, leaving the recorder empty
    pub fn take(&self) -> HashMap<String, Vec<f64>> {
        std::mem::take(&mut *self.samples.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl RunHooks for SampleRecorder {
    fn iteration(&self, case: &str, sample: IterationSample) {
        self.record(case, sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(index: u64, ms: f64) -> IterationSample {
        IterationSample { index, ms, mean: ms }
    }

    #[test]
    fn test_recorder_keeps_order() {
        let recorder = SampleRecorder::new();
        recorder.record("a", sample(0, 1.0));
        recorder.record("a", sample(1, 2.0));
        recorder.record("b", sample(0, 5.0));

        assert_eq!(recorder.samples("a"), vec![1.0, 2.0]);
        assert_eq!(recorder.samples("b"), vec![5.0]);
        assert!(recorder.samples("c").is_empty());
    }

    #[test]
    fn test_duplicate_name_shadows() {
        let recorder = SampleRecorder::new();
        recorder.record("a", sample(0, 1.0));
        recorder.record("a", sample(1, 1.0));
        recorder.record("a", sample(0, 9.0));

        assert_eq!(recorder.samples("a"), vec![9.0]);
    }

    #[test]
    fn test_take_empties() {
        let recorder = SampleRecorder::new();
        recorder.record("a", sample(0, 1.0));
        let all = recorder.take();
        assert_eq!(all.len(), 1);
        assert!(recorder.samples("a").is_empty());
    }
}
