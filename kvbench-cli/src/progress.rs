//! Terminal progress rendering

use indicatif::{ProgressBar, ProgressStyle};
use kvbench_core::{ProgressPhase, ProgressSink};
use std::sync::Mutex;

/// Bar resolution; fractions are scaled to this many ticks
const TICKS: u64 = 1000;

/// `ProgressSink` drawing one bar per case phase
pub struct BarProgress {
    bar: ProgressBar,
    current: Mutex<Option<(String, ProgressPhase)>>,
}

impl BarProgress {
    /// Bar drawn to stderr
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(TICKS))
    }

    /// Bar that draws nothing, for tests and non-interactive output
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_length(TICKS);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self {
            bar,
            current: Mutex::new(None),
        }
    }

    /// Current bar position in ticks
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the bar once the run is over
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn progress(&self, case: &str, phase: ProgressPhase, fraction: f64) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let changed = current
            .as_ref()
            .is_none_or(|(name, p)| name != case || *p != phase);
        if changed {
            let label = match phase {
                ProgressPhase::Prefill => "prefill",
                ProgressPhase::Measure => "measure",
            };
            self.bar.reset();
            self.bar.set_message(format!("{case} ({label})"));
            *current = Some((case.to_string(), phase));
        }
        self.bar
            .set_position((fraction.clamp(0.0, 1.0) * TICKS as f64).round() as u64);
    }
}
