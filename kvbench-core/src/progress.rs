//! Progress Reporting
//!
//! The scheduler emits two progress channels per case, prefill and measurement, each a
//! fraction `(i + 1) / count` that reaches exactly 1.0 on the last iteration.
//!
//! Updates go through [`ThrottledProgress`], which forwards at most one value per
//! interval and holds back the latest suppressed value. The scheduler flushes the
//! throttle at every phase boundary, so the sink always sees the terminal 1.0 even when
//! intermediate values were coalesced.

use std::time::Duration;
use tokio::time::Instant;

/// Which phase a progress fraction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressPhase {
    /// Untimed warm-up iterations
    Prefill,
    /// Timed iterations
    Measure,
}

/// Consumer of progress fractions
pub trait ProgressSink: Send + Sync {
    /// Called with a fraction in `(0.0, 1.0]`
    fn progress(&self, case: &str, phase: ProgressPhase, fraction: f64);
}

/// Sink that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn progress(&self, _case: &str, _phase: ProgressPhase, _fraction: f64) {}
}

/// Fraction of a phase complete after iteration `index` of `count`
pub fn phase_fraction(index: u64, count: u64) -> f64 {
    if count == 0 {
        1.0
    } else {
        (index + 1) as f64 / count as f64
    }
}

/// Rate limiter in front of a [`ProgressSink`] for one case phase.
///
/// Dropping the throttle without calling [`flush`](Self::flush) discards any held-back
/// value, which is what an aborted phase wants.
pub struct ThrottledProgress<'a> {
    sink: &'a dyn ProgressSink,
    case: &'a str,
    phase: ProgressPhase,
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<f64>,
}

impl<'a> ThrottledProgress<'a> {
    /// Create a throttle forwarding to `sink` at most once per `interval`
    pub fn new(
        sink: &'a dyn ProgressSink,
        case: &'a str,
        phase: ProgressPhase,
        interval: Duration,
    ) -> Self {
        Self {
            sink,
            case,
            phase,
            interval,
            last_emit: None,
            pending: None,
        }
    }

    /// Offer a new fraction; forwarded now or held until the next emit/flush
    pub fn update(&mut self, fraction: f64) {
        let now = Instant::now();
        let due = self
            .last_emit
            .is_none_or(|last| now.duration_since(last) >= self.interval);

        if due {
            self.emit(fraction, now);
        } else {
            self.pending = Some(fraction);
        }
    }

    /// Forward the held-back value, if any
    pub fn flush(&mut self) {
        if let Some(fraction) = self.pending.take() {
            self.emit(fraction, Instant::now());
        }
    }

    fn emit(&mut self, fraction: f64, now: Instant) {
        self.pending = None;
        self.last_emit = Some(now);
        self.sink.progress(self.case, self.phase, fraction);
    }
}
