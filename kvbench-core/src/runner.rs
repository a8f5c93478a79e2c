//! Scheduler
//!
//! Drives registered cases through the run state machine:
//!
//! ```text
//! Idle → GlobalSetup
//!      → per case: Before → PreMeasuring → Settling → Measuring → Cycle → After → Settling
//!      → GlobalTeardown → Idle
//! ```
//!
//! Exactly one case and one phase execute at a time. Every awaited hook is followed by a
//! checkpoint; a checkpoint that observes cancellation jumps straight to the current
//! case's `after` hook and ends the run without global teardown.
//!
//! A case whose hook fails is marked failed, still gets its `after` hook, and the run
//! moves on to the next case.

use crate::cancel::{CancelHandle, Phase, RunFlags};
use crate::case::{Case, CaseSpec};
use crate::database::Capabilities;
use crate::error::BenchError;
use crate::hooks::{CycleReport, IterationSample, NoHooks, PrefillSample, RunHooks};
use crate::progress::{NoProgress, ProgressPhase, ProgressSink, ThrottledProgress, phase_fraction};
use kvbench_stats::{RunningMean, normalize_ms};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default measured iterations per case
pub const DEFAULT_ITERATIONS: u64 = 100;

/// Default pause between phases and cases
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Default minimum spacing between forwarded progress updates
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(50);

/// Scheduler-wide run options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Measured iterations for cases without their own override
    pub iterations: u64,
    /// Pause after the pre-measure phase and after each case
    pub settle_delay: Duration,
    /// Minimum spacing between forwarded progress updates
    pub progress_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            settle_delay: DEFAULT_SETTLE_DELAY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl RunOptions {
    /// Reject option sets that cannot produce a measurement
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.iterations == 0 {
            return Err(BenchError::Configuration(
                "iteration count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every case ran and global teardown completed
    Completed,
    /// Cancellation was observed; remaining cases never started
    Aborted,
    /// Another run was already in flight, so this call did nothing
    AlreadyRunning,
}

/// How a single case ended
#[derive(Debug, Clone, PartialEq)]
pub enum CaseStatus {
    /// Measured loop finished and the cycle was reported
    Completed {
        /// Mean per-operation milliseconds
        mean_ms: f64,
        /// Measured iterations
        iterations: u64,
    },
    /// A hook failed
    Failed {
        /// The failure
        error: BenchError,
    },
    /// Cancellation was observed while the case was in flight
    Aborted,
    /// The backend lacks capabilities the case requires
    Skipped {
        /// Capabilities the backend does not offer
        missing: Capabilities,
    },
}

/// Result for one case of a run
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    /// Case name
    pub name: String,
    /// Declared bulk factor
    pub bulk_factor: u32,
    /// Terminal status
    pub status: CaseStatus,
    /// Wall-clock time spent on the case, hooks and pauses included
    pub elapsed: Duration,
}

impl CaseOutcome {
    /// Mean per-operation milliseconds, when the case completed
    pub fn mean_ms(&self) -> Option<f64> {
        match self.status {
            CaseStatus::Completed { mean_ms, .. } => Some(mean_ms),
            _ => None,
        }
    }
}

/// Result of one `run()` call
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Per-case results in execution order; cases never reached are absent
    pub cases: Vec<CaseOutcome>,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    fn new(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            cases: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Outcome for the last case registered under `name`
    pub fn case(&self, name: &str) -> Option<&CaseOutcome> {
        self.cases.iter().rev().find(|c| c.name == name)
    }
}

/// Benchmark scheduler
///
/// Owns the case registry and its own run flags, so independent schedulers never
/// interfere with each other.
pub struct Scheduler {
    options: RunOptions,
    hooks: Arc<dyn RunHooks>,
    progress: Arc<dyn ProgressSink>,
    capabilities: Option<Capabilities>,
    cases: Mutex<Vec<Case>>,
    flags: Arc<RunFlags>,
}

impl Scheduler {
    /// Create a scheduler with no-op hooks and progress
    pub fn new(options: RunOptions) -> Result<Self, BenchError> {
        options.validate()?;
        Ok(Self {
            options,
            hooks: Arc::new(NoHooks),
            progress: Arc::new(NoProgress),
            capabilities: None,
            cases: Mutex::new(Vec::new()),
            flags: Arc::new(RunFlags::default()),
        })
    }

    /// Install run callbacks
    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Install a progress sink
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Capabilities of the backend under test. Cases requiring anything outside this
    /// set are skipped. Without it every case is assumed runnable.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Run options in effect
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Register a case. Names are not checked for uniqueness; a later case with the same
    /// name shadows the earlier one in name-keyed lookups.
    pub fn add(&self, name: impl Into<String>, spec: CaseSpec) -> Result<(), BenchError> {
        let case = Case::new(name, spec)?;
        debug!(case = case.name(), "registered case");
        self.registry().push(case);
        Ok(())
    }

    /// Names of the registered cases in run order
    pub fn case_names(&self) -> Vec<String> {
        self.registry().iter().map(|c| c.name().to_string()).collect()
    }

    /// Number of registered cases
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    /// Whether no case is registered
    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// Drop every case and reset the run flags. An in-flight run keeps its own snapshot
    /// of the cases and unwinds at its next checkpoint.
    pub fn clear(&self) {
        self.registry().clear();
        self.flags.reset();
        debug!("scheduler cleared");
    }

    /// Request cooperative cancellation. No-op when no run is in flight.
    pub fn cancel(&self) -> bool {
        let requested = self.flags.cancel();
        if requested {
            info!("cancellation requested");
        }
        requested
    }

    /// Handle for cancelling from another task or from inside a hook
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(Arc::clone(&self.flags))
    }

    /// Whether a run is in flight
    pub fn is_running(&self) -> bool {
        self.flags.is_running()
    }

    /// Current phase of the in-flight run
    pub fn phase(&self) -> Phase {
        self.flags.phase()
    }

    /// Index of the case the in-flight run is on
    pub fn current_index(&self) -> usize {
        self.flags.current_index()
    }

    /// Run every registered case in order.
    ///
    /// Returns `RunOutcome::AlreadyRunning` without doing anything if another run is in
    /// flight. Per-case failures are reported in the summary; only global setup or
    /// teardown failures are returned as `Err`.
    pub async fn run(&self) -> Result<RunSummary, BenchError> {
        let Some(epoch) = self.flags.try_start() else {
            debug!("run requested while another run is in flight");
            return Ok(RunSummary::new(RunOutcome::AlreadyRunning));
        };

        let cases = self.registry().clone();
        let started = Instant::now();
        info!(cases = cases.len(), "run started");

        let result = self.drive(epoch, &cases).await;
        self.flags.finish(epoch);

        match result {
            Ok(mut summary) => {
                summary.elapsed = started.elapsed();
                info!(outcome = ?summary.outcome, elapsed = ?summary.elapsed, "run finished");
                Ok(summary)
            }
            Err(error) => {
                warn!(%error, "run failed");
                Err(error)
            }
        }
    }

    fn registry(&self) -> MutexGuard<'_, Vec<Case>> {
        self.cases.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, epoch: u64, phase: Phase) {
        debug!(%phase, "entering phase");
        self.flags.enter(epoch, phase);
    }

    fn checkpoint(&self, epoch: u64) -> Result<(), BenchError> {
        if self.flags.should_stop(epoch) {
            Err(BenchError::Aborted)
        } else {
            Ok(())
        }
    }

    async fn settle(&self, epoch: u64) -> Result<(), BenchError> {
        self.enter(epoch, Phase::Settling);
        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }
        self.checkpoint(epoch)
    }

    async fn drive(&self, epoch: u64, cases: &[Case]) -> Result<RunSummary, BenchError> {
        let mut summary = RunSummary::new(RunOutcome::Completed);

        self.enter(epoch, Phase::GlobalSetup);
        self.hooks.before_all().await?;
        if self.checkpoint(epoch).is_err() {
            summary.outcome = RunOutcome::Aborted;
            return Ok(summary);
        }

        for (index, case) in cases.iter().enumerate() {
            self.flags.set_current_index(epoch, index);

            if let Some(available) = self.capabilities {
                let missing = case.requires().missing_from(available);
                if !missing.is_empty() {
                    info!(case = case.name(), %missing, "skipping case");
                    summary.cases.push(CaseOutcome {
                        name: case.name().to_string(),
                        bulk_factor: case.bulk_factor(),
                        status: CaseStatus::Skipped { missing },
                        elapsed: Duration::ZERO,
                    });
                    continue;
                }
            }

            let outcome = self.run_case(epoch, case).await;
            let aborted = outcome.status == CaseStatus::Aborted;
            summary.cases.push(outcome);

            // A cancel that lands during the trailing pause still stops the run
            if aborted || self.checkpoint(epoch).is_err() {
                summary.outcome = RunOutcome::Aborted;
                return Ok(summary);
            }
        }

        self.enter(epoch, Phase::GlobalTeardown);
        self.hooks.after_all().await?;
        Ok(summary)
    }

    async fn run_case(&self, epoch: u64, case: &Case) -> CaseOutcome {
        let name = case.name();
        let started = Instant::now();
        info!(case = name, "case started");

        let mut status = match self.measure_case(epoch, case).await {
            Ok((mean_ms, iterations)) => {
                info!(case = name, mean_ms, "case completed");
                CaseStatus::Completed {
                    mean_ms,
                    iterations,
                }
            }
            Err(BenchError::Aborted) => {
                info!(case = name, "case aborted");
                self.enter(epoch, Phase::Aborting);
                CaseStatus::Aborted
            }
            Err(error) => {
                warn!(case = name, %error, "case failed");
                self.hooks.case_failed(name, &error);
                CaseStatus::Failed { error }
            }
        };

        self.enter(epoch, Phase::After);
        if let Some(after) = case.after_hook() {
            if let Err(error) = after(name.to_string()).await {
                warn!(case = name, %error, "after hook failed");
                if matches!(status, CaseStatus::Completed { .. }) {
                    let error = BenchError::from(error);
                    self.hooks.case_failed(name, &error);
                    status = CaseStatus::Failed { error };
                }
            }
        }

        if status != CaseStatus::Aborted {
            // The outer loop checks for cancellation right after this pause
            self.enter(epoch, Phase::Settling);
            if !self.options.settle_delay.is_zero() {
                tokio::time::sleep(self.options.settle_delay).await;
            }
        }

        CaseOutcome {
            name: name.to_string(),
            bulk_factor: case.bulk_factor(),
            status,
            elapsed: started.elapsed(),
        }
    }

    /// Before → PreMeasuring → Settling → Measuring → Cycle. Returns the cycle mean and
    /// the iteration count.
    async fn measure_case(&self, epoch: u64, case: &Case) -> Result<(f64, u64), BenchError> {
        let name = case.name();

        self.enter(epoch, Phase::Before);
        if let Some(before) = case.before_hook() {
            before(name.to_string()).await?;
        }
        self.checkpoint(epoch)?;

        if let Some((count, pre_measure)) = case.pre_measure_hook() {
            self.enter(epoch, Phase::PreMeasuring);
            let mut progress = ThrottledProgress::new(
                self.progress.as_ref(),
                name,
                ProgressPhase::Prefill,
                self.options.progress_interval,
            );
            for i in 0..count {
                self.checkpoint(epoch)?;
                pre_measure(i).await?;
                self.checkpoint(epoch)?;
                self.hooks
                    .pre_measure_iteration(name, PrefillSample { index: i });
                progress.update(phase_fraction(i, count));
            }
            progress.flush();
        }
        self.settle(epoch).await?;

        self.enter(epoch, Phase::Measuring);
        let iterations = case.iterations().unwrap_or(self.options.iterations);
        let measure = case.measure_hook();
        let post_measure = case.post_measure_hook();
        let mut accumulator = RunningMean::new();
        let mut progress = ThrottledProgress::new(
            self.progress.as_ref(),
            name,
            ProgressPhase::Measure,
            self.options.progress_interval,
        );

        for i in 0..iterations {
            self.checkpoint(epoch)?;
            let start = Instant::now();
            measure(i).await?;
            self.checkpoint(epoch)?;
            let elapsed = start.elapsed();

            let ms = normalize_ms(elapsed, case.bulk_factor());
            let mean = accumulator.record(ms);
            self.hooks
                .iteration(name, IterationSample { index: i, ms, mean });
            progress.update(phase_fraction(i, iterations));

            if let Some(post_measure) = post_measure {
                post_measure(i).await?;
            }
        }
        progress.flush();

        self.enter(epoch, Phase::Cycle);
        let mean = accumulator.mean_over(iterations);
        self.hooks.cycle(name, CycleReport { mean });
        Ok((mean, iterations))
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("options", &self.options)
            .field("capabilities", &self.capabilities)
            .field("cases", &self.case_names())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    impl Log {
        fn push(&self, event: impl Into<String>) {
            self.0.lock().unwrap().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl RunHooks for Log {
        async fn before_all(&self) -> Result<(), StoreError> {
            self.push("before_all");
            Ok(())
        }

        async fn after_all(&self) -> Result<(), StoreError> {
            self.push("after_all");
            Ok(())
        }

        fn pre_measure_iteration(&self, case: &str, sample: PrefillSample) {
            self.push(format!("prefill {case} {}", sample.index));
        }

        fn iteration(&self, case: &str, sample: IterationSample) {
            self.push(format!("iteration {case} {} {:.1}", sample.index, sample.ms));
        }

        fn cycle(&self, case: &str, report: CycleReport) {
            self.push(format!("cycle {case} {:.1}", report.mean));
        }

        fn case_failed(&self, case: &str, _error: &BenchError) {
            self.push(format!("failed {case}"));
        }
    }

    fn options(iterations: u64) -> RunOptions {
        RunOptions {
            iterations,
            settle_delay: Duration::from_millis(5),
            progress_interval: Duration::ZERO,
        }
    }

    fn sleeping(ms: u64) -> CaseSpec {
        CaseSpec::new().measure(move |_| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(())
        })
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = Scheduler::new(options(0)).unwrap_err();
        assert!(matches!(err, BenchError::Configuration(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_order_within_case() {
        let log = Arc::new(Log::default());
        let scheduler = Scheduler::new(options(2))
            .unwrap()
            .with_hooks(log.clone());

        let before_log = log.clone();
        let after_log = log.clone();
        let post_log = log.clone();
        scheduler
            .add(
                "c",
                sleeping(1)
                    .before(move |name| {
                        let log = before_log.clone();
                        async move {
                            log.push(format!("before {name}"));
                            Ok(())
                        }
                    })
                    .pre_measure(1, |_| async { Ok(()) })
                    .post_measure(move |i| {
                        let log = post_log.clone();
                        async move {
                            log.push(format!("post {i}"));
                            Ok(())
                        }
                    })
                    .after(move |name| {
                        let log = after_log.clone();
                        async move {
                            log.push(format!("after {name}"));
                            Ok(())
                        }
                    }),
            )
            .unwrap();

        let summary = scheduler.run().await.unwrap();
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(
            log.events(),
            vec![
                "before_all",
                "before c",
                "prefill c 0",
                "iteration c 0 1.0",
                "post 0",
                "iteration c 1 1.0",
                "post 1",
                "cycle c 1.0",
                "after c",
                "after_all",
            ]
        );
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_case_is_isolated() {
        let log = Arc::new(Log::default());
        let scheduler = Scheduler::new(options(2))
            .unwrap()
            .with_hooks(log.clone());

        let after_log = log.clone();
        scheduler
            .add(
                "broken",
                CaseSpec::new()
                    .measure(|i| async move {
                        if i == 1 {
                            Err(StoreError::QuotaExceeded("full".to_string()))
                        } else {
                            Ok(())
                        }
                    })
                    .after(move |name| {
                        let log = after_log.clone();
                        async move {
                            log.push(format!("after {name}"));
                            Ok(())
                        }
                    }),
            )
            .unwrap();
        scheduler.add("fine", sleeping(3)).unwrap();

        let summary = scheduler.run().await.unwrap();
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(
            summary.case("broken").unwrap().status,
            CaseStatus::Failed {
                error: BenchError::Operation(StoreError::QuotaExceeded("full".to_string()))
            }
        );
        assert_eq!(summary.case("fine").unwrap().mean_ms(), Some(3.0));

        let events = log.events();
        assert!(events.contains(&"failed broken".to_string()));
        assert!(events.contains(&"after broken".to_string()));
        assert!(!events.iter().any(|e| e.starts_with("cycle broken")));
        assert_eq!(events.last().map(String::as_str), Some("after_all"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_after_hook_marks_case_failed() {
        let scheduler = Scheduler::new(options(1)).unwrap();
        scheduler
            .add(
                "leaky",
                sleeping(1).after(|_| async { Err(StoreError::Backend("close".to_string())) }),
            )
            .unwrap();

        let summary = scheduler.run().await.unwrap();
        assert!(matches!(
            summary.cases[0].status,
            CaseStatus::Failed { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_before_still_runs_after() {
        let scheduler = Arc::new(Scheduler::new(options(5)).unwrap());
        let handle = scheduler.cancel_handle();
        let afters = Arc::new(AtomicU64::new(0));
        let measured = Arc::new(AtomicU64::new(0));

        let after_count = afters.clone();
        let measure_count = measured.clone();
        scheduler
            .add(
                "c",
                CaseSpec::new()
                    .before(move |_| {
                        let handle = handle.clone();
                        async move {
                            handle.cancel();
                            Ok(())
                        }
                    })
                    .measure(move |_| {
                        measure_count.fetch_add(1, Ordering::SeqCst);
                        async { Ok(()) }
                    })
                    .after(move |_| {
                        after_count.fetch_add(1, Ordering::SeqCst);
                        async { Ok(()) }
                    }),
            )
            .unwrap();

        let summary = scheduler.run().await.unwrap();
        assert_eq!(summary.outcome, RunOutcome::Aborted);
        assert_eq!(summary.cases[0].status, CaseStatus::Aborted);
        assert_eq!(afters.load(Ordering::SeqCst), 1);
        assert_eq!(measured.load(Ordering::SeqCst), 0);
        assert!(!handle_is_cancelled(&scheduler));
    }

    fn handle_is_cancelled(scheduler: &Scheduler) -> bool {
        scheduler.cancel_handle().is_cancelled()
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentrant_run_is_noop() {
        let scheduler = Arc::new(Scheduler::new(options(3)).unwrap());
        scheduler.add("slow", sleeping(10)).unwrap();

        let background = Arc::clone(&scheduler);
        let first = tokio::spawn(async move { background.run().await });
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(scheduler.is_running());

        let second = scheduler.run().await.unwrap();
        assert_eq!(second.outcome, RunOutcome::AlreadyRunning);
        assert!(second.cases.is_empty());

        let first = first.await.unwrap().unwrap();
        assert_eq!(first.outcome, RunOutcome::Completed);
        assert_eq!(first.cases.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_when_idle_is_noop() {
        let scheduler = Scheduler::new(options(1)).unwrap();
        assert!(!scheduler.cancel());
        scheduler.add("c", sleeping(1)).unwrap();

        let summary = scheduler.run().await.unwrap();
        assert_eq!(summary.outcome, RunOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_capability_skips_case() {
        let scheduler = Scheduler::new(options(1))
            .unwrap()
            .with_capabilities(Capabilities::GET_ALL);
        scheduler
            .add("bulk", sleeping(1).requires(Capabilities::BULK_SET))
            .unwrap();
        scheduler
            .add("scan", sleeping(1).requires(Capabilities::GET_ALL))
            .unwrap();

        let summary = scheduler.run().await.unwrap();
        assert_eq!(
            summary.cases[0].status,
            CaseStatus::Skipped {
                missing: Capabilities::BULK_SET
            }
        );
        assert_eq!(summary.cases[1].mean_ms(), Some(1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_case_iteration_override() {
        let log = Arc::new(Log::default());
        let scheduler = Scheduler::new(options(10))
            .unwrap()
            .with_hooks(log.clone());
        scheduler.add("short", sleeping(2).iterations(2)).unwrap();

        let summary = scheduler.run().await.unwrap();
        assert_eq!(
            summary.cases[0].status,
            CaseStatus::Completed {
                mean_ms: 2.0,
                iterations: 2
            }
        );
        let iterations = log
            .events()
            .iter()
            .filter(|e| e.starts_with("iteration"))
            .count();
        assert_eq!(iterations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_before_all_failure_propagates_and_releases() {
        struct FailingSetup;

        #[async_trait::async_trait]
        impl RunHooks for FailingSetup {
            async fn before_all(&self) -> Result<(), StoreError> {
                Err(StoreError::Backend("open".to_string()))
            }
        }

        let scheduler = Scheduler::new(options(1))
            .unwrap()
            .with_hooks(Arc::new(FailingSetup));
        scheduler.add("c", sleeping(1)).unwrap();

        let err = scheduler.run().await.unwrap_err();
        assert_eq!(
            err,
            BenchError::Operation(StoreError::Backend("open".to_string()))
        );
        assert!(!scheduler.is_running());

        scheduler.clear();
        assert!(scheduler.is_empty());
    }
}
