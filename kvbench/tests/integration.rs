//! Integration tests for kvbench
//!
//! These tests drive the scheduler end to end through the public facade. Time is paused,
//! so `tokio::time::sleep` inside a measured call yields exact durations.

use async_trait::async_trait;
use kvbench::{
    BenchError, CaseSpec, CaseStatus, CycleReport, IterationSample, MemoryDatabase, Phase,
    PrefillSample, ProgressPhase, ProgressSink, RunHooks, RunOptions, RunOutcome, Scheduler,
    StoreError, WorkloadConfig, standard_cases,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    BeforeAll,
    AfterAll,
    Prefill(String, u64),
    Iteration(String, u64, f64),
    Cycle(String, f64),
    Failed(String),
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Event>>);

impl Recorder {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn iterations(&self, case: &str) -> Vec<(u64, f64)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Iteration(name, i, ms) if name == case => Some((i, ms)),
                _ => None,
            })
            .collect()
    }

    fn cycles(&self) -> Vec<(String, f64)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Cycle(name, mean) => Some((name, mean)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RunHooks for Recorder {
    async fn before_all(&self) -> Result<(), StoreError> {
        self.push(Event::BeforeAll);
        Ok(())
    }

    async fn after_all(&self) -> Result<(), StoreError> {
        self.push(Event::AfterAll);
        Ok(())
    }

    fn pre_measure_iteration(&self, case: &str, sample: PrefillSample) {
        self.push(Event::Prefill(case.to_string(), sample.index));
    }

    fn iteration(&self, case: &str, sample: IterationSample) {
        self.push(Event::Iteration(case.to_string(), sample.index, sample.ms));
    }

    fn cycle(&self, case: &str, report: CycleReport) {
        self.push(Event::Cycle(case.to_string(), report.mean));
    }

    fn case_failed(&self, case: &str, _error: &BenchError) {
        self.push(Event::Failed(case.to_string()));
    }
}

#[derive(Default)]
struct ProgressLog(Mutex<Vec<(String, ProgressPhase, f64)>>);

impl ProgressSink for ProgressLog {
    fn progress(&self, case: &str, phase: ProgressPhase, fraction: f64) {
        self.0
            .lock()
            .unwrap()
            .push((case.to_string(), phase, fraction));
    }
}

fn options(iterations: u64) -> RunOptions {
    RunOptions {
        iterations,
        settle_delay: Duration::from_millis(100),
        progress_interval: Duration::from_millis(50),
    }
}

fn scheduler(iterations: u64) -> (Scheduler, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let scheduler = Scheduler::new(options(iterations))
        .unwrap()
        .with_hooks(recorder.clone());
    (scheduler, recorder)
}

fn sleeping(ms: u64) -> CaseSpec {
    CaseSpec::new().measure(move |_| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    })
}

fn counter() -> (Arc<AtomicU64>, impl Fn(String) -> std::future::Ready<Result<(), StoreError>> + Send + Sync + 'static) {
    let count = Arc::new(AtomicU64::new(0));
    let hook_count = Arc::clone(&count);
    let hook = move |_: String| {
        hook_count.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok(()))
    };
    (count, hook)
}

/// Fixed-duration measured calls yield that duration as the cycle mean
#[tokio::test(start_paused = true)]
async fn test_fixed_duration_mean() {
    let (scheduler, recorder) = scheduler(5);
    scheduler.add("fixed", sleeping(8)).unwrap();

    let summary = scheduler.run().await.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Completed);

    let iterations = recorder.iterations("fixed");
    assert_eq!(iterations.len(), 5);
    assert!(iterations.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(iterations.iter().all(|(_, ms)| (ms - 8.0).abs() < 1e-9));
    assert_eq!(recorder.cycles(), vec![("fixed".to_string(), 8.0)]);
}

/// Per-iteration milliseconds are divided by the bulk factor before they feed the mean
#[tokio::test(start_paused = true)]
async fn test_bulk_factor_normalizes() {
    let (scheduler, recorder) = scheduler(4);
    scheduler
        .add("bulk", sleeping(20).bulk_factor(4))
        .unwrap();

    let summary = scheduler.run().await.unwrap();
    assert!(
        recorder
            .iterations("bulk")
            .iter()
            .all(|(_, ms)| (ms - 5.0).abs() < 1e-9)
    );
    assert_eq!(summary.cases[0].mean_ms(), Some(5.0));
    assert_eq!(summary.cases[0].bulk_factor, 4);
}

/// Cancelling during the second of three cases finishes the first, runs the second's
/// `after` once, and never starts the third
#[tokio::test(start_paused = true)]
async fn test_cancel_mid_run() {
    let (scheduler, recorder) = scheduler(3);
    let handle = scheduler.cancel_handle();

    let (first_after, first_hook) = counter();
    let (second_after, second_hook) = counter();
    let (third_before, third_hook) = counter();

    scheduler.add("one", sleeping(1).after(first_hook)).unwrap();
    scheduler
        .add(
            "two",
            CaseSpec::new()
                .measure(move |i| {
                    if i == 1 {
                        handle.cancel();
                    }
                    async { Ok(()) }
                })
                .after(second_hook),
        )
        .unwrap();
    scheduler.add("three", sleeping(1).before(third_hook)).unwrap();

    let summary = scheduler.run().await.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Aborted);
    assert_eq!(summary.cases.len(), 2);
    assert_eq!(summary.cases[1].status, CaseStatus::Aborted);

    assert_eq!(recorder.cycles(), vec![("one".to_string(), 1.0)]);
    assert_eq!(recorder.iterations("two").len(), 1);
    assert_eq!(first_after.load(Ordering::SeqCst), 1);
    assert_eq!(second_after.load(Ordering::SeqCst), 1);
    assert_eq!(third_before.load(Ordering::SeqCst), 0);
    assert!(!recorder.events().contains(&Event::AfterAll));

    assert!(!scheduler.is_running());
    assert_eq!(scheduler.phase(), Phase::Idle);
}

/// After an aborted run the scheduler runs again normally
#[tokio::test(start_paused = true)]
async fn test_run_after_abort() {
    let (scheduler, recorder) = scheduler(2);
    let handle = scheduler.cancel_handle();
    scheduler
        .add(
            "self-cancel",
            CaseSpec::new().measure(move |_| {
                handle.cancel();
                async { Ok(()) }
            }),
        )
        .unwrap();
    assert_eq!(scheduler.run().await.unwrap().outcome, RunOutcome::Aborted);

    scheduler.clear();
    scheduler.add("plain", sleeping(2)).unwrap();
    let summary = scheduler.run().await.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(recorder.cycles(), vec![("plain".to_string(), 2.0)]);
}

/// An empty registry only runs the global hooks
#[tokio::test(start_paused = true)]
async fn test_empty_registry() {
    let (scheduler, recorder) = scheduler(3);
    scheduler.add("dropped", sleeping(1)).unwrap();
    scheduler.clear();

    let summary = scheduler.run().await.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert!(summary.cases.is_empty());
    assert_eq!(recorder.events(), vec![Event::BeforeAll, Event::AfterAll]);
}

/// Throttled progress is non-decreasing within a phase and always ends at 1.0
#[tokio::test(start_paused = true)]
async fn test_progress_reaches_one() {
    let progress = Arc::new(ProgressLog::default());
    let scheduler = Scheduler::new(options(20))
        .unwrap()
        .with_progress(progress.clone());
    scheduler
        .add(
            "steady",
            sleeping(3).pre_measure(7, |_| async {
                tokio::time::sleep(Duration::from_millis(9)).await;
                Ok(())
            }),
        )
        .unwrap();

    scheduler.run().await.unwrap();

    let log = progress.0.lock().unwrap().clone();
    for phase in [ProgressPhase::Prefill, ProgressPhase::Measure] {
        let fractions: Vec<f64> = log
            .iter()
            .filter(|(_, p, _)| *p == phase)
            .map(|(_, _, f)| *f)
            .collect();
        assert!(!fractions.is_empty());
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(fractions.last(), Some(&1.0));
    }

    let measured = log
        .iter()
        .filter(|(_, p, _)| *p == ProgressPhase::Measure)
        .count();
    assert!(measured < 20, "updates were not throttled: {measured}");
}

/// Cases run in registration order with their own means
#[tokio::test(start_paused = true)]
async fn test_two_cases_in_order() {
    let (scheduler, recorder) = scheduler(3);
    scheduler.add("A", sleeping(10)).unwrap();
    scheduler.add("B", sleeping(20)).unwrap();

    scheduler.run().await.unwrap();

    assert_eq!(
        recorder.cycles(),
        vec![("A".to_string(), 10.0), ("B".to_string(), 20.0)]
    );
    assert_eq!(recorder.iterations("A").len(), 3);
    assert_eq!(recorder.iterations("B").len(), 3);
}

/// Pre-measure callbacks fire exactly as often as declared, before any measurement
#[tokio::test(start_paused = true)]
async fn test_pre_measure_precedes_measurement() {
    let (scheduler, recorder) = scheduler(2);
    scheduler
        .add("warm", sleeping(1).pre_measure(2, |_| async { Ok(()) }))
        .unwrap();

    scheduler.run().await.unwrap();

    let events = recorder.events();
    let prefills: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::Prefill(..)))
        .map(|(i, _)| i)
        .collect();
    let first_iteration = events
        .iter()
        .position(|e| matches!(e, Event::Iteration(..)))
        .unwrap();
    assert_eq!(prefills.len(), 2);
    assert!(prefills.iter().all(|&i| i < first_iteration));
}

/// A failing case does not stop the run
#[tokio::test(start_paused = true)]
async fn test_failure_isolation() {
    let (scheduler, recorder) = scheduler(2);
    let (after_count, after_hook) = counter();
    scheduler
        .add(
            "conflict",
            CaseSpec::new()
                .measure(|_| async { Err(StoreError::Conflict("busy".into())) })
                .after(after_hook),
        )
        .unwrap();
    scheduler.add("ok", sleeping(4)).unwrap();

    let summary = scheduler.run().await.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert!(matches!(summary.cases[0].status, CaseStatus::Failed { .. }));
    assert_eq!(summary.cases[1].mean_ms(), Some(4.0));
    assert_eq!(after_count.load(Ordering::SeqCst), 1);
    assert!(recorder.events().contains(&Event::Failed("conflict".into())));
    assert_eq!(recorder.events().last(), Some(&Event::AfterAll));
}

/// `clear()` during a run makes the stale run unwind without touching the new registry
#[tokio::test(start_paused = true)]
async fn test_clear_during_run() {
    let (scheduler, _recorder) = scheduler(50);
    let scheduler = Arc::new(scheduler);
    scheduler.add("long", sleeping(10)).unwrap();

    let background = Arc::clone(&scheduler);
    let stale = tokio::spawn(async move { background.run().await });
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(scheduler.phase(), Phase::Measuring);

    scheduler.clear();
    assert!(!scheduler.is_running());
    assert!(scheduler.is_empty());

    let summary = stale.await.unwrap().unwrap();
    assert_eq!(summary.outcome, RunOutcome::Aborted);
    assert_eq!(summary.cases[0].status, CaseStatus::Aborted);
    assert!(!scheduler.is_running());
    assert_eq!(scheduler.phase(), Phase::Idle);
}

/// Schedulers never share run state
#[tokio::test(start_paused = true)]
async fn test_independent_schedulers() {
    let (first, _) = scheduler(3);
    let (second, second_events) = scheduler(3);
    let first = Arc::new(first);
    first.add("slow", sleeping(10)).unwrap();
    second.add("quick", sleeping(1)).unwrap();

    let background = Arc::clone(&first);
    let running = tokio::spawn(async move { background.run().await });
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(!second.cancel());
    let summary = second.run().await.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(second_events.cycles(), vec![("quick".to_string(), 1.0)]);

    assert_eq!(running.await.unwrap().unwrap().outcome, RunOutcome::Completed);
}

/// The standard suite runs cleanly against the in-memory backend
#[tokio::test]
async fn test_standard_suite_on_memory() {
    let memory = Arc::new(MemoryDatabase::new());
    let config = WorkloadConfig {
        records: 50,
        prefill: 50,
        stores: 2,
        batch_size: 10,
        ..WorkloadConfig::default()
    };
    let scheduler = Scheduler::new(RunOptions {
        iterations: 5,
        settle_delay: Duration::ZERO,
        progress_interval: Duration::ZERO,
    })
    .unwrap()
    .with_capabilities(kvbench::Database::capabilities(memory.as_ref()));

    for (name, spec) in standard_cases(memory.clone(), &config).unwrap() {
        scheduler.add(name, spec).unwrap();
    }
    let summary = scheduler.run().await.unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.cases.len(), 6);
    assert!(summary.cases.iter().all(|c| c.mean_ms().is_some()));
    assert_eq!(summary.case("bulk get").unwrap().bulk_factor, 20);
    assert!(memory.store_names().is_empty());
}
