#![warn(missing_docs)]
//! # kvbench
//!
//! Benchmark execution engine for keyed-storage backends.
//!
//! - **Phase state machine**: every case runs before → pre-measure → settle → measure →
//!   cycle → after, one case and one phase at a time
//! - **Bulk-normalized timing**: a case performing `k` operations per call reports per-op cost
//! - **Cooperative cancellation**: `cancel()` takes effect at the next checkpoint and
//!   still runs the current case's `after` hook
//! - **Failure isolation**: a failing case is reported and the run continues
//! - **Capability-aware suite**: standard cases are skipped when a backend lacks the
//!   optional operation they need
//!
//! ## Quick Start
//!
//! ```ignore
//! use kvbench::prelude::*;
//! use std::sync::Arc;
//!
//! let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
//! let scheduler = Scheduler::new(RunOptions::default())?
//!     .with_capabilities(db.capabilities());
//! for (name, spec) in standard_cases(db, &WorkloadConfig::default())? {
//!     scheduler.add(name, spec)?;
//! }
//! let summary = scheduler.run().await?;
//! ```
//!
//! ## Custom Cases
//!
//! ```ignore
//! scheduler.add(
//!     "sleep",
//!     CaseSpec::new().bulk_factor(10).measure(|_| async {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         Ok(())
//!     }),
//! )?;
//! ```

pub use kvbench_core::{
    AccessMode, BenchError, CancelHandle, Capabilities, Case, CaseOutcome, CaseSpec, CaseStatus,
    CycleReport, Database, IterationSample, MemoryDatabase, NoHooks, NoProgress, PayloadShape,
    Phase, PrefillSample, ProgressPhase, ProgressSink, RunHooks, RunOptions, RunOutcome,
    RunSummary, SampleRecorder, Scheduler, StoreError, Value, WorkloadConfig, standard_cases,
};

pub use kvbench_report::{
    OutputFormat, Report, ReportConfig, ReportMeta, build_report, format_human_output,
    generate_csv_report, generate_json_report,
};

pub use kvbench_stats::{LatencySummary, RunningMean, compute_summary};

pub use kvbench_cli::{Cli, KvbenchConfig, run, run_with_cli};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AccessMode, BenchError, Capabilities, CaseSpec, Database, MemoryDatabase, RunHooks,
        RunOptions, RunOutcome, Scheduler, StoreError, WorkloadConfig, standard_cases,
    };
}
