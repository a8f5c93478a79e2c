#![warn(missing_docs)]
//! kvbench Core - Execution Engine
//!
//! This crate runs benchmark cases against keyed-storage backends:
//! - `Scheduler` driving each case through before → pre-measure → measure → after
//! - Cooperative cancellation through `CancelHandle`
//! - Throttled progress reporting for the pre-measure and measure phases
//! - `Database` capability trait plus a reference `MemoryDatabase`
//! - The standard workload suite (`standard_cases`)

mod cancel;
mod case;
mod database;
mod error;
mod hooks;
mod memory;
mod progress;
mod runner;
mod workload;

pub use cancel::{CancelHandle, Phase};
pub use case::{Case, CaseSpec, HookFuture, IndexHook, NameHook};
pub use database::{AccessMode, Capabilities, Database};
pub use error::{BenchError, StoreError};
pub use hooks::{CycleReport, IterationSample, NoHooks, PrefillSample, RunHooks, SampleRecorder};
pub use memory::MemoryDatabase;
pub use progress::{NoProgress, ProgressPhase, ProgressSink, ThrottledProgress, phase_fraction};
pub use runner::{
    CaseOutcome, CaseStatus, DEFAULT_ITERATIONS, DEFAULT_PROGRESS_INTERVAL, DEFAULT_SETTLE_DELAY,
    RunOptions, RunOutcome, RunSummary, Scheduler,
};
pub use workload::{
    GROUP_COUNT, GROUP_FIELD, PayloadShape, WorkloadConfig, generate_payload, standard_cases,
};

/// Record value type stored by every backend
pub use serde_json::Value;
