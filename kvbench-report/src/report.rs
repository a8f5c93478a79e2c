//! Report Data Structures

use chrono::{DateTime, Utc};
use kvbench_core::{RunOptions, WorkloadConfig};
use kvbench_stats::LatencySummary;
use serde::{Deserialize, Serialize};

/// Report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// Per-case results in execution order
    pub results: Vec<CaseReportResult>,
    /// Status counts
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version
    pub schema_version: u32,
    /// kvbench version that produced the report
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Backend under test
    pub backend: String,
    /// Configuration the run used
    pub config: ReportConfig,
}

impl ReportMeta {
    /// Metadata stamped with the current time
    pub fn new(backend: impl Into<String>, config: ReportConfig) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            backend: backend.into(),
            config,
        }
    }
}

/// Run configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default measured iterations per case
    pub iterations: u64,
    /// Settle delay in milliseconds
    pub settle_delay_ms: u64,
    /// Workload parameters, when the standard suite was run
    pub workload: Option<WorkloadConfig>,
}

impl ReportConfig {
    /// Capture scheduler options and the optional workload
    pub fn new(options: &RunOptions, workload: Option<WorkloadConfig>) -> Self {
        Self {
            iterations: options.iterations,
            settle_delay_ms: u64::try_from(options.settle_delay.as_millis()).unwrap_or(u64::MAX),
            workload,
        }
    }
}

/// Individual case result in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReportResult {
    /// Case name
    pub name: String,
    /// Terminal status
    pub status: CaseReportStatus,
    /// Logical operations per measured call
    pub bulk_factor: u32,
    /// Measured iterations, for completed cases
    pub iterations: Option<u64>,
    /// Scheduler-reported mean per-operation milliseconds
    pub mean_ms: Option<f64>,
    /// Throughput implied by `mean_ms`
    pub ops_per_sec: Option<f64>,
    /// Distribution of the recorded per-iteration samples
    pub latency: Option<LatencySummary>,
    /// Failure message
    pub error: Option<String>,
    /// Missing capabilities, for skipped cases
    pub missing: Option<String>,
    /// Wall-clock time spent on the case
    pub elapsed_ms: f64,
}

/// Case status as reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseReportStatus {
    /// Measured successfully
    Completed,
    /// A hook failed
    Failed,
    /// Cancelled mid-case
    Aborted,
    /// Backend lacks a required capability
    Skipped,
}

/// Summary counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Cases that reached a terminal status
    pub total_cases: usize,
    /// Completed cases
    pub completed: usize,
    /// Failed cases
    pub failed: usize,
    /// Aborted cases
    pub aborted: usize,
    /// Skipped cases
    pub skipped: usize,
    /// Whether the run was cancelled
    pub run_aborted: bool,
    /// Total run time in milliseconds
    pub total_duration_ms: f64,
}
