//! Report Building
//!
//! Turns a [`RunSummary`] plus the per-iteration samples a recorder collected into a
//! [`Report`]. Latency summaries are independent per case and computed with Rayon.

use crate::report::{CaseReportResult, CaseReportStatus, Report, ReportMeta, ReportSummary};
use kvbench_core::{CaseStatus, RunOutcome, RunSummary};
use kvbench_stats::compute_summary;
use rayon::prelude::*;
use std::collections::HashMap;

/// Build a complete report
///
/// `samples` maps case names to per-iteration milliseconds; cases without samples get
/// no latency summary.
pub fn build_report(
    run: &RunSummary,
    samples: &HashMap<String, Vec<f64>>,
    meta: ReportMeta,
) -> Report {
    let results: Vec<CaseReportResult> = run
        .cases
        .par_iter()
        .map(|case| {
            let latency = samples
                .get(&case.name)
                .filter(|s| !s.is_empty())
                .map(|s| compute_summary(s));

            let mut result = CaseReportResult {
                name: case.name.clone(),
                status: CaseReportStatus::Completed,
                bulk_factor: case.bulk_factor,
                iterations: None,
                mean_ms: None,
                ops_per_sec: None,
                latency,
                error: None,
                missing: None,
                elapsed_ms: case.elapsed.as_secs_f64() * 1000.0,
            };

            match &case.status {
                CaseStatus::Completed {
                    mean_ms,
                    iterations,
                } => {
                    result.iterations = Some(*iterations);
                    result.mean_ms = Some(*mean_ms);
                    result.ops_per_sec = (*mean_ms > 0.0).then(|| 1000.0 / mean_ms);
                }
                CaseStatus::Failed { error } => {
                    result.status = CaseReportStatus::Failed;
                    result.error = Some(error.to_string());
                }
                CaseStatus::Aborted => result.status = CaseReportStatus::Aborted,
                CaseStatus::Skipped { missing } => {
                    result.status = CaseReportStatus::Skipped;
                    result.missing = Some(missing.to_string());
                    result.latency = None;
                }
            }
            result
        })
        .collect();

    let mut summary = ReportSummary {
        total_cases: results.len(),
        run_aborted: run.outcome == RunOutcome::Aborted,
        total_duration_ms: run.elapsed.as_secs_f64() * 1000.0,
        ..Default::default()
    };
    for result in &results {
        match result.status {
            CaseReportStatus::Completed => summary.completed += 1,
            CaseReportStatus::Failed => summary.failed += 1,
            CaseReportStatus::Aborted => summary.aborted += 1,
            CaseReportStatus::Skipped => summary.skipped += 1,
        }
    }

    Report {
        meta,
        results,
        summary,
    }
}
