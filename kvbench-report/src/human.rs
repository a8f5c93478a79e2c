//! Human Output
//!
//! Terminal-friendly rendering with a status icon per case (✓/✗/⊘/■).

use crate::report::{CaseReportStatus, Report};

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("kvbench Results ({})\n", report.meta.backend));
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for result in &report.results {
        let status_icon = match result.status {
            CaseReportStatus::Completed => "✓",
            CaseReportStatus::Failed => "✗",
            CaseReportStatus::Skipped => "⊘",
            CaseReportStatus::Aborted => "■",
        };
        output.push_str(&format!("  {} {}", status_icon, result.name));
        if result.bulk_factor > 1 {
            output.push_str(&format!("  (×{})", result.bulk_factor));
        }
        output.push('\n');

        if let (Some(mean), Some(iterations)) = (result.mean_ms, result.iterations) {
            output.push_str(&format!(
                "      mean: {:.4} ms/op  iterations: {}\n",
                mean, iterations
            ));
        }
        if let Some(latency) = &result.latency {
            output.push_str(&format!(
                "      median: {:.4} ms  stddev: {:.4} ms  min: {:.4} ms  max: {:.4} ms\n",
                latency.median, latency.std_dev, latency.min, latency.max
            ));
            output.push_str(&format!(
                "      p90: {:.4} ms  p95: {:.4} ms  p99: {:.4} ms\n",
                latency.p90, latency.p95, latency.p99
            ));
        }
        if let Some(throughput) = result.ops_per_sec {
            output.push_str(&format!("      throughput: {:.2} ops/sec\n", throughput));
        }
        if let Some(error) = &result.error {
            output.push_str(&format!("      error: {}\n", error));
        }
        if let Some(missing) = &result.missing {
            output.push_str(&format!("      missing capability: {}\n", missing));
        }
        output.push('\n');
    }

    let summary = &report.summary;
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "Summary: {} completed, {} failed, {} skipped, {} aborted ({:.0} ms)\n",
        summary.completed,
        summary.failed,
        summary.skipped,
        summary.aborted,
        summary.total_duration_ms
    ));
    if summary.run_aborted {
        output.push_str("Run was cancelled before all cases finished\n");
    }

    output
}
