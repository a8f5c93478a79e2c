//! CSV Output
//!
//! One row per case. Empty cells mean "not applicable" (for example the latency columns
//! of a skipped case).

use crate::report::{CaseReportStatus, Report};

const HEADER: &str = "name,status,bulk_factor,iterations,mean_ms,ops_per_sec,median_ms,std_dev_ms,min_ms,max_ms,p95_ms,p99_ms,error";

/// Generate a CSV report
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for result in &report.results {
        let status = match result.status {
            CaseReportStatus::Completed => "completed",
            CaseReportStatus::Failed => "failed",
            CaseReportStatus::Aborted => "aborted",
            CaseReportStatus::Skipped => "skipped",
        };
        let latency = result.latency.as_ref();
        let message = result.error.as_deref().or(result.missing.as_deref());

        let cells = [
            escape(&result.name),
            status.to_string(),
            result.bulk_factor.to_string(),
            optional(result.iterations),
            optional(result.mean_ms.map(|v| format!("{v:.6}"))),
            optional(result.ops_per_sec.map(|v| format!("{v:.2}"))),
            optional(latency.map(|l| format!("{:.6}", l.median))),
            optional(latency.map(|l| format!("{:.6}", l.std_dev))),
            optional(latency.map(|l| format!("{:.6}", l.min))),
            optional(latency.map(|l| format!("{:.6}", l.max))),
            optional(latency.map(|l| format!("{:.6}", l.p95))),
            optional(latency.map(|l| format!("{:.6}", l.p99))),
            message.map(escape).unwrap_or_default(),
        ];
        output.push_str(&cells.join(","));
        output.push('\n');
    }

    output
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
