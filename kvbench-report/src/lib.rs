#![warn(missing_docs)]
//! kvbench Report - Output Formats
//!
//! Builds a [`Report`] from a finished run and renders it as:
//! - human-readable terminal text
//! - JSON (machine-readable)
//! - CSV (spreadsheet-compatible)

mod build;
mod csv;
mod human;
mod json;
mod report;

pub use build::build_report;
pub use csv::generate_csv_report;
pub use human::format_human_output;
pub use json::generate_json_report;
pub use report::{
    CaseReportResult, CaseReportStatus, Report, ReportConfig, ReportMeta, ReportSummary,
    SCHEMA_VERSION,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl OutputFormat {
    /// Render a report in this format
    pub fn render(self, report: &Report) -> Result<String, serde_json::Error> {
        Ok(match self {
            OutputFormat::Human => format_human_output(report),
            OutputFormat::Json => generate_json_report(report)?,
            OutputFormat::Csv => generate_csv_report(report),
        })
    }

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Human => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}
