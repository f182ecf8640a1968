//! Output formatters for analysis reports.
//!
//! This module provides trait-based formatters for rendering reports in
//! various output formats (human-readable, JSON, compact). The human layout
//! is the one shown to users and is reproduced by [`render`].

use crate::error::InspectorError;
use crate::types::{AnalysisReport, FormatResult};
use chrono::{DateTime, Local};

/// Width of the line closing every report or error block.
pub const SEPARATOR_WIDTH: usize = 80;

/// Timestamp layout used in report headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for formatting analysis reports.
///
/// Implementors provide methods for rendering each component of a report,
/// plus a method to render the complete report.
pub trait ReportFormatter {
    /// Format the report header (source label and capture time).
    fn format_header(&self, report: &AnalysisReport) -> String;

    /// Format the list of available formats.
    fn format_summary(&self, report: &AnalysisReport) -> Option<String>;

    /// Format one per-format section.
    fn format_result(&self, result: &FormatResult) -> Option<String>;

    /// Format the closing block.
    fn format_footer(&self, report: &AnalysisReport) -> Option<String>;

    /// Format the complete report.
    ///
    /// Default implementation concatenates all component outputs.
    fn format_report(&self, report: &AnalysisReport) -> String {
        let mut parts = vec![self.format_header(report)];

        if let Some(s) = self.format_summary(report) {
            parts.push(s);
        }
        parts.extend(report.results().iter().filter_map(|r| self.format_result(r)));
        if let Some(s) = self.format_footer(report) {
            parts.push(s);
        }

        parts.join("")
    }
}

/// Render a report in the human layout.
pub fn render(report: &AnalysisReport) -> String {
    HumanFormatter::new().format_report(report)
}

/// Render a fatal analysis failure as a single error block.
pub fn render_failure(error: &InspectorError) -> String {
    format!("ERROR: {error}\n{}\n\n", separator())
}

/// The separator line, without newline.
pub fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Default file name for a saved report.
pub fn default_save_name(now: DateTime<Local>) -> String {
    format!("DataTransferAnalysis_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Human-readable output formatter.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    /// Quiet mode (type lines only, no detail lines)
    pub quiet: bool,
}

impl HumanFormatter {
    /// Create a new human formatter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quiet formatter.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format_header(&self, report: &AnalysisReport) -> String {
        format!(
            "=== {} DATA ANALYSIS ===\nTimestamp: {}\n\n",
            report.source_label(),
            report.captured_at().format(TIMESTAMP_FORMAT)
        )
    }

    fn format_summary(&self, report: &AnalysisReport) -> Option<String> {
        let mut s = format!("Available Formats ({}):\n", report.len());
        for result in report.results() {
            s.push_str(&format!("  • {}\n", result.format()));
        }
        s.push('\n');
        Some(s)
    }

    fn format_result(&self, result: &FormatResult) -> Option<String> {
        let mut s = format!("--- FORMAT: {} ---\n", result.format());

        if let Some(error) = result.retrieval_error() {
            s.push_str(&format!("  Error retrieving data: {error}\n"));
        } else if result.is_null() {
            s.push_str("  Data: null\n");
        } else {
            s.push_str(&format!("  Type: {}\n", result.value_type_name()));
            if !self.quiet {
                s.push_str(&format!("  ToString(): {}\n", result.string_repr()));
                for line in result.detail_lines() {
                    s.push_str(&format!("  {line}\n"));
                }
            }
        }

        s.push('\n');
        Some(s)
    }

    fn format_footer(&self, _report: &AnalysisReport) -> Option<String> {
        Some(format!("\n{}\n\n", separator()))
    }
}

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    /// Create a new JSON formatter with pretty printing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact JSON formatter.
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_header(&self, _report: &AnalysisReport) -> String {
        String::new() // Handled in format_report
    }

    fn format_summary(&self, _report: &AnalysisReport) -> Option<String> {
        None // Handled in format_report
    }

    fn format_result(&self, _result: &FormatResult) -> Option<String> {
        None // Handled in format_report
    }

    fn format_footer(&self, _report: &AnalysisReport) -> Option<String> {
        None // Handled in format_report
    }

    fn format_report(&self, report: &AnalysisReport) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        let mut s = json.unwrap_or_else(|_| "{}".to_string());
        s.push('\n');
        s
    }
}

/// Compact one-line-per-format output formatter.
#[derive(Debug, Clone, Default)]
pub struct ShortFormatter;

impl ShortFormatter {
    /// Create a new short formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for ShortFormatter {
    fn format_header(&self, _report: &AnalysisReport) -> String {
        String::new()
    }

    fn format_summary(&self, _report: &AnalysisReport) -> Option<String> {
        None
    }

    fn format_result(&self, result: &FormatResult) -> Option<String> {
        let kind = if result.retrieval_error().is_some() {
            "error"
        } else {
            result.value_type_name()
        };
        Some(format!(
            "{}\t{}\t{}\n",
            result.format(),
            kind,
            result.detail_lines().len()
        ))
    }

    fn format_footer(&self, _report: &AnalysisReport) -> Option<String> {
        None
    }
}
