//! Payload enumeration and report assembly.

use crate::error::{InspectorError, Result};
use crate::formats;
use crate::source::DataSource;
use crate::types::{AnalysisReport, FormatName, FormatResult, InspectorOptions};

/// Inspect every format of `source` with default options.
///
/// Fails only when the format list itself cannot be obtained. A format whose
/// value cannot be retrieved is recorded with its error and the remaining
/// formats are still inspected.
pub fn build_report<S: DataSource + ?Sized>(
    source: &S,
    source_label: &str,
) -> Result<AnalysisReport> {
    build_report_with_options(source, source_label, &InspectorOptions::new())
}

/// Inspect every format of `source` with custom options.
pub fn build_report_with_options<S: DataSource + ?Sized>(
    source: &S,
    source_label: &str,
    options: &InspectorOptions,
) -> Result<AnalysisReport> {
    let formats = source.list_formats().map_err(|err| {
        tracing::error!(label = source_label, error = %err, "format enumeration failed");
        InspectorError::Enumeration {
            label: source_label.to_string(),
            source: err,
        }
    })?;

    tracing::debug!(label = source_label, count = formats.len(), "enumerated formats");

    let results: Vec<FormatResult> = formats
        .into_iter()
        .map(|format| inspect_format(source, format, options))
        .collect();

    let report = AnalysisReport::new(source_label, results);
    tracing::debug!(
        label = source_label,
        formats = report.len(),
        failures = report.failure_count(),
        "report built"
    );
    Ok(report)
}

/// Retrieve and analyze one format, capturing a retrieval failure.
pub fn inspect_format<S: DataSource + ?Sized>(
    source: &S,
    format: FormatName,
    options: &InspectorOptions,
) -> FormatResult {
    let payload = match source.get_value(&format) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(%format, error = %e, "format retrieval failed");
            return FormatResult::retrieval_failed(format, e.to_string());
        }
    };

    if payload.is_null() {
        return FormatResult::null(format);
    }

    let kind = formats::classify(&format);
    tracing::debug!(%format, ?kind, value_type = %payload.type_name(), "analyzing format");
    let details = formats::analyze(kind, &payload, options);

    FormatResult::value(format, payload.type_name(), payload.describe(), details)
}
