//! Payload Inspector - Clipboard and Drag-and-Drop Payload Introspection
//!
//! This library enumerates every named format offered by a data-transfer
//! payload (a clipboard snapshot or a drag-and-drop event), retrieves the
//! value behind each format, and produces a structured, human-readable
//! report describing it.
//!
//! # Features
//!
//! - **Format Dispatch**: Routes well-known formats (text, file lists, HTML,
//!   RTF, bitmaps, file contents) to dedicated analyzers
//! - **Generic Fallback**: Describes any other value by its runtime shape
//!   (strings, arrays, byte buffers, streams, property-bearing objects)
//! - **Failure Isolation**: One unreadable format never aborts the report
//! - **Non-destructive Streams**: Stream peeks restore the read position
//!
//! # Quick Start
//!
//! ```rust
//! use payload_inspector::{build_report, render, MemorySource};
//!
//! let source = MemorySource::new().with_text("Text", "hello");
//! let report = build_report(&source, "CLIPBOARD")?;
//! assert_eq!(report.results()[0].value_type_name(), "string");
//! print!("{}", render(&report));
//! # Ok::<(), payload_inspector::InspectorError>(())
//! ```
//!
//! # Sources
//!
//! - [`MemorySource`]: assembled in code
//! - [`ManifestSource`]: described by a JSON manifest
//! - [`drop_source`]: a file drop of filesystem paths
//! - `ClipboardSource`: the system clipboard (feature `clipboard`)

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]

pub mod error;
pub mod formats;
pub mod formatter;
pub mod heuristics;
pub mod introspect;
pub mod report;
pub mod source;
pub mod stream;
pub mod types;

pub use error::{InspectorError, PropertyError, Result, SourceError};
pub use formatter::{
    render, render_failure, HumanFormatter, JsonFormatter, ReportFormatter, ShortFormatter,
};
pub use heuristics::{is_likely_text, TEXT_THRESHOLD};
pub use introspect::{Introspect, Property, PropertyBag};
pub use report::{build_report, build_report_with_options, inspect_format};
pub use source::{
    drop_source, DataSource, ManifestSource, MemorySource, CLIPBOARD_LABEL, DRAG_DROP_LABEL,
    FILE_DROP_FORMAT,
};
pub use stream::{ByteStream, MemoryStream, ReaderStream, StreamCaps};
pub use types::{
    AnalysisReport, ArrayValue, FormatName, FormatResult, ImageMeta, InspectorOptions, Payload,
};

#[cfg(feature = "clipboard")]
pub use source::ClipboardSource;

/// Build and render a report in one step.
///
/// An enumeration failure is rendered as an error block instead of a report,
/// so the returned text is always displayable.
pub fn inspect_to_string<S: DataSource + ?Sized>(source: &S, source_label: &str) -> String {
    match build_report(source, source_label) {
        Ok(report) => render(&report),
        Err(e) => render_failure(&e),
    }
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
