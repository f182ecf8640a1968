//! Format dispatch and format-specific analyzers.
//!
//! This module routes a format name to the analyzer for its family:
//! - Plain text (`Text`, `UnicodeText`, `OEMText`)
//! - File-path lists (`Files`, `FileDrop`)
//! - Markup text (`HTML Format`, `text/html`, `Rtf`)
//! - Raster images (`Bitmap`, `DIB`)
//! - Byte-bearing payloads (`FileContents`, `FileContentsW`)
//! - Everything else goes to the generic analyzer
//!
//! Matching is on the name only. An analyzer that receives a payload
//! variant it does not understand declines, and the generic analyzer
//! inspects the actual variant instead.

pub mod bytes;
pub mod generic;
pub mod image;
pub mod markup;
pub mod paths;
pub mod text;

use crate::types::{FormatName, InspectorOptions, Payload};

/// Recognized format names, case-folded.
pub mod names {
    /// Plain text family.
    pub const PLAIN_TEXT: &[&str] = &["text", "unicodetext", "oemtext"];

    /// File-path list family.
    pub const PATH_LIST: &[&str] = &["files", "filedrop"];

    /// HTML markup.
    pub const HTML: &[&str] = &["html format", "text/html"];

    /// Rich text.
    pub const RTF: &[&str] = &["rtf"];

    /// Raster images.
    pub const IMAGE: &[&str] = &["bitmap", "dib"];

    /// Virtual file contents.
    pub const FILE_CONTENTS: &[&str] = &["filecontents", "filecontentsw"];
}

/// Which markup flavour a markup analyzer handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    /// HTML fragment
    Html,
    /// Rich Text Format
    Rtf,
}

/// Analyzer selected for a format name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    /// Plain text statistics and preview
    PlainText,
    /// Per-path filesystem metadata
    PathList,
    /// Markup length and preview
    Markup(MarkupKind),
    /// Image dimensions and resolution
    Image,
    /// Stream or byte-array summary
    FileContents,
    /// Variant-driven fallback
    Generic,
}

/// Name table, matched top to bottom.
const DISPATCH_TABLE: &[(&[&str], AnalyzerKind)] = &[
    (names::PLAIN_TEXT, AnalyzerKind::PlainText),
    (names::PATH_LIST, AnalyzerKind::PathList),
    (names::HTML, AnalyzerKind::Markup(MarkupKind::Html)),
    (names::RTF, AnalyzerKind::Markup(MarkupKind::Rtf)),
    (names::IMAGE, AnalyzerKind::Image),
    (names::FILE_CONTENTS, AnalyzerKind::FileContents),
];

/// Select the analyzer for a format name.
pub fn classify(format: &FormatName) -> AnalyzerKind {
    let normalized = format.normalized();
    DISPATCH_TABLE
        .iter()
        .find(|(names, _)| names.contains(&normalized.as_str()))
        .map_or(AnalyzerKind::Generic, |(_, kind)| *kind)
}

/// Run the analyzer for `kind` over `payload`, producing detail lines.
///
/// Falls back to the generic analyzer when the selected analyzer does not
/// understand the payload variant.
pub fn analyze(kind: AnalyzerKind, payload: &Payload, options: &InspectorOptions) -> Vec<String> {
    let specific = match kind {
        AnalyzerKind::PlainText => text::analyze(payload, options),
        AnalyzerKind::PathList => paths::analyze(payload),
        AnalyzerKind::Markup(markup) => markup::analyze(markup, payload, options),
        AnalyzerKind::Image => Some(image::analyze(payload)),
        AnalyzerKind::FileContents => bytes::analyze(payload, options),
        AnalyzerKind::Generic => None,
    };

    specific.unwrap_or_else(|| {
        if kind != AnalyzerKind::Generic {
            tracing::debug!(
                ?kind,
                value_type = %payload.type_name(),
                "payload variant mismatch, using generic analyzer"
            );
        }
        generic::analyze(payload, options)
    })
}

/// Render `label: text` with a bounded preview.
///
/// Text up to `limit` characters is shown whole; longer text shows the first
/// `limit` characters followed by `...`, and the label notes the cut.
pub fn preview_line(label: &str, text: &str, limit: usize, quoted: bool) -> String {
    let q = if quoted { "\"" } else { "" };
    match text.char_indices().nth(limit) {
        None => format!("{label}: {q}{text}{q}"),
        Some((cut, _)) => format!(
            "{label} (first {limit} chars): {q}{}...{q}",
            &text[..cut]
        ),
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Hex dump as upper-case byte pairs joined by `-`.
pub fn hex_dump(bytes: &[u8]) -> String {
    let encoded = hex::encode_upper(bytes);
    let mut out = String::with_capacity(encoded.len() + bytes.len());
    for (i, pair) in encoded.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.extend(pair.iter().map(|&c| char::from(c)));
    }
    out
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
