//! HTML and RTF analyzer.

use super::{char_len, preview_line, MarkupKind};
use crate::types::{InspectorOptions, Payload};

/// Length and a bounded, unquoted preview of markup text.
///
/// Returns `None` for any non-string payload.
pub fn analyze(
    kind: MarkupKind,
    payload: &Payload,
    options: &InspectorOptions,
) -> Option<Vec<String>> {
    let Payload::Text(markup) = payload else {
        return None;
    };

    let (label, limit) = match kind {
        MarkupKind::Html => ("HTML", options.html_preview_chars),
        MarkupKind::Rtf => ("RTF", options.rtf_preview_chars),
    };

    Some(vec![
        format!("{label} Length: {} characters", char_len(markup)),
        preview_line(&format!("{label} Content"), markup, limit, false),
    ])
}
