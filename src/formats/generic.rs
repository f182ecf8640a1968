//! Generic fallback analyzer.
//!
//! Dispatches on the payload variant rather than the format name and is
//! always safe: every nested failure (stream peek, property getter) becomes
//! an inline line instead of an error.

use super::bytes::stream_summary;
use super::{char_len, hex_dump, preview_line};
use crate::heuristics::is_likely_text_with_threshold;
use crate::introspect::Introspect;
use crate::stream::{peek_head, ByteStream};
use crate::types::{ArrayValue, InspectorOptions, Payload};

/// Inspect any payload by its actual variant.
pub fn analyze(payload: &Payload, options: &InspectorOptions) -> Vec<String> {
    match payload {
        Payload::Null => Vec::new(),
        Payload::Text(text) => vec![
            format!("String Length: {}", char_len(text)),
            preview_line("Content", text, options.text_preview_chars, true),
        ],
        Payload::PathList(paths) => {
            array_lines(&ArrayValue::new("String", paths.clone()), options)
        }
        Payload::RawBytes(bytes) => {
            let mut lines = vec![format!("Byte Array Length: {}", bytes.len())];
            if bytes.len() <= options.generic_hex_bytes {
                lines.push(format!("Bytes: {}", hex_dump(bytes)));
            }
            lines
        }
        Payload::Stream(stream) => stream_lines(stream.as_ref(), options),
        Payload::Array(array) => array_lines(array, options),
        Payload::Image(meta) => object_lines(meta, options),
        Payload::Generic(object) => object_lines(object.as_ref(), options),
    }
}

/// Stream summary plus a preview of its first bytes.
///
/// The preview is read from offset 0 and the stream's position is restored
/// afterwards, whether or not the read succeeded.
pub fn stream_lines(stream: &dyn ByteStream, options: &InspectorOptions) -> Vec<String> {
    let mut lines = stream_summary(stream, true);

    let non_empty = matches!(stream.is_empty(), Ok(false));
    if !(stream.can_seek() && stream.can_read() && non_empty) {
        return lines;
    }

    match peek_head(stream, options.stream_peek_bytes) {
        Ok(head) if head.is_empty() => {}
        Ok(head) => {
            lines.push(format!("First {} bytes: {}", head.len(), hex_dump(&head)));
            if is_likely_text_with_threshold(&head, head.len(), options.text_threshold) {
                let text = String::from_utf8_lossy(&head)
                    .replace('\r', "\\r")
                    .replace('\n', "\\n");
                lines.push(format!("As Text: \"{text}\""));
            }
        }
        Err(e) => {
            tracing::debug!(stream = stream.type_name(), error = %e, "stream peek failed");
            lines.push(format!("Error reading stream content: {e}"));
        }
    }
    lines
}

/// Element type, length and, for short arrays, every element.
pub fn array_lines(array: &ArrayValue, options: &InspectorOptions) -> Vec<String> {
    let mut lines = vec![
        format!("Array Type: {}", array.element_type),
        format!("Array Length: {}", array.items.len()),
    ];
    if array.items.len() <= options.max_array_items {
        lines.extend(
            array
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("  [{i}]: {item}")),
        );
    }
    lines
}

/// Up to `max_properties` readable, non-indexed, non-denied properties.
///
/// A failing getter is shown as `Name: Error - message`.
pub fn object_lines(object: &dyn Introspect, options: &InspectorOptions) -> Vec<String> {
    let mut lines = vec!["Object Properties:".to_string()];
    let safe = object
        .properties()
        .into_iter()
        .filter(|p| p.readable && !p.indexed && !options.is_denied(&p.name))
        .take(options.max_properties);

    for prop in safe {
        match object.property(&prop.name) {
            Ok(value) => lines.push(format!("  {}: {value}", prop.name)),
            Err(e) => lines.push(format!("  {}: Error - {e}", prop.name)),
        }
    }
    lines
}
