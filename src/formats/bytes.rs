//! Byte-bearing payload analyzer (`FileContents`).

use super::hex_dump;
use crate::stream::ByteStream;
use crate::types::{InspectorOptions, Payload};
use std::io;

/// Stream capabilities and position, or byte length and a hex dump.
///
/// Returns `None` for payloads that carry no bytes.
pub fn analyze(payload: &Payload, options: &InspectorOptions) -> Option<Vec<String>> {
    match payload {
        Payload::Stream(stream) => Some(stream_summary(stream.as_ref(), false)),
        Payload::RawBytes(bytes) => {
            let limit = options.file_contents_hex_bytes;
            let mut lines = vec![format!("Byte Array Length: {}", bytes.len())];
            if bytes.len() <= limit {
                lines.push(format!("Bytes: {}", hex_dump(bytes)));
            } else {
                lines.push(format!("First {limit} bytes: {}", hex_dump(&bytes[..limit])));
            }
            Some(lines)
        }
        _ => None,
    }
}

/// Type, length, position and capability lines for a stream.
///
/// A failing length or position accessor is reported in place of the value.
pub fn stream_summary(stream: &dyn ByteStream, include_write: bool) -> Vec<String> {
    let mut lines = vec![
        format!("Stream Type: {}", stream.type_name()),
        format!("Length: {}", or_unavailable(stream.len().map(|n| format!("{n} bytes")))),
        format!("Position: {}", or_unavailable(stream.position().map(|p| p.to_string()))),
        format!("Can Read: {}", stream.can_read()),
        format!("Can Seek: {}", stream.can_seek()),
    ];
    if include_write {
        lines.push(format!("Can Write: {}", stream.can_write()));
    }
    lines
}

fn or_unavailable(value: io::Result<String>) -> String {
    value.unwrap_or_else(|e| format!("unavailable ({e})"))
}
