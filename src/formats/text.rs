//! Plain text analyzer.

use super::{char_len, preview_line};
use crate::types::{InspectorOptions, Payload};

/// Length, line count and a bounded quoted preview of a string payload.
///
/// Returns `None` for any non-string payload.
pub fn analyze(payload: &Payload, options: &InspectorOptions) -> Option<Vec<String>> {
    let Payload::Text(text) = payload else {
        return None;
    };

    Some(vec![
        format!("Length: {} characters", char_len(text)),
        format!("Lines: {}", line_count(text)),
        preview_line("Content", text, options.text_preview_chars, true),
    ])
}

/// Number of `\n`-separated segments; an empty string has one line.
pub fn line_count(text: &str) -> usize {
    memchr::memchr_iter(b'\n', text.as_bytes()).count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        analyze(&Payload::Text(text.to_string()), &InspectorOptions::new()).unwrap()
    }

    #[test]
    fn test_short_text() {
        assert_eq!(
            lines("hello"),
            vec![
                "Length: 5 characters".to_string(),
                "Lines: 1".to_string(),
                "Content: \"hello\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_exactly_200_chars_untruncated() {
        let text = "x".repeat(200);
        let out = lines(&text);
        assert_eq!(out[0], "Length: 200 characters");
        assert_eq!(out[2], format!("Content: \"{text}\""));
    }

    #[test]
    fn test_201_chars_truncated() {
        let text = "x".repeat(201);
        let out = lines(&text);
        assert_eq!(out[0], "Length: 201 characters");
        assert_eq!(
            out[2],
            format!("Content (first 200 chars): \"{}...\"", "x".repeat(200))
        );
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("a\nb"), 2);
        assert_eq!(line_count("a\r\nb\n"), 3);
    }

    #[test]
    fn test_non_text_declined() {
        assert!(analyze(&Payload::RawBytes(vec![1]), &InspectorOptions::new()).is_none());
    }
}
