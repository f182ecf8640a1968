//! Printable-ratio text detection.

/// Fraction of printable bytes at which a window is considered text.
pub const TEXT_THRESHOLD: f64 = 0.7;

/// Whether a byte counts as printable.
///
/// ASCII 32..=126, tab, LF and CR are printable. Bytes >= 128 are given the
/// benefit of the doubt as UTF-8 lead or continuation bytes.
#[inline]
pub fn is_printable(b: u8) -> bool {
    matches!(b, 32..=126 | 9 | 10 | 13) || b >= 128
}

/// Number of printable bytes in `bytes`.
pub fn printable_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| is_printable(b)).count()
}

/// Fraction of printable bytes in `bytes`; 0.0 for an empty slice.
pub fn printable_ratio(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    printable_count(bytes) as f64 / bytes.len() as f64
}

/// Classify the first `length` bytes of `bytes` as likely text.
///
/// `length` is clamped to the slice. An empty window is never text.
pub fn is_likely_text(bytes: &[u8], length: usize) -> bool {
    is_likely_text_with_threshold(bytes, length, TEXT_THRESHOLD)
}

/// [`is_likely_text`] with a custom threshold.
pub fn is_likely_text_with_threshold(bytes: &[u8], length: usize, threshold: f64) -> bool {
    let window = &bytes[..length.min(bytes.len())];
    if window.is_empty() {
        return false;
    }
    printable_count(window) as f64 >= window.len() as f64 * threshold
}
