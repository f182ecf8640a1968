//! Core types for the payload inspector.
//!
//! This module defines the payload model handed over by a data source,
//! the immutable per-format results, the assembled report, and the
//! options that bound every preview.

use crate::error::PropertyError;
use crate::introspect::{Introspect, Property};
use crate::stream::ByteStream;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

// =============================================================================
// Format names
// =============================================================================

/// Case-insensitive data-transfer format identifier.
///
/// Keeps the spelling reported by the source for display, but compares and
/// hashes on the case-folded form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatName(String);

impl FormatName {
    /// Create a format name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as reported by the source.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for matching.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for FormatName {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 || self.normalized() == other.normalized()
    }
}

impl Eq for FormatName {}

impl Hash for FormatName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialEq<str> for FormatName {
    fn eq(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl PartialEq<&str> for FormatName {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<&str> for FormatName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FormatName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for FormatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Payload model
// =============================================================================

/// Raster image metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Horizontal resolution.
    pub dpi_x: f64,
    /// Vertical resolution.
    pub dpi_y: f64,
    /// Pixel format name (e.g. "Bgra32").
    pub pixel_format: String,
}

impl ImageMeta {
    /// Metadata at the default 96 DPI.
    pub fn new(width: u32, height: u32, pixel_format: impl Into<String>) -> Self {
        Self {
            width,
            height,
            dpi_x: 96.0,
            dpi_y: 96.0,
            pixel_format: pixel_format.into(),
        }
    }

    /// Override the resolution.
    #[must_use]
    pub fn with_dpi(mut self, dpi_x: f64, dpi_y: f64) -> Self {
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
        self
    }
}

impl fmt::Display for ImageMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.pixel_format)
    }
}

impl Introspect for ImageMeta {
    fn type_name(&self) -> &str {
        "ImageMeta"
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn properties(&self) -> Vec<Property> {
        ["PixelWidth", "PixelHeight", "DpiX", "DpiY", "Format"]
            .into_iter()
            .map(Property::readable)
            .collect()
    }

    fn property(&self, name: &str) -> Result<String, PropertyError> {
        match name {
            "PixelWidth" => Ok(self.width.to_string()),
            "PixelHeight" => Ok(self.height.to_string()),
            "DpiX" => Ok(self.dpi_x.to_string()),
            "DpiY" => Ok(self.dpi_y.to_string()),
            "Format" => Ok(self.pixel_format.clone()),
            _ => Err(PropertyError::missing(name)),
        }
    }
}

/// Homogeneous array of values, already rendered to strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Element type name.
    pub element_type: String,
    /// String form of each element.
    pub items: Vec<String>,
}

impl ArrayValue {
    /// Create an array value.
    pub fn new(element_type: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            element_type: element_type.into(),
            items,
        }
    }
}

/// The value retrieved for one format.
#[derive(Debug, Clone)]
pub enum Payload {
    /// The source returned no value.
    Null,
    /// A string.
    Text(String),
    /// A list of filesystem paths.
    PathList(Vec<String>),
    /// A byte sequence held in memory.
    RawBytes(Vec<u8>),
    /// A shared, possibly seekable stream.
    Stream(Rc<dyn ByteStream>),
    /// Raster image metadata.
    Image(ImageMeta),
    /// Any other array of values.
    Array(ArrayValue),
    /// An opaque object with reflectable properties.
    Generic(Rc<dyn Introspect>),
}

impl Payload {
    /// Wrap a stream.
    pub fn stream(stream: impl ByteStream + 'static) -> Self {
        Self::Stream(Rc::new(stream))
    }

    /// Wrap an introspectable object.
    pub fn object(value: impl Introspect + 'static) -> Self {
        Self::Generic(Rc::new(value))
    }

    /// Whether this is [`Payload::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Concrete value-type name shown in reports.
    pub fn type_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Text(_) => "string".to_string(),
            Self::PathList(_) => "string[]".to_string(),
            Self::RawBytes(_) => "byte[]".to_string(),
            Self::Stream(s) => s.type_name().to_string(),
            Self::Image(_) => "image".to_string(),
            Self::Array(a) => format!("{}[]", a.element_type),
            Self::Generic(o) => o.type_name().to_string(),
        }
    }

    /// String representation of the value.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Text(text) => text.clone(),
            Self::PathList(paths) => format!("string[{}]", paths.len()),
            Self::RawBytes(bytes) => format!("byte[{}]", bytes.len()),
            Self::Stream(s) => s.type_name().to_string(),
            Self::Image(image) => image.to_string(),
            Self::Array(a) => format!("{}[{}]", a.element_type, a.items.len()),
            Self::Generic(o) => o.describe(),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::RawBytes(bytes)
    }
}

impl From<ImageMeta> for Payload {
    fn from(image: ImageMeta) -> Self {
        Self::Image(image)
    }
}

// =============================================================================
// Results
// =============================================================================

/// Outcome of inspecting one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatResult {
    format: FormatName,
    value_type_name: String,
    string_repr: String,
    detail_lines: Vec<String>,
    retrieval_error: Option<String>,
    #[serde(default)]
    null: bool,
}

impl FormatResult {
    /// A successfully retrieved, non-null value.
    pub fn value(
        format: FormatName,
        value_type_name: impl Into<String>,
        string_repr: impl Into<String>,
        detail_lines: Vec<String>,
    ) -> Self {
        Self {
            format,
            value_type_name: value_type_name.into(),
            string_repr: string_repr.into(),
            detail_lines,
            retrieval_error: None,
            null: false,
        }
    }

    /// The source returned a null value.
    pub fn null(format: FormatName) -> Self {
        Self {
            format,
            value_type_name: "null".to_string(),
            string_repr: String::new(),
            detail_lines: Vec::new(),
            retrieval_error: None,
            null: true,
        }
    }

    /// Retrieval of the value failed.
    pub fn retrieval_failed(format: FormatName, error: impl Into<String>) -> Self {
        Self {
            format,
            value_type_name: String::new(),
            string_repr: String::new(),
            detail_lines: Vec::new(),
            retrieval_error: Some(error.into()),
            null: false,
        }
    }

    /// The format this result describes.
    pub fn format(&self) -> &FormatName {
        &self.format
    }

    /// Concrete value-type name; empty on retrieval failure.
    pub fn value_type_name(&self) -> &str {
        &self.value_type_name
    }

    /// String representation of the value.
    pub fn string_repr(&self) -> &str {
        &self.string_repr
    }

    /// Analyzer output, relative to the section indent.
    pub fn detail_lines(&self) -> &[String] {
        &self.detail_lines
    }

    /// Retrieval failure message, if any.
    pub fn retrieval_error(&self) -> Option<&str> {
        self.retrieval_error.as_deref()
    }

    /// Whether the value was null.
    pub fn is_null(&self) -> bool {
        self.null
    }
}

/// Ordered per-format results of one inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    source_label: String,
    captured_at: DateTime<Local>,
    results: Vec<FormatResult>,
}

impl AnalysisReport {
    /// Assemble a report captured now.
    pub fn new(source_label: impl Into<String>, results: Vec<FormatResult>) -> Self {
        Self::captured(source_label, Local::now(), results)
    }

    /// Assemble a report with an explicit capture time.
    pub fn captured(
        source_label: impl Into<String>,
        captured_at: DateTime<Local>,
        results: Vec<FormatResult>,
    ) -> Self {
        Self {
            source_label: source_label.into(),
            captured_at,
            results,
        }
    }

    /// Label of the source (e.g. "CLIPBOARD").
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// When the report was captured.
    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// Per-format results in enumeration order.
    pub fn results(&self) -> &[FormatResult] {
        &self.results
    }

    /// Number of formats inspected.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the source offered no formats.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of formats whose retrieval failed.
    pub fn failure_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.retrieval_error.is_some())
            .count()
    }
}

// =============================================================================
// Options
// =============================================================================

/// Limits and policies applied while inspecting.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorOptions {
    /// Characters of plain text shown before truncating
    pub text_preview_chars: usize,
    /// Characters of HTML shown before truncating
    pub html_preview_chars: usize,
    /// Characters of RTF shown before truncating
    pub rtf_preview_chars: usize,
    /// Bytes hex-dumped for file-contents payloads
    pub file_contents_hex_bytes: usize,
    /// Largest byte array hex-dumped by the generic analyzer
    pub generic_hex_bytes: usize,
    /// Bytes peeked from the head of a stream
    pub stream_peek_bytes: usize,
    /// Largest array whose elements are listed
    pub max_array_items: usize,
    /// Maximum number of object properties listed
    pub max_properties: usize,
    /// Printable ratio above which bytes are treated as text
    pub text_threshold: f64,
    /// Property names never read (their getters are known to fail)
    pub denied_properties: Vec<String>,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectorOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            text_preview_chars: 200,
            html_preview_chars: 300,
            rtf_preview_chars: 200,
            file_contents_hex_bytes: 50,
            generic_hex_bytes: 20,
            stream_peek_bytes: 32,
            max_array_items: 10,
            max_properties: 10,
            text_threshold: crate::heuristics::TEXT_THRESHOLD,
            denied_properties: vec!["ReadTimeout".to_string(), "WriteTimeout".to_string()],
        }
    }

    /// Create options with wider previews for deep debugging.
    pub fn verbose() -> Self {
        Self {
            text_preview_chars: 2000,
            html_preview_chars: 3000,
            rtf_preview_chars: 2000,
            file_contents_hex_bytes: 256,
            generic_hex_bytes: 256,
            stream_peek_bytes: 256,
            max_array_items: 100,
            max_properties: 50,
            ..Self::new()
        }
    }

    /// Whether a property name is on the denylist.
    pub fn is_denied(&self, property: &str) -> bool {
        self.denied_properties.iter().any(|d| d == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::PropertyBag;
    use crate::stream::MemoryStream;

    #[test]
    fn test_format_name_case_insensitive() {
        let a = FormatName::from("HTML Format");
        let b = FormatName::from("html format");
        assert_eq!(a, b);
        assert_eq!(a, "Html Format");
        assert_eq!(a.to_string(), "HTML Format");
        assert_eq!(a.normalized(), "html format");
    }

    #[test]
    fn test_format_name_hash_matches_eq() {
        let mut set = std::collections::HashSet::new();
        set.insert(FormatName::from("Text"));
        assert!(set.contains(&FormatName::from("TEXT")));
    }

    #[test]
    fn test_payload_type_names() {
        assert_eq!(Payload::from("hi").type_name(), "string");
        assert_eq!(Payload::PathList(vec![]).type_name(), "string[]");
        assert_eq!(Payload::RawBytes(vec![1]).type_name(), "byte[]");
        assert_eq!(Payload::stream(MemoryStream::new(vec![])).type_name(), "MemoryStream");
        assert_eq!(
            Payload::Array(ArrayValue::new("Int32", vec![])).type_name(),
            "Int32[]"
        );
        assert_eq!(Payload::object(PropertyBag::new("Widget")).type_name(), "Widget");
        assert_eq!(Payload::Null.type_name(), "null");
    }

    #[test]
    fn test_payload_describe() {
        assert_eq!(Payload::from("hello").describe(), "hello");
        assert_eq!(
            Payload::PathList(vec!["a".into(), "b".into()]).describe(),
            "string[2]"
        );
        assert_eq!(
            Payload::Image(ImageMeta::new(4, 3, "Bgra32")).describe(),
            "4x3 Bgra32"
        );
    }

    #[test]
    fn test_image_meta_properties() {
        let image = ImageMeta::new(640, 480, "Bgr24").with_dpi(72.0, 72.0);
        assert_eq!(image.property("PixelWidth").unwrap(), "640");
        assert_eq!(image.property("DpiY").unwrap(), "72");
        assert!(image.property("Palette").is_err());
    }

    #[test]
    fn test_result_constructors() {
        let failed = FormatResult::retrieval_failed("FileDrop".into(), "busy");
        assert_eq!(failed.retrieval_error(), Some("busy"));
        assert!(failed.value_type_name().is_empty());
        assert!(failed.detail_lines().is_empty());

        let null = FormatResult::null("Locale".into());
        assert!(null.is_null());
    }

    #[test]
    fn test_null_is_not_inferred_from_type_name() {
        let value = FormatResult::value("Custom".into(), "null", "null", vec!["x".to_string()]);
        assert!(!value.is_null());
        assert_eq!(value.detail_lines().len(), 1);
    }

    #[test]
    fn test_options() {
        let default = InspectorOptions::new();
        let verbose = InspectorOptions::verbose();
        assert_eq!(default.text_preview_chars, 200);
        assert!(verbose.text_preview_chars > default.text_preview_chars);
        assert!(default.is_denied("ReadTimeout"));
        assert!(!default.is_denied("Length"));
    }
}
