//! JSON-described data source.
//!
//! A manifest records the formats of a captured payload so that a report
//! can be reproduced without the originating application:
//!
//! ```json
//! {
//!   "label": "DRAG & DROP",
//!   "formats": [
//!     { "name": "Text", "value": { "type": "text", "data": "hello" } },
//!     { "name": "FileContents", "value": { "type": "stream", "hex": "48656c6c6f" } },
//!     { "name": "FileDrop", "error": "Data on clipboard is invalid" }
//!   ]
//! }
//! ```
//!
//! Byte data is hex-encoded. A `file` value opens the file when the format
//! is retrieved, so a missing file fails that format only.

use super::DataSource;
use crate::error::{InspectorError, PropertyError, Result, SourceError};
use crate::introspect::{Property, PropertyBag};
use crate::stream::{ByteStream, MemoryStream, ReaderStream};
use crate::types::{ArrayValue, FormatName, ImageMeta, Payload};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Top-level manifest document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Source label for the report.
    #[serde(default)]
    pub label: Option<String>,
    /// When set, enumerating formats fails with this message.
    #[serde(default)]
    pub enumeration_error: Option<String>,
    /// Formats in source order.
    pub formats: Vec<ManifestEntry>,
}

/// One format of the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Format name.
    pub name: String,
    /// Value or retrieval failure.
    #[serde(flatten)]
    pub content: EntryContent,
}

/// Either a value or a retrieval error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryContent {
    /// The value returned for the format.
    Value(ValueSpec),
    /// Retrieval fails with this message.
    Error(String),
}

/// Serialized form of a [`Payload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueSpec {
    /// Null value.
    Null,
    /// String value.
    Text {
        /// The string.
        data: String,
    },
    /// Path list.
    Paths {
        /// The paths.
        data: Vec<String>,
    },
    /// In-memory bytes.
    Bytes {
        /// Hex-encoded bytes.
        hex: String,
    },
    /// In-memory seekable stream.
    Stream {
        /// Hex-encoded stream content.
        hex: String,
        /// Initial position.
        #[serde(default)]
        position: u64,
    },
    /// A file opened as a stream on retrieval.
    File {
        /// Path, relative to the manifest's directory when not absolute.
        path: PathBuf,
    },
    /// Image metadata.
    Image {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Horizontal resolution.
        #[serde(default = "default_dpi")]
        dpi_x: f64,
        /// Vertical resolution.
        #[serde(default = "default_dpi")]
        dpi_y: f64,
        /// Pixel format name.
        pixel_format: String,
    },
    /// Array of pre-rendered elements.
    Array {
        /// Element type name.
        element_type: String,
        /// Element string forms.
        items: Vec<String>,
    },
    /// Opaque object with properties.
    Object {
        /// Type name.
        type_name: String,
        /// Properties in declaration order.
        #[serde(default)]
        properties: Vec<PropertySpec>,
    },
}

fn default_dpi() -> f64 {
    96.0
}

fn default_true() -> bool {
    true
}

/// Serialized property of an object value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Property name.
    pub name: String,
    /// Rendered value.
    #[serde(default)]
    pub value: Option<String>,
    /// Getter failure message.
    #[serde(default)]
    pub error: Option<String>,
    /// Whether the property has a getter.
    #[serde(default = "default_true")]
    pub readable: bool,
    /// Whether the property is indexed.
    #[serde(default)]
    pub indexed: bool,
}

#[derive(Debug, Clone)]
enum Entry {
    Ready(std::result::Result<Payload, SourceError>),
    File(PathBuf),
}

/// Data source backed by a [`Manifest`].
#[derive(Debug, Clone)]
pub struct ManifestSource {
    label: Option<String>,
    enumeration_error: Option<SourceError>,
    entries: Vec<(FormatName, Entry)>,
}

impl ManifestSource {
    /// Load a manifest file. Relative `file` paths resolve against its
    /// directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&text, base)
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str, base_dir: &Path) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        Self::from_manifest(manifest, base_dir)
    }

    /// Build from an already-parsed manifest.
    pub fn from_manifest(manifest: Manifest, base_dir: &Path) -> Result<Self> {
        let entries = manifest
            .formats
            .into_iter()
            .map(|entry| -> Result<(FormatName, Entry)> {
                let content = match entry.content {
                    EntryContent::Error(message) => Entry::Ready(Err(SourceError::new(message))),
                    EntryContent::Value(ValueSpec::File { path }) => {
                        Entry::File(base_dir.join(path))
                    }
                    EntryContent::Value(spec) => {
                        Entry::Ready(Ok(build_payload(&entry.name, spec)?))
                    }
                };
                Ok((FormatName::new(entry.name), content))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(formats = entries.len(), "loaded payload manifest");

        Ok(Self {
            label: manifest.label,
            enumeration_error: manifest.enumeration_error.map(SourceError::new),
            entries,
        })
    }

    /// Label recorded in the manifest, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

fn build_payload(format: &str, spec: ValueSpec) -> Result<Payload> {
    let decode = |hex_text: &str| {
        hex::decode(hex_text.trim()).map_err(|e| InspectorError::Manifest {
            message: format!("format '{format}': invalid hex data: {e}"),
        })
    };

    Ok(match spec {
        ValueSpec::Null => Payload::Null,
        ValueSpec::Text { data } => Payload::Text(data),
        ValueSpec::Paths { data } => Payload::PathList(data),
        ValueSpec::Bytes { hex } => Payload::RawBytes(decode(&hex)?),
        ValueSpec::Stream { hex, position } => {
            let stream = MemoryStream::new(decode(&hex)?);
            stream.set_position(position)?;
            Payload::stream(stream)
        }
        ValueSpec::File { .. } => {
            return Err(InspectorError::Manifest {
                message: format!("format '{format}': file values are opened on retrieval"),
            })
        }
        ValueSpec::Image {
            width,
            height,
            dpi_x,
            dpi_y,
            pixel_format,
        } => Payload::Image(ImageMeta::new(width, height, pixel_format).with_dpi(dpi_x, dpi_y)),
        ValueSpec::Array {
            element_type,
            items,
        } => Payload::Array(ArrayValue::new(element_type, items)),
        ValueSpec::Object {
            type_name,
            properties,
        } => {
            let mut bag = PropertyBag::new(type_name);
            for prop in properties {
                let value = match (prop.value, prop.error) {
                    (_, Some(error)) => Err(PropertyError::new(error)),
                    (Some(value), None) => Ok(value),
                    (None, None) => {
                        return Err(InspectorError::Manifest {
                            message: format!(
                                "format '{format}': property '{}' has neither value nor error",
                                prop.name
                            ),
                        })
                    }
                };
                let descriptor = Property {
                    name: prop.name,
                    readable: prop.readable,
                    indexed: prop.indexed,
                };
                bag = bag.with_property(descriptor, value);
            }
            Payload::object(bag)
        }
    })
}

impl DataSource for ManifestSource {
    fn list_formats(&self) -> std::result::Result<Vec<FormatName>, SourceError> {
        if let Some(err) = &self.enumeration_error {
            return Err(err.clone());
        }
        Ok(self.entries.iter().map(|(name, _)| name.clone()).collect())
    }

    fn get_value(&self, format: &FormatName) -> std::result::Result<Payload, SourceError> {
        let (_, entry) = self
            .entries
            .iter()
            .find(|(name, _)| name == format)
            .ok_or_else(|| SourceError::format_not_present(format))?;

        match entry {
            Entry::Ready(value) => value.clone(),
            Entry::File(path) => {
                let file = File::open(path)
                    .map_err(|e| SourceError::new(format!("{}: {e}", path.display())))?;
                Ok(Payload::stream(ReaderStream::new(file, "FileStream")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "label": "DRAG & DROP",
        "formats": [
            { "name": "Text", "value": { "type": "text", "data": "hello" } },
            { "name": "FileDrop", "error": "Data on clipboard is invalid" },
            { "name": "Preferred DropEffect", "value": { "type": "stream", "hex": "05000000", "position": 2 } },
            { "name": "Locale", "value": { "type": "null" } },
            { "name": "Shell Object", "value": { "type": "object", "type_name": "ComObject",
                "properties": [
                    { "name": "Id", "value": "7" },
                    { "name": "Handle", "error": "disposed" },
                    { "name": "Item", "value": "x", "indexed": true }
                ] } },
            { "name": "Bitmap", "value": { "type": "image", "width": 10, "height": 20, "pixel_format": "Bgr32" } }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let source = ManifestSource::from_json(SAMPLE, Path::new(".")).unwrap();
        assert_eq!(source.label(), Some("DRAG & DROP"));

        let formats = source.list_formats().unwrap();
        assert_eq!(formats.len(), 6);
        assert_eq!(formats[2].as_str(), "Preferred DropEffect");

        assert_eq!(source.get_value(&"text".into()).unwrap().describe(), "hello");
        assert_eq!(
            source.get_value(&"FileDrop".into()).unwrap_err().message(),
            "Data on clipboard is invalid"
        );
        assert!(source.get_value(&"Locale".into()).unwrap().is_null());

        match source.get_value(&"Preferred DropEffect".into()).unwrap() {
            Payload::Stream(stream) => {
                assert_eq!(stream.len().unwrap(), 4);
                assert_eq!(stream.position().unwrap(), 2);
            }
            other => panic!("unexpected payload {other:?}"),
        }

        match source.get_value(&"Bitmap".into()).unwrap() {
            Payload::Image(meta) => assert_eq!(meta.dpi_x, 96.0),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_invalid_hex_rejected() {
        let json = r#"{ "formats": [ { "name": "X", "value": { "type": "bytes", "hex": "zz" } } ] }"#;
        let err = ManifestSource::from_json(json, Path::new(".")).unwrap_err();
        assert!(matches!(err, InspectorError::Manifest { .. }));
    }

    #[test]
    fn test_property_without_value_rejected() {
        let json = r#"{ "formats": [ { "name": "X", "value": { "type": "object", "type_name": "T",
            "properties": [ { "name": "P" } ] } } ] }"#;
        assert!(ManifestSource::from_json(json, Path::new(".")).is_err());
    }

    #[test]
    fn test_file_value_opened_on_retrieval() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("payload.bin")).unwrap();
        file.write_all(b"abc").unwrap();

        let json = r#"{ "formats": [
            { "name": "FileContents", "value": { "type": "file", "path": "payload.bin" } },
            { "name": "Other", "value": { "type": "file", "path": "missing.bin" } }
        ] }"#;
        let source = ManifestSource::from_json(json, dir.path()).unwrap();

        match source.get_value(&"FileContents".into()).unwrap() {
            Payload::Stream(stream) => {
                assert_eq!(stream.type_name(), "FileStream");
                assert_eq!(stream.len().unwrap(), 3);
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert!(source.get_value(&"Other".into()).is_err());
    }

    #[test]
    fn test_enumeration_error() {
        let json = r#"{ "enumeration_error": "OpenClipboard failed", "formats": [] }"#;
        let source = ManifestSource::from_json(json, Path::new(".")).unwrap();
        assert_eq!(
            source.list_formats().unwrap_err().message(),
            "OpenClipboard failed"
        );
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let source = ManifestSource::load(&path).unwrap();
        assert_eq!(source.list_formats().unwrap().len(), 6);
    }
}
