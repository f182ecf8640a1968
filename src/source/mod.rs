//! Data-transfer sources.
//!
//! A [`DataSource`] exposes the named formats of one clipboard or
//! drag-and-drop payload and the value behind each. The inspector only
//! borrows a source for the duration of one analysis.
//!
//! Bundled implementations:
//! - [`MemorySource`]: built in code, used by tests and embedders
//! - [`ManifestSource`]: loaded from a JSON description
//! - [`ClipboardSource`]: the system clipboard (feature `clipboard`)

pub mod manifest;
pub mod memory;

#[cfg(feature = "clipboard")]
pub mod clipboard;

pub use manifest::ManifestSource;
pub use memory::MemorySource;

#[cfg(feature = "clipboard")]
pub use clipboard::ClipboardSource;

use crate::error::SourceError;
use crate::types::{FormatName, Payload};
use std::path::Path;

/// Label used for clipboard reports.
pub const CLIPBOARD_LABEL: &str = "CLIPBOARD";

/// Label used for drag-and-drop reports.
pub const DRAG_DROP_LABEL: &str = "DRAG & DROP";

/// Format name under which a file drop exposes its paths.
pub const FILE_DROP_FORMAT: &str = "FileDrop";

/// Capability to list formats and retrieve their values.
pub trait DataSource {
    /// Formats offered, in the source's order. Duplicates are allowed.
    fn list_formats(&self) -> Result<Vec<FormatName>, SourceError>;

    /// Retrieve the value for one format.
    fn get_value(&self, format: &FormatName) -> Result<Payload, SourceError>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn list_formats(&self) -> Result<Vec<FormatName>, SourceError> {
        (**self).list_formats()
    }

    fn get_value(&self, format: &FormatName) -> Result<Payload, SourceError> {
        (**self).get_value(format)
    }
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn list_formats(&self) -> Result<Vec<FormatName>, SourceError> {
        (**self).list_formats()
    }

    fn get_value(&self, format: &FormatName) -> Result<Payload, SourceError> {
        (**self).get_value(format)
    }
}

/// A source shaped like a file drop from a file manager.
pub fn drop_source<P: AsRef<Path>>(paths: &[P]) -> MemorySource {
    let paths = paths
        .iter()
        .map(|p| p.as_ref().to_string_lossy().into_owned())
        .collect();
    MemorySource::new().with_payload(FILE_DROP_FORMAT, Payload::PathList(paths))
}
