//! System clipboard source, backed by `arboard`.
//!
//! `arboard` exposes the clipboard as text and RGBA images only, so the
//! formats offered are a projection: `UnicodeText` and `Text` when text is
//! present, `Bitmap` when an image is present.

use super::DataSource;
use crate::error::{InspectorError, Result, SourceError};
use crate::types::{FormatName, ImageMeta, Payload};
use arboard::Clipboard;
use std::cell::RefCell;

const TEXT_FORMATS: &[&str] = &["UnicodeText", "Text"];
const BITMAP_FORMAT: &str = "Bitmap";

/// Data source reading the system clipboard.
pub struct ClipboardSource {
    clipboard: RefCell<Clipboard>,
}

impl ClipboardSource {
    /// Open the system clipboard.
    pub fn open() -> Result<Self> {
        let clipboard = Clipboard::new().map_err(|e| InspectorError::Clipboard {
            message: e.to_string(),
        })?;
        Ok(Self {
            clipboard: RefCell::new(clipboard),
        })
    }
}

impl std::fmt::Debug for ClipboardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardSource").finish_non_exhaustive()
    }
}

fn is_content_missing(err: &arboard::Error) -> bool {
    matches!(err, arboard::Error::ContentNotAvailable)
}

impl DataSource for ClipboardSource {
    fn list_formats(&self) -> std::result::Result<Vec<FormatName>, SourceError> {
        let mut clipboard = self.clipboard.borrow_mut();
        let mut formats = Vec::new();

        match clipboard.get_text() {
            Ok(_) => formats.extend(TEXT_FORMATS.iter().copied().map(FormatName::from)),
            Err(e) if is_content_missing(&e) => {}
            Err(e) => return Err(SourceError::new(e.to_string())),
        }
        match clipboard.get_image() {
            Ok(_) => formats.push(FormatName::from(BITMAP_FORMAT)),
            Err(e) if is_content_missing(&e) => {}
            Err(e) => return Err(SourceError::new(e.to_string())),
        }

        Ok(formats)
    }

    fn get_value(&self, format: &FormatName) -> std::result::Result<Payload, SourceError> {
        let mut clipboard = self.clipboard.borrow_mut();

        if TEXT_FORMATS.iter().any(|name| format == name) {
            return clipboard
                .get_text()
                .map(Payload::Text)
                .map_err(|e| SourceError::new(e.to_string()));
        }
        if format == BITMAP_FORMAT {
            let image = clipboard
                .get_image()
                .map_err(|e| SourceError::new(e.to_string()))?;
            let width = u32::try_from(image.width).unwrap_or(u32::MAX);
            let height = u32::try_from(image.height).unwrap_or(u32::MAX);
            return Ok(Payload::Image(ImageMeta::new(width, height, "Rgba32")));
        }

        Err(SourceError::format_not_present(format))
    }
}
