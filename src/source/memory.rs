//! In-memory data source.

use super::DataSource;
use crate::error::SourceError;
use crate::types::{FormatName, Payload};

/// Data source assembled in code.
///
/// Lookup is case-insensitive; when a name appears more than once the first
/// entry answers.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<(FormatName, Result<Payload, SourceError>)>,
    enumeration_error: Option<SourceError>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a format with a value.
    #[must_use]
    pub fn with_payload(mut self, format: impl Into<FormatName>, payload: Payload) -> Self {
        self.entries.push((format.into(), Ok(payload)));
        self
    }

    /// Add a string-valued format.
    #[must_use]
    pub fn with_text(self, format: impl Into<FormatName>, text: impl Into<String>) -> Self {
        self.with_payload(format, Payload::Text(text.into()))
    }

    /// Add a path-list format.
    #[must_use]
    pub fn with_paths<S: Into<String>>(
        self,
        format: impl Into<FormatName>,
        paths: impl IntoIterator<Item = S>,
    ) -> Self {
        let paths = paths.into_iter().map(Into::into).collect();
        self.with_payload(format, Payload::PathList(paths))
    }

    /// Add a format whose retrieval fails.
    #[must_use]
    pub fn with_error(mut self, format: impl Into<FormatName>, message: impl Into<String>) -> Self {
        self.entries
            .push((format.into(), Err(SourceError::new(message))));
        self
    }

    /// Make format enumeration itself fail.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.enumeration_error = Some(SourceError::new(message));
        self
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no formats were added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DataSource for MemorySource {
    fn list_formats(&self) -> Result<Vec<FormatName>, SourceError> {
        if let Some(err) = &self.enumeration_error {
            return Err(err.clone());
        }
        Ok(self.entries.iter().map(|(name, _)| name.clone()).collect())
    }

    fn get_value(&self, format: &FormatName) -> Result<Payload, SourceError> {
        self.entries
            .iter()
            .find(|(name, _)| name == format)
            .map_or_else(
                || Err(SourceError::format_not_present(format)),
                |(_, value)| value.clone(),
            )
    }
}
